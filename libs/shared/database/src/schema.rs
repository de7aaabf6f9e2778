use sqlx::SqlitePool;
use tracing::info;

use shared_models::AppError;

use crate::error::db_error;

const TABLES: [&str; 7] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL UNIQUE,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        is_active BOOLEAN NOT NULL DEFAULT 1,
        role TEXT NOT NULL DEFAULT 'patient' CHECK (role IN ('patient', 'doctor', 'admin')),
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS departments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS doctors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
        specialization_id INTEGER NOT NULL REFERENCES departments(id),
        contact_number TEXT,
        licence_number TEXT UNIQUE,
        is_blacklisted BOOLEAN NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS doctor_schedules (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        doctor_id INTEGER NOT NULL REFERENCES doctors(id),
        day_of_week TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        CHECK (end_time > start_time)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS patients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
        date_of_birth TEXT,
        contact_number TEXT,
        medical_history_summary TEXT,
        is_blacklisted BOOLEAN NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        patient_id INTEGER NOT NULL REFERENCES patients(id),
        doctor_id INTEGER NOT NULL REFERENCES doctors(id),
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Booked'
            CHECK (status IN ('Booked', 'Confirmed', 'Canceled', 'Completed')),
        CHECK (end_time > start_time)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS treatments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        appointment_id INTEGER NOT NULL UNIQUE REFERENCES appointments(id),
        diagnosis TEXT NOT NULL,
        prescription TEXT NOT NULL,
        notes TEXT,
        created_by_doctor_id INTEGER NOT NULL REFERENCES doctors(id)
    )
    "#,
];

const INDEXES: [&str; 5] = [
    "CREATE INDEX IF NOT EXISTS idx_doctors_specialization_id ON doctors(specialization_id)",
    "CREATE INDEX IF NOT EXISTS idx_doctor_schedules_doctor_id ON doctor_schedules(doctor_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_patient_id ON appointments(patient_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_doctor_id ON appointments(doctor_id)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_start_time ON appointments(start_time)",
];

/// Creates every table and index that does not exist yet.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), AppError> {
    for table_sql in TABLES {
        sqlx::query(table_sql).execute(pool).await.map_err(db_error)?;
    }

    for index_sql in INDEXES {
        sqlx::query(index_sql).execute(pool).await.map_err(db_error)?;
    }

    info!("Database schema is up to date");
    Ok(())
}
