//! Hard deletes of a profile together with everything that hangs off it.
//! Callers run these inside their request transaction.

use sqlx::SqliteConnection;
use tracing::info;

use shared_models::AppError;

use crate::error::db_error;

/// Deletes a doctor's treatments, appointments and schedules, then the
/// doctor row and finally the owning user.
pub async fn delete_doctor_cascade(
    conn: &mut SqliteConnection,
    doctor_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        DELETE FROM treatments
        WHERE created_by_doctor_id = ?1
           OR appointment_id IN (SELECT id FROM appointments WHERE doctor_id = ?1)
        "#,
    )
    .bind(doctor_id)
    .execute(&mut *conn)
    .await
    .map_err(db_error)?;

    sqlx::query("DELETE FROM appointments WHERE doctor_id = ?")
        .bind(doctor_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    sqlx::query("DELETE FROM doctor_schedules WHERE doctor_id = ?")
        .bind(doctor_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    sqlx::query("DELETE FROM doctors WHERE id = ?")
        .bind(doctor_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    info!("Removed doctor {} and user {}", doctor_id, user_id);
    Ok(())
}

/// Deletes a patient's treatments and appointments, then the patient row and
/// the owning user.
pub async fn delete_patient_cascade(
    conn: &mut SqliteConnection,
    patient_id: i64,
    user_id: i64,
) -> Result<(), AppError> {
    sqlx::query(
        "DELETE FROM treatments WHERE appointment_id IN (SELECT id FROM appointments WHERE patient_id = ?)",
    )
    .bind(patient_id)
    .execute(&mut *conn)
    .await
    .map_err(db_error)?;

    sqlx::query("DELETE FROM appointments WHERE patient_id = ?")
        .bind(patient_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    sqlx::query("DELETE FROM patients WHERE id = ?")
        .bind(patient_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error)?;

    info!("Removed patient {} and user {}", patient_id, user_id);
    Ok(())
}
