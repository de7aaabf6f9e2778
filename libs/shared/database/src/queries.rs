//! Read queries shared by the cells. Entity lookups accept any executor so
//! they can run on the pool or inside a request transaction; the directory
//! listings always read from the pool.

use sqlx::{Executor, Sqlite, SqlitePool};

use shared_models::{
    Appointment, AppointmentListing, Department, Doctor, DoctorListing, DoctorSchedule, Patient,
    PatientListing, ScheduleListing, Treatment, User,
};
use shared_models::AppError;

use crate::error::db_error;

const DOCTOR_LISTING: &str = r#"
    SELECT d.id AS doctor_id, u.id AS user_id, u.full_name, u.username, u.email,
           dep.id AS department_id, dep.name AS department,
           d.contact_number, d.licence_number, d.is_blacklisted
    FROM doctors d
    JOIN users u ON u.id = d.user_id
    JOIN departments dep ON dep.id = d.specialization_id
"#;

const PATIENT_LISTING: &str = r#"
    SELECT p.id AS patient_id, u.id AS user_id, u.full_name, u.username, u.email,
           p.contact_number, p.date_of_birth, p.medical_history_summary, p.is_blacklisted
    FROM patients p
    JOIN users u ON u.id = p.user_id
"#;

const SCHEDULE_LISTING: &str = r#"
    SELECT s.id, s.doctor_id, u.full_name AS doctor_name, s.day_of_week, s.start_time, s.end_time
    FROM doctor_schedules s
    JOIN doctors d ON d.id = s.doctor_id
    JOIN users u ON u.id = d.user_id
"#;

const SCHEDULE_ORDER: &str = r#"
    ORDER BY u.full_name,
             CASE s.day_of_week
                 WHEN 'Monday' THEN 1 WHEN 'Tuesday' THEN 2 WHEN 'Wednesday' THEN 3
                 WHEN 'Thursday' THEN 4 WHEN 'Friday' THEN 5 WHEN 'Saturday' THEN 6
                 WHEN 'Sunday' THEN 7 ELSE 8
             END,
             s.start_time
"#;

const APPOINTMENT_LISTING: &str = r#"
    SELECT a.id, a.patient_id, pu.full_name AS patient_name,
           a.doctor_id, du.full_name AS doctor_name, dep.name AS department,
           a.start_time, a.end_time, a.status
    FROM appointments a
    JOIN patients p ON p.id = a.patient_id
    JOIN users pu ON pu.id = p.user_id
    JOIN doctors d ON d.id = a.doctor_id
    JOIN users du ON du.id = d.user_id
    JOIN departments dep ON dep.id = d.specialization_id
"#;

/// Wraps a free-text term for a case-insensitive `LIKE ... ESCAPE '\'`.
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

// ========== entity lookups ==========

pub async fn find_user<'e, E>(executor: E, user_id: i64) -> Result<Option<User>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
}

pub async fn find_user_by_username<'e, E>(
    executor: E,
    username: &str,
) -> Result<Option<User>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
}

/// Whether any user other than `except_user_id` already uses this username or email.
pub async fn username_or_email_taken<'e, E>(
    executor: E,
    username: &str,
    email: &str,
    except_user_id: Option<i64>,
) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM users WHERE (username = ?1 OR email = ?2) AND id IS NOT ?3",
    )
    .bind(username)
    .bind(email)
    .bind(except_user_id)
    .fetch_one(executor)
    .await
    .map_err(db_error)?;

    Ok(count > 0)
}

pub async fn email_taken<'e, E>(
    executor: E,
    email: &str,
    except_user_id: Option<i64>,
) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?1 AND id IS NOT ?2")
            .bind(email)
            .bind(except_user_id)
            .fetch_one(executor)
            .await
            .map_err(db_error)?;

    Ok(count > 0)
}

pub async fn find_doctor<'e, E>(executor: E, doctor_id: i64) -> Result<Option<Doctor>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE id = ?")
        .bind(doctor_id)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
}

pub async fn find_doctor_by_user<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Option<Doctor>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Doctor>("SELECT * FROM doctors WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
}

pub async fn find_patient<'e, E>(executor: E, patient_id: i64) -> Result<Option<Patient>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = ?")
        .bind(patient_id)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
}

pub async fn find_patient_by_user<'e, E>(
    executor: E,
    user_id: i64,
) -> Result<Option<Patient>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
}

pub async fn find_schedule<'e, E>(
    executor: E,
    schedule_id: i64,
) -> Result<Option<DoctorSchedule>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, DoctorSchedule>("SELECT * FROM doctor_schedules WHERE id = ?")
        .bind(schedule_id)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
}

pub async fn find_appointment<'e, E>(
    executor: E,
    appointment_id: i64,
) -> Result<Option<Appointment>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = ?")
        .bind(appointment_id)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
}

pub async fn find_treatment_for_appointment<'e, E>(
    executor: E,
    appointment_id: i64,
) -> Result<Option<Treatment>, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, Treatment>("SELECT * FROM treatments WHERE appointment_id = ?")
        .bind(appointment_id)
        .fetch_optional(executor)
        .await
        .map_err(db_error)
}

// ========== directory listings ==========

/// Joined read views over the pool.
pub struct DirectoryQueries<'a> {
    pool: &'a SqlitePool,
}

impl<'a> DirectoryQueries<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn departments(&self) -> Result<Vec<Department>, AppError> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name")
            .fetch_all(self.pool)
            .await
            .map_err(db_error)
    }

    pub async fn doctors(&self) -> Result<Vec<DoctorListing>, AppError> {
        sqlx::query_as::<_, DoctorListing>(&format!("{} ORDER BY u.full_name", DOCTOR_LISTING))
            .fetch_all(self.pool)
            .await
            .map_err(db_error)
    }

    pub async fn bookable_doctors(&self) -> Result<Vec<DoctorListing>, AppError> {
        sqlx::query_as::<_, DoctorListing>(&format!(
            "{} WHERE d.is_blacklisted = 0 AND u.is_active = 1 ORDER BY dep.name, u.full_name",
            DOCTOR_LISTING
        ))
        .fetch_all(self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn doctor(&self, doctor_id: i64) -> Result<Option<DoctorListing>, AppError> {
        sqlx::query_as::<_, DoctorListing>(&format!("{} WHERE d.id = ?", DOCTOR_LISTING))
            .bind(doctor_id)
            .fetch_optional(self.pool)
            .await
            .map_err(db_error)
    }

    pub async fn patients(&self) -> Result<Vec<PatientListing>, AppError> {
        sqlx::query_as::<_, PatientListing>(&format!("{} ORDER BY u.full_name", PATIENT_LISTING))
            .fetch_all(self.pool)
            .await
            .map_err(db_error)
    }

    pub async fn patient(&self, patient_id: i64) -> Result<Option<PatientListing>, AppError> {
        sqlx::query_as::<_, PatientListing>(&format!("{} WHERE p.id = ?", PATIENT_LISTING))
            .bind(patient_id)
            .fetch_optional(self.pool)
            .await
            .map_err(db_error)
    }

    /// All schedules, ordered by doctor name then weekday.
    pub async fn schedules(&self) -> Result<Vec<ScheduleListing>, AppError> {
        sqlx::query_as::<_, ScheduleListing>(&format!("{} {}", SCHEDULE_LISTING, SCHEDULE_ORDER))
            .fetch_all(self.pool)
            .await
            .map_err(db_error)
    }

    pub async fn schedules_for_doctor(
        &self,
        doctor_id: i64,
    ) -> Result<Vec<ScheduleListing>, AppError> {
        sqlx::query_as::<_, ScheduleListing>(&format!(
            "{} WHERE s.doctor_id = ? {}",
            SCHEDULE_LISTING, SCHEDULE_ORDER
        ))
        .bind(doctor_id)
        .fetch_all(self.pool)
        .await
        .map_err(db_error)
    }

    /// All appointments, newest first.
    pub async fn appointments(&self) -> Result<Vec<AppointmentListing>, AppError> {
        sqlx::query_as::<_, AppointmentListing>(&format!(
            "{} ORDER BY a.start_time DESC",
            APPOINTMENT_LISTING
        ))
        .fetch_all(self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn appointments_for_doctor(
        &self,
        doctor_id: i64,
    ) -> Result<Vec<AppointmentListing>, AppError> {
        sqlx::query_as::<_, AppointmentListing>(&format!(
            "{} WHERE a.doctor_id = ? ORDER BY a.start_time DESC",
            APPOINTMENT_LISTING
        ))
        .bind(doctor_id)
        .fetch_all(self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn appointments_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<AppointmentListing>, AppError> {
        sqlx::query_as::<_, AppointmentListing>(&format!(
            "{} WHERE a.patient_id = ? ORDER BY a.start_time DESC",
            APPOINTMENT_LISTING
        ))
        .bind(patient_id)
        .fetch_all(self.pool)
        .await
        .map_err(db_error)
    }

    pub async fn treatments_by_doctor(&self, doctor_id: i64) -> Result<Vec<Treatment>, AppError> {
        sqlx::query_as::<_, Treatment>(
            "SELECT * FROM treatments WHERE created_by_doctor_id = ? ORDER BY id DESC",
        )
        .bind(doctor_id)
        .fetch_all(self.pool)
        .await
        .map_err(db_error)
    }

    /// Doctors whose name or department contains `term`, ignoring case.
    pub async fn search_doctors(&self, term: &str) -> Result<Vec<DoctorListing>, AppError> {
        sqlx::query_as::<_, DoctorListing>(&format!(
            r#"{} WHERE LOWER(u.full_name) LIKE ?1 ESCAPE '\'
                  OR LOWER(dep.name) LIKE ?1 ESCAPE '\'
               ORDER BY u.full_name"#,
            DOCTOR_LISTING
        ))
        .bind(like_pattern(term))
        .fetch_all(self.pool)
        .await
        .map_err(db_error)
    }

    /// Patients whose name or contact number contains `term`, ignoring case,
    /// plus the patient whose id equals `patient_id` when given.
    pub async fn search_patients(
        &self,
        term: &str,
        patient_id: Option<i64>,
    ) -> Result<Vec<PatientListing>, AppError> {
        sqlx::query_as::<_, PatientListing>(&format!(
            r#"{} WHERE LOWER(u.full_name) LIKE ?1 ESCAPE '\'
                  OR LOWER(COALESCE(p.contact_number, '')) LIKE ?1 ESCAPE '\'
                  OR p.id = ?2
               ORDER BY u.full_name"#,
            PATIENT_LISTING
        ))
        .bind(like_pattern(term))
        .bind(patient_id)
        .fetch_all(self.pool)
        .await
        .map_err(db_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Card"), "%card%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
