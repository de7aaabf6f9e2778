use tracing::{info, instrument};

use shared_database::{db_error, queries, Database, DirectoryQueries};
use shared_models::{is_weekday_name, AppError};
use shared_utils::form::{optional_id, parse_hh_mm, required, required_id};

use crate::models::{ScheduleForm, ScheduleOverview};

const SCHEDULE_FIELDS_REQUIRED: &str = "Doctor, day, start time and end time are required.";

fn schedule_not_found() -> AppError {
    AppError::NotFound("Schedule not found.".to_string())
}

pub struct ScheduleService<'a> {
    db: &'a Database,
}

impl<'a> ScheduleService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn overview(&self) -> Result<ScheduleOverview, AppError> {
        let directory = DirectoryQueries::new(self.db.pool());
        Ok(ScheduleOverview {
            schedules: directory.schedules().await?,
            doctors: directory.doctors().await?,
        })
    }

    /// Creates a weekly slot, or updates one when `schedule_id` is given.
    /// Returns the schedule id.
    #[instrument(skip(self, form), fields(schedule_id = ?form.schedule_id))]
    pub async fn save_schedule(&self, form: &ScheduleForm) -> Result<i64, AppError> {
        required(&form.doctor_id, SCHEDULE_FIELDS_REQUIRED)?;
        let day_of_week = required(&form.day_of_week, SCHEDULE_FIELDS_REQUIRED)?;
        let start_raw = required(&form.start_time, SCHEDULE_FIELDS_REQUIRED)?;
        let end_raw = required(&form.end_time, SCHEDULE_FIELDS_REQUIRED)?;
        let doctor_id = required_id(&form.doctor_id, "doctor_id")?;
        let schedule_id = optional_id(&form.schedule_id, "schedule_id")?;

        let start_time = parse_hh_mm(start_raw)?;
        let end_time = parse_hh_mm(end_raw)?;
        if end_time <= start_time {
            return Err(AppError::ValidationError(
                "End time must be after start time.".to_string(),
            ));
        }
        if !is_weekday_name(day_of_week) {
            return Err(AppError::ValidationError(format!(
                "Invalid day of week: {}.",
                day_of_week
            )));
        }

        let mut tx = self.db.begin().await?;

        if queries::find_doctor(&mut *tx, doctor_id).await?.is_none() {
            return Err(AppError::NotFound("Doctor not found.".to_string()));
        }

        let id = match schedule_id {
            Some(schedule_id) => {
                queries::find_schedule(&mut *tx, schedule_id)
                    .await?
                    .ok_or_else(schedule_not_found)?;

                sqlx::query(
                    r#"
                    UPDATE doctor_schedules
                    SET doctor_id = ?, day_of_week = ?, start_time = ?, end_time = ?
                    WHERE id = ?
                    "#,
                )
                .bind(doctor_id)
                .bind(day_of_week)
                .bind(start_time)
                .bind(end_time)
                .bind(schedule_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;

                schedule_id
            }
            None => sqlx::query_scalar(
                r#"
                INSERT INTO doctor_schedules (doctor_id, day_of_week, start_time, end_time)
                VALUES (?, ?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(doctor_id)
            .bind(day_of_week)
            .bind(start_time)
            .bind(end_time)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error)?,
        };

        tx.commit().await.map_err(db_error)?;

        info!(
            "Saved schedule {} for doctor {}: {} {}-{}",
            id, doctor_id, day_of_week, start_time, end_time
        );
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn delete_schedule(&self, schedule_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM doctor_schedules WHERE id = ?")
            .bind(schedule_id)
            .execute(self.db.pool())
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(schedule_not_found());
        }

        info!("Deleted schedule {}", schedule_id);
        Ok(())
    }
}
