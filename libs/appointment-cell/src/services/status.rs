use tracing::{info, instrument};

use shared_database::{db_error, queries, Database};
use shared_models::{AppError, AppointmentStatus};

use crate::models::AppointmentError;
use crate::services::lifecycle::AppointmentLifecycle;

pub struct StatusService<'a> {
    db: &'a Database,
    lifecycle: AppointmentLifecycle,
}

impl<'a> StatusService<'a> {
    pub fn new(db: &'a Database, lifecycle: AppointmentLifecycle) -> Self {
        Self { db, lifecycle }
    }

    /// Sets the status of an appointment. Unknown values and disallowed
    /// transitions leave the stored status untouched.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        appointment_id: i64,
        raw_status: Option<&str>,
    ) -> Result<AppointmentStatus, AppError> {
        let next = AppointmentLifecycle::parse_status(raw_status)?;

        let mut tx = self.db.begin().await?;

        let appointment = queries::find_appointment(&mut *tx, appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        self.lifecycle.validate_transition(appointment.status, next)?;

        sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
            .bind(next)
            .bind(appointment.id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!(
            "Appointment {} status {} -> {}",
            appointment.id, appointment.status, next
        );
        Ok(next)
    }
}
