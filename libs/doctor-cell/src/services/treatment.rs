use tracing::{info, instrument};

use shared_database::{db_error, queries, Database};
use shared_models::{AppError, AppointmentStatus, Treatment};
use shared_utils::form::{required, text};

use crate::models::TreatmentForm;

pub struct TreatmentService<'a> {
    db: &'a Database,
}

impl<'a> TreatmentService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Writes the treatment for one of the doctor's appointments, replacing
    /// any earlier record, and completes the appointment.
    #[instrument(skip(self, form))]
    pub async fn record(
        &self,
        doctor_user_id: i64,
        appointment_id: i64,
        form: &TreatmentForm,
    ) -> Result<Treatment, AppError> {
        const REQUIRED: &str = "Diagnosis and prescription are required.";
        let diagnosis = required(&form.diagnosis, REQUIRED)?;
        let prescription = required(&form.prescription, REQUIRED)?;

        let mut tx = self.db.begin().await?;

        let doctor = queries::find_doctor_by_user(&mut *tx, doctor_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Doctor profile not found.".to_string()))?;
        let appointment = queries::find_appointment(&mut *tx, appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found.".to_string()))?;

        if appointment.doctor_id != doctor.id {
            return Err(AppError::Forbidden(
                "You can only record treatments for your own appointments.".to_string(),
            ));
        }
        if appointment.status == AppointmentStatus::Canceled {
            return Err(AppError::ValidationError(
                "Cannot record a treatment for a canceled appointment.".to_string(),
            ));
        }

        let treatment = sqlx::query_as::<_, Treatment>(
            r#"
            INSERT INTO treatments (appointment_id, diagnosis, prescription, notes, created_by_doctor_id)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (appointment_id) DO UPDATE SET
                diagnosis = excluded.diagnosis,
                prescription = excluded.prescription,
                notes = excluded.notes,
                created_by_doctor_id = excluded.created_by_doctor_id
            RETURNING *
            "#,
        )
        .bind(appointment.id)
        .bind(diagnosis)
        .bind(prescription)
        .bind(text(&form.notes))
        .bind(doctor.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
            .bind(AppointmentStatus::Completed)
            .bind(appointment.id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!(
            "Doctor {} recorded treatment {} for appointment {}",
            doctor.id, treatment.id, appointment.id
        );
        Ok(treatment)
    }
}
