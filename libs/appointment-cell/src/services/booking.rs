use chrono::{Local, NaiveDateTime};
use sqlx::SqliteConnection;
use tracing::{debug, info, instrument, warn};

use shared_database::{db_error, queries, Database};
use shared_models::{Appointment, AppError, AppointmentStatus, DoctorSchedule};

use crate::models::{AppointmentError, BookingRequest};

/// Whether `[start, end)` lies on a single day inside one of the weekly
/// slots. Slots for other weekdays never match.
pub fn fits_schedule(
    schedules: &[DoctorSchedule],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> bool {
    if start.date() != end.date() {
        return false;
    }
    let weekday = start.format("%A").to_string();

    schedules.iter().any(|slot| {
        slot.day_of_week == weekday && slot.start_time <= start.time() && end.time() <= slot.end_time
    })
}

pub struct BookingService<'a> {
    db: &'a Database,
}

impl<'a> BookingService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn book(
        &self,
        patient_user_id: i64,
        request: BookingRequest,
    ) -> Result<Appointment, AppError> {
        self.book_at(patient_user_id, request, Local::now().naive_local())
            .await
    }

    /// Books `request` for the patient owned by `patient_user_id`, taking
    /// `now` as the current wall-clock time.
    #[instrument(skip(self))]
    pub async fn book_at(
        &self,
        patient_user_id: i64,
        request: BookingRequest,
        now: NaiveDateTime,
    ) -> Result<Appointment, AppError> {
        if request.end_time <= request.start_time {
            return Err(AppointmentError::EndBeforeStart.into());
        }
        if request.start_time <= now {
            return Err(AppointmentError::InThePast.into());
        }

        let mut tx = self.db.begin().await?;

        let patient = queries::find_patient_by_user(&mut *tx, patient_user_id)
            .await?
            .ok_or(AppointmentError::PatientNotFound)?;
        if patient.is_blacklisted {
            warn!("Blacklisted patient {} tried to book", patient.id);
            return Err(AppointmentError::PatientBlacklisted.into());
        }

        let doctor = queries::find_doctor(&mut *tx, request.doctor_id)
            .await?
            .ok_or(AppointmentError::DoctorNotFound)?;
        if doctor.is_blacklisted {
            return Err(AppointmentError::DoctorBlacklisted.into());
        }

        let schedules = doctor_schedules(&mut tx, doctor.id).await?;
        if !fits_schedule(&schedules, request.start_time, request.end_time) {
            return Err(AppointmentError::OutsideSchedule.into());
        }

        if has_overlap(&mut tx, doctor.id, request.start_time, request.end_time).await? {
            debug!("Slot already taken for doctor {}", doctor.id);
            return Err(AppointmentError::ConflictDetected.into());
        }

        let appointment = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (patient_id, doctor_id, start_time, end_time, status)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(patient.id)
        .bind(doctor.id)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(AppointmentStatus::Booked)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!(
            "Patient {} booked appointment {} with doctor {}",
            patient.id, appointment.id, doctor.id
        );
        Ok(appointment)
    }

    /// Cancels one of the patient's own appointments. Canceling twice is
    /// harmless; completed appointments stay completed.
    #[instrument(skip(self))]
    pub async fn cancel(&self, patient_user_id: i64, appointment_id: i64) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;

        let patient = queries::find_patient_by_user(&mut *tx, patient_user_id)
            .await?
            .ok_or(AppointmentError::PatientNotFound)?;
        let appointment = queries::find_appointment(&mut *tx, appointment_id)
            .await?
            .ok_or(AppointmentError::NotFound)?;

        if appointment.patient_id != patient.id {
            return Err(AppointmentError::NotOwner.into());
        }
        match appointment.status {
            AppointmentStatus::Completed => return Err(AppointmentError::AlreadyCompleted.into()),
            AppointmentStatus::Canceled => return Ok(()),
            AppointmentStatus::Booked | AppointmentStatus::Confirmed => {}
        }

        sqlx::query("UPDATE appointments SET status = ? WHERE id = ?")
            .bind(AppointmentStatus::Canceled)
            .bind(appointment.id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!("Patient {} canceled appointment {}", patient.id, appointment.id);
        Ok(())
    }
}

async fn doctor_schedules(
    conn: &mut SqliteConnection,
    doctor_id: i64,
) -> Result<Vec<DoctorSchedule>, AppError> {
    sqlx::query_as::<_, DoctorSchedule>("SELECT * FROM doctor_schedules WHERE doctor_id = ?")
        .bind(doctor_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_error)
}

/// Any non-canceled appointment of the doctor intersecting `[start, end)`.
async fn has_overlap(
    conn: &mut SqliteConnection,
    doctor_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM appointments
        WHERE doctor_id = ? AND status != ? AND start_time < ? AND end_time > ?
        "#,
    )
    .bind(doctor_id)
    .bind(AppointmentStatus::Canceled)
    .bind(end)
    .bind(start)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_error)?;

    Ok(count > 0)
}
