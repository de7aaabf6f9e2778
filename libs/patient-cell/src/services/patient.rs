use tracing::{debug, info, instrument};

use appointment_cell::{BookingRequest, BookingService};
use auth_cell::update_account;
use shared_database::{db_error, queries, Database, DirectoryQueries};
use shared_models::{AppError, BookableDoctor, PatientDashboard, PatientListing};
use shared_utils::form::{parse_date, parse_datetime_local, required, required_id, text};

use crate::models::{DashboardAction, DashboardForm, PatientProfileForm};

const BOOKING_FIELDS_REQUIRED: &str = "Doctor, start time and end time are required.";

fn profile_not_found() -> AppError {
    AppError::NotFound("Patient profile not found.".to_string())
}

pub struct PatientService<'a> {
    db: &'a Database,
}

impl<'a> PatientService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn profile(&self, user_id: i64) -> Result<PatientListing, AppError> {
        let patient = queries::find_patient_by_user(self.db.pool(), user_id)
            .await?
            .ok_or_else(profile_not_found)?;

        DirectoryQueries::new(self.db.pool())
            .patient(patient.id)
            .await?
            .ok_or_else(profile_not_found)
    }

    /// The patient's own appointments plus every doctor open for booking,
    /// each with its weekly slots.
    pub async fn dashboard(&self, user_id: i64) -> Result<PatientDashboard, AppError> {
        let patient = self.profile(user_id).await?;
        let directory = DirectoryQueries::new(self.db.pool());

        let schedules = directory.schedules().await?;
        let doctors = directory
            .bookable_doctors()
            .await?
            .into_iter()
            .map(|doctor| BookableDoctor {
                schedules: schedules
                    .iter()
                    .filter(|slot| slot.doctor_id == doctor.doctor_id)
                    .cloned()
                    .collect(),
                doctor,
            })
            .collect();

        Ok(PatientDashboard {
            appointments: directory.appointments_for_patient(patient.patient_id).await?,
            patient,
            doctors,
        })
    }

    /// Runs a dashboard action and returns the notice to show.
    #[instrument(skip(self, form), fields(action = ?form.action))]
    pub async fn perform(&self, user_id: i64, form: &DashboardForm) -> Result<&'static str, AppError> {
        let booking = BookingService::new(self.db);

        match DashboardAction::parse(form.action.as_deref()) {
            Some(DashboardAction::Book) => {
                required(&form.doctor_id, BOOKING_FIELDS_REQUIRED)?;
                let start_raw = required(&form.start_time, BOOKING_FIELDS_REQUIRED)?;
                let end_raw = required(&form.end_time, BOOKING_FIELDS_REQUIRED)?;

                let request = BookingRequest {
                    doctor_id: required_id(&form.doctor_id, "doctor_id")?,
                    start_time: parse_datetime_local(start_raw)?,
                    end_time: parse_datetime_local(end_raw)?,
                };
                booking.book(user_id, request).await?;
                Ok("Appointment booked successfully.")
            }
            Some(DashboardAction::Cancel) => {
                let appointment_id = required_id(&form.appointment_id, "appointment_id")?;
                booking.cancel(user_id, appointment_id).await?;
                Ok("Appointment canceled successfully.")
            }
            None => Err(AppError::ValidationError("Unknown action.".to_string())),
        }
    }

    /// Self-service edit: account fields plus contact, birth date and
    /// medical history summary. Blank fields keep their stored value.
    #[instrument(skip(self, form))]
    pub async fn update_profile(
        &self,
        user_id: i64,
        form: &PatientProfileForm,
    ) -> Result<(), AppError> {
        let date_of_birth = text(&form.date_of_birth).map(parse_date).transpose()?;

        let mut tx = self.db.begin().await?;

        let patient = queries::find_patient_by_user(&mut *tx, user_id)
            .await?
            .ok_or_else(profile_not_found)?;

        update_account(&mut tx, user_id, &form.account_changes()).await?;

        debug!("Updating patient profile {}", patient.id);
        sqlx::query(
            r#"
            UPDATE patients
            SET contact_number = COALESCE(?, contact_number),
                date_of_birth = COALESCE(?, date_of_birth),
                medical_history_summary = COALESCE(?, medical_history_summary)
            WHERE id = ?
            "#,
        )
        .bind(text(&form.contact_number))
        .bind(date_of_birth)
        .bind(text(&form.medical_history_summary))
        .bind(patient.id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!("Patient {} updated their profile", patient.id);
        Ok(())
    }
}
