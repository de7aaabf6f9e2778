use tracing::{debug, info, instrument};

use auth_cell::{create_user, update_account};
use shared_database::{cascade, db_error, db_error_or_conflict, queries, Database, DirectoryQueries};
use shared_models::{AppError, DoctorDashboard, DoctorListing, Role};
use shared_utils::form::{is_valid_email, optional_id, required, secret, text};
use shared_utils::password::hash_password;

use crate::models::{DoctorForm, DoctorProfileForm};
use crate::services::department::find_or_create_department;

const DOCTOR_FIELDS_REQUIRED: &str = "Full name, username, email and specialization are required.";
const DUPLICATE_ACCOUNT: &str = "Username or email already exists.";
const DUPLICATE_DETAILS: &str = "A doctor with the same name or licence number already exists.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedDoctor {
    Created(i64),
    Updated(i64),
}

impl SavedDoctor {
    pub fn notice(&self) -> &'static str {
        match self {
            SavedDoctor::Created(_) => "Doctor added successfully.",
            SavedDoctor::Updated(_) => "Doctor updated successfully.",
        }
    }
}

fn doctor_not_found() -> AppError {
    AppError::NotFound("Doctor not found.".to_string())
}

fn profile_not_found() -> AppError {
    AppError::NotFound("Doctor profile not found.".to_string())
}

pub struct DoctorService<'a> {
    db: &'a Database,
}

impl<'a> DoctorService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Creates a doctor account or, when `doctor_id` is present, edits the
    /// doctor and its owning user.
    #[instrument(skip(self, form), fields(doctor_id = ?form.doctor_id))]
    pub async fn save_doctor(&self, form: &DoctorForm) -> Result<SavedDoctor, AppError> {
        let doctor_id = optional_id(&form.doctor_id, "doctor_id")?;
        let full_name = required(&form.full_name, DOCTOR_FIELDS_REQUIRED)?;
        let username = required(&form.username, DOCTOR_FIELDS_REQUIRED)?;
        let email = required(&form.email, DOCTOR_FIELDS_REQUIRED)?;
        let specialization = required(&form.specialization, DOCTOR_FIELDS_REQUIRED)?;
        let contact_number = text(&form.contact_number);
        let licence_number = text(&form.licence_number);

        if !is_valid_email(email) {
            return Err(AppError::ValidationError(
                "Please enter a valid email address.".to_string(),
            ));
        }
        let password_hash = secret(&form.password).map(hash_password).transpose()?;

        let mut tx = self.db.begin().await?;

        let saved = match doctor_id {
            Some(doctor_id) => {
                debug!("Updating doctor {}", doctor_id);
                let doctor = queries::find_doctor(&mut *tx, doctor_id)
                    .await?
                    .ok_or_else(doctor_not_found)?;

                if queries::username_or_email_taken(&mut *tx, username, email, Some(doctor.user_id))
                    .await?
                {
                    return Err(AppError::Conflict(DUPLICATE_ACCOUNT.to_string()));
                }

                let department_id = find_or_create_department(&mut tx, specialization).await?;

                sqlx::query(
                    r#"
                    UPDATE users
                    SET full_name = ?, username = ?, email = ?,
                        password_hash = COALESCE(?, password_hash)
                    WHERE id = ?
                    "#,
                )
                .bind(full_name)
                .bind(username)
                .bind(email)
                .bind(password_hash)
                .bind(doctor.user_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error_or_conflict(DUPLICATE_DETAILS))?;

                sqlx::query(
                    r#"
                    UPDATE doctors
                    SET specialization_id = ?, contact_number = ?, licence_number = ?
                    WHERE id = ?
                    "#,
                )
                .bind(department_id)
                .bind(contact_number)
                .bind(licence_number)
                .bind(doctor.id)
                .execute(&mut *tx)
                .await
                .map_err(db_error_or_conflict(DUPLICATE_DETAILS))?;

                SavedDoctor::Updated(doctor.id)
            }
            None => {
                debug!("Creating doctor {}", username);
                let password_hash = password_hash.as_deref().ok_or_else(|| {
                    AppError::ValidationError("Password is required for a new doctor.".to_string())
                })?;

                if queries::username_or_email_taken(&mut *tx, username, email, None).await? {
                    return Err(AppError::Conflict(DUPLICATE_ACCOUNT.to_string()));
                }

                let department_id = find_or_create_department(&mut tx, specialization).await?;
                let user =
                    create_user(&mut tx, full_name, username, email, password_hash, Role::Doctor)
                        .await?;

                let doctor_id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO doctors (user_id, specialization_id, contact_number, licence_number)
                    VALUES (?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(user.id)
                .bind(department_id)
                .bind(contact_number)
                .bind(licence_number)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error_or_conflict(DUPLICATE_DETAILS))?;

                SavedDoctor::Created(doctor_id)
            }
        };

        tx.commit().await.map_err(db_error)?;

        info!("Saved doctor: {:?}", saved);
        Ok(saved)
    }

    /// Removes a doctor with its schedules, appointments, treatments and
    /// owning user.
    #[instrument(skip(self))]
    pub async fn delete_doctor(&self, doctor_id: i64) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;

        let doctor = queries::find_doctor(&mut *tx, doctor_id)
            .await?
            .ok_or_else(doctor_not_found)?;

        cascade::delete_doctor_cascade(&mut tx, doctor.id, doctor.user_id).await?;
        tx.commit().await.map_err(db_error)?;

        info!("Deleted doctor {} and user {}", doctor.id, doctor.user_id);
        Ok(())
    }

    pub async fn profile(&self, user_id: i64) -> Result<DoctorListing, AppError> {
        let doctor = queries::find_doctor_by_user(self.db.pool(), user_id)
            .await?
            .ok_or_else(profile_not_found)?;

        DirectoryQueries::new(self.db.pool())
            .doctor(doctor.id)
            .await?
            .ok_or_else(profile_not_found)
    }

    pub async fn dashboard(&self, user_id: i64) -> Result<DoctorDashboard, AppError> {
        let doctor = self.profile(user_id).await?;
        let directory = DirectoryQueries::new(self.db.pool());

        Ok(DoctorDashboard {
            schedules: directory.schedules_for_doctor(doctor.doctor_id).await?,
            appointments: directory.appointments_for_doctor(doctor.doctor_id).await?,
            treatments: directory.treatments_by_doctor(doctor.doctor_id).await?,
            doctor,
        })
    }

    /// Self-service edit: account fields plus the contact number.
    #[instrument(skip(self, form))]
    pub async fn update_profile(
        &self,
        user_id: i64,
        form: &DoctorProfileForm,
    ) -> Result<(), AppError> {
        let mut tx = self.db.begin().await?;

        let doctor = queries::find_doctor_by_user(&mut *tx, user_id)
            .await?
            .ok_or_else(profile_not_found)?;

        update_account(&mut tx, user_id, &form.account_changes()).await?;

        if let Some(contact_number) = text(&form.contact_number) {
            sqlx::query("UPDATE doctors SET contact_number = ? WHERE id = ?")
                .bind(contact_number)
                .bind(doctor.id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;

        info!("Doctor {} updated their profile", doctor.id);
        Ok(())
    }
}
