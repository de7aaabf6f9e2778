use tracing::{info, instrument, warn};

use shared_database::{cascade, db_error, queries, Database};
use shared_models::{AppError, Role};
use shared_utils::form::required_id;

use crate::models::{BlacklistAction, BlacklistForm};

pub struct BlacklistService<'a> {
    db: &'a Database,
}

impl<'a> BlacklistService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Blacklists (toggling) or removes the account named by the form on
    /// behalf of `admin_user_id`. Returns the notice to show.
    #[instrument(skip(self, form), fields(user_id = ?form.user_id, action = ?form.action))]
    pub async fn apply(&self, admin_user_id: i64, form: &BlacklistForm) -> Result<String, AppError> {
        let user_id = required_id(&form.user_id, "user_id")?;
        let action = BlacklistAction::parse(form.action.as_deref()).ok_or_else(|| {
            AppError::ValidationError("Invalid action. Use blacklist or remove.".to_string())
        })?;

        if user_id == admin_user_id {
            warn!("Administrator {} tried to {:?} themselves", admin_user_id, action);
            return Err(AppError::ValidationError(
                "You cannot blacklist or remove yourself.".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let user = queries::find_user(&mut *tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        let notice = match (action, user.role) {
            (_, Role::Admin) => {
                return Err(AppError::ValidationError(
                    "Administrator accounts cannot be blacklisted or removed.".to_string(),
                ));
            }
            (BlacklistAction::Blacklist, Role::Doctor) => {
                let doctor = queries::find_doctor_by_user(&mut *tx, user.id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Doctor profile not found.".to_string()))?;

                let blacklisted: bool = sqlx::query_scalar(
                    "UPDATE doctors SET is_blacklisted = NOT is_blacklisted WHERE id = ? RETURNING is_blacklisted",
                )
                .bind(doctor.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error)?;

                toggled_notice("Doctor", &user.full_name, blacklisted)
            }
            (BlacklistAction::Blacklist, Role::Patient) => {
                let patient = queries::find_patient_by_user(&mut *tx, user.id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Patient profile not found.".to_string()))?;

                let blacklisted: bool = sqlx::query_scalar(
                    "UPDATE patients SET is_blacklisted = NOT is_blacklisted WHERE id = ? RETURNING is_blacklisted",
                )
                .bind(patient.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(db_error)?;

                toggled_notice("Patient", &user.full_name, blacklisted)
            }
            (BlacklistAction::Remove, Role::Doctor) => {
                let doctor = queries::find_doctor_by_user(&mut *tx, user.id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Doctor profile not found.".to_string()))?;

                cascade::delete_doctor_cascade(&mut tx, doctor.id, user.id).await?;
                format!("Doctor {} has been removed.", user.full_name)
            }
            (BlacklistAction::Remove, Role::Patient) => {
                let patient = queries::find_patient_by_user(&mut *tx, user.id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Patient profile not found.".to_string()))?;

                cascade::delete_patient_cascade(&mut tx, patient.id, user.id).await?;
                format!("Patient {} has been removed.", user.full_name)
            }
        };

        tx.commit().await.map_err(db_error)?;

        info!("{}", notice);
        Ok(notice)
    }
}

fn toggled_notice(kind: &str, name: &str, blacklisted: bool) -> String {
    if blacklisted {
        format!("{} {} has been blacklisted.", kind, name)
    } else {
        format!("{} {} has been removed from the blacklist.", kind, name)
    }
}
