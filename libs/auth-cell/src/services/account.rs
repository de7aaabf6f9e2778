use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::{debug, info, instrument, warn};

use shared_config::AdminBootstrap;
use shared_database::{db_error, db_error_or_conflict, queries, Database};
use shared_models::{AppError, Role, User};
use shared_utils::form::{is_valid_email, parse_date, required, secret, text};
use shared_utils::password::{hash_password, verify_password};

use crate::models::{AccountChanges, LoginForm, RegisterForm};

const ALL_FIELDS_REQUIRED: &str = "All fields are required.";
const INVALID_CREDENTIALS: &str = "Invalid username or password.";
const INVALID_EMAIL: &str = "Please enter a valid email address.";

/// The two login entry points. Each admits its own roles only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginSurface {
    Patient,
    DoctorAdmin,
}

impl LoginSurface {
    pub fn path(&self) -> &'static str {
        match self {
            LoginSurface::Patient => "/patient-login",
            LoginSurface::DoctorAdmin => "/doctor-admin-login",
        }
    }

    pub fn admits(&self, role: Role) -> bool {
        match self {
            LoginSurface::Patient => role == Role::Patient,
            LoginSurface::DoctorAdmin => matches!(role, Role::Doctor | Role::Admin),
        }
    }

    fn wrong_surface_notice(&self) -> &'static str {
        match self {
            LoginSurface::Patient => "Doctors and administrators must sign in at /doctor-admin-login.",
            LoginSurface::DoctorAdmin => "Patients must sign in at /patient-login.",
        }
    }
}

pub struct AccountService<'a> {
    db: &'a Database,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Creates a patient account together with its patient profile.
    #[instrument(skip(self, form), fields(username = ?form.username))]
    pub async fn register(&self, form: &RegisterForm) -> Result<User, AppError> {
        debug!("Registering patient account");

        let full_name = required(&form.full_name, ALL_FIELDS_REQUIRED)?;
        let username = required(&form.username, ALL_FIELDS_REQUIRED)?;
        let email = required(&form.email, ALL_FIELDS_REQUIRED)?;
        let password = secret(&form.password)
            .ok_or_else(|| AppError::ValidationError(ALL_FIELDS_REQUIRED.to_string()))?;
        let confirm_password = secret(&form.confirm_password)
            .ok_or_else(|| AppError::ValidationError(ALL_FIELDS_REQUIRED.to_string()))?;

        if !is_valid_email(email) {
            return Err(AppError::ValidationError(INVALID_EMAIL.to_string()));
        }
        if password != confirm_password {
            return Err(AppError::ValidationError("Passwords do not match.".to_string()));
        }
        let date_of_birth = text(&form.date_of_birth).map(parse_date).transpose()?;
        let password_hash = hash_password(password)?;

        let mut tx = self.db.begin().await?;

        if queries::find_user_by_username(&mut *tx, username).await?.is_some() {
            return Err(AppError::Conflict("Username already exists.".to_string()));
        }
        if queries::email_taken(&mut *tx, email, None).await? {
            return Err(AppError::Conflict("Email already registered.".to_string()));
        }

        let user =
            create_user(&mut *tx, full_name, username, email, &password_hash, Role::Patient).await?;

        sqlx::query("INSERT INTO patients (user_id, date_of_birth, contact_number) VALUES (?, ?, ?)")
            .bind(user.id)
            .bind(date_of_birth)
            .bind(text(&form.contact_number))
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;

        info!("Registered patient {} (user {})", user.username, user.id);
        Ok(user)
    }

    /// Checks credentials for one login surface. Unknown users and wrong
    /// passwords are indistinguishable to the caller.
    #[instrument(skip(self, form), fields(username = ?form.username))]
    pub async fn authenticate(
        &self,
        surface: LoginSurface,
        form: &LoginForm,
    ) -> Result<User, AppError> {
        let invalid = || AppError::Auth(INVALID_CREDENTIALS.to_string());

        let username = text(&form.username).ok_or_else(invalid)?;
        let password = secret(&form.password).ok_or_else(invalid)?;

        let user = queries::find_user_by_username(self.db.pool(), username)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash) {
            warn!("Failed login for {}", username);
            return Err(invalid());
        }
        if !user.is_active {
            return Err(AppError::Forbidden("This account has been deactivated.".to_string()));
        }
        if !surface.admits(user.role) {
            return Err(AppError::Forbidden(surface.wrong_surface_notice().to_string()));
        }

        info!("User {} logged in as {}", user.username, user.role);
        Ok(user)
    }

    /// Creates the configured administrator unless the username is taken.
    /// Returns whether an account was created.
    #[instrument(skip(self, admin), fields(username = %admin.username))]
    pub async fn ensure_admin(&self, admin: &AdminBootstrap) -> Result<bool, AppError> {
        if queries::find_user_by_username(self.db.pool(), &admin.username).await?.is_some() {
            debug!("Administrator account already present");
            return Ok(false);
        }

        let password_hash = hash_password(&admin.password)?;
        let mut tx = self.db.begin().await?;

        if queries::find_user_by_username(&mut *tx, &admin.username).await?.is_some() {
            debug!("Administrator account created concurrently");
            return Ok(false);
        }

        let user = create_user(
            &mut *tx,
            &admin.full_name,
            &admin.username,
            &admin.email,
            &password_hash,
            Role::Admin,
        )
        .await?;
        tx.commit().await.map_err(db_error)?;

        info!("Created administrator account {} (user {})", user.username, user.id);
        Ok(true)
    }
}

/// Inserts a user row. `password_hash` comes from `hash_password`, computed
/// before the caller's transaction opens.
pub async fn create_user(
    conn: &mut SqliteConnection,
    full_name: &str,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (full_name, username, password_hash, email, is_active, role, created_at)
        VALUES (?, ?, ?, ?, 1, ?, ?)
        RETURNING *
        "#,
    )
    .bind(full_name)
    .bind(username)
    .bind(password_hash)
    .bind(email)
    .bind(role)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await
    .map_err(db_error_or_conflict("An account with these details already exists."))
}

/// Applies self-service account changes inside the caller's transaction.
/// Every check runs before the first write, so a rejected password change
/// leaves the name and email untouched as well.
pub async fn update_account(
    conn: &mut SqliteConnection,
    user_id: i64,
    changes: &AccountChanges,
) -> Result<User, AppError> {
    debug!("Updating account {}", user_id);

    let user = queries::find_user(&mut *conn, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

    let full_name = text(&changes.full_name);
    let email = text(&changes.email);

    if let Some(email) = email {
        if !is_valid_email(email) {
            return Err(AppError::ValidationError(INVALID_EMAIL.to_string()));
        }
        if queries::email_taken(&mut *conn, email, Some(user.id)).await? {
            return Err(AppError::Conflict("Email already registered.".to_string()));
        }
    }

    let password_hash = match secret(&changes.new_password) {
        None => None,
        Some(new_password) => {
            let current = secret(&changes.current_password).unwrap_or_default();
            if !verify_password(current, &user.password_hash) {
                return Err(AppError::Auth("Current password is incorrect.".to_string()));
            }
            if secret(&changes.confirm_password) != Some(new_password) {
                return Err(AppError::ValidationError("New passwords do not match.".to_string()));
            }
            Some(hash_password(new_password)?)
        }
    };

    let updated = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET full_name = COALESCE(?1, full_name),
            email = COALESCE(?2, email),
            password_hash = COALESCE(?3, password_hash)
        WHERE id = ?4
        RETURNING *
        "#,
    )
    .bind(full_name)
    .bind(email)
    .bind(password_hash)
    .bind(user.id)
    .fetch_one(&mut *conn)
    .await
    .map_err(db_error_or_conflict("That name or email is already in use."))?;

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surfaces_admit_their_roles() {
        assert!(LoginSurface::Patient.admits(Role::Patient));
        assert!(!LoginSurface::Patient.admits(Role::Doctor));
        assert!(!LoginSurface::Patient.admits(Role::Admin));
        assert!(LoginSurface::DoctorAdmin.admits(Role::Doctor));
        assert!(LoginSurface::DoctorAdmin.admits(Role::Admin));
        assert!(!LoginSurface::DoctorAdmin.admits(Role::Patient));
    }

    #[test]
    fn test_surface_paths_match_role_login_pages() {
        assert_eq!(LoginSurface::Patient.path(), Role::Patient.login_path());
        assert_eq!(LoginSurface::DoctorAdmin.path(), Role::Admin.login_path());
    }
}
