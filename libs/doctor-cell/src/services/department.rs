use sqlx::SqliteConnection;
use tracing::info;

use shared_database::db_error;
use shared_models::AppError;

/// Id of the department called exactly `name`, creating it when missing.
pub async fn find_or_create_department(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<i64, AppError> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM departments WHERE name = ?")
        .bind(name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error)?;

    if let Some(id) = existing {
        return Ok(id);
    }

    let id: i64 = sqlx::query_scalar("INSERT INTO departments (name) VALUES (?) RETURNING id")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_error)?;

    info!("Created department {} ({})", name, id);
    Ok(id)
}
