use shared_models::AppError;

/// Maps a driver error onto the application taxonomy. Unique-constraint
/// violations become conflicts; everything else is a database failure.
pub fn db_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("A record with the same unique value already exists.".to_string())
        }
        sqlx::Error::RowNotFound => AppError::NotFound("Record not found.".to_string()),
        _ => AppError::Database(err.to_string()),
    }
}

/// Like [`db_error`], but reports unique violations with `message`.
pub fn db_error_or_conflict(message: &str) -> impl Fn(sqlx::Error) -> AppError + '_ {
    move |err| match db_error(err) {
        AppError::Conflict(_) => AppError::Conflict(message.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use crate::Database;

    #[tokio::test]
    async fn test_unique_violation_becomes_conflict() {
        let db = Database::connect_and_migrate("sqlite::memory:").await.unwrap();
        sqlx::query("INSERT INTO departments (name) VALUES ('Cardiology')")
            .execute(db.pool())
            .await
            .unwrap();

        let err = sqlx::query("INSERT INTO departments (name) VALUES ('Cardiology')")
            .execute(db.pool())
            .await
            .unwrap_err();
        assert_matches!(db_error_or_conflict("Department exists.")(err), AppError::Conflict(msg) if msg == "Department exists.");

        let err = sqlx::query("SELECT * FROM no_such_table")
            .execute(db.pool())
            .await
            .unwrap_err();
        assert_matches!(db_error(err), AppError::Database(_));
    }

    #[test]
    fn test_row_not_found() {
        assert_matches!(db_error(sqlx::Error::RowNotFound), AppError::NotFound(_));
    }
}
