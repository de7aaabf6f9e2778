use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info, warn};

use shared_models::AppError;

use crate::error::db_error;
use crate::schema;

/// How long a writer waits for another writer's transaction to finish.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection pool over the hospital database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self, AppError> {
        debug!("Connecting to database: {}", url);

        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_error)?
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        // Every connection to an in-memory database sees its own empty
        // database, so keep exactly one and never let it expire.
        let (options, pool_options) = if is_in_memory(url) {
            let pool_options = SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (options, pool_options)
        } else {
            let options = options.journal_mode(SqliteJournalMode::Wal);
            (options, SqlitePoolOptions::new().max_connections(5))
        };

        let pool = pool_options.connect_with(options).await.map_err(db_error)?;

        info!("Database connection established");
        Ok(Self { pool })
    }

    /// Connects and makes sure the schema exists.
    pub async fn connect_and_migrate(url: &str) -> Result<Self, AppError> {
        let database = Self::connect(url).await?;
        schema::create_tables(database.pool()).await?;
        Ok(database)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Opens a write transaction holding the database write lock from the
    /// start, so concurrent writers wait up to [`BUSY_TIMEOUT`] for each
    /// other instead of failing when a read turns into a write.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, AppError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // The driver opened a deferred transaction, which holds no lock until
        // its first statement. Reopen it as IMMEDIATE on the same connection.
        sqlx::query("COMMIT").execute(&mut *tx).await.map_err(db_error)?;
        if let Err(err) = sqlx::query("BEGIN IMMEDIATE").execute(&mut *tx).await {
            warn!("Could not take the database write lock: {}", err);
            // Keep a transaction open so the rollback on drop matches the
            // driver's bookkeeping.
            sqlx::query("BEGIN").execute(&mut *tx).await.map_err(db_error)?;
            return Err(db_error(err));
        }

        Ok(tx)
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
