use shared_config::AppConfig;

use crate::connection::Database;

/// Shared state handed to every cell router.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Self {
        Self { config, db }
    }
}
