//! Relational entity store: SQLite pool, schema, error mapping and the shared
//! read queries used by the dashboards.

pub mod cascade;
pub mod connection;
pub mod error;
pub mod queries;
pub mod schema;
pub mod state;

pub use connection::Database;
pub use error::{db_error, db_error_or_conflict};
pub use queries::DirectoryQueries;
pub use state::AppState;
