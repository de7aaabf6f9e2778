pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::{doctor_admin_routes, doctor_routes};
pub use services::*;
