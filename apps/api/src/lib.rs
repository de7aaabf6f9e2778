pub mod router;
pub mod startup;

pub use router::create_router;
pub use startup::check_config;
