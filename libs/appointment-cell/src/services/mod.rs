pub mod booking;
pub mod lifecycle;
pub mod status;

pub use booking::BookingService;
pub use lifecycle::AppointmentLifecycle;
pub use status::StatusService;
