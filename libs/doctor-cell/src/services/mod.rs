pub mod department;
pub mod doctor;
pub mod scheduling;
pub mod treatment;

pub use doctor::{DoctorService, SavedDoctor};
pub use scheduling::ScheduleService;
pub use treatment::TreatmentService;
