use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use shared_models::{AppError, AppointmentStatus};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusForm {
    pub status: Option<String>,
}

/// A validated booking request for the signed-in patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    pub doctor_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentError {
    #[error("Appointment not found.")]
    NotFound,

    #[error("Doctor not found.")]
    DoctorNotFound,

    #[error("Patient profile not found.")]
    PatientNotFound,

    #[error("Invalid status. Valid statuses are: {}.", AppointmentStatus::valid_values())]
    InvalidStatus,

    #[error("Cannot change an appointment from {from} to {to}.")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("End time must be after start time.")]
    EndBeforeStart,

    #[error("Appointments must be booked for a future time.")]
    InThePast,

    #[error("Your account is blacklisted and cannot book appointments.")]
    PatientBlacklisted,

    #[error("This doctor is not accepting appointments.")]
    DoctorBlacklisted,

    #[error("The selected time is outside the doctor's schedule.")]
    OutsideSchedule,

    #[error("The doctor already has an appointment at that time.")]
    ConflictDetected,

    #[error("You can only cancel your own appointments.")]
    NotOwner,

    #[error("Completed appointments cannot be canceled.")]
    AlreadyCompleted,
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        let message = err.to_string();
        match err {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::PatientNotFound => AppError::NotFound(message),
            AppointmentError::PatientBlacklisted | AppointmentError::NotOwner => {
                AppError::Forbidden(message)
            }
            AppointmentError::ConflictDetected => AppError::Conflict(message),
            _ => AppError::ValidationError(message),
        }
    }
}
