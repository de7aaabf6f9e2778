use serde::{Deserialize, Serialize};

use auth_cell::AccountChanges;
use shared_models::{DoctorListing, ScheduleListing};

/// Admin form for creating a doctor (no `doctor_id`) or editing one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorForm {
    pub doctor_id: Option<String>,
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub specialization: Option<String>,
    pub contact_number: Option<String>,
    pub licence_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleForm {
    pub schedule_id: Option<String>,
    pub doctor_id: Option<String>,
    pub day_of_week: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorProfileForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
    pub contact_number: Option<String>,
}

impl DoctorProfileForm {
    pub fn account_changes(&self) -> AccountChanges {
        AccountChanges {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
            confirm_password: self.confirm_password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreatmentForm {
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub notes: Option<String>,
}

/// Everything the schedule management page lists.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOverview {
    pub schedules: Vec<ScheduleListing>,
    pub doctors: Vec<DoctorListing>,
}
