use serde::Deserialize;

use auth_cell::AccountChanges;

/// The patient dashboard posts one form for both booking and canceling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardForm {
    pub action: Option<String>,
    pub doctor_id: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub appointment_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    Book,
    Cancel,
}

impl DashboardAction {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            Some("book") => Some(DashboardAction::Book),
            Some("cancel") => Some(DashboardAction::Cancel),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientProfileForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
    pub contact_number: Option<String>,
    pub date_of_birth: Option<String>,
    pub medical_history_summary: Option<String>,
}

impl PatientProfileForm {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_action_parse() {
        assert_eq!(DashboardAction::parse(Some("book")), Some(DashboardAction::Book));
        assert_eq!(DashboardAction::parse(Some(" cancel ")), Some(DashboardAction::Cancel));
        assert_eq!(DashboardAction::parse(Some("delete")), None);
        assert_eq!(DashboardAction::parse(None), None);
    }
}
