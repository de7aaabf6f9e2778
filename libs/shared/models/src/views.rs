//! Denormalised rows produced by the directory joins and handed to the views.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::entities::{AppointmentStatus, Department, Treatment};
use crate::notice::NoticeQuery;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct DoctorListing {
    pub doctor_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub department_id: i64,
    pub department: String,
    pub contact_number: Option<String>,
    pub licence_number: Option<String>,
    pub is_blacklisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct PatientListing {
    pub patient_id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub username: String,
    pub email: String,
    pub contact_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub medical_history_summary: Option<String>,
    pub is_blacklisted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct ScheduleListing {
    pub id: i64,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub day_of_week: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct AppointmentListing {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub department: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub doctors: Vec<DoctorListing>,
    pub schedules: Vec<ScheduleListing>,
    pub appointments: Vec<AppointmentListing>,
    pub departments: Vec<Department>,
    pub patients: Vec<PatientListing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(flatten)]
    pub dashboard: AdminDashboard,
    pub search_term: String,
    pub doctor_results: Vec<DoctorListing>,
    pub patient_results: Vec<PatientListing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorDashboard {
    pub doctor: DoctorListing,
    pub schedules: Vec<ScheduleListing>,
    pub appointments: Vec<AppointmentListing>,
    pub treatments: Vec<Treatment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableDoctor {
    #[serde(flatten)]
    pub doctor: DoctorListing,
    pub schedules: Vec<ScheduleListing>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientDashboard {
    pub patient: PatientListing,
    pub appointments: Vec<AppointmentListing>,
    pub doctors: Vec<BookableDoctor>,
}

/// A view model together with the notice of the redirect that led to it.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    #[serde(flatten)]
    pub view: T,
    #[serde(flatten)]
    pub notice: NoticeQuery,
}

impl<T> Page<T> {
    pub fn new(view: T, notice: NoticeQuery) -> Self {
        Self { view, notice }
    }
}
