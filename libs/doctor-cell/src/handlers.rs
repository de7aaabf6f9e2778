use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};

use shared_database::AppState;
use shared_models::{NoticeQuery, NoticeRedirect, Page, Principal, Role};

use crate::models::{DoctorForm, DoctorProfileForm, ScheduleForm, TreatmentForm};
use crate::services::{DoctorService, ScheduleService, TreatmentService};

const ADMIN_DASHBOARD: &str = "/admin-dashboard";
const MANAGE_SCHEDULE: &str = "/manage-schedule";
const DOCTOR_DASHBOARD: &str = "/doctor-dashboard";
const DOCTOR_PROFILE: &str = "/doctor-profile";

// ========== admin ==========

pub async fn manage_doctor(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DoctorForm>,
) -> Response {
    match DoctorService::new(&state.db).save_doctor(&form).await {
        Ok(saved) => NoticeRedirect::success(ADMIN_DASHBOARD, saved.notice()).into_response(),
        Err(e) => e.redirect(ADMIN_DASHBOARD),
    }
}

pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i64>,
) -> Response {
    match DoctorService::new(&state.db).delete_doctor(doctor_id).await {
        Ok(()) => NoticeRedirect::success(ADMIN_DASHBOARD, "Doctor deleted successfully.")
            .into_response(),
        Err(e) => e.redirect(ADMIN_DASHBOARD),
    }
}

pub async fn schedule_page(
    State(state): State<Arc<AppState>>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    match ScheduleService::new(&state.db).overview().await {
        Ok(overview) => Json(Page::new(overview, notice)).into_response(),
        Err(e) => e.redirect(ADMIN_DASHBOARD),
    }
}

pub async fn manage_schedule(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ScheduleForm>,
) -> Response {
    let updating = form.schedule_id.as_deref().is_some_and(|id| !id.trim().is_empty());

    match ScheduleService::new(&state.db).save_schedule(&form).await {
        Ok(_) => {
            let message = if updating {
                "Schedule updated successfully."
            } else {
                "Schedule added successfully."
            };
            NoticeRedirect::success(MANAGE_SCHEDULE, message).into_response()
        }
        Err(e) => e.redirect(MANAGE_SCHEDULE),
    }
}

pub async fn delete_schedule(
    State(state): State<Arc<AppState>>,
    Path(schedule_id): Path<i64>,
) -> Response {
    match ScheduleService::new(&state.db).delete_schedule(schedule_id).await {
        Ok(()) => NoticeRedirect::success(MANAGE_SCHEDULE, "Schedule deleted successfully.")
            .into_response(),
        Err(e) => e.redirect(MANAGE_SCHEDULE),
    }
}

// ========== doctor ==========

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    match DoctorService::new(&state.db).dashboard(principal.user_id).await {
        Ok(view) => Json(Page::new(view, notice)).into_response(),
        Err(e) => e.redirect(Role::Doctor.login_path()),
    }
}

pub async fn profile_page(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    match DoctorService::new(&state.db).profile(principal.user_id).await {
        Ok(view) => Json(Page::new(view, notice)).into_response(),
        Err(e) => e.redirect(Role::Doctor.login_path()),
    }
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Form(form): Form<DoctorProfileForm>,
) -> Response {
    match DoctorService::new(&state.db)
        .update_profile(principal.user_id, &form)
        .await
    {
        Ok(()) => NoticeRedirect::success(DOCTOR_PROFILE, "Profile updated successfully.")
            .into_response(),
        Err(e) => e.redirect(DOCTOR_PROFILE),
    }
}

pub async fn record_treatment(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Path(appointment_id): Path<i64>,
    Form(form): Form<TreatmentForm>,
) -> Response {
    match TreatmentService::new(&state.db)
        .record(principal.user_id, appointment_id, &form)
        .await
    {
        Ok(_) => NoticeRedirect::success(DOCTOR_DASHBOARD, "Treatment recorded successfully.")
            .into_response(),
        Err(e) => e.redirect(DOCTOR_DASHBOARD),
    }
}
