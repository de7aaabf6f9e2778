use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};

use shared_database::AppState;
use shared_models::{NoticeQuery, NoticeRedirect, Page, Principal, Role};

use crate::models::{DashboardForm, PatientProfileForm};
use crate::services::PatientService;

const PATIENT_DASHBOARD: &str = "/patient-dashboard";
const PATIENT_PROFILE: &str = "/patient-profile";

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    match PatientService::new(&state.db).dashboard(principal.user_id).await {
        Ok(view) => Json(Page::new(view, notice)).into_response(),
        Err(e) => e.redirect(Role::Patient.login_path()),
    }
}

#[axum::debug_handler]
pub async fn dashboard_action(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Form(form): Form<DashboardForm>,
) -> Response {
    match PatientService::new(&state.db)
        .perform(principal.user_id, &form)
        .await
    {
        Ok(message) => NoticeRedirect::success(PATIENT_DASHBOARD, message).into_response(),
        Err(e) => e.redirect(PATIENT_DASHBOARD),
    }
}

#[axum::debug_handler]
pub async fn profile_page(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    match PatientService::new(&state.db).profile(principal.user_id).await {
        Ok(view) => Json(Page::new(view, notice)).into_response(),
        Err(e) => e.redirect(Role::Patient.login_path()),
    }
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Form(form): Form<PatientProfileForm>,
) -> Response {
    match PatientService::new(&state.db)
        .update_profile(principal.user_id, &form)
        .await
    {
        Ok(()) => NoticeRedirect::success(PATIENT_PROFILE, "Profile updated successfully.")
            .into_response(),
        Err(e) => e.redirect(PATIENT_PROFILE),
    }
}
