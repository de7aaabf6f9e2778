use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{require_roles, RoleGuard, ADMIN_ONLY, DOCTOR_ONLY};

use crate::handlers;

/// Doctor and schedule administration.
pub fn doctor_admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/manage-doctor", post(handlers::manage_doctor))
        .route("/delete-doctor/{id}", post(handlers::delete_doctor))
        .route(
            "/manage-schedule",
            get(handlers::schedule_page).post(handlers::manage_schedule),
        )
        .route("/delete-schedule/{id}", post(handlers::delete_schedule))
        .route_layer(middleware::from_fn_with_state(
            RoleGuard::new(state.clone(), ADMIN_ONLY),
            require_roles,
        ))
        .with_state(state)
}

/// Pages for the signed-in doctor.
pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/doctor-dashboard", get(handlers::dashboard))
        .route(
            "/doctor-profile",
            get(handlers::profile_page).post(handlers::update_profile),
        )
        .route("/record-treatment/{appointment_id}", post(handlers::record_treatment))
        .route_layer(middleware::from_fn_with_state(
            RoleGuard::new(state.clone(), DOCTOR_ONLY),
            require_roles,
        ))
        .with_state(state)
}
