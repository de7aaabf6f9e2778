use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::AppState;

use crate::handlers;

/// Public account routes. Profile edits live with the role cells.
pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route(
            "/patient-login",
            get(handlers::patient_login_page).post(handlers::patient_login),
        )
        .route(
            "/doctor-admin-login",
            get(handlers::doctor_admin_login_page).post(handlers::doctor_admin_login),
        )
        .route("/logout", get(handlers::logout))
        .with_state(state)
}
