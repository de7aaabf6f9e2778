use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_database::AppState;
use shared_utils::extractor::{require_roles, RoleGuard, PATIENT_ONLY};

use crate::handlers;

pub fn patient_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/patient-dashboard",
            get(handlers::dashboard).post(handlers::dashboard_action),
        )
        .route(
            "/patient-profile",
            get(handlers::profile_page).post(handlers::update_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            RoleGuard::new(state.clone(), PATIENT_ONLY),
            require_roles,
        ))
        .with_state(state)
}
