use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use shared_database::AppState;
use shared_utils::extractor::{require_roles, RoleGuard, ADMIN_ONLY};

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/update-appointment-status/{id}",
            post(handlers::update_status),
        )
        .route_layer(middleware::from_fn_with_state(
            RoleGuard::new(state.clone(), ADMIN_ONLY),
            require_roles,
        ))
        .with_state(state)
}
