use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_database::AppState;
use shared_utils::extractor::{require_roles, RoleGuard, ADMIN_ONLY};

use crate::handlers;

pub fn admin_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin-dashboard", get(handlers::dashboard))
        .route("/search-users", post(handlers::search_users))
        .route("/manage-blacklist", post(handlers::manage_blacklist))
        .route_layer(middleware::from_fn_with_state(
            RoleGuard::new(state.clone(), ADMIN_ONLY),
            require_roles,
        ))
        .with_state(state)
}
