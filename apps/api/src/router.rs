use std::sync::Arc;

use axum::{response::Redirect, routing::get, Json, Router};
use serde_json::{json, Value};

use admin_cell::admin_routes;
use appointment_cell::appointment_routes;
use auth_cell::auth_routes;
use doctor_cell::{doctor_admin_routes, doctor_routes};
use patient_cell::patient_routes;
use shared_database::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/register") }))
        .route("/health", get(health))
        .merge(auth_routes(state.clone()))
        .merge(patient_routes(state.clone()))
        .merge(doctor_admin_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .merge(appointment_routes(state.clone()))
        .merge(admin_routes(state))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
