use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Form,
};

use shared_database::AppState;
use shared_models::NoticeRedirect;

use crate::models::StatusForm;
use crate::services::{AppointmentLifecycle, StatusService};

const ADMIN_DASHBOARD: &str = "/admin-dashboard";

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Response {
    let lifecycle = AppointmentLifecycle::new(state.config.strict_appointment_transitions);

    match StatusService::new(&state.db, lifecycle)
        .update_status(appointment_id, form.status.as_deref())
        .await
    {
        Ok(status) => NoticeRedirect::success(
            ADMIN_DASHBOARD,
            format!("Appointment status updated to {}.", status),
        )
        .into_response(),
        Err(e) => e.redirect(ADMIN_DASHBOARD),
    }
}
