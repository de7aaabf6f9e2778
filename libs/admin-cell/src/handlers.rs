use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};

use shared_database::AppState;
use shared_models::{NoticeQuery, NoticeRedirect, Page, Principal};

use crate::models::{BlacklistForm, SearchForm};
use crate::services::{BlacklistService, DirectoryService};

const ADMIN_DASHBOARD: &str = "/admin-dashboard";

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(notice): Query<NoticeQuery>,
) -> Response {
    match DirectoryService::new(&state.db).dashboard().await {
        Ok(view) => Json(Page::new(view, notice)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn search_users(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Response {
    match DirectoryService::new(&state.db)
        .search(form.search_term.as_deref())
        .await
    {
        Ok(results) => Json(results).into_response(),
        Err(e) => e.redirect(ADMIN_DASHBOARD),
    }
}

pub async fn manage_blacklist(
    State(state): State<Arc<AppState>>,
    Extension(principal): Extension<Principal>,
    Form(form): Form<BlacklistForm>,
) -> Response {
    match BlacklistService::new(&state.db)
        .apply(principal.user_id, &form)
        .await
    {
        Ok(message) => NoticeRedirect::success(ADMIN_DASHBOARD, message).into_response(),
        Err(e) => e.redirect(ADMIN_DASHBOARD),
    }
}
