use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, error};

use shared_database::AppState;
use shared_models::{AppError, NoticeQuery, NoticeRedirect, Principal, Role};
use shared_utils::extractor::{expired_session_cookie, principal_from_jar, session_cookie};
use shared_utils::jwt::issue_token;

use crate::models::{FormPage, LoginForm, RegisterForm};
use crate::services::account::{AccountService, LoginSurface};

pub async fn register_page(Query(query): Query<NoticeQuery>) -> Json<FormPage> {
    Json(FormPage::new("register", "/register", query))
}

pub async fn patient_login_page(Query(query): Query<NoticeQuery>) -> Json<FormPage> {
    Json(FormPage::new("patient-login", LoginSurface::Patient.path(), query))
}

pub async fn doctor_admin_login_page(Query(query): Query<NoticeQuery>) -> Json<FormPage> {
    Json(FormPage::new(
        "doctor-admin-login",
        LoginSurface::DoctorAdmin.path(),
        query,
    ))
}

pub async fn register(State(state): State<Arc<AppState>>, Form(form): Form<RegisterForm>) -> Response {
    match AccountService::new(&state.db).register(&form).await {
        Ok(_) => NoticeRedirect::success(
            LoginSurface::Patient.path(),
            "Registration successful. Please log in.",
        )
        .into_response(),
        Err(e) => e.redirect("/register"),
    }
}

pub async fn patient_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    login(&state, jar, LoginSurface::Patient, form).await
}

pub async fn doctor_admin_login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    login(&state, jar, LoginSurface::DoctorAdmin, form).await
}

async fn login(state: &AppState, jar: CookieJar, surface: LoginSurface, form: LoginForm) -> Response {
    let user = match AccountService::new(&state.db).authenticate(surface, &form).await {
        Ok(user) => user,
        Err(e) => return e.redirect(surface.path()),
    };

    let principal = Principal {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
    };

    match issue_token(&principal, &state.config.session_secret, state.config.session_ttl_hours) {
        Ok(token) => {
            let jar = jar.add(session_cookie(token, state.config.cookie_secure));
            let welcome = format!("Welcome back, {}.", user.full_name);
            (jar, NoticeRedirect::success(user.role.dashboard_path(), welcome)).into_response()
        }
        Err(e) => {
            error!("Could not issue session token: {}", e);
            AppError::Internal("Could not start a session.".to_string()).into_response()
        }
    }
}

/// Clears the session and sends the user back to the login page of the
/// role they were signed in as.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    let principal = principal_from_jar(&jar, &state.config.session_secret);
    let target = principal
        .as_ref()
        .map(|p| p.role.login_path())
        .unwrap_or(Role::Patient.login_path());

    debug!("Logging out {:?}", principal.map(|p| p.username));

    let jar = jar.remove(expired_session_cookie());
    (jar, NoticeRedirect::success(target, "You have been logged out.")).into_response()
}
