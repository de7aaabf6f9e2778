use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, warn};

use shared_database::{queries, AppState};
use shared_models::{NoticeRedirect, Principal, Role};

use crate::jwt::validate_token;

pub const SESSION_COOKIE: &str = "hms_session";

pub const PATIENT_ONLY: &[Role] = &[Role::Patient];
pub const DOCTOR_ONLY: &[Role] = &[Role::Doctor];
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    Unauthenticated,
    Forbidden,
}

impl AccessDenied {
    pub fn notice(&self) -> &'static str {
        match self {
            AccessDenied::Unauthenticated => "Please log in to access this page.",
            AccessDenied::Forbidden => "You do not have permission to access this page.",
        }
    }
}

/// Admits a request iff a principal exists and its role is in `allowed`.
pub fn authorize<'a>(
    principal: Option<&'a Principal>,
    allowed: &[Role],
) -> Result<&'a Principal, AccessDenied> {
    match principal {
        None => Err(AccessDenied::Unauthenticated),
        Some(p) if allowed.contains(&p.role) => Ok(p),
        Some(_) => Err(AccessDenied::Forbidden),
    }
}

/// Guard configuration for one route group: who may pass, and where
/// everyone else is sent.
#[derive(Clone)]
pub struct RoleGuard {
    state: Arc<AppState>,
    allowed: &'static [Role],
    login_path: &'static str,
}

impl RoleGuard {
    pub fn new(state: Arc<AppState>, allowed: &'static [Role]) -> Self {
        let login_path = allowed
            .first()
            .map(Role::login_path)
            .unwrap_or(Role::Patient.login_path());

        Self {
            state,
            allowed,
            login_path,
        }
    }

    pub fn allowed(&self) -> &[Role] {
        self.allowed
    }

    pub fn login_path(&self) -> &str {
        self.login_path
    }
}

/// Principal named by the session cookie, if its token is valid.
pub fn principal_from_jar(jar: &CookieJar, secret: &str) -> Option<Principal> {
    let token = jar.get(SESSION_COOKIE)?;
    match validate_token(token.value(), secret) {
        Ok(principal) => Some(principal),
        Err(e) => {
            debug!("Ignoring session cookie: {}", e);
            None
        }
    }
}

/// Resolves the session principal and re-checks it against the store, so
/// removed or deactivated accounts lose access immediately.
pub async fn current_principal(state: &AppState, jar: &CookieJar) -> Option<Principal> {
    let principal = principal_from_jar(jar, &state.config.session_secret)?;

    match queries::find_user(state.db.pool(), principal.user_id).await {
        Ok(Some(user)) if user.is_active && user.role == principal.role => Some(principal),
        Ok(_) => {
            debug!("Session for user {} no longer matches an active account", principal.user_id);
            None
        }
        Err(e) => {
            warn!("Could not load session user {}: {}", principal.user_id, e);
            None
        }
    }
}

/// Middleware admitting only the guard's roles. Admitted requests carry the
/// `Principal` in their extensions.
pub async fn require_roles(
    State(guard): State<RoleGuard>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let principal = current_principal(&guard.state, &jar).await;

    match authorize(principal.as_ref(), guard.allowed) {
        Ok(admitted) => {
            let admitted = admitted.clone();
            request.extensions_mut().insert(admitted);
            next.run(request).await
        }
        Err(denied) => {
            warn!(
                "Access denied to {} ({:?})",
                request.uri().path(),
                denied
            );
            NoticeRedirect::error(guard.login_path, denied.notice()).into_response()
        }
    }
}

pub fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub fn expired_session_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
