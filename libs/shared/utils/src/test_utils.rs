//! Fixtures for cell tests: an in-memory store, seeded accounts, signed
//! session cookies and request/response helpers.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use shared_config::AppConfig;
use shared_database::{AppState, Database};
use shared_models::{AppointmentStatus, Doctor, Patient, Principal, Role, User};

use crate::extractor::SESSION_COOKIE;
use crate::jwt::issue_token;
use crate::password::hash_password;

pub const TEST_PASSWORD: &str = "Corr3ct-Horse";

pub struct TestConfig {
    pub session_secret: String,
    pub strict_appointment_transitions: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            session_secret: "test-secret-key-for-session-signing-must-be-long-enough".to_string(),
            strict_appointment_transitions: false,
        }
    }
}

impl TestConfig {
    pub fn strict() -> Self {
        Self {
            strict_appointment_transitions: true,
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".to_string(),
            session_secret: self.session_secret.clone(),
            session_ttl_hours: 1,
            bind_addr: "127.0.0.1:0".to_string(),
            cookie_secure: false,
            strict_appointment_transitions: self.strict_appointment_transitions,
            admin: None,
        }
    }

    /// Fresh state over its own migrated in-memory database.
    pub async fn to_state(&self) -> Arc<AppState> {
        let config = self.to_app_config();
        let db = Database::connect_and_migrate(&config.database_url)
            .await
            .expect("in-memory database");
        Arc::new(AppState::new(config, db))
    }
}

fn username_for(full_name: &str) -> String {
    full_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

pub async fn seed_user(state: &AppState, full_name: &str, role: Role) -> User {
    let username = username_for(full_name);
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (full_name, username, password_hash, email, is_active, role, created_at)
        VALUES (?, ?, ?, ?, 1, ?, ?)
        RETURNING id
        "#,
    )
    .bind(full_name)
    .bind(&username)
    .bind(hash_password(TEST_PASSWORD).expect("hash"))
    .bind(format!("{}@example.com", username))
    .bind(role)
    .bind(Utc::now())
    .fetch_one(state.db.pool())
    .await
    .expect("seed user");

    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_one(state.db.pool())
        .await
        .expect("load seeded user")
}

pub async fn seed_admin(state: &AppState, full_name: &str) -> User {
    seed_user(state, full_name, Role::Admin).await
}

pub async fn seed_patient(state: &AppState, full_name: &str) -> (User, Patient) {
    let user = seed_user(state, full_name, Role::Patient).await;
    let patient = sqlx::query_as::<_, Patient>(
        "INSERT INTO patients (user_id, contact_number) VALUES (?, ?) RETURNING *",
    )
    .bind(user.id)
    .bind("555-0100")
    .fetch_one(state.db.pool())
    .await
    .expect("seed patient");
    (user, patient)
}

pub async fn seed_department(state: &AppState, name: &str) -> i64 {
    sqlx::query("INSERT OR IGNORE INTO departments (name) VALUES (?)")
        .bind(name)
        .execute(state.db.pool())
        .await
        .expect("seed department");

    sqlx::query_scalar("SELECT id FROM departments WHERE name = ?")
        .bind(name)
        .fetch_one(state.db.pool())
        .await
        .expect("load department")
}

pub async fn seed_doctor(state: &AppState, full_name: &str, department: &str) -> (User, Doctor) {
    let user = seed_user(state, full_name, Role::Doctor).await;
    let department_id = seed_department(state, department).await;
    let doctor = sqlx::query_as::<_, Doctor>(
        r#"
        INSERT INTO doctors (user_id, specialization_id, contact_number, licence_number)
        VALUES (?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(user.id)
    .bind(department_id)
    .bind("555-0199")
    .bind(format!("LIC-{}", user.id))
    .fetch_one(state.db.pool())
    .await
    .expect("seed doctor");
    (user, doctor)
}

pub async fn seed_schedule(
    state: &AppState,
    doctor_id: i64,
    day_of_week: &str,
    start: &str,
    end: &str,
) -> i64 {
    sqlx::query_scalar(
        r#"
        INSERT INTO doctor_schedules (doctor_id, day_of_week, start_time, end_time)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(doctor_id)
    .bind(day_of_week)
    .bind(NaiveTime::parse_from_str(start, "%H:%M").expect("start"))
    .bind(NaiveTime::parse_from_str(end, "%H:%M").expect("end"))
    .fetch_one(state.db.pool())
    .await
    .expect("seed schedule")
}

pub async fn seed_appointment(
    state: &AppState,
    patient_id: i64,
    doctor_id: i64,
    start: &str,
    end: &str,
    status: AppointmentStatus,
) -> i64 {
    let parse = |value: &str| {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").expect("appointment time")
    };
    sqlx::query_scalar(
        r#"
        INSERT INTO appointments (patient_id, doctor_id, start_time, end_time, status)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(patient_id)
    .bind(doctor_id)
    .bind(parse(start))
    .bind(parse(end))
    .bind(status)
    .fetch_one(state.db.pool())
    .await
    .expect("seed appointment")
}

/// `Cookie` header value carrying a valid session for `user`.
pub fn session_cookie_for(state: &AppState, user: &User) -> String {
    let principal = Principal {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role,
    };
    let token = issue_token(&principal, &state.config.session_secret, 1).expect("token");
    format!("{}={}", SESSION_COOKIE, token)
}

pub async fn count_rows(state: &AppState, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(state.db.pool())
        .await
        .expect("count rows")
}

pub fn form_request(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("infallible router")
}

/// `Location` header of a redirect, or an empty string.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Path part of the redirect target.
pub fn redirect_path(response: &Response<Body>) -> String {
    let target = location(response);
    target.split('?').next().unwrap_or_default().to_string()
}

/// Decoded notice carried by a redirect.
pub fn notice(response: &Response<Body>) -> Option<String> {
    let target = location(response);
    let query = target.split_once('?')?.1;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("notice="))
        .and_then(|raw| urlencoding::decode(raw).ok())
        .map(|decoded| decoded.into_owned())
}

/// Value of the session cookie set by the response, if any.
pub fn set_session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", SESSION_COOKIE)))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json body")
}
