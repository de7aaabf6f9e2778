use std::env;
use tracing::warn;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://hospital.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub bind_addr: String,
    pub cookie_secure: bool,
    pub strict_appointment_transitions: bool,
    pub admin: Option<AdminBootstrap>,
}

/// Credentials for the administrator account created on first start.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so tests can feed a map
    /// instead of touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            warn!("DATABASE_URL not set, using default");
            DEFAULT_DATABASE_URL.to_string()
        });

        let session_secret = lookup("SESSION_SECRET").unwrap_or_else(|| {
            warn!("SESSION_SECRET not set, using empty value");
            String::new()
        });

        let session_ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(raw) => match raw.parse::<i64>().ok().filter(|h| *h > 0) {
                Some(hours) if hours > MAX_SESSION_TTL_HOURS => {
                    warn!("SESSION_TTL_HOURS is above {}, capping it", MAX_SESSION_TTL_HOURS);
                    MAX_SESSION_TTL_HOURS
                }
                Some(hours) => hours,
                None => {
                    warn!("SESSION_TTL_HOURS is not a positive integer, using default");
                    DEFAULT_SESSION_TTL_HOURS
                }
            },
            None => DEFAULT_SESSION_TTL_HOURS,
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let admin = match (lookup("ADMIN_USERNAME"), lookup("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    email: lookup("ADMIN_EMAIL")
                        .unwrap_or_else(|| format!("{}@hospital.local", username)),
                    full_name: lookup("ADMIN_FULL_NAME")
                        .unwrap_or_else(|| "Administrator".to_string()),
                    username,
                    password,
                })
            }
            _ => None,
        };

        let config = Self {
            database_url,
            session_secret,
            session_ttl_hours,
            bind_addr,
            cookie_secure: parse_flag(lookup("COOKIE_SECURE")),
            strict_appointment_transitions: parse_flag(lookup("STRICT_APPOINTMENT_TRANSITIONS")),
            admin,
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty() && !self.session_secret.is_empty()
    }
}

fn parse_flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1") | Some("true") | Some("yes") | Some("on")
    )
}
