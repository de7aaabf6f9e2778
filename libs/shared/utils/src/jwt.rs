use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{TimeDelta, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, instrument};
use uuid::Uuid;

use shared_models::auth::{JwtHeader, Principal, SessionClaims};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Session secret is not set")]
    MissingSecret,

    #[error("Invalid token format")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,

    #[error("Invalid claims")]
    BadClaims,

    #[error("Token expired")]
    Expired,

    #[error("Session lifetime out of range")]
    BadLifetime,
}

fn sign(signing_input: &str, secret: &str) -> Result<Vec<u8>, TokenError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::MissingSecret)?;
    mac.update(signing_input.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Issues a signed session token for `principal`, valid for `ttl_hours`.
#[instrument(skip(secret), fields(user_id = principal.user_id))]
pub fn issue_token(principal: &Principal, secret: &str, ttl_hours: i64) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let now = Utc::now();
    let expires_at = TimeDelta::try_hours(ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or(TokenError::BadLifetime)?;

    let claims = SessionClaims {
        sub: principal.user_id.to_string(),
        username: principal.username.clone(),
        role: principal.role,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    let header_json = serde_json::to_vec(&JwtHeader::default()).map_err(|_| TokenError::BadClaims)?;
    let claims_json = serde_json::to_vec(&claims).map_err(|_| TokenError::BadClaims)?;

    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header_json),
        URL_SAFE_NO_PAD.encode(claims_json)
    );
    let signature = sign(&signing_input, secret)?;

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

/// Checks signature and expiry and returns the principal the token names.
#[instrument(skip(token, secret))]
pub fn validate_token(token: &str, secret: &str) -> Result<Principal, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(TokenError::Malformed);
    }

    let (header_b64, claims_b64, signature_b64) = (parts[0], parts[1], parts[2]);

    let signature = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::Malformed)?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| TokenError::MissingSecret)?;
    mac.update(format!("{}.{}", header_b64, claims_b64).as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Token signature verification failed");
        return Err(TokenError::BadSignature);
    }

    let claims_json = URL_SAFE_NO_PAD
        .decode(claims_b64)
        .map_err(|_| TokenError::Malformed)?;

    let claims: SessionClaims = serde_json::from_slice(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        TokenError::BadClaims
    })?;

    let now = Utc::now().timestamp();
    if claims.exp < now {
        debug!("Token expired at {} (now: {})", claims.exp, now);
        return Err(TokenError::Expired);
    }

    let principal = claims.principal().ok_or(TokenError::BadClaims)?;
    debug!("Token validated successfully for user: {}", principal.user_id);
    Ok(principal)
}
