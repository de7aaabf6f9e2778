use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        }
    }
}

/// A `303 See Other` carrying a user-visible notice in the query string.
#[derive(Debug, Clone)]
pub struct NoticeRedirect {
    pub location: String,
    pub message: String,
    pub level: NoticeLevel,
}

impl NoticeRedirect {
    pub fn success(location: &str, message: impl Into<String>) -> Self {
        Self {
            location: location.to_string(),
            message: message.into(),
            level: NoticeLevel::Success,
        }
    }

    pub fn error(location: &str, message: impl Into<String>) -> Self {
        Self {
            location: location.to_string(),
            message: message.into(),
            level: NoticeLevel::Error,
        }
    }

    pub fn target(&self) -> String {
        let separator = if self.location.contains('?') { '&' } else { '?' };
        format!(
            "{}{}notice={}&level={}",
            self.location,
            separator,
            urlencoding::encode(&self.message),
            self.level.as_str()
        )
    }
}

impl IntoResponse for NoticeRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.target()).into_response()
    }
}

/// Notice echoed back to GET pages after a redirect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
    pub level: Option<NoticeLevel>,
}
