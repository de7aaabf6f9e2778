use serde::{Deserialize, Serialize};

use shared_models::{NoticeLevel, NoticeQuery};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    pub full_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub contact_number: Option<String>,
    pub date_of_birth: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Account fields any signed-in user may change about themselves. Blank
/// fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountChanges {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// View model for the public form pages.
#[derive(Debug, Clone, Serialize)]
pub struct FormPage {
    pub page: &'static str,
    pub action: &'static str,
    pub notice: Option<String>,
    pub level: Option<NoticeLevel>,
}

impl FormPage {
    pub fn new(page: &'static str, action: &'static str, query: NoticeQuery) -> Self {
        Self {
            page,
            action,
            notice: query.notice,
            level: query.level,
        }
    }
}
