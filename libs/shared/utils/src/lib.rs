pub mod extractor;
pub mod form;
pub mod jwt;
pub mod password;
pub mod test_utils;

pub use extractor::{authorize, require_roles, AccessDenied, RoleGuard, SESSION_COOKIE};
