pub mod auth;
pub mod entities;
pub mod error;
pub mod notice;
pub mod views;

pub use auth::{Principal, Role, SessionClaims};
pub use entities::*;
pub use error::AppError;
pub use notice::{NoticeLevel, NoticeQuery, NoticeRedirect};
pub use views::*;
