use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchForm {
    pub search_term: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlacklistForm {
    pub user_id: Option<String>,
    pub action: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlacklistAction {
    /// Flip the profile's blacklist flag.
    Blacklist,
    /// Delete the profile, its dependents and the user.
    Remove,
}

impl BlacklistAction {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            Some("blacklist") => Some(BlacklistAction::Blacklist),
            Some("remove") => Some(BlacklistAction::Remove),
            _ => None,
        }
    }
}
