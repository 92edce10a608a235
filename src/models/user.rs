use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Deserialize;

/// Which relationship list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipKind {
    Followers,
    Following,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::Followers => write!(f, "followers"),
            RelationshipKind::Following => write!(f, "following"),
        }
    }
}

/// A full user profile from the `/users/{username}` endpoint.
///
/// `followers_url` and `following_url` are the URL templates the API hands
/// out for the profile's relationship lists; list fetches derive their
/// endpoints from these rather than rebuilding paths by hand.
///
/// Equality and hashing are defined solely by `login`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub login: String,
    pub avatar_url: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub followers: u32,
    pub following: u32,
    pub followers_url: String,
    pub following_url: String,
}

impl UserProfile {
    /// Display name, falling back to the login when the profile has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.login)
    }
}

impl PartialEq for UserProfile {
    fn eq(&self, other: &Self) -> bool {
        self.login == other.login
    }
}

impl Eq for UserProfile {}

impl Hash for UserProfile {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.login.hash(state);
    }
}

/// A single row in a relationship list or search result.
///
/// Equality is defined by `login`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    pub login: String,
    pub avatar_url: String,
}

impl PartialEq for UserSummary {
    fn eq(&self, other: &Self) -> bool {
        self.login == other.login
    }
}

impl Eq for UserSummary {}

impl Hash for UserSummary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.login.hash(state);
    }
}

/// Result envelope from the `/search/users` endpoint.
///
/// Only the items survive decoding; the endpoint's own paging metadata is
/// deliberately not carried any further.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<UserSummary>,
}
