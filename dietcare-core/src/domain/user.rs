//! User domain model

use serde::{Deserialize, Serialize};

use super::wire;

pub const DEMO_USER_ID: &str = "1";
pub const DEMO_USER_NAME: &str = "Demo User";
pub const DEMO_USER_EMAIL: &str = "demo@dietcare.app";

/// Represents an authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// The shared demo account
    pub fn demo() -> Self {
        Self::new(DEMO_USER_ID, DEMO_USER_NAME, DEMO_USER_EMAIL)
    }

    /// A front-end-only signup, identified by its creation time
    pub fn signup(created_at_ms: i64) -> Self {
        Self::new(created_at_ms.to_string(), "New User", "new@demo.com")
    }

    /// First word of the display name, for greetings
    pub fn first_name(&self) -> Option<&str> {
        self.name.split_whitespace().next()
    }
}
