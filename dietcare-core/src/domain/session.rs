//! Session and screen models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::Profile;
use super::user::User;

/// The signed-in user and the last known profile snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    #[serde(default)]
    pub profile: Option<Profile>,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self {
            user,
            profile: None,
            signed_in_at: Utc::now(),
        }
    }
}

/// Screens of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Home,
    Feed,
    Onboarding,
    Login,
    Signup,
    Dashboard,
    Saved,
    RecipeDetail,
}

impl Screen {
    /// Screens that need a signed-in user
    pub fn requires_user(&self) -> bool {
        matches!(
            self,
            Screen::Feed | Screen::Onboarding | Screen::Dashboard | Screen::Saved
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Feed => "feed",
            Screen::Onboarding => "onboarding",
            Screen::Login => "login",
            Screen::Signup => "signup",
            Screen::Dashboard => "dashboard",
            Screen::Saved => "saved",
            Screen::RecipeDetail => "recipe_detail",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gated_screens() {
        assert!(Screen::Feed.requires_user());
        assert!(Screen::Saved.requires_user());
        assert!(Screen::Dashboard.requires_user());
        assert!(Screen::Onboarding.requires_user());
        assert!(!Screen::Home.requires_user());
        assert!(!Screen::Login.requires_user());
        assert!(!Screen::Signup.requires_user());
        assert!(!Screen::RecipeDetail.requires_user());
    }

    #[test]
    fn test_session_roundtrip_keeps_profile() {
        let mut session = Session::new(User::demo());
        session.profile = Some(Profile::new("1"));
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
