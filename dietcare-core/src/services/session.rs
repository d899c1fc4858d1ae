//! Session service - signed-in user, profile snapshot and screen gate

use std::sync::{Arc, RwLock};

use crate::domain::result::{Error, Result};
use crate::domain::{Profile, Screen, Session, User};
use crate::ports::SessionStore;

/// Outcome of checking a screen against the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Redirect(Screen),
}

/// Owns the current session and keeps the store in step with it
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
}

impl SessionService {
    /// Load whatever session the store holds
    pub fn new(store: Arc<dyn SessionStore>) -> Result<Self> {
        let current = store.load()?;
        Ok(Self {
            store,
            current: RwLock::new(current),
        })
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().ok().and_then(|s| s.clone())
    }

    pub fn current_user(&self) -> Option<User> {
        self.current().map(|s| s.user)
    }

    pub fn current_profile(&self) -> Option<Profile> {
        self.current().and_then(|s| s.profile)
    }

    pub fn is_signed_in(&self) -> bool {
        self.current().is_some()
    }

    /// Start a session for the user, replacing any previous one
    pub fn login(&self, user: User) -> Result<Session> {
        let session = Session::new(user);
        self.replace(Some(session.clone()))?;
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.replace(None)
    }

    /// Store the profile snapshot on the current session
    pub fn set_profile(&self, profile: Profile) -> Result<Session> {
        let mut session = self
            .current()
            .ok_or_else(|| Error::Session("Not signed in".to_string()))?;
        session.profile = Some(profile);
        self.replace(Some(session.clone()))?;
        Ok(session)
    }

    /// Gated screens send anonymous users to the login screen
    pub fn gate(&self, screen: Screen) -> Access {
        if screen.requires_user() && !self.is_signed_in() {
            Access::Redirect(Screen::Login)
        } else {
            Access::Allowed
        }
    }

    /// The signed-in user, or an auth error naming the gated screen
    pub fn require_user(&self, screen: Screen) -> Result<User> {
        match (self.gate(screen), self.current_user()) {
            (Access::Allowed, Some(user)) => Ok(user),
            _ => Err(Error::Auth(format!(
                "Sign in to open {} (run `dietcare login demo` or `dietcare login google`)",
                screen
            ))),
        }
    }

    fn replace(&self, session: Option<Session>) -> Result<()> {
        match &session {
            Some(s) => self.store.save(s)?,
            None => self.store.clear()?,
        }
        let mut current = self
            .current
            .write()
            .map_err(|e| Error::Session(format!("Lock poisoned: {}", e)))?;
        *current = session;
        Ok(())
    }
}
