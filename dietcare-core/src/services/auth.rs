//! Auth service - Google and demo sign-in

use std::sync::Arc;

use chrono::Utc;

use crate::domain::result::{Error, Result};
use crate::domain::{Screen, Session, User};
use crate::ports::{IdentityProvider, RecipeApi};
use crate::services::logging::{LogEvent, LoggingService};
use crate::services::session::SessionService;

/// Signs users in and decides where they land
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    api: Arc<dyn RecipeApi>,
    session: Arc<SessionService>,
    google_client_id: Option<String>,
    logger: Option<Arc<LoggingService>>,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        api: Arc<dyn RecipeApi>,
        session: Arc<SessionService>,
        google_client_id: Option<String>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        Self {
            identity,
            api,
            session,
            google_client_id,
            logger,
        }
    }

    /// Exchange a Google ID token for a session.
    ///
    /// A response without a user signs in the demo user. Failures name the
    /// browser login page to fall back to.
    pub async fn google(&self, id_token: &str) -> Result<Session> {
        if self.google_client_id.is_none() {
            return Err(Error::config(
                "Google sign-in is not configured (set DIETCARE_GOOGLE_CLIENT_ID)",
            ));
        }
        if id_token.trim().is_empty() {
            return Err(Error::Auth("No credential returned by Google".to_string()));
        }

        let user = match self.identity.verify_google_token(id_token).await {
            Ok(user) => user.unwrap_or_else(User::demo),
            Err(e) => {
                let fallback = self.identity.fallback_login_url();
                if let Some(logger) = &self.logger {
                    logger.record(
                        LogEvent::error("google_sign_in_failed")
                            .with_backend(self.identity.name())
                            .with_error(e.to_string()),
                    );
                }
                return Err(Error::Auth(format!(
                    "Google sign-in failed: {}. Sign in through the browser instead: {}",
                    e, fallback
                )));
            }
        };

        self.session.login(user)
    }

    pub fn demo_login(&self) -> Result<Session> {
        self.session.login(User::demo())
    }

    /// Front-end-only signup; the new user goes straight to onboarding
    pub fn demo_signup(&self) -> Result<Session> {
        self.session.login(User::signup(Utc::now().timestamp_millis()))
    }

    pub fn logout(&self) -> Result<()> {
        self.session.logout()
    }

    /// Home when the user already has a stored profile, else onboarding.
    /// A failed lookup also routes to onboarding. The profile is cached in
    /// the session; a failed cache write is logged and doesn't change the
    /// route.
    pub async fn landing_screen(&self, user: &User) -> Screen {
        match self.api.find_profiles(&user.id).await {
            Ok(profiles) => match profiles.into_iter().next() {
                Some(profile) => {
                    if let Err(e) = self.session.set_profile(profile) {
                        if let Some(logger) = &self.logger {
                            logger.record(
                                LogEvent::error("session_write_failed")
                                    .with_page(Screen::Home.as_str())
                                    .with_error(e.to_string()),
                            );
                        }
                    }
                    Screen::Home
                }
                None => Screen::Onboarding,
            },
            Err(_) => Screen::Onboarding,
        }
    }
}
