//! Profile service - onboarding and profile lookup

use std::sync::Arc;

use crate::domain::result::{Error, Result};
use crate::domain::{Profile, User};
use crate::ports::RecipeApi;
use crate::services::session::SessionService;

pub struct ProfileService {
    api: Arc<dyn RecipeApi>,
    session: Arc<SessionService>,
}

impl ProfileService {
    pub fn new(api: Arc<dyn RecipeApi>, session: Arc<SessionService>) -> Self {
        Self { api, session }
    }

    /// The user's stored profile. With several, the first one wins.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let profiles = self.api.find_profiles(user_id).await?;
        Ok(profiles.into_iter().next())
    }

    /// Validate and store a profile for the user, then refresh the
    /// session snapshot.
    ///
    /// A profile with an id replaces the stored one; otherwise the stored
    /// profile for the user (if any) is updated, else a new one is created.
    /// A failed lookup of the stored profile fails the submit.
    pub async fn submit(&self, user: &User, mut profile: Profile) -> Result<Profile> {
        profile.user_id = Some(user.id.clone());
        profile.validate()?;

        if profile.id.is_none() {
            profile.id = self
                .get_profile(&user.id)
                .await?
                .and_then(|existing| existing.id);
        }

        let stored = match profile.id.clone() {
            Some(id) => self.api.update_profile(&id, &profile).await?,
            None => self.api.create_profile(&profile).await?,
        };

        if self.session.current_user().as_ref() == Some(user) {
            self.session.set_profile(stored.clone())?;
        }
        Ok(stored)
    }

    /// Profile from the session snapshot, else from the backend
    pub async fn current(&self) -> Result<Option<Profile>> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| Error::Session("Not signed in".to_string()))?;
        if let Some(profile) = self.session.current_profile() {
            return Ok(Some(profile));
        }
        let profile = self.get_profile(&user.id).await?;
        if let Some(p) = &profile {
            self.session.set_profile(p.clone())?;
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::demo::DemoBackend;
    use crate::adapters::mock_server::{MockBackendServer, MockConfig};
    use crate::adapters::http::HttpApiClient;
    use crate::adapters::session::MemorySessionStore;
    use crate::domain::DietType;

    fn signed_in_session() -> Arc<SessionService> {
        let session = Arc::new(SessionService::new(Arc::new(MemorySessionStore::new())).unwrap());
        session.login(User::demo()).unwrap();
        session
    }

    fn onboarding_answers() -> Profile {
        let mut profile = Profile::default();
        profile.age = Some(34);
        profile.diet = Some(DietType::Vegetarian);
        profile.allergies = vec!["Peanuts".to_string()];
        profile.conditions = vec!["hypertension".to_string()];
        profile
    }

    #[tokio::test]
    async fn test_submit_validates_before_sending() {
        let backend = Arc::new(DemoBackend::new());
        let service = ProfileService::new(backend.clone(), signed_in_session());

        let mut profile = onboarding_answers();
        profile.age = Some(3);
        assert!(matches!(
            service.submit(&User::demo(), profile).await,
            Err(Error::Validation(_))
        ));

        let mut profile = onboarding_answers();
        profile.diet = None;
        assert!(matches!(
            service.submit(&User::demo(), profile).await,
            Err(Error::Validation(_))
        ));

        assert!(backend.find_profiles("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_creates_then_updates() {
        let backend = Arc::new(DemoBackend::new());
        let session = signed_in_session();
        let service = ProfileService::new(backend.clone(), session.clone());

        let created = service.submit(&User::demo(), onboarding_answers()).await.unwrap();
        assert!(created.id.is_some());
        assert_eq!(session.current_profile(), Some(created.clone()));

        let mut edited = onboarding_answers();
        edited.age = Some(35);
        let updated = service.submit(&User::demo(), edited).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.age, Some(35));
        assert_eq!(backend.find_profiles("1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_over_http() {
        let server = MockBackendServer::start(MockConfig::default()).unwrap();
        let api = Arc::new(HttpApiClient::new(&server.base_url()).unwrap());
        let service = ProfileService::new(api, signed_in_session());

        let stored = service.submit(&User::demo(), onboarding_answers()).await.unwrap();
        assert_eq!(stored.user_id.as_deref(), Some("1"));
        assert_eq!(stored.diet, Some(DietType::Vegetarian));
        assert!(server.requests().contains(&"POST /profiles".to_string()));

        let fetched = service.get_profile("1").await.unwrap().unwrap();
        assert_eq!(fetched.id, stored.id);
    }

    #[tokio::test]
    async fn test_submit_failure_propagates() {
        let server = MockBackendServer::start(MockConfig {
            fail_profiles: true,
            ..Default::default()
        })
        .unwrap();
        let api = Arc::new(HttpApiClient::new(&server.base_url()).unwrap());
        let session = signed_in_session();
        let service = ProfileService::new(api, session.clone());

        let result = service.submit(&User::demo(), onboarding_answers()).await;
        assert!(matches!(result, Err(Error::Http { status: 500, .. })));
        assert!(session.current_profile().is_none());
    }

    #[tokio::test]
    async fn test_failed_lookup_does_not_create_a_second_profile() {
        let server = MockBackendServer::start(MockConfig {
            fail_profiles: true,
            ..Default::default()
        })
        .unwrap();
        let api = Arc::new(HttpApiClient::new(&server.base_url()).unwrap());
        let service = ProfileService::new(api, signed_in_session());

        let result = service.submit(&User::demo(), onboarding_answers()).await;
        assert!(matches!(result, Err(Error::Http { status: 500, .. })));
        assert_eq!(server.requests(), vec!["GET /profiles".to_string()]);
    }

    #[tokio::test]
    async fn test_current_prefers_snapshot() {
        let backend = Arc::new(DemoBackend::new());
        let session = signed_in_session();
        let service = ProfileService::new(backend, session.clone());
        assert!(service.current().await.unwrap().is_none());

        let mut snapshot = Profile::new("1");
        snapshot.age = Some(60);
        session.set_profile(snapshot).unwrap();
        assert_eq!(service.current().await.unwrap().unwrap().age, Some(60));
    }
}
