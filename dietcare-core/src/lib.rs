//! DietCare Core - Business logic for personalized recipe recommendations
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Recipe, Profile, Interaction, etc.)
//! - **ports**: Trait definitions for external dependencies (RecipeApi, SessionStore)
//! - **services**: Business logic orchestration
//! - **adapters**: Concrete implementations (HTTP, demo backend, session files)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::demo::DemoBackend;
use adapters::http::{GoogleIdentityClient, HttpApiClient};
use adapters::session::FileSessionStore;
use config::Config;
use ports::{IdentityProvider, RecipeApi};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{
    Allergen, Allergy, DietType, Interaction, InteractionKind, Nutrition, Profile, Recipe, Screen,
    Session, User,
};

/// Main context for DietCare operations
///
/// Holds the configuration, the selected backends and all services.
pub struct DietcareContext {
    pub config: Config,
    pub api: Arc<dyn RecipeApi>,
    pub session: Arc<SessionService>,
    pub recommendation_service: RecommendationService,
    pub auth_service: AuthService,
    pub profile_service: ProfileService,
    pub interaction_service: InteractionService,
    pub status_service: StatusService,
}

impl DietcareContext {
    /// Create a context for the dietcare directory.
    ///
    /// Demo mode uses the in-process demo backend; otherwise the recipe and
    /// identity backends are reached over HTTP.
    pub fn new(dietcare_dir: &Path, logger: Option<Arc<LoggingService>>) -> Result<Self> {
        std::fs::create_dir_all(dietcare_dir)?;
        let config = Config::load(dietcare_dir)?;

        let (api, identity): (Arc<dyn RecipeApi>, Arc<dyn IdentityProvider>) = if config.demo_mode
        {
            let demo = Arc::new(DemoBackend::persistent(
                &dietcare_dir.join(DEMO_STATE_FILE),
            ));
            (demo.clone() as Arc<dyn RecipeApi>, demo as Arc<dyn IdentityProvider>)
        } else {
            (
                Arc::new(HttpApiClient::new(&config.api_base)?) as Arc<dyn RecipeApi>,
                Arc::new(GoogleIdentityClient::new(&config.auth_base)?) as Arc<dyn IdentityProvider>,
            )
        };

        let session = Arc::new(SessionService::new(Arc::new(FileSessionStore::new(
            dietcare_dir,
        )))?);

        let recommendation_service = RecommendationService::new(api.clone(), logger.clone());
        let auth_service = AuthService::new(
            identity,
            api.clone(),
            session.clone(),
            config.google_client_id.clone(),
            logger.clone(),
        );
        let profile_service = ProfileService::new(api.clone(), session.clone());
        let interaction_service = InteractionService::new(api.clone(), logger);
        let status_service = StatusService::new(api.clone());

        Ok(Self {
            config,
            api,
            session,
            recommendation_service,
            auth_service,
            profile_service,
            interaction_service,
            status_service,
        })
    }
}
