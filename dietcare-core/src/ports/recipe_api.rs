//! Recipe backend port
//!
//! Defines the interface for reading the recipe catalog and writing
//! profiles and interactions (HTTP backend, in-process demo data, etc.)

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{Interaction, InteractionKind, Profile, Recipe, User};

/// Recipe backend abstraction
///
/// One method per product action. Implementations map transport and status
/// failures into `Error::Network` / `Error::Http`; deciding whether a failure
/// matters is left to the calling service.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Backend name (e.g., "http", "demo")
    fn name(&self) -> &str;

    // === Recipes ===

    /// Fetch a single recipe (`GET /recipes/{id}`)
    async fn get_recipe(&self, id: &str) -> Result<Recipe>;

    /// Fetch the full catalog (`GET /recipes`)
    async fn list_recipes(&self) -> Result<Vec<Recipe>>;

    /// Server-side recommendations (`GET /recommendations?user_id=ID`)
    async fn get_recommendations(&self, user_id: &str) -> Result<Vec<Recipe>>;

    // === Profiles ===

    /// Profiles stored for a user (`GET /profiles?user_id=ID`), empty if none
    async fn find_profiles(&self, user_id: &str) -> Result<Vec<Profile>>;

    /// Store a new profile (`POST /profiles`)
    async fn create_profile(&self, profile: &Profile) -> Result<Profile>;

    /// Replace a stored profile (`PUT /profiles/{id}`)
    async fn update_profile(&self, id: &str, profile: &Profile) -> Result<Profile>;

    // === Interactions ===

    /// Record an interaction (`POST /interactions`)
    async fn log_interaction(&self, interaction: &Interaction) -> Result<Interaction>;

    /// Interactions for a user, optionally of one kind
    /// (`GET /interactions?user_id=ID&type=like`)
    async fn list_interactions(
        &self,
        user_id: &str,
        kind: Option<InteractionKind>,
    ) -> Result<Vec<Interaction>>;
}

/// Identity backend abstraction
///
/// Exchanges an identity-provider credential for an application user.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provider name (e.g., "google", "demo")
    fn name(&self) -> &str;

    /// Verify a Google ID token (`POST /auth/google`).
    ///
    /// Returns `None` when the backend accepted the token but sent no user.
    async fn verify_google_token(&self, id_token: &str) -> Result<Option<User>>;

    /// Browser login page to use when token sign-in is unavailable
    fn fallback_login_url(&self) -> String;
}
