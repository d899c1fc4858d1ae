//! Recommendation service - personalized recipe feed
//!
//! The client-side feed is the full catalog narrowed by the user's profile:
//! recipes flagged for one of the user's allergies are dropped, high-sodium
//! recipes are dropped for hypertension, and the rest are ordered by sodium.

use std::sync::Arc;

use crate::domain::profile::HYPERTENSION;
use crate::domain::result::Result;
use crate::domain::{Profile, Recipe};
use crate::ports::RecipeApi;
use crate::services::logging::{LogEvent, LoggingService};

/// Sodium ceiling (mg) for users with hypertension
pub const HYPERTENSION_SODIUM_LIMIT_MG: f64 = 500.0;

/// Filter and order a catalog for a profile.
///
/// Without a profile the whole catalog comes back ordered by sodium. The
/// sort is stable and missing sodium counts as zero. Inputs are not
/// modified.
pub fn filter_recommendations(recipes: &[Recipe], profile: Option<&Profile>) -> Vec<Recipe> {
    let mut selected: Vec<Recipe> = match profile {
        None => recipes.to_vec(),
        Some(profile) => {
            let allergies = profile.allergies_to_avoid();
            let limit_sodium = profile.has_condition(HYPERTENSION);
            recipes
                .iter()
                .filter(|recipe| !allergies.iter().any(|a| recipe.has_allergy(a)))
                .filter(|recipe| {
                    !limit_sodium
                        || recipe
                            .nutrition
                            .sodium_mg
                            .map_or(true, |mg| mg <= HYPERTENSION_SODIUM_LIMIT_MG)
                })
                .cloned()
                .collect()
        }
    };

    selected.sort_by(|a, b| a.sodium_or_zero().total_cmp(&b.sodium_or_zero()));
    selected
}

/// Builds the recipe feed for a user
pub struct RecommendationService {
    api: Arc<dyn RecipeApi>,
    logger: Option<Arc<LoggingService>>,
}

impl RecommendationService {
    pub fn new(api: Arc<dyn RecipeApi>, logger: Option<Arc<LoggingService>>) -> Self {
        Self { api, logger }
    }

    /// Personalized feed.
    ///
    /// A catalog failure is returned. A failed or empty profile lookup
    /// falls back to the unpersonalized feed and is logged as a warning.
    pub async fn recommend(&self, user_id: Option<&str>) -> Result<Vec<Recipe>> {
        let recipes = self.api.list_recipes().await?;

        let profile = match user_id {
            Some(user_id) => self.lookup_profile(user_id).await,
            None => None,
        };

        Ok(filter_recommendations(&recipes, profile.as_ref()))
    }

    /// Recommendations computed by the backend, returned as-is
    pub async fn server_recommendations(&self, user_id: &str) -> Result<Vec<Recipe>> {
        self.api.get_recommendations(user_id).await
    }

    async fn lookup_profile(&self, user_id: &str) -> Option<Profile> {
        match self.api.find_profiles(user_id).await {
            Ok(profiles) => profiles.into_iter().next(),
            Err(e) => {
                if let Some(logger) = &self.logger {
                    logger.record(
                        LogEvent::warn("personalization_degraded")
                            .with_backend(self.api.name())
                            .with_error(e.to_string()),
                    );
                }
                None
            }
        }
    }
}
