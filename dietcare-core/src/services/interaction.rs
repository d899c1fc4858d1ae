//! Interaction service - likes, saves, cooked marks and the saved list

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::domain::result::{Error, Result};
use crate::domain::{Interaction, InteractionKind, Recipe};
use crate::ports::RecipeApi;
use crate::services::logging::{LogEvent, LoggingService};

pub struct InteractionService {
    api: Arc<dyn RecipeApi>,
    logger: Option<Arc<LoggingService>>,
}

impl InteractionService {
    pub fn new(api: Arc<dyn RecipeApi>, logger: Option<Arc<LoggingService>>) -> Self {
        Self { api, logger }
    }

    /// Record an interaction and return what the backend stored
    pub async fn try_record(
        &self,
        user_id: &str,
        recipe_id: &str,
        kind: InteractionKind,
    ) -> Result<Interaction> {
        let event = Interaction::new(user_id, recipe_id, kind);
        self.api.log_interaction(&event).await
    }

    /// Best-effort record: `None` when the backend did not take it
    pub async fn record(
        &self,
        user_id: &str,
        recipe_id: &str,
        kind: InteractionKind,
    ) -> Option<Interaction> {
        match self.try_record(user_id, recipe_id, kind).await {
            Ok(recorded) => Some(recorded),
            Err(e) => {
                if let Some(logger) = &self.logger {
                    logger.record(
                        LogEvent::warn("interaction_not_recorded")
                            .with_backend(self.api.name())
                            .with_command(kind.as_str())
                            .with_error(e.to_string()),
                    );
                }
                None
            }
        }
    }

    pub async fn like(&self, user_id: &str, recipe_id: &str) -> Option<Interaction> {
        self.record(user_id, recipe_id, InteractionKind::Like).await
    }

    pub async fn save(&self, user_id: &str, recipe_id: &str) -> Option<Interaction> {
        self.record(user_id, recipe_id, InteractionKind::Save).await
    }

    pub async fn cooked(&self, user_id: &str, recipe_id: &str) -> Option<Interaction> {
        self.record(user_id, recipe_id, InteractionKind::Cooked).await
    }

    /// Recipes the user liked, in the order the likes were listed.
    ///
    /// Each recipe is fetched concurrently. The first failed fetch fails
    /// the whole list and aborts the fetches still running.
    pub async fn saved_recipes(&self, user_id: &str) -> Result<Vec<Recipe>> {
        let result = self.fetch_liked(user_id).await;
        if let Err(e) = &result {
            if let Some(logger) = &self.logger {
                logger.record(
                    LogEvent::error("saved_recipes_failed")
                        .with_backend(self.api.name())
                        .with_page("saved")
                        .with_error(e.to_string()),
                );
            }
        }
        result
    }

    async fn fetch_liked(&self, user_id: &str) -> Result<Vec<Recipe>> {
        let likes = self
            .api
            .list_interactions(user_id, Some(InteractionKind::Like))
            .await?;

        let mut tasks = JoinSet::new();
        for (index, like) in likes.into_iter().enumerate() {
            let api = Arc::clone(&self.api);
            tasks.spawn(async move {
                let recipe = api.get_recipe(&like.recipe_id).await;
                (index, recipe)
            });
        }

        let mut slots: Vec<Option<Recipe>> = vec![None; tasks.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, recipe) =
                joined.map_err(|e| Error::Other(format!("Recipe fetch task failed: {}", e)))?;
            // Returning drops the set, which aborts the remaining fetches
            slots[index] = Some(recipe?);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
