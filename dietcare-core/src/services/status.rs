//! Status service - dashboard summary for the signed-in user

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{InteractionKind, Profile, User};
use crate::ports::RecipeApi;

pub struct StatusService {
    api: Arc<dyn RecipeApi>,
}

impl StatusService {
    pub fn new(api: Arc<dyn RecipeApi>) -> Self {
        Self { api }
    }

    /// Summary of the user's profile and activity
    pub async fn get_status(&self, user: &User, profile: Option<&Profile>) -> Result<StatusSummary> {
        let interactions = self.api.list_interactions(&user.id, None).await?;
        let count = |kind: InteractionKind| {
            interactions.iter().filter(|i| i.event_type == kind).count()
        };

        Ok(StatusSummary {
            user: user.clone(),
            backend: self.api.name().to_string(),
            profile: profile.map(ProfileSummary::from),
            likes: count(InteractionKind::Like),
            saves: count(InteractionKind::Save),
            cooked: count(InteractionKind::Cooked),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub user: User,
    pub backend: String,
    pub profile: Option<ProfileSummary>,
    pub likes: usize,
    pub saves: usize,
    pub cooked: usize,
}

#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub age: Option<u32>,
    pub diet: Option<String>,
    pub conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub calorie_target: Option<u32>,
    pub budget: Option<Decimal>,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            age: profile.age,
            diet: profile.diet.map(|d| d.to_string()),
            conditions: profile.normalized_conditions(),
            allergies: profile.normalized_allergies(),
            calorie_target: profile.calorie_target,
            budget: profile.budget,
        }
    }
}
