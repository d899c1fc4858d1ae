//! Demo backend
//!
//! In-process stand-in for the recipe and identity backends, used by demo
//! mode and by tests:
//! - 10 recipes with nutrition facts and allergen flags
//! - profiles and interactions kept in memory, optionally mirrored to a
//!   JSON file so they survive between CLI invocations

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::session::write_atomically;
use crate::domain::result::{Error, Result};
use crate::domain::{Allergen, Interaction, InteractionKind, Nutrition, Profile, Recipe, User};
use crate::ports::{IdentityProvider, RecipeApi};

struct DemoRecipe {
    id: &'static str,
    title: &'static str,
    calories_kcal: f64,
    protein_g: f64,
    sodium_mg: f64,
    carbs_g: f64,
    fat_g: f64,
    allergens: &'static [Allergen],
    tags: &'static [&'static str],
    ingredients: &'static [&'static str],
    instructions: &'static [&'static str],
}

const DEMO_RECIPES: &[DemoRecipe] = &[
    DemoRecipe {
        id: "1",
        title: "Lentil and Spinach Soup",
        calories_kcal: 320.0,
        protein_g: 18.0,
        sodium_mg: 410.0,
        carbs_g: 48.0,
        fat_g: 6.0,
        allergens: &[],
        tags: &["vegan", "high-fiber"],
        ingredients: &["1 cup red lentils", "2 cups spinach", "1 onion", "2 cloves garlic", "4 cups low-sodium stock"],
        instructions: &["Saute onion and garlic.", "Add lentils and stock, simmer 20 minutes.", "Stir in spinach until wilted."],
    },
    DemoRecipe {
        id: "2",
        title: "Peanut Noodle Bowl",
        calories_kcal: 540.0,
        protein_g: 19.0,
        sodium_mg: 690.0,
        carbs_g: 66.0,
        fat_g: 22.0,
        allergens: &[Allergen::Peanuts, Allergen::Gluten, Allergen::Soy],
        tags: &["vegetarian", "asian"],
        ingredients: &["200 g wheat noodles", "3 tbsp peanut butter", "2 tbsp soy sauce", "1 cucumber", "1 carrot"],
        instructions: &["Cook noodles.", "Whisk peanut butter with soy sauce and warm water.", "Toss noodles with sauce and vegetables."],
    },
    DemoRecipe {
        id: "3",
        title: "Grilled Salmon with Quinoa",
        calories_kcal: 480.0,
        protein_g: 36.0,
        sodium_mg: 280.0,
        carbs_g: 34.0,
        fat_g: 20.0,
        allergens: &[Allergen::Fish],
        tags: &["pescatarian", "high-protein"],
        ingredients: &["1 salmon fillet", "1/2 cup quinoa", "1 lemon", "1 tbsp olive oil"],
        instructions: &["Cook quinoa.", "Grill salmon 4 minutes per side.", "Serve with lemon."],
    },
    DemoRecipe {
        id: "4",
        title: "Greek Yogurt Parfait",
        calories_kcal: 260.0,
        protein_g: 17.0,
        sodium_mg: 85.0,
        carbs_g: 32.0,
        fat_g: 7.0,
        allergens: &[Allergen::Dairy, Allergen::TreeNuts],
        tags: &["vegetarian", "breakfast"],
        ingredients: &["1 cup greek yogurt", "1/2 cup berries", "2 tbsp chopped almonds", "1 tsp honey"],
        instructions: &["Layer yogurt, berries and almonds.", "Drizzle with honey."],
    },
    DemoRecipe {
        id: "5",
        title: "Chicken Teriyaki Stir-Fry",
        calories_kcal: 510.0,
        protein_g: 38.0,
        sodium_mg: 980.0,
        carbs_g: 52.0,
        fat_g: 14.0,
        allergens: &[Allergen::Soy, Allergen::Gluten],
        tags: &["non-veg", "asian"],
        ingredients: &["250 g chicken breast", "3 tbsp teriyaki sauce", "1 bell pepper", "1 cup broccoli", "1 cup rice"],
        instructions: &["Stir-fry chicken until browned.", "Add vegetables and sauce.", "Serve over rice."],
    },
    DemoRecipe {
        id: "6",
        title: "Chickpea Salad",
        calories_kcal: 350.0,
        protein_g: 14.0,
        sodium_mg: 240.0,
        carbs_g: 40.0,
        fat_g: 15.0,
        allergens: &[Allergen::Sesame],
        tags: &["vegan", "quick"],
        ingredients: &["1 can chickpeas, rinsed", "1 tomato", "1/2 cucumber", "2 tbsp tahini", "1 lemon"],
        instructions: &["Chop vegetables.", "Whisk tahini with lemon juice.", "Toss everything together."],
    },
    DemoRecipe {
        id: "7",
        title: "Vegetable Omelette",
        calories_kcal: 290.0,
        protein_g: 20.0,
        sodium_mg: 380.0,
        carbs_g: 8.0,
        fat_g: 19.0,
        allergens: &[Allergen::Eggs, Allergen::Dairy],
        tags: &["vegetarian", "breakfast"],
        ingredients: &["3 eggs", "1/4 cup milk", "1/2 bell pepper", "handful of spinach"],
        instructions: &["Whisk eggs with milk.", "Cook vegetables briefly.", "Pour in eggs and fold when set."],
    },
    DemoRecipe {
        id: "8",
        title: "Shrimp Tacos",
        calories_kcal: 430.0,
        protein_g: 27.0,
        sodium_mg: 720.0,
        carbs_g: 44.0,
        fat_g: 15.0,
        allergens: &[Allergen::Shellfish],
        tags: &["pescatarian"],
        ingredients: &["200 g shrimp", "4 corn tortillas", "1 cup cabbage slaw", "1 lime"],
        instructions: &["Season and sear shrimp.", "Warm tortillas.", "Assemble with slaw and lime."],
    },
    DemoRecipe {
        id: "9",
        title: "Oat and Banana Porridge",
        calories_kcal: 300.0,
        protein_g: 9.0,
        sodium_mg: 10.0,
        carbs_g: 56.0,
        fat_g: 5.0,
        allergens: &[],
        tags: &["vegan", "breakfast"],
        ingredients: &["1/2 cup rolled oats", "1 banana", "1 cup water", "pinch of cinnamon"],
        instructions: &["Simmer oats in water for 5 minutes.", "Top with sliced banana and cinnamon."],
    },
    DemoRecipe {
        id: "10",
        title: "Tofu Miso Soup",
        calories_kcal: 180.0,
        protein_g: 13.0,
        sodium_mg: 1150.0,
        carbs_g: 10.0,
        fat_g: 8.0,
        allergens: &[Allergen::Soy],
        tags: &["vegan", "asian"],
        ingredients: &["150 g silken tofu", "2 tbsp miso paste", "1 sheet nori", "2 spring onions"],
        instructions: &["Dissolve miso in hot water.", "Add tofu and nori.", "Garnish with spring onion."],
    },
];

/// Generate the demo recipe catalog
pub fn generate_demo_recipes() -> Vec<Recipe> {
    DEMO_RECIPES
        .iter()
        .map(|r| {
            let mut recipe = Recipe::new(r.id, r.title);
            recipe.nutrition = Nutrition {
                calories_kcal: Some(r.calories_kcal),
                protein_g: Some(r.protein_g),
                sodium_mg: Some(r.sodium_mg),
                carbs_g: Some(r.carbs_g),
                fat_g: Some(r.fat_g),
                ..Default::default()
            };
            for allergen in Allergen::ALL {
                recipe.allergens.insert(allergen, r.allergens.contains(&allergen));
            }
            recipe.tags = r.tags.iter().map(|t| t.to_string()).collect();
            recipe.ingredients = r.ingredients.iter().map(|t| t.to_string()).collect();
            recipe.instructions = r.instructions.iter().map(|t| t.to_string()).collect();
            recipe
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DemoState {
    profiles: Vec<Profile>,
    interactions: Vec<Interaction>,
}

/// In-memory recipe and identity backend
#[derive(Debug)]
pub struct DemoBackend {
    recipes: Vec<Recipe>,
    state: Mutex<DemoState>,
    state_path: Option<PathBuf>,
}

impl DemoBackend {
    pub fn new() -> Self {
        Self::with_recipes(generate_demo_recipes())
    }

    pub fn with_recipes(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            state: Mutex::new(DemoState::default()),
            state_path: None,
        }
    }

    /// Demo backend whose profiles and interactions live in `state_path`.
    /// A missing or unreadable file starts empty.
    pub fn persistent(state_path: &Path) -> Self {
        let state = std::fs::read_to_string(state_path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            recipes: generate_demo_recipes(),
            state: Mutex::new(state),
            state_path: Some(state_path.to_path_buf()),
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, DemoState>> {
        self.state
            .lock()
            .map_err(|e| Error::Other(format!("Lock poisoned: {}", e)))
    }

    /// Apply a change to a copy of the state, persist it, then keep it.
    /// On any error the held state is left as it was.
    fn commit<T>(&self, change: impl FnOnce(&mut DemoState) -> Result<T>) -> Result<T> {
        let mut state = self.state()?;
        let mut next = state.clone();
        let out = change(&mut next)?;
        if let Some(path) = &self.state_path {
            write_atomically(path, &serde_json::to_string_pretty(&next)?)?;
        }
        *state = next;
        Ok(out)
    }
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeApi for DemoBackend {
    fn name(&self) -> &str {
        "demo"
    }

    async fn get_recipe(&self, id: &str) -> Result<Recipe> {
        self.recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Recipe {}", id)))
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>> {
        Ok(self.recipes.clone())
    }

    async fn get_recommendations(&self, _user_id: &str) -> Result<Vec<Recipe>> {
        Ok(self.recipes.clone())
    }

    async fn find_profiles(&self, user_id: &str) -> Result<Vec<Profile>> {
        let state = self.state()?;
        Ok(state
            .profiles
            .iter()
            .filter(|p| p.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }

    async fn create_profile(&self, profile: &Profile) -> Result<Profile> {
        let mut stored = profile.clone();
        stored.id = Some(Uuid::new_v4().to_string());
        self.commit(|state| {
            state.profiles.push(stored.clone());
            Ok(stored)
        })
    }

    async fn update_profile(&self, id: &str, profile: &Profile) -> Result<Profile> {
        let mut stored = profile.clone();
        stored.id = Some(id.to_string());
        self.commit(|state| {
            let slot = state
                .profiles
                .iter_mut()
                .find(|p| p.id.as_deref() == Some(id))
                .ok_or_else(|| Error::not_found(format!("Profile {}", id)))?;
            *slot = stored.clone();
            Ok(stored)
        })
    }

    async fn log_interaction(&self, interaction: &Interaction) -> Result<Interaction> {
        let mut stored = interaction.clone();
        stored.id = Some(Uuid::new_v4().to_string());
        stored.timestamp = stored.timestamp.or_else(|| Some(Utc::now()));
        self.commit(|state| {
            state.interactions.push(stored.clone());
            Ok(stored)
        })
    }

    async fn list_interactions(
        &self,
        user_id: &str,
        kind: Option<InteractionKind>,
    ) -> Result<Vec<Interaction>> {
        let state = self.state()?;
        Ok(state
            .interactions
            .iter()
            .filter(|i| i.user_id == user_id)
            .filter(|i| kind.map_or(true, |k| i.event_type == k))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl IdentityProvider for DemoBackend {
    fn name(&self) -> &str {
        "demo"
    }

    async fn verify_google_token(&self, id_token: &str) -> Result<Option<User>> {
        if id_token.trim().is_empty() {
            return Err(Error::Auth("No credential returned by Google".to_string()));
        }
        Ok(Some(User::demo()))
    }

    fn fallback_login_url(&self) -> String {
        "demo://auth/google/login".to_string()
    }
}
