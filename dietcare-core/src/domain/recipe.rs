//! Recipe domain model

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::wire;

/// Prefix of the allergen-presence fields on the wire (`contains_peanuts`)
pub const ALLERGEN_FLAG_PREFIX: &str = "contains_";

/// Allergens a recipe can be flagged for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Allergen {
    Dairy,
    Peanuts,
    TreeNuts,
    Gluten,
    Soy,
    Eggs,
    Fish,
    Shellfish,
    Sesame,
}

impl Allergen {
    pub const ALL: [Allergen; 9] = [
        Allergen::Dairy,
        Allergen::Peanuts,
        Allergen::TreeNuts,
        Allergen::Gluten,
        Allergen::Soy,
        Allergen::Eggs,
        Allergen::Fish,
        Allergen::Shellfish,
        Allergen::Sesame,
    ];

    /// Canonical snake_case key
    pub fn key(&self) -> &'static str {
        match self {
            Allergen::Dairy => "dairy",
            Allergen::Peanuts => "peanuts",
            Allergen::TreeNuts => "tree_nuts",
            Allergen::Gluten => "gluten",
            Allergen::Soy => "soy",
            Allergen::Eggs => "eggs",
            Allergen::Fish => "fish",
            Allergen::Shellfish => "shellfish",
            Allergen::Sesame => "sesame",
        }
    }

    /// Wire field carrying this allergen's flag
    pub fn flag_name(&self) -> String {
        format!("{}{}", ALLERGEN_FLAG_PREFIX, self.key())
    }

    /// Map a free-form label ("Tree Nuts", "peanut") to an allergen.
    ///
    /// Singular and plural spellings resolve to the same allergen.
    pub fn from_label(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "dairy" | "milk" => Some(Allergen::Dairy),
            "peanut" | "peanuts" => Some(Allergen::Peanuts),
            "tree_nut" | "tree_nuts" => Some(Allergen::TreeNuts),
            "gluten" | "wheat" => Some(Allergen::Gluten),
            "soy" | "soya" => Some(Allergen::Soy),
            "egg" | "eggs" => Some(Allergen::Eggs),
            "fish" => Some(Allergen::Fish),
            "shellfish" => Some(Allergen::Shellfish),
            "sesame" => Some(Allergen::Sesame),
            _ => None,
        }
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Lower-case a label and turn whitespace runs into underscores
/// ("Tree Nuts" becomes "tree_nuts")
pub fn normalize_label(label: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let ws = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
    ws.replace_all(&label.trim().to_lowercase(), "_").into_owned()
}

/// An allergy as the filter matches it against recipe flags
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Allergy {
    Known(Allergen),
    /// Any other label, by normalized key; matched against `contains_<key>`
    Other(String),
}

impl Allergy {
    /// `None` for a blank label
    pub fn from_label(label: &str) -> Option<Self> {
        if let Some(allergen) = Allergen::from_label(label) {
            return Some(Allergy::Known(allergen));
        }
        let key = normalize_label(label);
        (!key.is_empty()).then_some(Allergy::Other(key))
    }

    pub fn key(&self) -> &str {
        match self {
            Allergy::Known(allergen) => allergen.key(),
            Allergy::Other(key) => key,
        }
    }
}

impl fmt::Display for Allergy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Nutrition facts per serving
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_kcal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sat_fat_g: Option<f64>,
}

/// A catalog recipe. Owned by the backend, read-only here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RecipeWire", into = "RecipeWire")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub image: Option<String>,
    pub nutrition: Nutrition,
    /// Allergen flags present on the record; absent means "not flagged"
    pub allergens: BTreeMap<Allergen, bool>,
    /// `contains_*` flags outside the known allergens, by normalized key
    pub other_allergens: BTreeMap<String, bool>,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image: None,
            nutrition: Nutrition::default(),
            allergens: BTreeMap::new(),
            other_allergens: BTreeMap::new(),
            tags: Vec::new(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
        }
    }

    pub fn with_sodium(mut self, sodium_mg: f64) -> Self {
        self.nutrition.sodium_mg = Some(sodium_mg);
        self
    }

    pub fn with_allergen(mut self, allergen: Allergen, present: bool) -> Self {
        self.allergens.insert(allergen, present);
        self
    }

    /// Sodium used for ordering; missing counts as zero
    pub fn sodium_or_zero(&self) -> f64 {
        self.nutrition.sodium_mg.unwrap_or(0.0)
    }

    /// Whether the recipe carries a truthy flag for the allergen
    pub fn contains(&self, allergen: Allergen) -> bool {
        self.allergens.get(&allergen).copied().unwrap_or(false)
    }

    /// Whether the recipe carries a truthy flag for the allergy
    pub fn has_allergy(&self, allergy: &Allergy) -> bool {
        match allergy {
            Allergy::Known(allergen) => self.contains(*allergen),
            Allergy::Other(key) => self.other_allergens.get(key).copied().unwrap_or(false),
        }
    }

    /// Keys of every truthy flag, known allergens first
    pub fn flagged_keys(&self) -> Vec<&str> {
        let known = self
            .allergens
            .iter()
            .filter(|(_, present)| **present)
            .map(|(allergen, _)| allergen.key());
        let other = self
            .other_allergens
            .iter()
            .filter(|(_, present)| **present)
            .map(|(key, _)| key.as_str());
        known.chain(other).collect()
    }
}

/// JSON shape of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecipeWire {
    #[serde(deserialize_with = "wire::id")]
    id: String,
    #[serde(default, deserialize_with = "wire::nullable")]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(flatten)]
    nutrition: Nutrition,
    #[serde(default, deserialize_with = "wire::tag_list")]
    tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "wire::nullable",
        skip_serializing_if = "Vec::is_empty"
    )]
    ingredients: Vec<String>,
    #[serde(
        default,
        deserialize_with = "wire::nullable",
        skip_serializing_if = "Vec::is_empty"
    )]
    instructions: Vec<String>,
    #[serde(flatten)]
    rest: BTreeMap<String, JsonValue>,
}

impl From<RecipeWire> for Recipe {
    fn from(raw: RecipeWire) -> Self {
        let mut allergens = BTreeMap::new();
        let mut other_allergens = BTreeMap::new();
        for (field, value) in &raw.rest {
            let Some(label) = field.strip_prefix(ALLERGEN_FLAG_PREFIX) else {
                continue;
            };
            let truthy = wire::is_truthy(value);
            match Allergy::from_label(label) {
                Some(Allergy::Known(allergen)) => {
                    let flagged = allergens.entry(allergen).or_insert(false);
                    *flagged = *flagged || truthy;
                }
                Some(Allergy::Other(key)) => {
                    let flagged = other_allergens.entry(key).or_insert(false);
                    *flagged = *flagged || truthy;
                }
                None => {}
            }
        }

        Self {
            id: raw.id,
            title: raw.title,
            image: raw.image,
            nutrition: raw.nutrition,
            allergens,
            other_allergens,
            tags: raw.tags,
            ingredients: raw.ingredients,
            instructions: raw.instructions,
        }
    }
}

impl From<Recipe> for RecipeWire {
    fn from(recipe: Recipe) -> Self {
        let known = recipe
            .allergens
            .iter()
            .map(|(allergen, present)| (allergen.flag_name(), JsonValue::Bool(*present)));
        let other = recipe.other_allergens.iter().map(|(key, present)| {
            (
                format!("{}{}", ALLERGEN_FLAG_PREFIX, key),
                JsonValue::Bool(*present),
            )
        });
        let rest = known.chain(other).collect();

        Self {
            id: recipe.id,
            title: recipe.title,
            image: recipe.image,
            nutrition: recipe.nutrition,
            tags: recipe.tags,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            rest,
        }
    }
}
