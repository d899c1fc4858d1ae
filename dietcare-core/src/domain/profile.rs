//! Health profile domain model

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::recipe::{Allergen, Allergy};
use super::result::Error;
use super::wire;

/// Condition tag that triggers the low-sodium rule
pub const HYPERTENSION: &str = "hypertension";

/// Youngest and oldest accepted ages for onboarding
pub const MIN_AGE: u32 = 5;
pub const MAX_AGE: u32 = 120;

/// Diet preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DietType {
    Vegetarian,
    Vegan,
    NonVegetarian,
    Pescatarian,
}

impl DietType {
    pub const ALL: [DietType; 4] = [
        DietType::Vegetarian,
        DietType::Vegan,
        DietType::NonVegetarian,
        DietType::Pescatarian,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietType::Vegetarian => "vegetarian",
            DietType::Vegan => "vegan",
            DietType::NonVegetarian => "non-veg",
            DietType::Pescatarian => "pescatarian",
        }
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "vegetarian" | "veg" => Ok(DietType::Vegetarian),
            "vegan" => Ok(DietType::Vegan),
            "non-veg" | "non-vegetarian" | "nonveg" | "omnivore" => Ok(DietType::NonVegetarian),
            "pescatarian" => Ok(DietType::Pescatarian),
            _ => Err(Error::validation(format!("Unknown diet type: {}", s))),
        }
    }
}

impl TryFrom<String> for DietType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DietType> for String {
    fn from(diet: DietType) -> Self {
        diet.as_str().to_string()
    }
}

/// A user's stored health and diet preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(
        default,
        deserialize_with = "wire::optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "wire::optional_id")]
    pub user_id: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient")]
    pub age: Option<u32>,
    #[serde(default, alias = "dietType", deserialize_with = "optional_diet")]
    pub diet: Option<DietType>,
    #[serde(default, deserialize_with = "wire::tag_list")]
    pub conditions: Vec<String>,
    #[serde(default, deserialize_with = "wire::tag_list")]
    pub allergies: Vec<String>,
    #[serde(
        default,
        deserialize_with = "wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub calorie_target: Option<u32>,
    #[serde(
        default,
        deserialize_with = "wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget: Option<Decimal>,
}

impl Profile {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Default::default()
        }
    }

    /// Lower-cased allergy labels
    pub fn normalized_allergies(&self) -> Vec<String> {
        self.allergies.iter().map(|a| a.to_lowercase()).collect()
    }

    /// Lower-cased condition labels
    pub fn normalized_conditions(&self) -> Vec<String> {
        self.conditions.iter().map(|c| c.to_lowercase()).collect()
    }

    /// Every allergy the filter must honor, known allergen or not
    pub fn allergies_to_avoid(&self) -> Vec<Allergy> {
        let mut out: Vec<Allergy> = self
            .allergies
            .iter()
            .filter_map(|a| Allergy::from_label(a))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// The known allergens among the profile's labels
    pub fn allergens(&self) -> Vec<Allergen> {
        self.allergies_to_avoid()
            .into_iter()
            .filter_map(|a| match a {
                Allergy::Known(allergen) => Some(allergen),
                Allergy::Other(_) => None,
            })
            .collect()
    }

    pub fn has_condition(&self, condition: &str) -> bool {
        let wanted = condition.to_lowercase();
        self.normalized_conditions().iter().any(|c| *c == wanted)
    }

    /// Check the fields onboarding requires
    pub fn validate(&self) -> Result<(), Error> {
        match self.age {
            None => return Err(Error::validation("Please provide your age")),
            Some(age) if !(MIN_AGE..=MAX_AGE).contains(&age) => {
                return Err(Error::validation(format!(
                    "Age must be between {} and {}",
                    MIN_AGE, MAX_AGE
                )))
            }
            Some(_) => {}
        }
        if self.diet.is_none() {
            return Err(Error::validation("Please provide your diet preference"));
        }
        if self.user_id.is_none() {
            return Err(Error::validation("Profile is not linked to a user"));
        }
        Ok(())
    }
}

/// Diet decoded case-insensitively; an empty selection means none
fn optional_diet<'de, D>(deserializer: D) -> std::result::Result<Option<DietType>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(D::Error::custom),
        None => Ok(None),
    }
}
