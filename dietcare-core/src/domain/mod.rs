//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod interaction;
pub mod profile;
pub mod recipe;
pub mod result;
mod session;
pub mod user;
pub(crate) mod wire;

pub use interaction::{Interaction, InteractionKind};
pub use profile::{DietType, Profile};
pub use recipe::{Allergen, Allergy, Nutrition, Recipe};
pub use session::{Screen, Session};
pub use user::User;
