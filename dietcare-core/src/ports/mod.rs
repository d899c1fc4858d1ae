//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod recipe_api;
mod session_store;

pub use recipe_api::{IdentityProvider, RecipeApi};
pub use session_store::SessionStore;
