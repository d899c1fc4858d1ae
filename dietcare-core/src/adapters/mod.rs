//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest HTTP clients for the RecipeApi and IdentityProvider ports
//! - In-memory demo backend for offline use and testing
//! - JSON file and in-memory SessionStore implementations

pub mod demo;
pub mod http;
pub mod session;

#[cfg(test)]
pub mod mock_server;
