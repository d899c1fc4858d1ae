//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod auth;
mod demo;
mod interaction;
pub mod logging;
mod profile;
pub mod recommendation;
mod session;
mod status;

pub use auth::AuthService;
pub use demo::{DemoService, DEMO_STATE_FILE};
pub use interaction::InteractionService;
pub use logging::{EntryPoint, EventCount, Level, LogEntry, LogEvent, LoggingService};
pub use profile::ProfileService;
pub use recommendation::{filter_recommendations, RecommendationService};
pub use session::{Access, SessionService};
pub use status::{ProfileSummary, StatusService, StatusSummary};
