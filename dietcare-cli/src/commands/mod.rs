//! CLI command implementations

pub mod auth;
pub mod demo;
pub mod feed;
pub mod logs;
pub mod profile;
pub mod saved;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use dietcare_core::services::{Access, EntryPoint, LogEvent, LoggingService};
use dietcare_core::{DietcareContext, Screen, User};

use crate::output;

/// Get the event log for CLI operations
///
/// Returns None if the log fails to open; logging never blocks a command.
pub fn get_logger() -> Option<Arc<LoggingService>> {
    let dietcare_dir = get_dietcare_dir().ok()?;
    std::fs::create_dir_all(&dietcare_dir).ok()?;
    LoggingService::new(&dietcare_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<Arc<LoggingService>>, event: LogEvent) {
    if let Some(l) = logger {
        l.record(event);
    }
}

/// The dietcare directory: $DIETCARE_DIR or ~/.dietcare
pub fn get_dietcare_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("DIETCARE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".dietcare"))
}

pub fn get_context(logger: &Option<Arc<LoggingService>>) -> Result<DietcareContext> {
    let dietcare_dir = get_dietcare_dir()?;
    std::fs::create_dir_all(&dietcare_dir)
        .with_context(|| format!("Failed to create dietcare directory: {:?}", dietcare_dir))?;

    DietcareContext::new(&dietcare_dir, logger.clone())
        .context("Failed to initialize dietcare context")
}

/// Record a visit to a public screen
pub fn open_screen(logger: &Option<Arc<LoggingService>>, screen: Screen) {
    log_event(logger, LogEvent::new("page_opened").with_page(screen.as_str()));
}

/// Open a screen that needs a signed-in user
pub fn open_gated_screen(
    ctx: &DietcareContext,
    logger: &Option<Arc<LoggingService>>,
    screen: Screen,
) -> Result<User> {
    if let Access::Redirect(target) = ctx.session.gate(screen) {
        output::warning(&format!(
            "{} needs a signed-in user; taking you to {}.",
            screen, target
        ));
        output::info("Run 'dietcare login demo', 'dietcare login google' or 'dietcare signup'.");
    }
    let user = ctx.session.require_user(screen)?;
    open_screen(logger, screen);
    Ok(user)
}
