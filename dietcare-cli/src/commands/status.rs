//! Status command - the user's dashboard

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use super::{get_context, open_gated_screen};
use super::profile::print_profile;
use crate::output;
use dietcare_core::services::LoggingService;
use dietcare_core::Screen;

pub async fn run(logger: &Option<Arc<LoggingService>>, json: bool) -> Result<()> {
    let ctx = get_context(logger)?;
    let user = open_gated_screen(&ctx, logger, Screen::Dashboard)?;

    let profile = ctx.profile_service.current().await.ok().flatten();
    let status = ctx
        .status_service
        .get_status(&user, profile.as_ref())
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", format!("{}'s Dashboard", status.user.name).bold());
    println!("{}", status.user.email.dimmed());
    if ctx.config.demo_mode {
        println!("{}", "Demo mode".yellow());
    }
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Liked".to_string(), status.likes.to_string()]);
    table.add_row(vec!["Saved".to_string(), status.saves.to_string()]);
    table.add_row(vec!["Cooked".to_string(), status.cooked.to_string()]);
    println!("{}", table);
    println!();

    match &status.profile {
        Some(summary) => {
            println!("{}", "Profile".bold());
            print_profile(summary);
        }
        None => output::warning("No profile yet. Run 'dietcare onboard' to personalize your feed."),
    }

    Ok(())
}
