//! Saved command - recipes the user liked

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use super::{get_context, open_gated_screen};
use crate::output;
use dietcare_core::services::LoggingService;
use dietcare_core::Screen;

pub async fn run(logger: &Option<Arc<LoggingService>>, json: bool) -> Result<()> {
    let ctx = get_context(logger)?;
    let user = open_gated_screen(&ctx, logger, Screen::Saved)?;

    let pb = output::spinner("Loading saved recipes...");
    let result = ctx.interaction_service.saved_recipes(&user.id).await;
    pb.finish_and_clear();
    let recipes = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    println!("{}", "Saved Recipes".bold());
    println!();
    if recipes.is_empty() {
        println!("Nothing saved yet. Like a recipe with 'dietcare like <id>'.");
        return Ok(());
    }
    println!("{}", output::recipe_table(&recipes));
    Ok(())
}
