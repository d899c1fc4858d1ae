//! Home, feed and recipe detail commands

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use super::{get_context, open_gated_screen, open_screen};
use crate::output;
use dietcare_core::ports::RecipeApi;
use dietcare_core::services::LoggingService;
use dietcare_core::{InteractionKind, OperationResult, Recipe, Screen};

fn print_recipes(recipes: &[Recipe], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(recipes)?);
        return Ok(());
    }
    if recipes.is_empty() {
        output::warning("No recipes match your profile yet.");
        return Ok(());
    }
    println!("{}", output::recipe_table(recipes));
    println!();
    println!("Run 'dietcare recipe <id>' for details.");
    Ok(())
}

/// Home: personalized picks for the session user, or the plain catalog
pub async fn home(logger: &Option<Arc<LoggingService>>, json: bool) -> Result<()> {
    let ctx = get_context(logger)?;
    open_screen(logger, Screen::Home);
    let user = ctx.session.current_user();

    if !json {
        match user.as_ref().and_then(|u| u.first_name()) {
            Some(name) => println!("{}", format!("Welcome back, {}!", name).bold()),
            None => println!("{}", "Welcome to DietCare".bold()),
        }
        println!();
    }

    let pb = output::spinner("Loading recipes...");
    let result = ctx
        .recommendation_service
        .recommend(user.as_ref().map(|u| u.id.as_str()))
        .await;
    pb.finish_and_clear();

    print_recipes(&result?, json)
}

/// Feed: client-side filtered feed, or the backend's own picks with --server
pub async fn feed(logger: &Option<Arc<LoggingService>>, server: bool, json: bool) -> Result<()> {
    let ctx = get_context(logger)?;
    let user = open_gated_screen(&ctx, logger, Screen::Feed)?;

    let pb = output::spinner("Building your feed...");
    let result = if server {
        ctx.recommendation_service.server_recommendations(&user.id).await
    } else {
        ctx.recommendation_service.recommend(Some(&user.id)).await
    };
    pb.finish_and_clear();

    print_recipes(&result?, json)
}

/// Recipe detail
pub async fn recipe(logger: &Option<Arc<LoggingService>>, id: &str, json: bool) -> Result<()> {
    let ctx = get_context(logger)?;
    open_screen(logger, Screen::RecipeDetail);

    let pb = output::spinner("Loading recipe...");
    let result = ctx.api.get_recipe(id).await;
    pb.finish_and_clear();
    let recipe = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        output::print_recipe(&recipe);
    }
    Ok(())
}

/// Like, save or mark a recipe as cooked
pub async fn interact(
    logger: &Option<Arc<LoggingService>>,
    kind: InteractionKind,
    recipe_id: &str,
    json: bool,
) -> Result<()> {
    let ctx = get_context(logger)?;
    let user = open_gated_screen(&ctx, logger, Screen::Feed)?;

    let recorded = ctx
        .interaction_service
        .record(&user.id, recipe_id, kind)
        .await;

    if json {
        let result = match &recorded {
            Some(interaction) => OperationResult::ok(interaction.clone()),
            None => OperationResult::fail("Interaction was not recorded"),
        }
        .with_context("recipe_id", serde_json::json!(recipe_id));
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match (recorded, kind) {
        (Some(_), InteractionKind::Like) => output::success(&format!("Liked recipe {}", recipe_id)),
        (Some(_), InteractionKind::Save) => output::success(&format!("Saved recipe {}", recipe_id)),
        (Some(_), InteractionKind::Cooked) => {
            output::success(&format!("Marked recipe {} as cooked", recipe_id))
        }
        (None, _) => output::warning("Couldn't reach the recipe service; nothing was recorded."),
    }
    Ok(())
}
