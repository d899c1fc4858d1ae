//! Onboarding and profile commands

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Select};
use rust_decimal::Decimal;

use super::{get_context, open_gated_screen};
use crate::output;
use dietcare_core::services::{LoggingService, ProfileSummary};
use dietcare_core::{DietType, Profile, Screen};

/// Onboarding answers; anything missing is prompted for
#[derive(Args, Debug, Default)]
pub struct OnboardArgs {
    /// Age in years (5-120)
    #[arg(long)]
    pub age: Option<u32>,
    /// Diet: vegetarian, vegan, non-veg, pescatarian
    #[arg(long)]
    pub diet: Option<String>,
    /// Comma-separated health conditions (e.g. hypertension)
    #[arg(long)]
    pub conditions: Option<String>,
    /// Comma-separated allergies (e.g. "peanuts, tree nuts")
    #[arg(long)]
    pub allergies: Option<String>,
    /// Daily calorie target
    #[arg(long)]
    pub calorie_target: Option<u32>,
    /// Monthly food budget
    #[arg(long)]
    pub budget: Option<Decimal>,
    /// Don't prompt; missing answers stay empty
    #[arg(long)]
    pub no_input: bool,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn prompt_list(prompt: &str) -> Result<Vec<String>> {
    let raw: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(split_list(&raw))
}

/// Fill a profile from flags, prompting for what's missing
fn collect_answers(args: OnboardArgs, existing: Option<Profile>) -> Result<Profile> {
    let mut profile = existing.unwrap_or_default();
    let interactive = !args.no_input;

    profile.age = match args.age {
        Some(age) => Some(age),
        None if interactive => Some(
            Input::<u32>::new()
                .with_prompt("Age")
                .interact_text()?,
        ),
        None => profile.age,
    };

    profile.diet = match args.diet {
        Some(raw) => Some(raw.parse::<DietType>()?),
        None if interactive => {
            let labels: Vec<&str> = DietType::ALL.iter().map(|d| d.as_str()).collect();
            let choice = Select::new()
                .with_prompt("Diet")
                .items(&labels)
                .default(0)
                .interact()?;
            Some(DietType::ALL[choice])
        }
        None => profile.diet,
    };

    if let Some(raw) = args.conditions {
        profile.conditions = split_list(&raw);
    } else if interactive {
        profile.conditions = prompt_list("Health conditions (comma-separated, optional)")?;
    }

    if let Some(raw) = args.allergies {
        profile.allergies = split_list(&raw);
    } else if interactive {
        profile.allergies = prompt_list("Allergies (comma-separated, optional)")?;
    }

    if args.calorie_target.is_some() {
        profile.calorie_target = args.calorie_target;
    }
    if args.budget.is_some() {
        profile.budget = args.budget;
    }

    Ok(profile)
}

pub async fn onboard(logger: &Option<Arc<LoggingService>>, args: OnboardArgs) -> Result<()> {
    let ctx = get_context(logger)?;
    let user = open_gated_screen(&ctx, logger, Screen::Onboarding)?;

    println!("{}", "Tell us about yourself".bold());
    let existing = ctx.profile_service.current().await.ok().flatten();
    let answers = collect_answers(args, existing)?;

    let pb = output::spinner("Saving profile...");
    let result = ctx.profile_service.submit(&user, answers).await;
    pb.finish_and_clear();

    match result {
        Ok(_) => {
            output::success("Profile saved");
            println!("Run 'dietcare feed' to see recipes picked for you.");
            Ok(())
        }
        Err(e) => {
            output::error(&format!("Could not save your profile: {}", e));
            Err(e.into())
        }
    }
}

pub async fn show(logger: &Option<Arc<LoggingService>>, json: bool) -> Result<()> {
    let ctx = get_context(logger)?;
    open_gated_screen(&ctx, logger, Screen::Dashboard)?;

    let profile = ctx.profile_service.current().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    let Some(profile) = profile else {
        output::warning("No profile yet. Run 'dietcare onboard' to create one.");
        return Ok(());
    };
    print_profile(&ProfileSummary::from(&profile));
    Ok(())
}

pub fn print_profile(summary: &ProfileSummary) {
    let none = || "-".to_string();
    let mut table = output::create_table();
    table.add_row(vec![
        "Age".to_string(),
        summary.age.map(|a| a.to_string()).unwrap_or_else(none),
    ]);
    table.add_row(vec!["Diet".to_string(), summary.diet.clone().unwrap_or_else(none)]);
    table.add_row(vec!["Conditions".to_string(), summary.conditions.join(", ")]);
    table.add_row(vec!["Allergies".to_string(), summary.allergies.join(", ")]);
    table.add_row(vec![
        "Calorie target".to_string(),
        summary
            .calorie_target
            .map(|c| format!("{} kcal", c))
            .unwrap_or_else(none),
    ]);
    table.add_row(vec![
        "Monthly budget".to_string(),
        summary.budget.map(|b| b.to_string()).unwrap_or_else(none),
    ]);
    println!("{}", table);
}
