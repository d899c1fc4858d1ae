//! Output formatting utilities

use std::time::Duration;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};

use dietcare_core::Recipe;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Spinner shown while a request is in flight
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn amount(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.0} {}", v, unit),
        None => "-".to_string(),
    }
}

/// Allergen names flagged on a recipe
pub fn allergen_list(recipe: &Recipe) -> String {
    recipe.flagged_keys().join(", ")
}

/// Recipe list with the nutrition columns the feed shows
pub fn recipe_table(recipes: &[Recipe]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Title", "Calories", "Protein", "Sodium", "Allergens"]);
    for recipe in recipes {
        table.add_row(vec![
            recipe.id.clone(),
            recipe.title.clone(),
            amount(recipe.nutrition.calories_kcal, "kcal"),
            amount(recipe.nutrition.protein_g, "g"),
            amount(recipe.nutrition.sodium_mg, "mg"),
            allergen_list(recipe),
        ]);
    }
    table
}

/// Full recipe view: nutrition, allergens, ingredients, steps
pub fn print_recipe(recipe: &Recipe) {
    println!("{}", recipe.title.bold());
    if let Some(image) = &recipe.image {
        println!("{}", image.dimmed());
    }
    if !recipe.tags.is_empty() {
        println!("{}", recipe.tags.join(" · ").dimmed());
    }
    println!();

    let n = &recipe.nutrition;
    let mut table = create_table();
    table.set_header(vec!["Nutrient", "Amount"]);
    for (label, value, unit) in [
        ("Calories", n.calories_kcal, "kcal"),
        ("Protein", n.protein_g, "g"),
        ("Carbohydrates", n.carbs_g, "g"),
        ("Fat", n.fat_g, "g"),
        ("Saturated fat", n.sat_fat_g, "g"),
        ("Sugar", n.sugar_g, "g"),
        ("Fiber", n.fiber_g, "g"),
        ("Sodium", n.sodium_mg, "mg"),
    ] {
        if value.is_some() {
            table.add_row(vec![label.to_string(), amount(value, unit)]);
        }
    }
    println!("{}", table);

    let allergens = allergen_list(recipe);
    if !allergens.is_empty() {
        println!("{} {}", "Contains:".red().bold(), allergens);
    }

    if !recipe.ingredients.is_empty() {
        println!();
        println!("{}", "Ingredients".bold());
        for item in &recipe.ingredients {
            println!("  • {}", item);
        }
    }

    if !recipe.instructions.is_empty() {
        println!();
        println!("{}", "Instructions".bold());
        for (i, step) in recipe.instructions.iter().enumerate() {
            println!("  {}. {}", i + 1, step);
        }
    }
}
