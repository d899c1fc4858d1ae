//! Login, signup and logout commands

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Input;

use super::{get_context, open_screen};
use crate::output;
use dietcare_core::services::LoggingService;
use dietcare_core::{DietcareContext, Screen, User};

#[derive(Subcommand)]
pub enum LoginCommands {
    /// Sign in with a Google ID token
    Google {
        /// ID token issued by Google Sign-In
        #[arg(long, env = "DIETCARE_GOOGLE_ID_TOKEN")]
        token: Option<String>,
    },
    /// Sign in as the demo user
    Demo,
}

/// Tell the user where to go next
async fn route_after_login(ctx: &DietcareContext, user: &User) {
    let greeting = match user.first_name() {
        Some(name) => format!("Signed in as {}", name),
        None => "Signed in".to_string(),
    };
    output::success(&greeting);

    match ctx.auth_service.landing_screen(user).await {
        Screen::Home => println!("Run 'dietcare home' to see your recipes."),
        _ => println!("Let's set up your profile: run 'dietcare onboard'."),
    }
}

pub async fn login(logger: &Option<Arc<LoggingService>>, command: LoginCommands) -> Result<()> {
    let ctx = get_context(logger)?;
    open_screen(logger, Screen::Login);

    let session = match command {
        LoginCommands::Google { token } => {
            let token = match token {
                Some(t) => t,
                None => Input::new()
                    .with_prompt("Google ID token")
                    .interact_text()?,
            };
            let pb = output::spinner("Signing in with Google...");
            let result = ctx.auth_service.google(&token).await;
            pb.finish_and_clear();
            result?
        }
        LoginCommands::Demo => ctx.auth_service.demo_login()?,
    };

    route_after_login(&ctx, &session.user).await;
    Ok(())
}

/// Demo signup: a fresh local user that goes straight to onboarding
pub async fn signup(logger: &Option<Arc<LoggingService>>) -> Result<()> {
    let ctx = get_context(logger)?;
    open_screen(logger, Screen::Signup);

    let session = ctx.auth_service.demo_signup()?;
    output::success(&format!("Account created for {}", session.user.name));
    println!("Let's set up your profile: run 'dietcare onboard'.");
    Ok(())
}

pub fn logout(logger: &Option<Arc<LoggingService>>) -> Result<()> {
    let ctx = get_context(logger)?;
    match ctx.session.current_user() {
        Some(user) => {
            ctx.auth_service.logout()?;
            println!("{} {}", "Signed out".yellow(), user.email.dimmed());
        }
        None => println!("Not signed in."),
    }
    Ok(())
}
