//! DietCare CLI - personalized recipes in your terminal

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{auth, demo, feed, logs, profile, saved, status};
use dietcare_core::services::{LogEvent, LoggingService};
use dietcare_core::InteractionKind;

/// DietCare - recipes that fit your diet and health
#[derive(Parser)]
#[command(name = "dietcare", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommended recipes (personalized when signed in)
    Home {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Your personalized recipe feed
    Feed {
        /// Use the backend's recommendations instead of filtering locally
        #[arg(long)]
        server: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a recipe
    Recipe {
        /// Recipe ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Like a recipe
    Like {
        /// Recipe ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Save a recipe for later
    Save {
        /// Recipe ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Mark a recipe as cooked
    Cooked {
        /// Recipe ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recipes you liked
    Saved {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set up or update your health profile
    Onboard(profile::OnboardArgs),

    /// Show your stored profile
    Profile {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in
    Login {
        #[command(subcommand)]
        command: auth::LoginCommands,
    },

    /// Create a demo account
    Signup,

    /// Sign out
    Logout,

    /// Your dashboard
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage demo mode
    Demo {
        #[command(subcommand)]
        command: Option<demo::DemoCommands>,
    },

    /// View and manage the local event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Home { .. } => "home",
            Commands::Feed { .. } => "feed",
            Commands::Recipe { .. } => "recipe",
            Commands::Like { .. } => "like",
            Commands::Save { .. } => "save",
            Commands::Cooked { .. } => "cooked",
            Commands::Saved { .. } => "saved",
            Commands::Onboard(_) => "onboard",
            Commands::Profile { .. } => "profile",
            Commands::Login { .. } => "login",
            Commands::Signup => "signup",
            Commands::Logout => "logout",
            Commands::Status { .. } => "status",
            Commands::Demo { .. } => "demo",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|runtime| runtime.block_on(run(cli)));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let logger: Option<Arc<LoggingService>> = commands::get_logger();
    commands::log_event(
        &logger,
        LogEvent::new("command_executed").with_command(cli.command.name()),
    );

    match cli.command {
        Commands::Home { json } => feed::home(&logger, json).await,
        Commands::Feed { server, json } => feed::feed(&logger, server, json).await,
        Commands::Recipe { id, json } => feed::recipe(&logger, &id, json).await,
        Commands::Like { id, json } => {
            feed::interact(&logger, InteractionKind::Like, &id, json).await
        }
        Commands::Save { id, json } => {
            feed::interact(&logger, InteractionKind::Save, &id, json).await
        }
        Commands::Cooked { id, json } => {
            feed::interact(&logger, InteractionKind::Cooked, &id, json).await
        }
        Commands::Saved { json } => saved::run(&logger, json).await,
        Commands::Onboard(args) => profile::onboard(&logger, args).await,
        Commands::Profile { json } => profile::show(&logger, json).await,
        Commands::Login { command } => auth::login(&logger, command).await,
        Commands::Signup => auth::signup(&logger).await,
        Commands::Logout => auth::logout(&logger),
        Commands::Status { json } => status::run(&logger, json).await,
        Commands::Demo { command } => demo::run(command),
        Commands::Logs { command } => logs::run(logger, command),
    }
}
