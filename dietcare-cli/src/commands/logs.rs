//! Logs command - view and manage the local event log

use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;

use super::get_dietcare_dir;
use crate::output;
use dietcare_core::services::{EntryPoint, Level, LoggingService};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Minimum level: info, warn, error
        #[arg(long, default_value = "info")]
        level: Level,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear log entries
    Clear {
        /// Only delete logs older than N days
        #[arg(long)]
        older_than_days: Option<i64>,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show log statistics and database path
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Reuse the process's event log, or open it to surface the error
fn get_logging_service(logger: Option<Arc<LoggingService>>) -> Result<Arc<LoggingService>> {
    match logger {
        Some(service) => Ok(service),
        None => {
            let dietcare_dir = get_dietcare_dir()?;
            let service =
                LoggingService::new(&dietcare_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;
            Ok(Arc::new(service))
        }
    }
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn colored_level(level: &str) -> String {
    match level {
        "error" => level.red().to_string(),
        "warn" => level.yellow().to_string(),
        _ => level.dimmed().to_string(),
    }
}

pub fn run(logger: Option<Arc<LoggingService>>, command: LogsCommands) -> Result<()> {
    let service = get_logging_service(logger)?;

    match command {
        LogsCommands::List { limit, level, json } => {
            let entries = service.get_at_level(level, limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("No log entries found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Level", "Event", "Context", "Error"]);

            for entry in entries {
                let context = [
                    entry.command.as_deref(),
                    entry.page.as_deref(),
                    entry.backend.as_deref(),
                ]
                .iter()
                .filter_map(|&s| s)
                .collect::<Vec<_>>()
                .join(", ");

                table.add_row(vec![
                    format_timestamp(entry.timestamp),
                    colored_level(&entry.level),
                    entry.event,
                    context,
                    entry.error_message.unwrap_or_default(),
                ]);
            }

            println!("{}", table);
        }
        LogsCommands::Clear {
            older_than_days,
            force,
            json,
        } => {
            let prompt = match older_than_days {
                Some(days) => format!("Delete logs older than {} days?", days),
                None => "Delete all logs?".to_string(),
            };
            if !force && !json {
                use dialoguer::Confirm;
                if !Confirm::new().with_prompt(prompt).default(false).interact()? {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let deleted = match older_than_days {
                Some(days) => {
                    let cutoff = Utc::now() - Duration::days(days);
                    service.delete_before(cutoff.timestamp_millis())?
                }
                None => service.clear()?,
            };

            if json {
                println!("{}", serde_json::json!({ "deleted": deleted }));
            } else {
                println!("Deleted {} log entries", deleted);
            }
        }
        LogsCommands::Stats { json } => {
            let total = service.count()?;
            let counts = service.stats()?;
            let db_path = service.db_path().to_path_buf();
            let size_bytes = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "total_entries": total,
                        "events": counts,
                        "database_path": db_path.to_string_lossy(),
                        "database_size_bytes": size_bytes
                    })
                );
                return Ok(());
            }

            println!("{}", "Log Statistics".bold());
            println!("  Total entries: {}", total);
            println!("  Database: {}", db_path.display());
            println!("  Size: {} bytes", size_bytes);

            if !counts.is_empty() {
                println!();
                let mut table = output::create_table();
                table.set_header(vec!["Level", "Event", "Count"]);
                for c in counts {
                    table.add_row(vec![colored_level(&c.level), c.event, c.count.to_string()]);
                }
                println!("{}", table);
            }
        }
    }

    Ok(())
}
