//! Event log - structured event logging to DuckDB
//!
//! Stores privacy-safe events in logs.duckdb. Health data (allergies,
//! conditions, age, budget) and recipe contents are never logged; only
//! event names, screens, commands and error text.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use chrono::Utc;
use duckdb::Connection;
use serde::{Deserialize, Serialize};

use crate::log_migrations::LOG_MIGRATIONS;

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Timestamp in the low 48 bits, per-millisecond counter in the high 16
fn generate_id() -> u64 {
    let timestamp = now_ms() as u64;
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    (timestamp << 16) | counter
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// Entry point for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Embedded,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Embedded => "embedded",
        }
    }
}

/// Severity of a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            other => Err(anyhow!("Unknown log level '{}'", other)),
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub level: Level,
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    /// Info-level event with just a name
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            event: event.into(),
            backend: None,
            page: None,
            command: None,
            error_message: None,
            error_details: None,
        }
    }

    pub fn warn(event: impl Into<String>) -> Self {
        Self::new(event).with_level(Level::Warn)
    }

    pub fn error(event: impl Into<String>) -> Self {
        Self::new(event).with_level(Level::Error)
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Which recipe backend served the operation ("http", "demo")
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A log entry as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub level: String,
    pub event: String,
    pub backend: Option<String>,
    pub page: Option<String>,
    pub command: Option<String>,
    pub error_message: Option<String>,
    pub error_details: Option<String>,
}

/// Event counts grouped by level and name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCount {
    pub level: String,
    pub event: String,
    pub count: u64,
}

const ENTRY_COLUMNS: &str = "id, timestamp, entry_point, app_version, platform, \
     level, event, backend, page, command, error_message, error_details";

fn read_entry(row: &duckdb::Row<'_>) -> duckdb::Result<LogEntry> {
    Ok(LogEntry {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        entry_point: row.get(2)?,
        app_version: row.get(3)?,
        platform: row.get(4)?,
        level: row.get(5)?,
        event: row.get(6)?,
        backend: row.get(7)?,
        page: row.get(8)?,
        command: row.get(9)?,
        error_message: row.get(10)?,
        error_details: row.get(11)?,
    })
}

/// Structured event log backed by logs.duckdb
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Open or create logs.duckdb in the dietcare directory and apply
    /// pending migrations
    pub fn new(
        dietcare_dir: &Path,
        entry_point: EntryPoint,
        app_version: impl Into<String>,
    ) -> Result<Self> {
        std::fs::create_dir_all(dietcare_dir)?;
        let db_path = dietcare_dir.join("logs.duckdb");
        let conn = Connection::open(&db_path)?;

        let service = Self {
            conn: Mutex::new(conn),
            db_path,
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        };

        service.run_migrations()?;

        Ok(service)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;

        let table_exists: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM information_schema.tables WHERE table_name = 'sys_migrations'",
                [],
                |row| row.get(0),
            )
            .unwrap_or(false);

        if !table_exists {
            if let Some((name, sql)) = LOG_MIGRATIONS.iter().find(|(n, _)| *n == "000_migrations.sql")
            {
                conn.execute_batch(sql)?;
                conn.execute(
                    "INSERT INTO sys_migrations (migration_name) VALUES (?)",
                    [name],
                )?;
            }
        }

        let mut stmt = conn.prepare("SELECT migration_name FROM sys_migrations")?;
        let applied: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        for (name, sql) in LOG_MIGRATIONS.iter() {
            if *name == "000_migrations.sql" || applied.iter().any(|a| a == name) {
                continue;
            }
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO sys_migrations (migration_name) VALUES (?)",
                [name],
            )?;
        }

        Ok(())
    }

    /// Log an event; entry point, version and platform are filled in
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO sys_logs (
                id, timestamp, entry_point, app_version, platform,
                level, event, backend, page, command, error_message, error_details
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            duckdb::params![
                generate_id(),
                now_ms(),
                self.entry_point.as_str(),
                &self.app_version,
                self.platform,
                event.level.as_str(),
                &event.event,
                &event.backend,
                &event.page,
                &event.command,
                &event.error_message,
                &event.error_details,
            ],
        )?;

        Ok(())
    }

    /// Log and drop any failure. Logging never breaks an operation.
    pub fn record(&self, event: LogEvent) {
        let _ = self.log(event);
    }

    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new("command_executed").with_command(command))
    }

    pub fn log_page(&self, page: &str) -> Result<()> {
        self.log(LogEvent::new("page_opened").with_page(page))
    }

    pub fn log_error(&self, event: &str, message: &str, details: Option<&str>) -> Result<()> {
        let mut log_event = LogEvent::error(event).with_error(message);
        if let Some(d) = details {
            log_event = log_event.with_error_details(d);
        }
        self.log(log_event)
    }

    /// Most recent entries, newest first
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_logs ORDER BY timestamp DESC, id DESC LIMIT ?",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map([limit as i64], read_entry)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    /// Most recent entries at or above a level
    pub fn get_at_level(&self, min_level: Level, limit: usize) -> Result<Vec<LogEntry>> {
        let levels: &[&str] = match min_level {
            Level::Info => &["info", "warn", "error"],
            Level::Warn => &["warn", "error"],
            Level::Error => &["error"],
        };
        let placeholders = vec!["?"; levels.len()].join(", ");

        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_logs WHERE level IN ({}) ORDER BY timestamp DESC, id DESC LIMIT ?",
            ENTRY_COLUMNS, placeholders
        ))?;

        let mut params: Vec<Box<dyn duckdb::ToSql>> = levels
            .iter()
            .map(|l| Box::new(l.to_string()) as Box<dyn duckdb::ToSql>)
            .collect();
        params.push(Box::new(limit as i64));
        let param_refs: Vec<&dyn duckdb::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let entries = stmt
            .query_map(param_refs.as_slice(), read_entry)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    /// Entries carrying an error message
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sys_logs WHERE error_message IS NOT NULL \
             ORDER BY timestamp DESC, id DESC LIMIT ?",
            ENTRY_COLUMNS
        ))?;
        let entries = stmt
            .query_map([limit as i64], read_entry)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }

    /// Event counts by level and name, most frequent first
    pub fn stats(&self) -> Result<Vec<EventCount>> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let mut stmt = conn.prepare(
            "SELECT level, event, COUNT(*) AS n FROM sys_logs \
             GROUP BY level, event ORDER BY n DESC, level, event",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok(EventCount {
                    level: row.get(0)?,
                    event: row.get(1)?,
                    count: row.get(2)?,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();
        Ok(counts)
    }

    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM sys_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete logs older than the given unix-ms timestamp
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let deleted = conn.execute("DELETE FROM sys_logs WHERE timestamp < ?", [timestamp_ms])?;
        Ok(deleted as u64)
    }

    /// Delete every entry
    pub fn clear(&self) -> Result<u64> {
        let conn = self.conn.lock().map_err(|e| anyhow!("Lock poisoned: {}", e))?;
        let deleted = conn.execute("DELETE FROM sys_logs", [])?;
        Ok(deleted as u64)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn service(dir: &Path) -> LoggingService {
        LoggingService::new(dir, EntryPoint::Cli, "0.1.0").unwrap()
    }

    #[test]
    fn test_logging_service_creation() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        assert!(service.db_path().exists());
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_reopen_does_not_reapply_migrations() {
        let dir = tempdir().unwrap();
        service(dir.path()).log_command("home").unwrap();
        let reopened = service(dir.path());
        assert_eq!(reopened.count().unwrap(), 1);
    }

    #[test]
    fn test_log_command() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        service.log_command("feed").unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "command_executed");
        assert_eq!(entries[0].command.as_deref(), Some("feed"));
        assert_eq!(entries[0].level, "info");
        assert_eq!(entries[0].entry_point, "cli");
        assert_eq!(entries[0].app_version, "0.1.0");
    }

    #[test]
    fn test_log_with_context() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        service
            .log(
                LogEvent::warn("personalization_degraded")
                    .with_backend("http")
                    .with_page("feed")
                    .with_error("Unable to connect"),
            )
            .unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries[0].level, "warn");
        assert_eq!(entries[0].backend.as_deref(), Some("http"));
        assert_eq!(entries[0].page.as_deref(), Some("feed"));
    }

    #[test]
    fn test_log_error() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        service
            .log_error("saved_recipes_failed", "HTTP 500", Some("recipe 7"))
            .unwrap();

        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].level, "error");
        assert_eq!(errors[0].error_details.as_deref(), Some("recipe 7"));
    }

    #[test]
    fn test_filter_by_level_and_stats() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        service.log_page("home").unwrap();
        service.log_page("home").unwrap();
        service.record(LogEvent::warn("interaction_not_recorded"));
        service.record(LogEvent::error("google_sign_in_failed"));

        assert_eq!(service.get_at_level(Level::Info, 10).unwrap().len(), 4);
        assert_eq!(service.get_at_level(Level::Warn, 10).unwrap().len(), 2);
        let errors = service.get_at_level(Level::Error, 10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "google_sign_in_failed");

        let stats = service.stats().unwrap();
        assert_eq!(stats[0].event, "page_opened");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats.len(), 3);
    }

    #[test]
    fn test_count_delete_and_clear() {
        let dir = tempdir().unwrap();
        let service = service(dir.path());
        service.log_page("home").unwrap();
        service.log_page("feed").unwrap();
        assert_eq!(service.count().unwrap(), 2);

        assert_eq!(service.delete_before(0).unwrap(), 0);
        assert_eq!(service.delete_before(now_ms() + 1000).unwrap(), 2);

        service.log_page("saved").unwrap();
        assert_eq!(service.clear().unwrap(), 1);
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!("WARNING".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("error".parse::<Level>().unwrap(), Level::Error);
        assert!("loud".parse::<Level>().is_err());
    }
}
