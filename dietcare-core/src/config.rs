//! Configuration management
//!
//! Settings live in `settings.json` inside the dietcare directory:
//! ```json
//! {
//!   "app": {
//!     "apiBase": "http://localhost:4000",
//!     "authBase": "http://localhost:8000",
//!     "googleClientId": "...",
//!     "demoMode": false
//!   }
//! }
//! ```
//! Environment variables take precedence over the file.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Default recipe API host
pub const DEFAULT_API_BASE: &str = "http://localhost:4000";

/// Default identity backend host
pub const DEFAULT_AUTH_BASE: &str = "http://localhost:8000";

/// Environment variable overriding the recipe API base URL
pub const API_BASE_ENV: &str = "DIETCARE_API_BASE";

/// Environment variable overriding the identity backend base URL
pub const AUTH_BASE_ENV: &str = "DIETCARE_AUTH_BASE";

/// Environment variable carrying the Google client id
pub const GOOGLE_CLIENT_ID_ENV: &str = "DIETCARE_GOOGLE_CLIENT_ID";

/// Environment variable forcing demo mode on or off
pub const DEMO_MODE_ENV: &str = "DIETCARE_DEMO_MODE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    google_client_id: Option<String>,
    #[serde(default)]
    demo_mode: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// DietCare configuration (resolved view of settings and environment)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub auth_base: String,
    pub google_client_id: Option<String>,
    pub demo_mode: bool,
    env: EnvOverrides,
}

/// Which fields came from the environment; those are never saved
#[derive(Debug, Clone, Copy, Default)]
struct EnvOverrides {
    api_base: bool,
    auth_base: bool,
    google_client_id: bool,
    demo_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            google_client_id: None,
            demo_mode: false,
            env: EnvOverrides::default(),
        }
    }
}

impl Config {
    /// Load config from the dietcare directory, then apply env overrides
    pub fn load(dietcare_dir: &Path) -> Result<Self> {
        let raw = read_settings(dietcare_dir)?;
        let env_api_base = std::env::var(API_BASE_ENV).ok();
        let env_auth_base = std::env::var(AUTH_BASE_ENV).ok();
        let env_client_id = std::env::var(GOOGLE_CLIENT_ID_ENV).ok();
        let env_demo_mode = match std::env::var(DEMO_MODE_ENV).ok().as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
            Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
            _ => None,
        };

        let env = EnvOverrides {
            api_base: env_api_base.is_some(),
            auth_base: env_auth_base.is_some(),
            google_client_id: env_client_id.is_some(),
            demo_mode: env_demo_mode.is_some(),
        };

        let api_base = env_api_base
            .or(raw.app.api_base)
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let auth_base = env_auth_base
            .or(raw.app.auth_base)
            .unwrap_or_else(|| DEFAULT_AUTH_BASE.to_string());
        let google_client_id = env_client_id
            .or(raw.app.google_client_id)
            .filter(|id| !id.trim().is_empty());

        Ok(Self {
            api_base: normalize_base_url(&api_base).context("Invalid API base URL")?,
            auth_base: normalize_base_url(&auth_base).context("Invalid auth base URL")?,
            google_client_id,
            demo_mode: env_demo_mode.unwrap_or(raw.app.demo_mode),
            env,
        })
    }

    /// Save config to the dietcare directory
    ///
    /// Preserves settings this crate doesn't manage. Values taken from the
    /// environment keep whatever the file already had. A settings file that
    /// doesn't parse is left alone and reported.
    pub fn save(&self, dietcare_dir: &Path) -> Result<()> {
        let settings_path = dietcare_dir.join("settings.json");
        let mut settings = read_settings(dietcare_dir)?;

        if !self.env.api_base {
            settings.app.api_base = Some(self.api_base.clone());
        }
        if !self.env.auth_base {
            settings.app.auth_base = Some(self.auth_base.clone());
        }
        if !self.env.google_client_id {
            settings.app.google_client_id = self.google_client_id.clone();
        }
        if !self.env.demo_mode {
            settings.app.demo_mode = self.demo_mode;
        }

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)
            .with_context(|| format!("Failed to write {:?}", settings_path))?;
        Ok(())
    }

    /// Enable demo mode; an explicit toggle is saved even under an env override
    pub fn enable_demo_mode(&mut self) {
        self.demo_mode = true;
        self.env.demo_mode = false;
    }

    /// Disable demo mode
    pub fn disable_demo_mode(&mut self) {
        self.demo_mode = false;
        self.env.demo_mode = false;
    }
}

fn read_settings(dietcare_dir: &Path) -> Result<SettingsFile> {
    let settings_path = dietcare_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)
        .with_context(|| format!("Failed to read {:?}", settings_path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {:?}", settings_path))
}

/// Validate an http(s) base URL and strip trailing slashes
pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).with_context(|| format!("'{}' is not a URL", raw))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => anyhow::bail!("Unsupported URL scheme '{}' in {}", other, raw),
    }
}
