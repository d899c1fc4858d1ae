//! Demo service - manage demo mode
//!
//! Demo mode swaps the HTTP backends for the in-process demo backend so the
//! app can be explored without a recipe server or a Google account.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Config;

/// File holding demo-mode profiles and interactions
pub const DEMO_STATE_FILE: &str = "demo_state.json";

pub struct DemoService {
    dietcare_dir: PathBuf,
}

impl DemoService {
    pub fn new(dietcare_dir: &Path) -> Self {
        Self {
            dietcare_dir: dietcare_dir.to_path_buf(),
        }
    }

    pub fn state_path(&self) -> PathBuf {
        self.dietcare_dir.join(DEMO_STATE_FILE)
    }

    pub fn is_enabled(&self) -> Result<bool> {
        let config = Config::load(&self.dietcare_dir)?;
        Ok(config.demo_mode)
    }

    /// Turn demo mode on with fresh demo state
    pub fn enable(&self) -> Result<()> {
        self.remove_state()?;

        let mut config = Config::load(&self.dietcare_dir)?;
        config.enable_demo_mode();
        config.save(&self.dietcare_dir)?;
        Ok(())
    }

    /// Turn demo mode off; `clean` also drops the demo state
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.dietcare_dir)?;
        config.disable_demo_mode();
        config.save(&self.dietcare_dir)?;

        if clean {
            self.remove_state()?;
        }
        Ok(())
    }

    fn remove_state(&self) -> Result<()> {
        let path = self.state_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_enable_and_disable() {
        let dir = tempdir().unwrap();
        let service = DemoService::new(dir.path());
        assert!(!service.is_enabled().unwrap());

        std::fs::write(service.state_path(), "{}").unwrap();
        service.enable().unwrap();
        assert!(service.is_enabled().unwrap());
        assert!(!service.state_path().exists());

        std::fs::write(service.state_path(), "{}").unwrap();
        service.disable(false).unwrap();
        assert!(!service.is_enabled().unwrap());
        assert!(service.state_path().exists());

        service.disable(true).unwrap();
        assert!(!service.state_path().exists());
    }
}
