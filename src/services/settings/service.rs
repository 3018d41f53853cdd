use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::EngineSettings;

const SETTINGS_FILE: &str = "engine.toml";

/// Loads and saves [`EngineSettings`] as TOML.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service bound to the per-user config directory.
    pub fn with_default_path() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// `<config dir>/interval-engine/engine.toml` for the current platform.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "KenBoyle", "IntervalEngine")
            .context("Failed to resolve the user config directory")?;
        Ok(dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read settings, falling back to defaults when the file does not exist.
    pub fn load(&self) -> Result<EngineSettings> {
        if !self.path.exists() {
            log::info!("No settings at {:?}, using defaults", self.path);
            return Ok(EngineSettings::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {:?}", self.path))?;
        let settings: EngineSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {:?}", self.path))?;
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings in {:?}: {}", self.path, e))?;

        log::debug!("Loaded settings from {:?}", self.path);
        Ok(settings)
    }

    pub fn save(&self, settings: &EngineSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create settings directory: {:?}", parent))?;
        }
        let content = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings to {:?}", self.path))?;
        Ok(())
    }
}
