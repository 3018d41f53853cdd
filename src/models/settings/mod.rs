// Settings module
// Engine configuration, read from a TOML file by the settings service

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineSettings {
    pub calendar: CalendarSettings,
    pub selection: SelectionSettings,
    pub logging: LoggingSettings,
}

impl EngineSettings {
    /// Validate values serde cannot check on its own
    pub fn validate(&self) -> Result<(), String> {
        if self.selection.max_cascade_steps == 0 {
            return Err("selection.max_cascade_steps must be at least 1".to_string());
        }
        if self.logging.level.parse::<log::LevelFilter>().is_err() {
            return Err(format!("Unknown log level '{}'", self.logging.level));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// Zone whose midnights delimit day buckets.
    pub timezone: Tz,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self { timezone: Tz::UTC }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Upper bound on bounds-resolution steps for a single mutation.
    pub max_cascade_steps: usize,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            max_cascade_steps: 4096,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is not set.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
