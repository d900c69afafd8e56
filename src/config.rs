use std::path::Path;

use anyhow::{Context, Result};
use drumgrid_core::{NoteMappingTable, DEFAULT_BPM, DEFAULT_STEPS};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Settings read from an optional JSON file
///
/// Every field may be omitted; command-line flags override whatever the file
/// sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the similarity search service
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Loop length used for imports
    #[serde(default = "default_steps")]
    pub steps: u16,

    /// Tempo used when a file declares none, and for exports
    #[serde(default = "default_bpm")]
    pub bpm: f64,

    /// Note numbers read from imported files, in kit order
    #[serde(default = "NoteMappingTable::ezdrummer")]
    pub input_notes: NoteMappingTable,

    /// Note numbers written to exported files, in kit order
    #[serde(default = "NoteMappingTable::general_midi")]
    pub export_notes: NoteMappingTable,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_steps() -> u16 {
    DEFAULT_STEPS as u16
}

fn default_bpm() -> f64 {
    DEFAULT_BPM
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            steps: default_steps(),
            bpm: DEFAULT_BPM,
            input_notes: NoteMappingTable::ezdrummer(),
            export_notes: NoteMappingTable::general_midi(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.steps == 0 {
            anyhow::bail!("steps must be at least 1");
        }
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            anyhow::bail!("bpm must be a positive number, got {}", self.bpm);
        }
        let tables = [
            ("input_notes", &self.input_notes),
            ("export_notes", &self.export_notes),
        ];
        for (name, table) in tables {
            if let Some(note) = table.notes().iter().find(|&&n| n > 127) {
                anyhow::bail!("{} contains {}, MIDI notes range from 0 to 127", name, note);
            }
        }
        Ok(())
    }
}
