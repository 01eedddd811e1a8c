//! Configuration handling for the reporting tool

use crate::schema::DEFAULT_MAX_FILE_SIZE;
use crate::state::ReportVariant;
use crate::transport::DEFAULT_SUBMIT_DELAY;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User configuration for sighting reports
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Path to the sighting schema document
    pub schema_path: Option<PathBuf>,
    /// Report variant used when none is given
    pub variant: Option<ReportVariant>,
    /// Site name shown in the email consent line
    pub site_name: Option<String>,
    /// Largest accepted upload in bytes
    pub max_file_size: Option<u64>,
    /// Simulated submission delay in milliseconds
    pub submit_delay_ms: Option<u64>,
}

impl ReportConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "wildbook", "sighting-report")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration, falling back to defaults when the file is unreadable
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from_or_default(&path),
            None => Self::default(),
        }
    }

    /// Load configuration from a specific file; a missing file gives defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: ReportConfig = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable config: {e:#}");
            Self::default()
        })
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Schema path, with an explicit path taking precedence over the file
    pub fn resolve_schema_path(&self, explicit: Option<PathBuf>) -> Option<PathBuf> {
        explicit.or_else(|| self.schema_path.clone())
    }

    pub fn variant(&self) -> ReportVariant {
        self.variant.unwrap_or_default()
    }

    pub fn site_name(&self) -> &str {
        self.site_name.as_deref().unwrap_or("this site")
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(DEFAULT_MAX_FILE_SIZE)
    }

    pub fn submit_delay(&self) -> Duration {
        self.submit_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SUBMIT_DELAY)
    }
}
