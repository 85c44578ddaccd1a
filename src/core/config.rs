//! Application configuration management

use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::storage::FileStore;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory the journal store lives in (platform data dir when unset)
    pub storage_dir: Option<PathBuf>,
    /// Last directory used by the import/export/photo dialogs
    pub last_dialog_dir: Option<PathBuf>,
    /// UI settings
    pub ui: UiConfig,
}

/// UI settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme (light/dark)
    pub theme: String,
    /// Height of the collage canvas
    pub collage_height: f32,
    /// Open the editor in render mode
    pub start_in_render_mode: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            collage_height: 700.0,
            start_in_render_mode: false,
        }
    }
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "travel-journal", "TravelJournal")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific file, defaulting when it is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// The journal store this configuration points at
    pub fn journal_store(&self) -> FileStore {
        match &self.storage_dir {
            Some(dir) => FileStore::new(dir.clone()),
            None => FileStore::default_location().unwrap_or_else(|| FileStore::new("journal-data")),
        }
    }

    /// Remember the directory of a file picked in a dialog
    pub fn remember_dialog_path(&mut self, picked: &Path) {
        let dir = if picked.is_dir() {
            Some(picked.to_path_buf())
        } else {
            picked.parent().map(Path::to_path_buf)
        };
        if dir.is_some() && dir != self.last_dialog_dir {
            self.last_dialog_dir = dir;
            if let Err(e) = self.save() {
                tracing::warn!("Failed to save config: {}", e);
            }
        }
    }

    pub fn is_dark(&self) -> bool {
        self.ui.theme == "dark"
    }
}
