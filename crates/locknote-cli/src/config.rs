//! Config file handling and path resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::CONFIG_ENV;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LockNoteConfig {
    #[serde(default)]
    pub notes: NotesSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct NotesSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoggingSection {
    pub level: Option<String>,
}

impl LockNoteConfig {
    pub fn new(notes_path: PathBuf) -> Self {
        Self {
            notes: NotesSection {
                path: Some(notes_path.to_string_lossy().to_string()),
            },
            logging: LoggingSection {
                level: Some("warn".to_string()),
            },
        }
    }
}

/// Resolve the config file path, checking LOCKNOTE_CONFIG first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Load the config if one exists. A missing file is not an error.
pub fn load_config() -> anyhow::Result<Option<LockNoteConfig>> {
    let path = resolve_config_path()?;
    if !path.exists() {
        return Ok(None);
    }
    read_config(&path).map(Some)
}

/// Resolve the notes document path: flag or LOCKNOTE_PATH, then config, then the XDG default.
pub fn resolve_notes_path(
    flag: Option<&str>,
    config: Option<&LockNoteConfig>,
) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag.filter(|value| !value.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.and_then(|config| config.notes.path.as_deref()) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    default_notes_path()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_notes_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("notes.json"))
}

pub fn read_config(path: &Path) -> anyhow::Result<LockNoteConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &LockNoteConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("locknote"));
        }
    }
    Ok(home_dir()?.join(".config").join("locknote"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("locknote"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("locknote"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
