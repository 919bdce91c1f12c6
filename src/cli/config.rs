//! User configuration file.
//!
//! Read from `~/.config/link-display/config.toml`, or from the path in
//! `LINK_DISPLAY_CONFIG` when set:
//!
//! ```toml
//! dir = "~/Notes"
//!
//! [defaults]
//! key = "title"
//! source_mode = true
//! excluded_folders = ["Templates", "Daily"]
//! ```
//!
//! `[defaults]` seeds the settings of a vault that has no settings file
//! yet. Once a vault's settings are saved, its file wins.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::Settings;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "LINK_DISPLAY_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Vault used when `--dir` is not given. A leading `~` is expanded.
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub defaults: VaultDefaults,
}

/// Settings for vaults without a settings file.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaultDefaults {
    pub key: Option<String>,
    pub source_mode: Option<bool>,
    #[serde(default)]
    pub excluded_folders: Vec<String>,
}

impl VaultDefaults {
    /// The built-in settings with these defaults applied.
    ///
    /// A blank `key` keeps the built-in property key.
    pub fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(key) = self.key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
            settings.key = key.to_string();
        }
        if let Some(enabled) = self.source_mode {
            settings.enable_in_source_mode = enabled;
        }
        for folder in &self.excluded_folders {
            settings.exclude_folder(folder);
        }
        settings
    }
}

impl Config {
    /// Loads the user's config file; a missing file gives the defaults.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read config file: {}", path.display()));
            }
        };

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Vault directory: `--dir`, then the config's `dir`, then the working
    /// directory.
    pub fn vault_dir(&self, cli_dir: Option<&Path>) -> PathBuf {
        match (cli_dir, &self.dir) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) => expand_home(dir, dirs::home_dir().as_deref()),
            (None, None) => PathBuf::from("."),
        }
    }

    /// Settings a vault starts from before it has a settings file.
    pub fn seed_settings(&self) -> Settings {
        self.defaults.settings()
    }
}

/// Location of the config file, `None` when no config directory is known.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("link-display").join("config.toml"))
}

fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    match (path.strip_prefix("~"), home) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
