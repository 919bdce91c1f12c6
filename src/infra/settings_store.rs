//! Persisted settings with change notification.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::domain::{ChangeNotifier, ConfigurationSource, Settings, SettingsChanged};
use crate::infra::fs::{FsError, read_text, write_atomic};

/// Settings file name, stored at the vault root.
pub const SETTINGS_FILE: &str = ".link-display.json";

/// Changes a subscriber may fall behind by before it lags.
const CHANGE_CAPACITY: usize = 16;

/// Errors loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error("invalid settings file {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings store backed by a JSON file.
///
/// Every successful [`update`](Self::update) that changes the settings is
/// written to disk and then broadcast to subscribers.
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    current: RwLock<Settings>,
    changes: broadcast::Sender<SettingsChanged>,
}

impl SettingsStore {
    /// Opens the settings of the vault at `vault_root`.
    ///
    /// A missing settings file yields the defaults; the file is created on
    /// the first update.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the file exists but cannot be read or parsed.
    pub fn open(vault_root: &Path) -> Result<Self, SettingsError> {
        Self::open_or(vault_root, Settings::default())
    }

    /// Like [`open`](Self::open), but a vault without a settings file starts
    /// from `seed` instead of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the file exists but cannot be read or parsed.
    pub fn open_or(vault_root: &Path, seed: Settings) -> Result<Self, SettingsError> {
        let path = vault_root.join(SETTINGS_FILE);
        let settings = match load(&path)? {
            Some(settings) => settings,
            None => {
                debug!(path = %path.display(), "no settings file, using seed");
                seed
            }
        };
        Ok(Self::with_path(Some(path), settings))
    }

    /// Creates a store that is never written to disk.
    pub fn in_memory(settings: Settings) -> Self {
        Self::with_path(None, settings)
    }

    fn with_path(path: Option<PathBuf>, settings: Settings) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            path,
            current: RwLock::new(settings),
            changes,
        }
    }

    /// Path of the backing file, if persisted.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns a snapshot of the current settings.
    pub fn current(&self) -> Settings {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies `change` to the settings, persists and notifies subscribers.
    ///
    /// Nothing is written or sent when `change` leaves the settings equal.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the settings cannot be written; the
    /// in-memory settings are left unchanged in that case.
    pub fn update<R>(&self, change: impl FnOnce(&mut Settings) -> R) -> Result<R, SettingsError> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let mut next = guard.clone();
        let result = change(&mut next);
        if next == *guard {
            debug!("settings unchanged");
            return Ok(result);
        }

        if let Some(path) = &self.path {
            save(path, &next)?;
            info!(path = %path.display(), "saved settings");
        }
        *guard = next.clone();
        drop(guard);

        self.notify(next);
        Ok(result)
    }

    fn notify(&self, settings: Settings) {
        // Fails only when nobody is subscribed
        let subscribers = self.changes.send(SettingsChanged { settings }).unwrap_or(0);
        debug!(subscribers, "notified settings change");
    }
}

impl ConfigurationSource for SettingsStore {
    fn settings(&self) -> Settings {
        self.current()
    }
}

impl ChangeNotifier for SettingsStore {
    fn subscribe(&self) -> broadcast::Receiver<SettingsChanged> {
        self.changes.subscribe()
    }
}

fn load(path: &Path) -> Result<Option<Settings>, SettingsError> {
    let content = match read_text(path) {
        Ok(content) => content,
        Err(FsError::NotFound { .. }) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| SettingsError::Invalid {
            path: path.to_path_buf(),
            source,
        })
}

fn save(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let mut json = serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Invalid {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');
    write_atomic(path, &json)?;
    Ok(())
}
