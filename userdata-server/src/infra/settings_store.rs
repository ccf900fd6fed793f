//! Persisted plugin settings.
//!
//! The live value sits behind a `parking_lot::RwLock` and is handed out as a
//! `Copy` snapshot, so request paths never hold the lock across an `.await`.
//! Updates are written to disk first (temp file + rename in the same
//! directory) and only then published to readers.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tracing::{debug, info};
use userdata_core::{DisableUserDataConfig, PluginSettings};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read plugin settings {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse plugin settings {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to encode plugin settings")]
    Encode(#[from] toml::ser::Error),
    #[error("failed to write plugin settings {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct PluginSettingsStore {
    /// `None` keeps the settings in memory only
    path: Option<PathBuf>,
    current: Arc<RwLock<PluginSettings>>,
    write_lock: Mutex<()>,
}

impl PluginSettingsStore {
    /// Opens the settings file at `path`, falling back to defaults when it
    /// does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = if path.exists() {
            let settings = read_settings(&path)?;
            info!(path = %path.display(), "loaded plugin settings");
            settings
        } else {
            info!(
                path = %path.display(),
                "plugin settings not found, using defaults"
            );
            PluginSettings::default()
        };

        Ok(Self {
            path: Some(path),
            current: Arc::new(RwLock::new(settings)),
            write_lock: Mutex::new(()),
        })
    }

    pub fn in_memory(settings: PluginSettings) -> Self {
        Self {
            path: None,
            current: Arc::new(RwLock::new(settings)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> PluginSettings {
        *self.current.read()
    }

    pub fn disable_user_data(&self) -> DisableUserDataConfig {
        self.current.read().disable_user_data
    }

    /// Replaces the Disable UserData configuration and persists it.
    ///
    /// On a write failure the previous settings stay in effect.
    pub fn update_disable_user_data(
        &self,
        config: DisableUserDataConfig,
    ) -> Result<PluginSettings, SettingsError> {
        let _guard = self.write_lock.lock();

        let mut next = self.snapshot();
        next.disable_user_data = config;

        if let Some(path) = &self.path {
            write_settings(path, &next)?;
            debug!(path = %path.display(), "persisted plugin settings");
        }

        *self.current.write() = next;
        info!(
            enabled = config.enabled,
            collections = config.collections,
            continue_watching = config.continue_watching,
            next_up = config.next_up,
            recently_added = config.recently_added,
            "disable userdata configuration updated"
        );
        Ok(next)
    }
}

fn read_settings(path: &Path) -> Result<PluginSettings, SettingsError> {
    let contents =
        fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_settings(
    path: &Path,
    settings: &PluginSettings,
) -> Result<(), SettingsError> {
    let encoded = toml::to_string(settings)?;
    let write_err = |source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(encoded.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}
