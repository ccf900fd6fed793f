use thiserror::Error;

use super::models::Config;

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("server port must not be 0 when DEV_MODE is false")]
    EphemeralPort,
    #[error("plugin settings path {path} is a directory")]
    SettingsPathIsDirectory { path: std::path::PathBuf },
}

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }
}

pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    if config.server.port == 0 && !config.dev_mode {
        return Err(ConfigGuardRailError::EphemeralPort);
    }

    if config.plugins.settings_path.is_dir() {
        return Err(ConfigGuardRailError::SettingsPathIsDirectory {
            path: config.plugins.settings_path.clone(),
        });
    }

    match &config.catalog.seed_path {
        None => warnings.push_with_hint(
            "No catalog seed configured; the item catalog starts empty",
            "Set CATALOG_SEED_PATH or add seed_path to the [catalog] section",
        ),
        Some(path) if !path.exists() => warnings.push(format!(
            "Catalog seed {} does not exist",
            path.display()
        )),
        Some(_) => {}
    }

    if !config.plugins.settings_path.exists() {
        warnings.push_with_hint(
            format!(
                "Plugin settings {} not found; using defaults",
                config.plugins.settings_path.display()
            ),
            "The file is written on the first configuration change",
        );
    }

    Ok(warnings)
}
