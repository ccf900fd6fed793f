use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8096;
pub const DEFAULT_SETTINGS_PATH: &str = "data/plugins.toml";

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub plugins: PluginStoreConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Config {
    /// Creates the directory that will hold the plugin settings file.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        match self.plugins.settings_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                std::fs::create_dir_all(parent)
            }
            _ => Ok(()),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.plugins.settings_path
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// JSON catalog seed; `None` starts with an empty catalog
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PluginStoreConfig {
    pub settings_path: PathBuf,
}

impl Default for PluginStoreConfig {
    fn default() -> Self {
        Self {
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
        }
    }
}

/// Where the configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
