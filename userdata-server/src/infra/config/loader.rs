use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use super::{
    models::{
        CatalogConfig, Config, ConfigMetadata, DEFAULT_HOST, DEFAULT_PORT,
        DEFAULT_SETTINGS_PATH, PluginStoreConfig, ServerConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("userdata.toml"),
        PathBuf::from("config/userdata.toml"),
    ]
});

/// Values given on the command line; they win over every other source.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub catalog_seed_path: Option<PathBuf>,
    pub plugin_settings_path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    /// Read instead of `./.env`; a missing file is not an error
    pub env_file: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.options.overrides = overrides;
        self
    }

    /// Loads `.env`, then resolves CLI overrides, environment, TOML file and
    /// defaults in that order of precedence.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = load_env_file(self.options.env_file.as_deref())?;
        self.load_from_env(EnvConfig::gather(), env_file_loaded)
    }

    /// Resolves the configuration against an already gathered environment.
    pub fn load_from_env(
        &self,
        env_config: EnvConfig,
        env_file_loaded: bool,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env_config)?;
        let (config, warnings) = self.compose_config(
            file_config,
            env_config,
            config_path,
            env_file_loaded,
        )?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let (path, explicit) = if let Some(path) = &self.options.config_path {
            (path.clone(), true)
        } else if let Some(path) = &env_config.config_path {
            (path.clone(), true)
        } else if let Some(path) = DEFAULT_CONFIG_LOCATIONS
            .iter()
            .find(|candidate| candidate.exists())
        {
            (path.clone(), false)
        } else {
            return Ok((None, None));
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
        env_file_loaded: bool,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if config_path.is_none() {
            warnings.push_with_hint(
                "No userdata.toml detected; falling back to environment variables",
                "Pass --config or set USERDATA_CONFIG_PATH to use a configuration file",
            );
        }

        let FileConfig {
            server: file_server,
            catalog: file_catalog,
            plugins: file_plugins,
            dev_mode: file_dev_mode,
        } = file_config.unwrap_or_default();
        let overrides = self.options.overrides.clone();

        let server = ServerConfig {
            host: overrides
                .host
                .or(env.server_host)
                .or(file_server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides
                .port
                .or(env.server_port)
                .or(file_server.port)
                .unwrap_or(DEFAULT_PORT),
        };

        let catalog = CatalogConfig {
            seed_path: overrides
                .catalog_seed_path
                .or(env.catalog_seed_path)
                .or(file_catalog.seed_path),
        };

        let plugins = PluginStoreConfig {
            settings_path: overrides
                .plugin_settings_path
                .or(env.plugin_settings_path)
                .or(file_plugins.settings_path)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH)),
        };

        let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(false);

        let config = Config {
            server,
            catalog,
            plugins,
            dev_mode,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        };

        config
            .ensure_directories()
            .map_err(|source| ConfigLoadError::Filesystem { source })?;

        let guard_warnings = validation::apply_guard_rails(&config)?;
        warnings.extend(guard_warnings);

        Ok((config, warnings))
    }
}

/// Exports the variables of an env file into the process environment.
///
/// Variables that are already set keep their value.
fn load_env_file(path: Option<&Path>) -> Result<bool, dotenvy::Error> {
    let outcome = match path {
        Some(path) => dotenvy::from_path(path),
        None => dotenvy::dotenv().map(|_| ()),
    };
    match outcome {
        Ok(()) => Ok(true),
        Err(dotenvy::Error::Io(_)) => Ok(false),
        Err(err) => Err(err),
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    toml::from_str(&contents).map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file missing: {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("filesystem initialization failed")]
    Filesystem {
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("userdata.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    #[test]
    fn file_values_fill_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = dir.path().join("state/plugins.toml");
        let path = write_config(
            dir.path(),
            &format!(
                "dev_mode = true\n[server]\nport = 9100\n[plugins]\nsettings_path = {:?}\n",
                settings.display().to_string()
            ),
        );

        let ConfigLoad { config, .. } = ConfigLoader::new()
            .with_config_path(&path)
            .load_from_env(EnvConfig::default(), false)
            .expect("config loads");

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, 9100);
        assert!(config.dev_mode);
        assert_eq!(config.settings_path(), settings.as_path());
        assert_eq!(config.metadata.config_path.as_deref(), Some(path.as_path()));
        assert!(settings.parent().is_some_and(Path::is_dir));
    }

    #[test]
    fn overrides_beat_env_which_beats_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(
            dir.path(),
            &format!(
                "[server]\nhost = \"10.0.0.1\"\nport = 9100\n[plugins]\nsettings_path = {:?}\n",
                dir.path().join("plugins.toml").display().to_string()
            ),
        );
        let env = EnvConfig {
            server_host: Some("10.0.0.2".into()),
            server_port: Some(9200),
            ..EnvConfig::default()
        };

        let ConfigLoad { config, .. } = ConfigLoader::new()
            .with_config_path(&path)
            .with_overrides(ConfigOverrides {
                port: Some(9300),
                ..ConfigOverrides::default()
            })
            .load_from_env(env, false)
            .expect("config loads");

        assert_eq!(config.server.host, "10.0.0.2");
        assert_eq!(config.server.port, 9300);
    }

    // The only test that touches the process environment.
    #[test]
    fn env_file_feeds_the_environment_layer() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = dir.path().join("from-env/plugins.toml");

        let missing = ConfigLoader::new()
            .with_env_file(dir.path().join("absent.env"))
            .with_overrides(ConfigOverrides {
                plugin_settings_path: Some(dir.path().join("plugins.toml")),
                ..ConfigOverrides::default()
            })
            .load()
            .expect("missing env file is tolerated");
        assert!(!missing.config.metadata.env_file_loaded);

        let env_file = dir.path().join("userdata.env");
        fs::write(
            &env_file,
            format!("PLUGIN_SETTINGS_PATH={}\n", settings.display()),
        )
        .expect("write env file");

        let ConfigLoad { config, .. } = ConfigLoader::new()
            .with_env_file(&env_file)
            .load()
            .expect("config loads");

        assert!(config.metadata.env_file_loaded);
        assert_eq!(config.settings_path(), settings.as_path());
        assert!(settings.parent().is_some_and(Path::is_dir));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ConfigLoader::new()
            .with_config_path(dir.path().join("nope.toml"))
            .load_from_env(EnvConfig::default(), false)
            .expect_err("missing explicit config");
        assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    }

    #[test]
    fn malformed_file_reports_its_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_config(dir.path(), "[server\nport = ");
        let err = ConfigLoader::new()
            .with_config_path(&path)
            .load_from_env(EnvConfig::default(), false)
            .expect_err("parse failure");
        match err {
            ConfigLoadError::Parse { path: reported, .. } => {
                assert_eq!(reported, path)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
