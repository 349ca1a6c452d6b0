//! Layered isocal configuration.
//!
//! Built-in defaults are overridden by `~/.config/isocal/config.toml`, which is
//! overridden by `ISOCAL_`-prefixed environment variables
//! (`ISOCAL_SERVER__PORT=8080`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{IsocalError, IsocalResult};
use crate::store::{EventStore, FileBackend, MemoryBackend};

static DEFAULT_HOST: &str = "127.0.0.1";
static DEFAULT_PORT: u16 = 3000;
static DEFAULT_STORAGE_PATH: &str = "~/.local/share/isocal/events.json";
static DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    pub path: PathBuf,
}

impl StorageConfig {
    /// The storage path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path.to_string_lossy()).into_owned())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// Load settings from the default config file, creating a commented-out
    /// one on first run.
    pub fn load() -> IsocalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(Some(&config_path))
    }

    /// Load settings from `config_path` (if given and present) plus environment.
    pub fn load_from(config_path: Option<&Path>) -> IsocalResult<Self> {
        Self::build(config_path, env_source())
    }

    fn build(config_path: Option<&Path>, env: Environment) -> IsocalResult<Self> {
        let mut builder = Config::builder()
            .set_default("server.host", DEFAULT_HOST)
            .and_then(|b| b.set_default("server.port", i64::from(DEFAULT_PORT)))
            .and_then(|b| b.set_default("storage.backend", "file"))
            .and_then(|b| b.set_default("storage.path", DEFAULT_STORAGE_PATH))
            .and_then(|b| b.set_default("logging.level", DEFAULT_LOG_LEVEL))
            .map_err(|e| IsocalError::Config(e.to_string()))?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        builder
            .add_source(env)
            .build()
            .map_err(|e| IsocalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| IsocalError::Config(e.to_string()))
    }

    pub fn config_path() -> IsocalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| IsocalError::Config("Could not determine config directory".into()))?
            .join("isocal");

        Ok(config_dir.join("config.toml"))
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> IsocalResult<()> {
        let contents = format!(
            "\
# isocal configuration

[server]
# host = \"{DEFAULT_HOST}\"
# port = {DEFAULT_PORT}

[storage]
# \"file\" keeps events in a JSON file, \"memory\" forgets them on exit
# backend = \"file\"
# path = \"{DEFAULT_STORAGE_PATH}\"

[logging]
# level = \"{DEFAULT_LOG_LEVEL}\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                IsocalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| IsocalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Open the event store selected by `storage.backend`.
    pub fn open_store(&self) -> EventStore {
        match self.storage.backend {
            StorageBackendKind::Memory => EventStore::new(MemoryBackend::default()),
            StorageBackendKind::File => EventStore::new(FileBackend::new(self.storage.resolved_path())),
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("ISOCAL")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The environment source fed from `vars` instead of the process environment.
    fn env_of(vars: &[(&str, &str)]) -> Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        env_source().source(Some(vars))
    }

    fn load_isolated(config_path: Option<&Path>) -> IsocalResult<Settings> {
        Settings::build(config_path, env_of(&[]))
    }

    #[test]
    fn test_defaults_without_file() {
        let settings = load_isolated(None).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.address(), "127.0.0.1:3000");
        assert_eq!(settings.storage.backend, StorageBackendKind::File);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8080\n\n[storage]\nbackend = \"memory\"\npath = \"/tmp/events.json\"\n",
        )
        .unwrap();

        let settings = load_isolated(Some(&path)).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.storage.backend, StorageBackendKind::Memory);
        assert_eq!(settings.storage.resolved_path(), PathBuf::from("/tmp/events.json"));
    }

    #[test]
    fn test_default_config_file_loads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        Settings::create_default_config(&path).unwrap();
        let settings = load_isolated(Some(&path)).unwrap();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.storage.path, PathBuf::from(DEFAULT_STORAGE_PATH));
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 8080\n").unwrap();

        let env = env_of(&[("ISOCAL_SERVER__PORT", "9090"), ("ISOCAL_LOGGING__LEVEL", "debug")]);
        let settings = Settings::build(Some(&path), env).unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.storage.backend, StorageBackendKind::File);
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage]\nbackend = \"sqlite\"\n").unwrap();

        assert!(matches!(
            load_isolated(Some(&path)),
            Err(IsocalError::Config(_))
        ));
    }

    #[test]
    fn test_resolved_path_expands_tilde() {
        let storage = StorageConfig {
            backend: StorageBackendKind::File,
            path: PathBuf::from("~/events.json"),
        };
        assert!(!storage.resolved_path().to_string_lossy().starts_with('~'));
    }
}
