//! Server configuration.
//!
//! ## Load Order
//! ```text
//! built-in defaults
//!      │
//!      ▼
//! emis.toml (optional; path from EMIS_CONFIG)
//!      │
//!      ▼
//! EMIS_* environment variables (EMIS_PORT=9000, EMIS_SEED_LOCATIONS=Sandy,Draper)
//! ```
//! Later sources override earlier ones.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "EMIS_CONFIG";

/// Config file used when `EMIS_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "emis.toml";

/// Shops inserted at startup unless configured otherwise.
pub const DEFAULT_SEED_LOCATIONS: [&str; 4] = ["Taylorsville", "West Jordan", "Sandy", "Draper"];

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to listen on
    pub bind_addr: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Connection pool size
    pub max_connections: u32,

    /// Shop names created at startup if absent
    pub seed_locations: Vec<String>,
}

impl ServerConfig {
    /// Loads configuration from the file named by `EMIS_CONFIG` (or
    /// `./emis.toml`) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::load_from(&file)
    }

    /// Loads configuration layering `file` (if it exists) and the
    /// environment over the defaults.
    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        Self::load_layered(file, environment())
    }

    fn load_layered(file: &Path, env: config::Environment) -> Result<Self, ConfigError> {
        let default_db = default_database_path();

        let settings = config::Config::builder()
            .set_default("bind_addr", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("database_path", default_db.to_string_lossy().into_owned())?
            .set_default("max_connections", 5)?
            .set_default("seed_locations", DEFAULT_SEED_LOCATIONS.to_vec())?
            .add_source(config::File::from(file).required(false))
            .add_source(env)
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_ip()?;

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "max_connections must be at least 1".to_string(),
            ));
        }

        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }

        Ok(())
    }

    fn bind_ip(&self) -> Result<IpAddr, ConfigError> {
        self.bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("bind_addr '{}'", self.bind_addr)))
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(SocketAddr::new(self.bind_ip()?, self.port))
    }
}

/// `EMIS_*` variables; `EMIS_SEED_LOCATIONS` is a comma-separated list.
fn environment() -> config::Environment {
    config::Environment::with_prefix("EMIS")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("seed_locations")
}

/// Platform data directory, falling back to the working directory.
///
/// - **macOS**: `~/Library/Application Support/com.emis.tracker/emis.db`
/// - **Windows**: `%APPDATA%\emis\tracker\data\emis.db`
/// - **Linux**: `~/.local/share/tracker/emis.db`
pub fn default_database_path() -> PathBuf {
    ProjectDirs::from("com", "emis", "tracker")
        .map(|dirs| dirs.data_dir().join("emis.db"))
        .unwrap_or_else(|| PathBuf::from("emis.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("emis-{}-{}.toml", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    /// Loads with a fixed environment instead of the process one.
    fn load_with_env(file: &Path, vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::load_layered(file, environment().source(Some(map)))
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_with_env(Path::new("/nonexistent/emis.toml"), &[]).unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.seed_locations, DEFAULT_SEED_LOCATIONS.to_vec());
        assert!(config.database_path.ends_with("emis.db"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = write_config(
            "override",
            r#"
            port = 9100
            database_path = "/tmp/emis-override.db"
            seed_locations = ["Murray"]
            "#,
        );

        let config = load_with_env(&path, &[]).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.port, 9100);
        assert_eq!(config.database_path, PathBuf::from("/tmp/emis-override.db"));
        assert_eq!(config.seed_locations, vec!["Murray".to_string()]);
        assert_eq!(config.socket_addr().unwrap().port(), 9100);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_addr = write_config("bad-addr", r#"bind_addr = "not-an-ip""#);
        assert!(matches!(
            load_with_env(&bad_addr, &[]),
            Err(ConfigError::InvalidValue(_))
        ));
        fs::remove_file(&bad_addr).ok();

        let no_pool = write_config("no-pool", "max_connections = 0");
        assert!(matches!(
            load_with_env(&no_pool, &[]),
            Err(ConfigError::InvalidValue(_))
        ));
        fs::remove_file(&no_pool).ok();
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = write_config("env-override", "port = 9100");

        let config = load_with_env(
            &path,
            &[("EMIS_PORT", "9200"), ("EMIS_SEED_LOCATIONS", "Sandy,Draper")],
        )
        .unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.port, 9200);
        assert_eq!(config.seed_locations, vec!["Sandy".to_string(), "Draper".to_string()]);
    }
}
