use crate::error::{ImportError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_PATH: &str = "importer.toml";

pub const MONGODB_URL_VAR: &str = "MONGODB_URL";
pub const MONGO_DB_VAR: &str = "MONGO_DB";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub import: ImportSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub name: String,
    pub connect_timeout_secs: u64,
    pub collections: CollectionNames,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            name: "flights".to_string(),
            connect_timeout_secs: 10,
            collections: CollectionNames::default(),
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionNames {
    pub airlines: String,
    pub alliances: String,
    pub alliance_members: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            airlines: "airlines".to_string(),
            alliances: "alliances".to_string(),
            alliance_members: "alliance_members".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub input_path: PathBuf,
    pub on_unknown_airline: UnknownAirlinePolicy,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("alliances.json"),
            on_unknown_airline: UnknownAirlinePolicy::default(),
        }
    }
}

/// What to do when an alliance lists an IATA code with no airline record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnknownAirlinePolicy {
    /// Abort the whole run before anything is written
    #[default]
    Fail,
    /// Drop the membership, log a warning and keep going
    Skip,
}

/// Values given on the command line; `None` keeps what lower layers set
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database: Option<String>,
    pub input_path: Option<PathBuf>,
    pub on_unknown_airline: Option<UnknownAirlinePolicy>,
}

impl Config {
    /// Load configuration from `path`, or from `importer.toml` when it exists,
    /// falling back to defaults. `MONGO_DB` overrides the database name.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, env::var(MONGO_DB_VAR).ok())
    }

    /// `load` with the `MONGO_DB` value passed in rather than read from the process
    pub fn load_with_env(path: Option<&Path>, env_database: Option<String>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        config.override_database_name(env_database);
        Ok(config)
    }

    /// Apply command-line values on top of everything else
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        self.override_database_name(overrides.database);
        if let Some(input_path) = overrides.input_path {
            self.import.input_path = input_path;
        }
        if let Some(policy) = overrides.on_unknown_airline {
            self.import.on_unknown_airline = policy;
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(path).map_err(|e| {
            ImportError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }

    /// Empty values are ignored so a blank `MONGO_DB=` line in `.env` keeps the default.
    pub fn override_database_name(&mut self, name: Option<String>) {
        if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
            self.database.name = name;
        }
    }
}

/// Connection string for the MongoDB deployment, read from `MONGODB_URL`.
pub fn mongodb_url() -> Result<String> {
    let url = env::var(MONGODB_URL_VAR).map_err(|_| {
        ImportError::Config(format!("{MONGODB_URL_VAR} environment variable not set"))
    })?;

    if url.trim().is_empty() {
        return Err(ImportError::Config(format!("{MONGODB_URL_VAR} is empty")));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_flights_database() {
        let config = Config::default();

        assert_eq!(config.database.name, "flights");
        assert_eq!(config.database.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.database.collections.airlines, "airlines");
        assert_eq!(config.database.collections.alliances, "alliances");
        assert_eq!(config.database.collections.alliance_members, "alliance_members");
        assert_eq!(config.import.input_path, PathBuf::from("alliances.json"));
        assert_eq!(config.import.on_unknown_airline, UnknownAirlinePolicy::Fail);
    }

    #[test]
    fn test_partial_toml_keeps_remaining_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
name = "flights_staging"

[database.collections]
alliance_members = "members"

[import]
on_unknown_airline = "skip"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.database.name, "flights_staging");
        assert_eq!(config.database.connect_timeout_secs, 10);
        assert_eq!(config.database.collections.airlines, "airlines");
        assert_eq!(config.database.collections.alliance_members, "members");
        assert_eq!(config.import.on_unknown_airline, UnknownAirlinePolicy::Skip);
        assert_eq!(config.import.input_path, PathBuf::from("alliances.json"));
    }

    #[test]
    fn test_unknown_policy_value_is_rejected() {
        let result: std::result::Result<Config, _> =
            toml::from_str("[import]\non_unknown_airline = \"ignore\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_config_file_is_config_error() {
        let err = Config::from_file(Path::new("/nonexistent/importer.toml")).unwrap_err();
        assert!(matches!(err, ImportError::Config(msg) if msg.contains("/nonexistent/importer.toml")));
    }

    fn staging_config_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[database]
name = "flights_from_file"

[import]
input_path = "data/file_alliances.json"
on_unknown_airline = "skip"
"#
        )
        .unwrap();
        file
    }

    #[test]
    fn test_env_database_beats_file() {
        let file = staging_config_file();

        let config = Config::load_with_env(Some(file.path()), Some("flights_env".to_string())).unwrap();
        assert_eq!(config.database.name, "flights_env");

        let config = Config::load_with_env(Some(file.path()), None).unwrap();
        assert_eq!(config.database.name, "flights_from_file");
    }

    #[test]
    fn test_cli_database_beats_env() {
        let file = staging_config_file();
        let mut config =
            Config::load_with_env(Some(file.path()), Some("flights_env".to_string())).unwrap();

        config.apply_overrides(ConfigOverrides {
            database: Some("flights_cli".to_string()),
            ..ConfigOverrides::default()
        });
        assert_eq!(config.database.name, "flights_cli");
    }

    #[test]
    fn test_cli_file_and_policy_beat_toml() {
        let file = staging_config_file();
        let mut config = Config::load_with_env(Some(file.path()), None).unwrap();
        assert_eq!(config.import.input_path, PathBuf::from("data/file_alliances.json"));
        assert_eq!(config.import.on_unknown_airline, UnknownAirlinePolicy::Skip);

        config.apply_overrides(ConfigOverrides {
            database: None,
            input_path: Some(PathBuf::from("cli_alliances.json")),
            on_unknown_airline: Some(UnknownAirlinePolicy::Fail),
        });

        assert_eq!(config.database.name, "flights_from_file");
        assert_eq!(config.import.input_path, PathBuf::from("cli_alliances.json"));
        assert_eq!(config.import.on_unknown_airline, UnknownAirlinePolicy::Fail);
    }

    #[test]
    fn test_empty_overrides_keep_loaded_values() {
        let file = staging_config_file();
        let mut config = Config::load_with_env(Some(file.path()), None).unwrap();

        config.apply_overrides(ConfigOverrides::default());
        assert_eq!(config.database.name, "flights_from_file");
        assert_eq!(config.import.on_unknown_airline, UnknownAirlinePolicy::Skip);
    }

    #[test]
    fn test_blank_database_override_is_ignored() {
        let mut config = Config::default();
        config.override_database_name(Some("  ".to_string()));
        assert_eq!(config.database.name, "flights");

        config.override_database_name(Some("flights_test".to_string()));
        assert_eq!(config.database.name, "flights_test");
    }
}
