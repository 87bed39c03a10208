//! Process configuration resolved from the environment.
//!
//! | Variable               | Meaning                               | Default                              |
//! |------------------------|---------------------------------------|--------------------------------------|
//! | `STAFFTRACK_DB_PATH`   | SQLite file holding the document      | `<temp_dir>/stafftrack.sqlite3`      |
//! | `STAFFTRACK_LOG_LEVEL` | `trace|debug|info|warn|error`         | `default_log_level()`                |
//! | `STAFFTRACK_LOG_DIR`   | absolute directory for rolling logs   | unset: file logging disabled         |
//! | `API_KEY`              | summary service credential            | unset: summaries report missing key  |

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "STAFFTRACK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "STAFFTRACK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "STAFFTRACK_LOG_DIR";
pub const API_KEY_ENV: &str = "API_KEY";

const DEFAULT_DB_FILE_NAME: &str = "stafftrack.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            api_key: None,
        }
    }
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
            api_key: read(API_KEY_ENV),
        }
    }
}

pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, API_KEY_ENV, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn unset_variables_use_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert!(config.db_path.ends_with("stafftrack.sqlite3"));
    }

    #[test]
    fn set_variables_override_and_blank_counts_as_unset() {
        let env: HashMap<&str, &str> = HashMap::from([
            (DB_PATH_ENV, " /data/staff.db "),
            (LOG_LEVEL_ENV, "warn"),
            (LOG_DIR_ENV, "/var/log/stafftrack"),
            (API_KEY_ENV, "   "),
        ]);
        let config = AppConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.db_path, PathBuf::from("/data/staff.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/stafftrack")));
        assert_eq!(config.api_key, None);
    }
}
