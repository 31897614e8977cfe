use crate::error::Error;
use config::{Config, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_INTERVAL_SECS: u64 = 60;
pub const DEFAULT_AUDIT_STORE_PATH: &str = "./file_renames.db";

/// Environment variables and the configuration key each one feeds.
/// Later entries win, so `RECURSIVE` beats the older `RENAME_SUBFOLDER`.
const ENV_KEYS: &[(&str, &str)] = &[
    ("DIR", "watched_directory"),
    ("DRY_RUN", "dry_run"),
    ("RENAME_SUBFOLDER", "recursive"),
    ("RECURSIVE", "recursive"),
    ("CRON", "scheduling_enabled"),
    ("CRON_INTERVAL", "scheduling_interval_seconds"),
    ("DB_PATH", "audit_store_path"),
];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub watched_directory: String,
    pub dry_run: bool,
    pub recursive: bool,
    pub scheduling_enabled: bool,
    pub scheduling_interval_seconds: u64,
    pub audit_store_path: String,
}

/// Values supplied on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub watched_directory: Option<String>,
    pub dry_run: Option<bool>,
    pub recursive: Option<bool>,
    pub scheduling_enabled: Option<bool>,
    pub scheduling_interval_seconds: Option<u64>,
    pub audit_store_path: Option<String>,
}

/// Resolve configuration from defaults, `Config.*` in the working directory,
/// the process environment and finally `overrides`.
pub fn load_configuration(overrides: &ConfigOverrides) -> Result<AppConfig, Error> {
    build_configuration(Some("Config"), |key| env::var(key).ok(), overrides)
}

fn build_configuration<F>(
    file_name: Option<&str>,
    lookup_env: F,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder()
        .set_default("watched_directory", "")?
        .set_default("dry_run", false)?
        .set_default("recursive", true)?
        .set_default("scheduling_enabled", false)?
        .set_default("scheduling_interval_seconds", DEFAULT_INTERVAL_SECS as i64)?
        .set_default("audit_store_path", DEFAULT_AUDIT_STORE_PATH)?;

    if let Some(name) = file_name {
        builder = builder.add_source(ConfigFile::with_name(name).required(false));
    }

    for (var, key) in ENV_KEYS {
        let value = lookup_env(var).filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(*key, value)?;
    }

    let config = builder
        .set_override_option("watched_directory", overrides.watched_directory.clone())?
        .set_override_option("dry_run", overrides.dry_run)?
        .set_override_option("recursive", overrides.recursive)?
        .set_override_option("scheduling_enabled", overrides.scheduling_enabled)?
        .set_override_option(
            "scheduling_interval_seconds",
            overrides.scheduling_interval_seconds.map(|v| v as i64),
        )?
        .set_override_option("audit_store_path", overrides.audit_store_path.clone())?
        .build()?
        .try_deserialize::<AppConfig>()?;
    Ok(config)
}

impl AppConfig {
    pub fn watched_path(&self) -> PathBuf {
        PathBuf::from(&self.watched_directory)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.scheduling_interval_seconds)
    }

    /// Basename of the audit store file. A scan never renames a file with
    /// this name, so the database survives living inside the watched tree.
    pub fn excluded_name(&self) -> Option<String> {
        if self.audit_store_path.is_empty() {
            return None;
        }
        Path::new(&self.audit_store_path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn validate(&self) -> Result<(), Error> {
        let path = self.watched_path();
        if self.watched_directory.trim().is_empty() {
            return Err(Error::InvalidDirectory {
                path,
                reason: "no directory configured (use --dir or DIR)".to_string(),
            });
        }

        match fs::metadata(&path) {
            Ok(metadata) if !metadata.is_dir() => {
                return Err(Error::InvalidDirectory {
                    path,
                    reason: "not a directory".to_string(),
                });
            }
            Ok(_) => {}
            Err(err) => {
                return Err(Error::InvalidDirectory {
                    path,
                    reason: err.to_string(),
                });
            }
        }

        if let Err(err) = fs::read_dir(&path) {
            return Err(Error::InvalidDirectory {
                path,
                reason: format!("unreadable: {}", err),
            });
        }

        if self.scheduling_enabled && self.scheduling_interval_seconds == 0 {
            return Err(Error::InvalidInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn sample_config(dir: &str) -> AppConfig {
        AppConfig {
            watched_directory: dir.to_string(),
            dry_run: false,
            recursive: true,
            scheduling_enabled: false,
            scheduling_interval_seconds: DEFAULT_INTERVAL_SECS,
            audit_store_path: DEFAULT_AUDIT_STORE_PATH.to_string(),
        }
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = build_configuration(None, no_env, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.watched_directory, "");
        assert!(!config.dry_run);
        assert!(config.recursive);
        assert!(!config.scheduling_enabled);
        assert_eq!(config.scheduling_interval_seconds, 60);
        assert_eq!(config.audit_store_path, "./file_renames.db");
    }

    #[test]
    fn test_environment_layer() {
        let env: HashMap<&str, &str> = [
            ("DIR", "/srv/inbox"),
            ("DRY_RUN", "true"),
            ("RENAME_SUBFOLDER", "false"),
            ("CRON", "1"),
            ("CRON_INTERVAL", "15"),
            ("DB_PATH", "/var/lib/renames.db"),
        ]
        .into_iter()
        .collect();
        let lookup = |key: &str| env.get(key).map(|v| v.to_string());

        let config = build_configuration(None, lookup, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.watched_directory, "/srv/inbox");
        assert!(config.dry_run);
        assert!(!config.recursive);
        assert!(config.scheduling_enabled);
        assert_eq!(config.scheduling_interval_seconds, 15);
        assert_eq!(config.audit_store_path, "/var/lib/renames.db");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let lookup = |key: &str| (key == "DB_PATH").then(|| "  ".to_string());
        let config = build_configuration(None, lookup, &ConfigOverrides::default()).unwrap();
        assert_eq!(config.audit_store_path, DEFAULT_AUDIT_STORE_PATH);
    }

    #[test]
    fn test_malformed_value_is_config_error() {
        let lookup = |key: &str| (key == "CRON_INTERVAL").then(|| "soon".to_string());
        let result = build_configuration(None, lookup, &ConfigOverrides::default());
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_overrides_beat_environment() {
        let lookup = |key: &str| match key {
            "DIR" => Some("/from/env".to_string()),
            "DRY_RUN" => Some("true".to_string()),
            _ => None,
        };
        let overrides = ConfigOverrides {
            watched_directory: Some("/from/cli".to_string()),
            dry_run: Some(false),
            scheduling_interval_seconds: Some(5),
            ..Default::default()
        };
        let config = build_configuration(None, lookup, &overrides).unwrap();
        assert_eq!(config.watched_directory, "/from/cli");
        assert!(!config.dry_run);
        assert_eq!(config.scheduling_interval_seconds, 5);
    }

    #[test]
    fn test_excluded_name_is_basename() {
        let mut config = sample_config("/tmp");
        config.audit_store_path = "/data/inbox/file_renames.db".to_string();
        assert_eq!(config.excluded_name().as_deref(), Some("file_renames.db"));

        config.audit_store_path = String::new();
        assert_eq!(config.excluded_name(), None);
    }

    #[test]
    fn test_validate_rejects_missing_directory() {
        let config = sample_config("/definitely/not/here/auto-rename");
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDirectory { .. })
        ));

        let config = sample_config("");
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDirectory { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_file_and_zero_interval() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let config = sample_config(file.to_str().unwrap());
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidDirectory { .. })
        ));

        let mut config = sample_config(dir.path().to_str().unwrap());
        assert!(config.validate().is_ok());
        config.scheduling_enabled = true;
        config.scheduling_interval_seconds = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidInterval)));
    }
}
