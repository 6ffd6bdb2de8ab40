use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "NVME_EXPORTER_";
const CONFIG_FILE_ENV: &str = "NVME_EXPORTER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid duration for {key}: {value:?}")]
    InvalidDuration { key: &'static str, value: String },

    #[error("invalid boolean for {key}: {value:?}")]
    InvalidBool { key: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub check_interval: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub shutdown_grace: Duration,
    pub nvme_binary: String,
    pub use_sudo: bool,
    pub log_level: String,
}

/// Optional TOML file; every key is optional and env vars take precedence
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    listen_addr: Option<String>,
    check_interval: Option<String>,
    initial_backoff: Option<String>,
    max_backoff: Option<String>,
    shutdown_grace: Option<String>,
    nvme_binary: Option<String>,
    use_sudo: Option<bool>,
    log_level: Option<String>,
}

impl FileConfig {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }
}

impl Config {
    /// Defaults, then the file named by `NVME_EXPORTER_CONFIG`, then
    /// `NVME_EXPORTER_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var(CONFIG_FILE_ENV) {
            Ok(path) => FileConfig::read(Path::new(&path))?,
            Err(_) => FileConfig::default(),
        };

        Self::resolve(file, |key| env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let duration = |key: &'static str, from_file: Option<String>, default: Duration| {
            match env(key).or(from_file) {
                Some(value) => parse_duration(&value).ok_or(ConfigError::InvalidDuration { key, value }),
                None => Ok(default),
            }
        };

        let use_sudo = match env("USE_SUDO") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool { key: "USE_SUDO", value })?,
            None => file.use_sudo.unwrap_or(defaults.use_sudo),
        };

        let config = Self {
            listen_addr: env("LISTEN_ADDR").or(file.listen_addr).unwrap_or(defaults.listen_addr),
            check_interval: duration("CHECK_INTERVAL", file.check_interval, defaults.check_interval)?,
            initial_backoff: duration("INITIAL_BACKOFF", file.initial_backoff, defaults.initial_backoff)?,
            max_backoff: duration("MAX_BACKOFF", file.max_backoff, defaults.max_backoff)?,
            shutdown_grace: duration("SHUTDOWN_GRACE", file.shutdown_grace, defaults.shutdown_grace)?,
            nvme_binary: env("NVME_BINARY").or(file.nvme_binary).unwrap_or(defaults.nvme_binary),
            use_sudo,
            log_level: env("LOG_LEVEL").or(file.log_level).unwrap_or(defaults.log_level),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.check_interval.is_zero() {
            return Err(ConfigError::Invalid("check_interval must be greater than zero".to_string()));
        }
        if self.initial_backoff.is_zero() {
            return Err(ConfigError::Invalid("initial_backoff must be greater than zero".to_string()));
        }
        if self.max_backoff < self.initial_backoff {
            return Err(ConfigError::Invalid(format!(
                "max_backoff ({:?}) is shorter than initial_backoff ({:?})",
                self.max_backoff, self.initial_backoff
            )));
        }
        Ok(())
    }

    /// Socket address to bind; a bare `:port` listens on all interfaces
    pub fn bind_addr(&self) -> String {
        if self.listen_addr.starts_with(':') {
            format!("0.0.0.0{}", self.listen_addr)
        } else {
            self.listen_addr.clone()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: ":21405".to_string(),
            check_interval: Duration::from_secs(60),
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            shutdown_grace: Duration::from_secs(5),
            nvme_binary: "nvme".to_string(),
            use_sudo: true,
            log_level: "info".to_string(),
        }
    }
}

/// Parse `500ms`, `30s`, `1m`, `1h30m`, `1.5s`; a bare integer is seconds
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_len == 0 {
            return None;
        }
        let value: f64 = rest[..number_len].parse().ok()?;
        rest = &rest[number_len..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit() || c == '.').unwrap_or(rest.len());
        let seconds_per_unit = match &rest[..unit_len] {
            "ms" => 0.001,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return None,
        };
        rest = &rest[unit_len..];

        total = total.checked_add(Duration::try_from_secs_f64(value * seconds_per_unit).ok()?)?;
    }

    Some(total)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolve_with(file: FileConfig, vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::resolve(file, |key| vars.get(key).cloned())
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1m"), Some(Duration::from_secs(60)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("1h30m"), Some(Duration::from_secs(5400)));
        assert_eq!(parse_duration("1.5s"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("15"), Some(Duration::from_secs(15)));
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("soon"), None);
        assert_eq!(parse_duration("10d"), None);
        assert_eq!(parse_duration("m5"), None);
        assert_eq!(parse_duration("10000000000000000000s10000000000000000000s"), None);
    }

    #[test]
    fn test_defaults() {
        let config = resolve_with(FileConfig::default(), &[]).unwrap();
        assert_eq!(config.listen_addr, ":21405");
        assert_eq!(config.bind_addr(), "0.0.0.0:21405");
        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert_eq!(config.initial_backoff, Duration::from_secs(1));
        assert_eq!(config.max_backoff, Duration::from_secs(10));
        assert!(config.use_sudo);
    }

    #[test]
    fn test_env_overrides_file() {
        let file: FileConfig = toml::from_str(
            r#"
            listen_addr = "127.0.0.1:9998"
            check_interval = "30s"
            use_sudo = false
            "#,
        )
        .unwrap();

        let config = resolve_with(file, &[("CHECK_INTERVAL", "2m"), ("LOG_LEVEL", "debug")]).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9998");
        assert_eq!(config.check_interval, Duration::from_secs(120));
        assert_eq!(config.log_level, "debug");
        assert!(!config.use_sudo);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            resolve_with(FileConfig::default(), &[("CHECK_INTERVAL", "often")]),
            Err(ConfigError::InvalidDuration { key: "CHECK_INTERVAL", .. })
        ));
        assert!(matches!(
            resolve_with(FileConfig::default(), &[("USE_SUDO", "maybe")]),
            Err(ConfigError::InvalidBool { .. })
        ));
        assert!(matches!(
            resolve_with(FileConfig::default(), &[("CHECK_INTERVAL", "0s")]),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            resolve_with(FileConfig::default(), &[("INITIAL_BACKOFF", "30s")]),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_file_keys_are_rejected() {
        assert!(toml::from_str::<FileConfig>("poll_every = \"1m\"").is_err());
    }
}
