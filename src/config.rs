//! Configuration management for HashLedger

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "ledger.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Identity of the ledger created at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSection {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_seed")]
    pub seed: String,
}

impl Default for LedgerSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: String::new(),
            seed: default_seed(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl LoggingConfig {
    pub fn max_level(&self) -> Result<tracing::Level, Box<dyn std::error::Error>> {
        self.level
            .parse::<tracing::Level>()
            .map_err(|e| format!("invalid logging.level {:?}: {}", self.level, e).into())
    }
}

fn default_name() -> String {
    "ledger".to_string()
}

fn default_seed() -> String {
    "genesis".to_string()
}

fn default_level() -> String {
    "warn".to_string()
}

/// Parses and validates a configuration document.
pub fn parse_config(text: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let config: Config = toml::from_str(text)?;

    if config.ledger.seed.is_empty() {
        return Err("ledger.seed must not be empty".into());
    }
    config.logging.max_level()?;

    Ok(config)
}

/// Loads the configuration at `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(path)?;
    parse_config(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = parse_config("").unwrap();
        assert_eq!(config.ledger.name, "ledger");
        assert_eq!(config.ledger.seed, "genesis");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [ledger]
            name = "test"
            description = "test ledger"
            seed = "abc"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.ledger.name, "test");
        assert_eq!(config.ledger.description, "test ledger");
        assert_eq!(config.ledger.seed, "abc");
        assert_eq!(config.logging.max_level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_empty_seed_rejected() {
        let err = parse_config("[ledger]\nseed = \"\"\n").unwrap_err();
        assert!(err.to_string().contains("seed"));
    }

    #[test]
    fn test_bad_level_rejected() {
        assert!(parse_config("[logging]\nlevel = \"loud\"\n").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/ledger.toml")).unwrap();
        assert_eq!(config.ledger.seed, "genesis");
    }
}
