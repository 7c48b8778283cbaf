//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Credentials from `CATALOG_CLIENT_ID` / `CATALOG_CLIENT_SECRET` override
/// whatever the file contains.
pub fn load_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RelayConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    finalize(config)
}

/// Build a config from defaults plus environment overrides, for running
/// without a config file.
pub fn default_config() -> Result<RelayConfig, ConfigError> {
    finalize(RelayConfig::default())
}

fn finalize(mut config: RelayConfig) -> Result<RelayConfig, ConfigError> {
    config.credentials = config.credentials.with_env_overrides();

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_minimal_config_with_defaults() {
        let file = tempfile_path("minimal");
        let toml = r#"
[listener]
bind_address = "127.0.0.1:9999"

[credentials]
client_id = "id"
client_secret = "secret"
"#;
        std::fs::File::create(&file)
            .unwrap()
            .write_all(toml.as_bytes())
            .unwrap();

        let config = load_config(&file).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");
        assert_eq!(config.token.safety_margin_secs, 300);
        assert!(config.upstream.api_base_url.starts_with("https://"));

        std::fs::remove_file(&file).unwrap_or_default();
    }

    #[test]
    fn rejects_malformed_toml() {
        let file = tempfile_path("malformed");
        std::fs::File::create(&file)
            .unwrap()
            .write_all(b"[listener\nbind_address = ")
            .unwrap();

        assert!(matches!(load_config(&file), Err(ConfigError::Parse(_))));

        std::fs::remove_file(&file).unwrap_or_default();
    }

    fn tempfile_path(tag: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("catalog_relay_cfg_{}_{}.toml", tag, std::process::id()))
    }
}
