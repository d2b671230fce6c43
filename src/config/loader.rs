//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `listener.port`.
pub const PORT_ENV_VAR: &str = "PORT";
/// Environment variable overriding `ledger.rpc_url`.
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";
/// Environment variable overriding `asset.mint`.
pub const MINT_ENV_VAR: &str = "MINT_ADDRESS";
/// Environment variable overriding `asset.decimals_fallback`.
pub const DECIMALS_ENV_VAR: &str = "TOKEN_DECIMALS";
/// Environment variable overriding `withdraw.preflight_balance_check`.
pub const PREFLIGHT_ENV_VAR: &str = "PREFLIGHT_BALANCE_CHECK";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, message: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, message } => write!(f, "Invalid {}: {}", var, message),
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

/// Parse a TOML file into a configuration without validating it.
pub fn load_file(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |var: &str| lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(port) = read(PORT_ENV_VAR) {
        config.listener.port = port.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
            var: PORT_ENV_VAR,
            message: e.to_string(),
        })?;
    }
    if let Some(url) = read(RPC_URL_ENV_VAR) {
        config.ledger.rpc_url = url;
    }
    if let Some(mint) = read(MINT_ENV_VAR) {
        config.asset.mint = Some(mint);
    }
    if let Some(decimals) = read(DECIMALS_ENV_VAR) {
        let decimals = decimals.parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
            var: DECIMALS_ENV_VAR,
            message: e.to_string(),
        })?;
        config.asset.decimals_fallback = Some(decimals);
    }
    if let Some(flag) = read(PREFLIGHT_ENV_VAR) {
        config.withdraw.preflight_balance_check = match flag.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            other => {
                return Err(ConfigError::Env {
                    var: PREFLIGHT_ENV_VAR,
                    message: format!("expected a boolean, got '{}'", other),
                })
            }
        };
    }

    Ok(())
}

/// Build the effective configuration: defaults or `path`, then the process
/// environment, then validation.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => RelayConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
