//! Configuration loading from the environment.

use std::path::{Path, PathBuf};

use crate::config::schema::{RelicConfig, Secret};
use crate::config::validation::{validate_config, ValidationError, ValidationMode};

/// Environment keys read by the loader.
pub mod keys {
    pub const WATCH_FOLDERS: &str = "WATCH_FOLDERS";
    pub const SCAN_QUEUE_CAPACITY: &str = "SCAN_QUEUE_CAPACITY";
    pub const RECEIPT_PRINTER_NAME: &str = "RECEIPT_PRINTER_NAME";
    pub const ETH_PRIVATE_KEY: &str = "ETH_PRIVATE_KEY";
    pub const ZORA_CONTRACT_ADDRESS: &str = "ZORA_CONTRACT_ADDRESS";
    pub const ZORA_RPC_URL: &str = "ZORA_RPC_URL";
    pub const ZORA_CHAIN_ID: &str = "ZORA_CHAIN_ID";
    pub const ZORA_RPC_TIMEOUT_SECS: &str = "ZORA_RPC_TIMEOUT_SECS";
    pub const ZORA_BASE_URL: &str = "ZORA_BASE_URL";
    pub const EVERPAY_CURRENCY: &str = "EVERPAY_CURRENCY";
    pub const ARSEEDING_URL: &str = "ARSEEDING_URL";
    pub const ARSEEDING_API_KEY: &str = "ARSEEDING_API_KEY";
    pub const ARWEAVE_GATEWAY_URL: &str = "ARWEAVE_GATEWAY_URL";
    pub const NFT_NAME_PREFIX: &str = "NFT_NAME_PREFIX";
    pub const NFT_DESCRIPTION: &str = "NFT_DESCRIPTION";
    pub const NFT_ARTIST_NAME: &str = "NFT_ARTIST_NAME";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const METRICS_ADDRESS: &str = "METRICS_ADDRESS";
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    let mut out = String::from("Validation failed: ");
    for (i, err) in errors.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&err.to_string());
    }
    out
}

/// Load a dotenv file into the process environment.
///
/// With no explicit path, `./.env` is tried and its absence is not an error.
/// Returns the path that was loaded, if any.
pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
            Ok(Some(path.to_path_buf()))
        }
        None => match dotenvy::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(dotenvy::Error::Io(_)) => Ok(None),
            Err(e) => Err(e.into()),
        },
    }
}

/// Load and validate configuration from the process environment.
pub fn load_config(mode: ValidationMode) -> Result<RelicConfig, ConfigError> {
    load_config_from(|key| std::env::var(key).ok(), mode)
}

/// Load and validate configuration from an arbitrary key lookup.
///
/// Parse problems and semantic violations are reported together.
pub fn load_config_from<F>(lookup: F, mode: ValidationMode) -> Result<RelicConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (config, parse_errors) = parse_config(lookup);

    let mut errors = validate_config(&config, mode).err().unwrap_or_default();
    errors.extend(parse_errors);

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(ConfigError::Validation(errors))
    }
}

/// Build a config from a key lookup without semantic validation.
pub fn parse_config<F>(lookup: F) -> (RelicConfig, Vec<ValidationError>)
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = RelicConfig::default();
    let mut errors = Vec::new();

    // Empty values behave like unset keys.
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(folders) = get(keys::WATCH_FOLDERS) {
        config.watch.folders = folders
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(PathBuf::from)
            .collect();
    }
    if let Some(capacity) = get(keys::SCAN_QUEUE_CAPACITY) {
        match capacity.parse() {
            Ok(capacity) => config.watch.queue_capacity = capacity,
            Err(_) => errors.push(ValidationError::InvalidNumber {
                key: keys::SCAN_QUEUE_CAPACITY,
                value: capacity,
            }),
        }
    }

    if let Some(name) = get(keys::RECEIPT_PRINTER_NAME) {
        config.printer.name = name;
    }

    config.chain.private_key = get(keys::ETH_PRIVATE_KEY).map(Secret::new);
    config.chain.contract_address = get(keys::ZORA_CONTRACT_ADDRESS);
    if let Some(url) = get(keys::ZORA_RPC_URL) {
        config.chain.rpc_url = url;
    }
    if let Some(chain_id) = get(keys::ZORA_CHAIN_ID) {
        match chain_id.parse() {
            Ok(id) => config.chain.chain_id = id,
            Err(_) => errors.push(ValidationError::InvalidNumber {
                key: keys::ZORA_CHAIN_ID,
                value: chain_id,
            }),
        }
    }
    if let Some(secs) = get(keys::ZORA_RPC_TIMEOUT_SECS) {
        match secs.parse() {
            Ok(secs) => config.chain.rpc_timeout_secs = secs,
            Err(_) => errors.push(ValidationError::InvalidNumber {
                key: keys::ZORA_RPC_TIMEOUT_SECS,
                value: secs,
            }),
        }
    }
    if let Some(url) = get(keys::ZORA_BASE_URL) {
        config.chain.collection_base_url = url;
    }

    if let Some(currency) = get(keys::EVERPAY_CURRENCY) {
        config.storage.currency = currency;
    }
    if let Some(url) = get(keys::ARSEEDING_URL) {
        config.storage.bundler_url = url;
    }
    config.storage.api_key = get(keys::ARSEEDING_API_KEY).map(Secret::new);
    if let Some(url) = get(keys::ARWEAVE_GATEWAY_URL) {
        config.storage.gateway_url = url;
    }

    if let Some(prefix) = get(keys::NFT_NAME_PREFIX) {
        config.metadata.name_prefix = prefix;
    }
    if let Some(description) = get(keys::NFT_DESCRIPTION) {
        config.metadata.description = description;
    }
    if let Some(artist) = get(keys::NFT_ARTIST_NAME) {
        config.metadata.artist_name = artist;
    }

    if let Some(level) = get(keys::LOG_LEVEL) {
        config.observability.log_level = level;
    }
    config.observability.metrics_address = get(keys::METRICS_ADDRESS);

    (config, errors)
}
