//! Configuration validation.
//!
//! # Responsibilities
//! - Check the signing key and contract address shape before any network use
//! - Require absolute watch folders
//! - Validate URLs and socket addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelicConfig → Result<(), Vec<ValidationError>>
//! - Runs before the watcher starts; any error keeps the process from watching

use std::net::SocketAddr;
use std::path::PathBuf;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::config::loader::keys;
use crate::config::schema::RelicConfig;

const PRIVATE_KEY_LEN: usize = 66;
const ADDRESS_LEN: usize = 42;

/// A single configuration violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{key} is not set")]
    Missing { key: &'static str },

    #[error("{key} must start with '0x'")]
    MissingHexPrefix { key: &'static str },

    #[error("{key} has invalid length ({actual} chars, expected {expected})")]
    InvalidLength {
        key: &'static str,
        actual: usize,
        expected: usize,
    },

    #[error("ETH_PRIVATE_KEY is invalid: {0}")]
    InvalidPrivateKey(String),

    #[error("ZORA_CONTRACT_ADDRESS is invalid: {0}")]
    InvalidContractAddress(String),

    #[error("WATCH_FOLDERS is not set or empty")]
    NoWatchFolders,

    #[error("WATCH_FOLDERS must use absolute paths: '{}' is relative", .0.display())]
    RelativeWatchFolder(PathBuf),

    #[error("{key} is not a valid URL: '{value}'")]
    InvalidUrl { key: &'static str, value: String },

    #[error("{key} must be a number, got '{value}'")]
    InvalidNumber { key: &'static str, value: String },

    #[error("SCAN_QUEUE_CAPACITY must be greater than zero")]
    ZeroQueueCapacity,

    #[error("ZORA_RPC_TIMEOUT_SECS must be greater than zero")]
    ZeroRpcTimeout,

    #[error("{key} is not a valid socket address: '{value}'")]
    InvalidSocketAddr { key: &'static str, value: String },
}

/// Which checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Signing key, contract address and bundler API key are required.
    Full,
    /// Credentials may be absent; present ones are still checked.
    ReceiptOnly,
}

/// Validate a loaded configuration.
pub fn validate_config(
    config: &RelicConfig,
    mode: ValidationMode,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match &config.chain.private_key {
        Some(key) => validate_private_key(key.expose(), &mut errors),
        None if mode == ValidationMode::Full => errors.push(ValidationError::Missing {
            key: keys::ETH_PRIVATE_KEY,
        }),
        None => {}
    }

    match &config.chain.contract_address {
        Some(address) => validate_contract_address(address, &mut errors),
        None if mode == ValidationMode::Full => errors.push(ValidationError::Missing {
            key: keys::ZORA_CONTRACT_ADDRESS,
        }),
        None => {}
    }

    if config.storage.api_key.is_none() && mode == ValidationMode::Full {
        errors.push(ValidationError::Missing {
            key: keys::ARSEEDING_API_KEY,
        });
    }

    if config.watch.folders.is_empty() {
        errors.push(ValidationError::NoWatchFolders);
    }
    for folder in &config.watch.folders {
        if !folder.is_absolute() {
            errors.push(ValidationError::RelativeWatchFolder(folder.clone()));
        }
    }
    if config.watch.queue_capacity == 0 {
        errors.push(ValidationError::ZeroQueueCapacity);
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRpcTimeout);
    }

    for (key, value) in [
        (keys::ZORA_RPC_URL, &config.chain.rpc_url),
        (keys::ZORA_BASE_URL, &config.chain.collection_base_url),
        (keys::ARSEEDING_URL, &config.storage.bundler_url),
        (keys::ARWEAVE_GATEWAY_URL, &config.storage.gateway_url),
    ] {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidUrl {
                key,
                value: value.clone(),
            });
        }
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidSocketAddr {
                key: keys::METRICS_ADDRESS,
                value: addr.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_private_key(key: &str, errors: &mut Vec<ValidationError>) {
    let Some(hex) = key.strip_prefix("0x") else {
        errors.push(ValidationError::MissingHexPrefix {
            key: keys::ETH_PRIVATE_KEY,
        });
        return;
    };
    let actual = key.chars().count();
    if actual != PRIVATE_KEY_LEN {
        errors.push(ValidationError::InvalidLength {
            key: keys::ETH_PRIVATE_KEY,
            actual,
            expected: PRIVATE_KEY_LEN,
        });
        return;
    }
    // Never echo the key itself.
    if let Err(e) = hex.parse::<PrivateKeySigner>() {
        errors.push(ValidationError::InvalidPrivateKey(e.to_string()));
    }
}

fn validate_contract_address(address: &str, errors: &mut Vec<ValidationError>) {
    if !address.starts_with("0x") {
        errors.push(ValidationError::MissingHexPrefix {
            key: keys::ZORA_CONTRACT_ADDRESS,
        });
        return;
    }
    let actual = address.chars().count();
    if actual != ADDRESS_LEN {
        errors.push(ValidationError::InvalidLength {
            key: keys::ZORA_CONTRACT_ADDRESS,
            actual,
            expected: ADDRESS_LEN,
        });
        return;
    }
    if let Err(e) = address.parse::<Address>() {
        errors.push(ValidationError::InvalidContractAddress(e.to_string()));
    }
}
