//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relic
//! generator. Every field maps to one environment key (see `loader.rs`);
//! defaults mirror the values used when a key is absent.

use std::fmt;
use std::path::PathBuf;

/// Root configuration for the relic generator.
#[derive(Debug, Clone, Default)]
pub struct RelicConfig {
    /// Directories observed for new scans.
    pub watch: WatchConfig,

    /// Receipt printer settings.
    pub printer: PrinterConfig,

    /// Chain endpoint, signer and collection contract.
    pub chain: ChainConfig,

    /// Content-addressed storage network settings.
    pub storage: StorageConfig,

    /// Token metadata templates.
    pub metadata: MetadataConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A string that must never be logged.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the underlying value. Callers must not log it.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Watch folder configuration.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Directories to observe (non-recursive).
    pub folders: Vec<PathBuf>,

    /// Capacity of the bounded scan event channel.
    pub queue_capacity: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            queue_capacity: 64,
        }
    }
}

/// Receipt printer configuration.
#[derive(Debug, Clone)]
pub struct PrinterConfig {
    /// Logical printer name handed to the print sink.
    pub name: String,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            name: "POS-80".to_string(),
        }
    }
}

/// Chain integration configuration.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    /// Hex-encoded signing key (`0x` + 64 hex chars).
    pub private_key: Option<Secret>,

    /// Collection contract address (`0x` + 40 hex chars).
    pub contract_address: Option<String>,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (7777777 for Zora mainnet).
    pub chain_id: u64,

    /// Per-call RPC timeout in seconds. Not applied to the confirmation wait.
    pub rpc_timeout_secs: u64,

    /// Base of the collection view URL.
    pub collection_base_url: String,
}

impl ChainConfig {
    /// Whether both the signing key and the contract address are present.
    pub fn has_credentials(&self) -> bool {
        let key = self.private_key.as_ref().is_some_and(|k| !k.is_empty());
        let contract = self.contract_address.as_ref().is_some_and(|c| !c.is_empty());
        key && contract
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            private_key: None,
            contract_address: None,
            rpc_url: "https://rpc.zora.energy".to_string(),
            chain_id: 7_777_777,
            rpc_timeout_secs: 30,
            collection_base_url: "https://zora.co/collect/zora".to_string(),
        }
    }
}

/// Content-addressed storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Bundler endpoint accepting uploads.
    pub bundler_url: String,

    /// Gateway used to build retrievable URIs.
    pub gateway_url: String,

    /// Payment currency tag for uploads.
    pub currency: String,

    /// Optional bundler API key.
    pub api_key: Option<Secret>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bundler_url: "https://arseed.web3infra.dev".to_string(),
            gateway_url: "https://arweave.net".to_string(),
            currency: "usdc".to_string(),
            api_key: None,
        }
    }
}

/// Token metadata templates.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    pub name_prefix: String,
    pub description: String,
    pub artist_name: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            name_prefix: "Blockchain Bimbo Relic".to_string(),
            description: "A digital relic from the Blockchain Bimbo Makeover performance"
                .to_string(),
            artist_name: "Blockchain Bimbo Makeover".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Prometheus exporter bind address. Disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("0xdeadbeef");
        assert_eq!(format!("{:?}", secret), "Secret(***)");
        assert_eq!(secret.expose(), "0xdeadbeef");
    }

    #[test]
    fn test_credentials_require_key_and_contract() {
        let mut chain = ChainConfig::default();
        assert!(!chain.has_credentials());

        chain.private_key = Some(Secret::new("0xabc"));
        assert!(!chain.has_credentials());

        chain.contract_address = Some(String::new());
        assert!(!chain.has_credentials());

        chain.contract_address = Some("0x1234".to_string());
        assert!(chain.has_credentials());
    }

    #[test]
    fn test_defaults() {
        let config = RelicConfig::default();
        assert_eq!(config.printer.name, "POS-80");
        assert_eq!(config.chain.chain_id, 7_777_777);
        assert_eq!(config.storage.currency, "usdc");
        assert_eq!(config.watch.queue_capacity, 64);
        assert!(config.observability.metrics_address.is_none());
    }
}
