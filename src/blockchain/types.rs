//! Chain-specific types and error definitions.

use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur while minting.
#[derive(Debug, Error)]
pub enum MintError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Credentials or contract address missing or malformed.
    #[error("Minting not configured: {0}")]
    NotConfigured(String),

    /// Latest block carried no base fee (pre-London chain).
    #[error("Latest block has no base fee")]
    MissingBaseFee,

    /// Gas estimation rejected the call.
    #[error("Gas estimation failed: {0}")]
    GasEstimation(String),

    /// Local signing failed.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Waiting for inclusion failed.
    #[error("Confirmation failed for {tx_hash}: {reason}")]
    Confirmation { tx_hash: String, reason: String },

    /// Transaction was included but reverted.
    #[error("Transaction reverted: {tx_hash}")]
    Reverted { tx_hash: String },
}

/// Result type for minting operations.
pub type MintResult<T> = Result<T, MintError>;

/// A successfully minted relic token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    /// Collection view URL for the token.
    pub nft_url: String,
    /// Hex transaction hash.
    pub tx_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(7_777_777u64);
        assert_eq!(chain_id.0, 7_777_777);
        assert_eq!(u64::from(chain_id), 7_777_777);
    }

    #[test]
    fn test_error_display() {
        let err = MintError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = MintError::ChainMismatch {
            expected: 7_777_777,
            actual: 1,
        };
        assert!(err.to_string().contains("7777777"));
    }
}
