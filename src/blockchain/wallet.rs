//! Wallet management and transaction signing.
//!
//! # Security
//! - The private key comes from configuration and never leaves the process
//! - Keys are never logged or serialized; only the derived address is

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::consensus::TxEnvelope;

use crate::blockchain::types::{MintError, MintResult};

/// Local signer bound to one chain.
#[derive(Debug, Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for EIP-155 replay protection
    pub fn from_private_key(private_key_hex: &str, chain_id: u64) -> MintResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| MintError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id,
            "Wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Sign a fully populated transaction request.
    pub async fn sign(&self, tx: TransactionRequest) -> MintResult<TxEnvelope> {
        let wallet = EthereumWallet::from(self.signer.clone());
        tx.build(&wallet)
            .await
            .map_err(|e| MintError::Signing(e.to_string()))
    }
}
