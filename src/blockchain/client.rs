//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query chain state (chain id, base fee, nonce, gas estimates)
//! - Submit signed transactions and wait for their receipt
//! - Bound every query with a timeout; the inclusion wait is unbounded

use std::fmt::Display;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::eips::BlockNumberOrTag;
use alloy::primitives::{Address, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::timeout;

use crate::blockchain::types::{ChainId, MintError, MintResult};

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct ChainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
    chain_id: u64,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new client. No request is made until first use.
    ///
    /// # Arguments
    /// * `rpc_url` - JSON-RPC endpoint
    /// * `chain_id` - expected chain ID
    /// * `timeout_secs` - per-request timeout
    pub fn new(rpc_url: &str, chain_id: u64, timeout_secs: u64) -> MintResult<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| MintError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
        let provider = Arc::new(ProviderBuilder::new().connect_http(url))
            as Arc<dyn Provider + Send + Sync>;

        Ok(Self {
            provider,
            rpc_url: rpc_url.to_string(),
            chain_id,
            timeout_duration: Duration::from_secs(timeout_secs),
        })
    }

    async fn call<F, T, E>(&self, op: &'static str, fut: F) -> MintResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(op, error = %e, "RPC error");
                Err(MintError::Rpc(format!("{}: {}", op, e)))
            }
            Err(_) => {
                tracing::warn!(op, "RPC timeout");
                Err(MintError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }

    /// Verify the endpoint is reachable and serves the configured chain.
    pub async fn verify_chain_id(&self) -> MintResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.chain_id {
            return Err(MintError::ChainMismatch {
                expected: self.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> MintResult<ChainId> {
        self.call("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Base fee of the latest block, in wei.
    pub async fn latest_base_fee(&self) -> MintResult<u128> {
        let block = self
            .call(
                "eth_getBlockByNumber",
                self.provider.get_block_by_number(BlockNumberOrTag::Latest),
            )
            .await?
            .ok_or_else(|| MintError::Rpc("latest block not available".to_string()))?;
        block
            .header
            .base_fee_per_gas
            .map(u128::from)
            .ok_or(MintError::MissingBaseFee)
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> MintResult<u64> {
        self.call(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address),
        )
        .await
    }

    /// Estimate gas for a call.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> MintResult<u64> {
        match timeout(self.timeout_duration, self.provider.estimate_gas(tx)).await {
            Ok(Ok(gas)) => Ok(gas),
            Ok(Err(e)) => Err(MintError::GasEstimation(e.to_string())),
            Err(_) => Err(MintError::Timeout(self.timeout_duration.as_secs())),
        }
    }

    /// Broadcast a signed transaction and block until it is included.
    ///
    /// Submission is bounded by the RPC timeout; the inclusion wait is not.
    pub async fn send_and_confirm(&self, encoded: &[u8]) -> MintResult<TransactionReceipt> {
        let pending = self
            .call(
                "eth_sendRawTransaction",
                self.provider.send_raw_transaction(encoded),
            )
            .await?;
        let tx_hash: TxHash = *pending.tx_hash();
        tracing::info!(tx_hash = %tx_hash, "Transaction sent");

        pending
            .get_receipt()
            .await
            .map_err(|e| MintError::Confirmation {
                tx_hash: tx_hash.to_string(),
                reason: e.to_string(),
            })
    }

    /// Configured chain ID.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
