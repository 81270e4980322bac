//! Relic token minting.

use std::time::Instant;

use alloy::eips::Encodable2718;
use alloy::primitives::Address;
use async_trait::async_trait;

use crate::blockchain::client::ChainClient;
use crate::blockchain::transaction::MintTxBuilder;
use crate::blockchain::types::{MintError, MintResult, MintedToken};
use crate::blockchain::wallet::Wallet;
use crate::config::ChainConfig;
use crate::observability::metrics;

/// Mints a token bound to a token URI.
#[async_trait]
pub trait Minter: Send + Sync {
    async fn mint(&self, token_uri: &str, token_id: u64) -> MintResult<MintedToken>;
}

/// Collection view URL: `{base}:{contract}/{token_id}`.
pub fn collection_url(base_url: &str, contract: &str, token_id: u64) -> String {
    format!("{}:{}/{}", base_url.trim_end_matches('/'), contract, token_id)
}

/// Mints through `safeMint` on a Zora-network collection.
///
/// One attempt per call: no retry and no fee bump.
#[derive(Debug)]
pub struct ZoraMinter {
    client: ChainClient,
    wallet: Wallet,
    contract: Address,
    contract_label: String,
    collection_base_url: String,
}

impl ZoraMinter {
    pub fn new(config: &ChainConfig) -> MintResult<Self> {
        let key = config
            .private_key
            .as_ref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| MintError::NotConfigured("ETH_PRIVATE_KEY is not set".to_string()))?;
        let contract_label = config
            .contract_address
            .clone()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| {
                MintError::NotConfigured("ZORA_CONTRACT_ADDRESS is not set".to_string())
            })?;
        let contract: Address = contract_label.parse().map_err(|e| {
            MintError::NotConfigured(format!("Invalid contract address: {}", e))
        })?;

        let client = ChainClient::new(&config.rpc_url, config.chain_id, config.rpc_timeout_secs)?;
        let wallet = Wallet::from_private_key(key.expose(), config.chain_id)?;

        Ok(Self {
            client,
            wallet,
            contract,
            contract_label,
            collection_base_url: config.collection_base_url.clone(),
        })
    }

    pub fn signer_address(&self) -> Address {
        self.wallet.address()
    }
}

#[async_trait]
impl Minter for ZoraMinter {
    async fn mint(&self, token_uri: &str, token_id: u64) -> MintResult<MintedToken> {
        let start = Instant::now();
        tracing::info!(token_id, contract = %self.contract, "Starting mint");

        self.client.verify_chain_id().await?;

        let tx = MintTxBuilder::new(&self.client, &self.wallet)
            .build(self.contract, token_id, token_uri)
            .await?;
        let envelope = self.wallet.sign(tx).await?;
        let receipt = self
            .client
            .send_and_confirm(&envelope.encoded_2718())
            .await?;

        let tx_hash = receipt.transaction_hash.to_string();
        if !receipt.status() {
            return Err(MintError::Reverted { tx_hash });
        }

        let nft_url = collection_url(&self.collection_base_url, &self.contract_label, token_id);
        metrics::record_stage_duration("mint", start.elapsed());
        tracing::info!(
            tx_hash = %tx_hash,
            block_number = ?receipt.block_number,
            nft_url = %nft_url,
            "Mint confirmed"
        );

        Ok(MintedToken { nft_url, tx_hash })
    }
}
