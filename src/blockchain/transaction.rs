//! Mint transaction building.
//!
//! # Responsibilities
//! - Encode the `safeMint` call
//! - Estimate gas and apply the safety multiplier
//! - Derive EIP-1559 fees from the latest base fee
//! - Assign the signer's next nonce

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::client::ChainClient;
use crate::blockchain::types::MintResult;
use crate::blockchain::wallet::Wallet;

sol! {
    /// Collection minting entry point.
    function safeMint(address to, uint256 tokenId, string uri);
}

/// Fixed priority fee: 0.05 gwei.
pub const PRIORITY_FEE_WEI: u128 = 50_000_000;

/// Gas limit headroom over the estimate, in percent.
pub const GAS_LIMIT_PERCENT: u64 = 120;

/// Gas and fee parameters for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePlan {
    pub gas_limit: u64,
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

impl FeePlan {
    /// `gas_limit = estimate * 1.2`, `max_fee = 2 * base_fee + priority`.
    ///
    /// Doubling the base fee tolerates one block of fee growth.
    pub fn new(estimated_gas: u64, base_fee: u128) -> Self {
        let gas_limit = (u128::from(estimated_gas) * u128::from(GAS_LIMIT_PERCENT) / 100)
            .min(u128::from(u64::MAX)) as u64;
        Self {
            gas_limit,
            max_fee_per_gas: base_fee.saturating_mul(2).saturating_add(PRIORITY_FEE_WEI),
            max_priority_fee_per_gas: PRIORITY_FEE_WEI,
        }
    }
}

/// ABI-encoded `safeMint(to, tokenId, uri)` call data.
pub fn safe_mint_calldata(to: Address, token_id: U256, uri: &str) -> Bytes {
    safeMintCall {
        to,
        tokenId: token_id,
        uri: uri.to_string(),
    }
    .abi_encode()
    .into()
}

/// Transaction builder for mint calls.
pub struct MintTxBuilder<'a> {
    client: &'a ChainClient,
    wallet: &'a Wallet,
}

impl<'a> MintTxBuilder<'a> {
    pub fn new(client: &'a ChainClient, wallet: &'a Wallet) -> Self {
        Self { client, wallet }
    }

    /// Build a fully populated mint transaction, minting to the signer.
    pub async fn build(
        &self,
        contract: Address,
        token_id: u64,
        token_uri: &str,
    ) -> MintResult<TransactionRequest> {
        let from = self.wallet.address();
        let call = TransactionRequest::default()
            .with_from(from)
            .with_to(contract)
            .with_input(safe_mint_calldata(from, U256::from(token_id), token_uri));

        let estimated_gas = self.client.estimate_gas(call.clone()).await?;
        let base_fee = self.client.latest_base_fee().await?;
        let fees = FeePlan::new(estimated_gas, base_fee);
        let nonce = self.client.get_transaction_count(from).await?;

        tracing::debug!(
            estimated_gas,
            gas_limit = fees.gas_limit,
            base_fee,
            max_fee_per_gas = fees.max_fee_per_gas,
            nonce,
            "Mint transaction prepared"
        );

        Ok(call
            .with_nonce(nonce)
            .with_chain_id(self.wallet.chain_id())
            .with_gas_limit(fees.gas_limit)
            .with_max_fee_per_gas(fees.max_fee_per_gas)
            .with_max_priority_fee_per_gas(fees.max_priority_fee_per_gas))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_plan() {
        let plan = FeePlan::new(100_000, 1_000_000_000);
        assert_eq!(plan.gas_limit, 120_000);
        assert_eq!(plan.max_priority_fee_per_gas, 50_000_000);
        assert_eq!(plan.max_fee_per_gas, 2_050_000_000);
    }

    #[test]
    fn test_fee_plan_rounds_gas_down() {
        let plan = FeePlan::new(21_001, 0);
        assert_eq!(plan.gas_limit, 25_201);
        assert_eq!(plan.max_fee_per_gas, PRIORITY_FEE_WEI);
    }

    #[test]
    fn test_safe_mint_calldata() {
        let to = Address::repeat_byte(0x11);
        let data = safe_mint_calldata(to, U256::from(7), "https://arweave.net/meta");

        assert_eq!(&data[..4], &safeMintCall::SELECTOR);
        let decoded = safeMintCall::abi_decode(&data).unwrap();
        assert_eq!(decoded.to, to);
        assert_eq!(decoded.tokenId, U256::from(7));
        assert_eq!(decoded.uri, "https://arweave.net/meta");
    }
}
