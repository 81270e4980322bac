//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! ChainConfig (private key, RPC URL, contract)
//!     → wallet.rs (key loading, local signing)
//!     → client.rs (RPC connection with timeouts)
//!     → transaction.rs (calldata, gas estimate, fees, nonce)
//!     → minter.rs (sign, broadcast, wait for receipt)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - Every RPC query has a timeout; the inclusion wait does not
//! - Any failure yields an error for the caller to degrade on

pub mod client;
pub mod minter;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::ChainClient;
pub use minter::{collection_url, Minter, ZoraMinter};
pub use types::{ChainId, MintError, MintedToken};
pub use wallet::Wallet;
