//! Relic Forge
//!
//! Turns scanned images dropped into watch folders into numbered relics:
//! each scan is published to content-addressed storage, minted as an NFT,
//! encoded as a QR code and printed on a receipt. Any failure along the way
//! degrades the relic to a plain receipt instead of stopping the watcher.

// Pipeline
pub mod pipeline;
pub mod relic;
pub mod watcher;

// Stage clients
pub mod blockchain;
pub mod display;
pub mod printer;
pub mod qr;
pub mod storage;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::RelicConfig;
pub use lifecycle::Shutdown;
pub use pipeline::{run_pipeline, Orchestrator};
