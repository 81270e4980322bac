//! Relic processing pipeline.
//!
//! # Data Flow
//! ```text
//! ScanEvent (mpsc)
//!     → runner.rs (one event at a time, stops on shutdown)
//!     → orchestrator.rs
//!         sequence → display → upload → mint → QR → print
//! ```
//!
//! A stage failure degrades the relic; a receipt is printed either way.

pub mod orchestrator;
pub mod runner;

pub use orchestrator::{Orchestrator, Publishing, RelicOutcome, StageError};
pub use runner::run_pipeline;
