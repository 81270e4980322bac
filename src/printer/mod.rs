//! Receipt printing subsystem.
//!
//! # Data Flow
//! ```text
//! Relic
//!     → receipt.rs (fixed template + optional NFT URL line)
//!     → receipt_printer.rs (temp file, submit, cleanup)
//!     → sink.rs (lpr / PrintTo / unsupported)
//! ```

pub mod receipt;
pub mod receipt_printer;
pub mod sink;

pub use receipt::Receipt;
pub use receipt_printer::{PrintReport, ReceiptPrinter};
pub use sink::{platform_sink, PrintSink};

/// Errors from a single print job.
#[derive(Debug, thiserror::Error)]
pub enum PrintError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("printing is not supported on {0}")]
    UnsupportedPlatform(String),

    #[error("print I/O error: {0}")]
    Io(#[from] std::io::Error),
}
