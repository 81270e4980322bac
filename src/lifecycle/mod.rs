//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → shutdown_signal() resolves
//!
//! Shutdown (shutdown.rs):
//!     trigger() → runner stops taking scans → watcher dropped → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
