//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, per-relic spans)
//!     → metrics.rs (counters and histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (when METRICS_ADDRESS is set)
//! ```

pub mod logging;
pub mod metrics;
