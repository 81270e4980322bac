//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional) + process environment
//!     → loader.rs (read keys, parse numbers/lists)
//!     → validation.rs (semantic checks, all errors collected)
//!     → RelicConfig (validated, immutable)
//!     → handed by value to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; there is no reload
//! - All fields except credentials and watch folders have defaults
//! - Parse errors and semantic errors are reported together

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_env_file, ConfigError};
pub use schema::{
    ChainConfig, MetadataConfig, ObservabilityConfig, PrinterConfig, RelicConfig, Secret,
    StorageConfig, WatchConfig,
};
pub use validation::{validate_config, ValidationError, ValidationMode};
