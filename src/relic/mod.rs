//! Relic records and numbering.

pub mod sequencer;
pub mod types;

pub use sequencer::RelicSequencer;
pub use types::{DegradeReason, Relic, RelicId, RelicStatus, ScanEvent, TransitionError};
