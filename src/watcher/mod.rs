//! Scan detection subsystem.
//!
//! # Data Flow
//! ```text
//! notify (inotify / FSEvents / ReadDirectoryChanges)
//!     → filter.rs (creations of .png/.jpg/.jpeg files only)
//!     → scan_watcher.rs (bounded mpsc channel)
//!     → pipeline runner (single consumer)
//! ```
//!
//! # Design Decisions
//! - Folders are watched non-recursively and created if missing
//! - No deduplication; every qualifying notification becomes one event
//! - A full channel blocks notify's thread instead of dropping events

pub mod filter;
pub mod scan_watcher;

pub use filter::{is_scan_image, scan_events_from};
pub use scan_watcher::{ScanWatcher, WatchError};
