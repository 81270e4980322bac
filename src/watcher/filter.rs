//! Deciding which filesystem notifications become scan events.

use std::path::Path;

use chrono::{DateTime, Local};
use notify::event::CreateKind;
use notify::{Event, EventKind};

use crate::relic::ScanEvent;

/// Extensions accepted as scans, compared case-insensitively.
pub const SCAN_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Check if a path names a scan image.
pub fn is_scan_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            SCAN_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Convert a notify event into zero or more scan events.
///
/// Only creations count. Duplicate native notifications are passed through
/// untouched.
pub fn scan_events_from(event: &Event, detected_at: DateTime<Local>) -> Vec<ScanEvent> {
    match event.kind {
        EventKind::Create(CreateKind::Folder) => return Vec::new(),
        EventKind::Create(_) => {}
        _ => return Vec::new(),
    }

    event
        .paths
        .iter()
        .filter(|path| !path.is_dir())
        .filter(|path| is_scan_image(path))
        .map(|path| ScanEvent {
            file_path: path.clone(),
            detected_at,
        })
        .collect()
}
