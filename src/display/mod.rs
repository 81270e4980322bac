//! Scan display.
//!
//! Showing the scan on screen is left to an external viewer; the default
//! implementation only logs it.

use std::path::Path;

/// Shows a freshly detected scan.
pub trait ScanDisplay: Send + Sync {
    fn show(&self, image: &Path);
}

/// Logs the image instead of drawing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDisplay;

impl ScanDisplay for LogDisplay {
    fn show(&self, image: &Path) {
        tracing::info!(image = %image.display(), "Displaying scan");
    }
}
