//! Watch folder observer feeding the scan channel.

use std::path::PathBuf;

use chrono::Local;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::observability::metrics;
use crate::relic::ScanEvent;
use crate::watcher::filter::scan_events_from;

/// Errors that stop the watcher from starting.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("failed to create watch folder {path}: {source}")]
    CreateFolder {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to start file watcher: {0}")]
    Notify(#[from] notify::Error),

    #[error("failed to watch {path}: {source}")]
    Watch {
        path: PathBuf,
        source: notify::Error,
    },
}

/// A watcher that turns new image files into [`ScanEvent`]s.
pub struct ScanWatcher {
    folders: Vec<PathBuf>,
    scan_tx: mpsc::Sender<ScanEvent>,
}

impl ScanWatcher {
    /// Create a new ScanWatcher.
    ///
    /// Returns the watcher and the receiving end of a bounded scan channel.
    pub fn new(folders: Vec<PathBuf>, capacity: usize) -> (Self, mpsc::Receiver<ScanEvent>) {
        let (scan_tx, scan_rx) = mpsc::channel(capacity);

        (Self { folders, scan_tx }, scan_rx)
    }

    /// Create missing folders and start observing them.
    ///
    /// The returned handle must be kept alive; dropping it stops observation.
    /// Notifications are delivered on notify's own thread, which blocks while
    /// the channel is full.
    pub fn run(self) -> Result<RecommendedWatcher, WatchError> {
        for folder in &self.folders {
            std::fs::create_dir_all(folder).map_err(|source| WatchError::CreateFolder {
                path: folder.clone(),
                source,
            })?;
        }

        let tx = self.scan_tx.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for scan in scan_events_from(&event, Local::now()) {
                        tracing::debug!(path = %scan.file_path.display(), "Scan detected");
                        metrics::record_scan_detected();
                        if tx.blocking_send(scan).is_err() {
                            tracing::warn!("Scan channel closed, dropping event");
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default(),
        )?;

        for folder in &self.folders {
            watcher
                .watch(folder, RecursiveMode::NonRecursive)
                .map_err(|source| WatchError::Watch {
                    path: folder.clone(),
                    source,
                })?;
            tracing::info!(folder = %folder.display(), "Watching for new scans");
        }

        Ok(watcher)
    }
}
