//! Single-consumer loop over detected scans.

use tokio::sync::{broadcast, mpsc};

use crate::pipeline::orchestrator::Orchestrator;
use crate::relic::ScanEvent;

/// Process scans one at a time until shutdown or until every sender is gone.
///
/// Shutdown is checked between scans; a run in progress finishes first.
/// Returns the number of scans processed.
pub async fn run_pipeline(
    mut orchestrator: Orchestrator,
    mut events: mpsc::Receiver<ScanEvent>,
    mut shutdown: broadcast::Receiver<()>,
) -> usize {
    let mut processed = 0;
    tracing::info!(
        publishing = orchestrator.is_publishing(),
        "Pipeline ready for scans"
    );

    loop {
        tokio::select! {
            biased;

            _ = shutdown.recv() => {
                tracing::info!("Pipeline received shutdown signal");
                break;
            }

            event = events.recv() => match event {
                Some(event) => {
                    orchestrator.process(event).await;
                    processed += 1;
                }
                None => {
                    tracing::info!("Scan channel closed");
                    break;
                }
            },
        }
    }

    tracing::info!(processed, issued = orchestrator.issued(), "Pipeline stopped");
    processed
}
