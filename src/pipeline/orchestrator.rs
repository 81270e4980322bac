//! Per-scan state machine.
//!
//! ```text
//! Pending ──upload──▶ Uploaded ──mint──▶ Minted ──print──▶ Printed
//!    │                   │                 │
//!    └──────────▶ Degraded ◀───────────────┘ (mint failure)
//!
//! panic / broken transition before the receipt stage ──▶ Failed
//! ```
//!
//! Every path ends with a receipt print.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::{MintError, Minter};
use crate::display::ScanDisplay;
use crate::observability::metrics;
use crate::printer::{PrintReport, Receipt, ReceiptPrinter};
use crate::qr::{QrImage, QrRenderer};
use crate::relic::{DegradeReason, Relic, RelicSequencer, RelicStatus, ScanEvent, TransitionError};
use crate::storage::{image_content_type, RelicUploader, StoredRelic, UploadError, UploadRequest};

/// A stage failure that degrades the current relic.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("scan could not be read: {0}")]
    Image(#[from] std::io::Error),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Mint(#[from] MintError),
}

impl StageError {
    pub fn stage(&self) -> &'static str {
        match self {
            StageError::Image(_) => "read",
            StageError::Upload(_) => "upload",
            StageError::Mint(_) => "mint",
        }
    }

    pub fn degrade_reason(&self) -> DegradeReason {
        match self {
            StageError::Image(_) => DegradeReason::ImageUnreadable,
            StageError::Upload(_) => DegradeReason::UploadFailed,
            StageError::Mint(_) => DegradeReason::MintFailed,
        }
    }
}

/// Remote services used when minting credentials are configured.
#[derive(Clone)]
pub struct Publishing {
    pub uploader: Arc<dyn RelicUploader>,
    pub minter: Arc<dyn Minter>,
}

/// Final state of one processed scan.
#[derive(Debug)]
pub struct RelicOutcome {
    pub relic: Relic,
    pub print: PrintReport,
}

/// Drives one scan at a time through every stage.
pub struct Orchestrator {
    sequencer: RelicSequencer,
    publishing: Option<Publishing>,
    qr: Arc<dyn QrRenderer>,
    printer: ReceiptPrinter,
    display: Arc<dyn ScanDisplay>,
}

impl Orchestrator {
    /// `publishing` is `None` when credentials are absent; every relic then
    /// degrades without touching the network.
    pub fn new(
        sequencer: RelicSequencer,
        publishing: Option<Publishing>,
        qr: Arc<dyn QrRenderer>,
        printer: ReceiptPrinter,
        display: Arc<dyn ScanDisplay>,
    ) -> Self {
        Self {
            sequencer,
            publishing,
            qr,
            printer,
            display,
        }
    }

    /// Relic ids issued so far.
    pub fn issued(&self) -> u64 {
        self.sequencer.issued()
    }

    pub fn is_publishing(&self) -> bool {
        self.publishing.is_some()
    }

    /// Process one scan to completion. Never fails.
    pub async fn process(&mut self, event: ScanEvent) -> RelicOutcome {
        let id = self.sequencer.next_id();
        let span = tracing::info_span!(
            "relic",
            relic_id = %id,
            file = %event.file_name(),
            run_id = %Uuid::new_v4()
        );
        let relic = Relic::new(id, &event);
        self.finish(relic).instrument(span).await
    }

    async fn finish(&self, mut relic: Relic) -> RelicOutcome {
        tracing::info!(path = %relic.source_image().display(), "Processing scan");

        let staged = AssertUnwindSafe(self.run_stages(&mut relic))
            .catch_unwind()
            .await;
        let qr = match staged {
            Ok(Ok(qr)) => qr,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Relic state machine rejected a transition");
                mark_failed(&mut relic);
                None
            }
            Err(payload) => {
                tracing::error!(panic = %panic_message(&*payload), "Pipeline run panicked");
                mark_failed(&mut relic);
                None
            }
        };

        let receipt = Receipt::for_relic(&relic);
        let printed = AssertUnwindSafe(self.printer.print(&receipt, qr))
            .catch_unwind()
            .await;
        let print = match printed {
            Ok(report) => report,
            Err(payload) => {
                metrics::record_stage_failure("print");
                tracing::error!(panic = %panic_message(&*payload), "Receipt printer panicked");
                PrintReport::default()
            }
        };

        if relic.status() == RelicStatus::Minted {
            if let Err(e) = relic.transition(RelicStatus::Printed) {
                tracing::error!(error = %e, "Could not mark relic printed");
            }
        }

        metrics::record_relic_outcome(relic.status());
        tracing::info!(
            status = %relic.status(),
            degrade_reason = relic.degrade_reason().map(|r| r.as_str()),
            receipt_printed = print.receipt_printed,
            qr_printed = print.qr_printed,
            "Relic finished"
        );

        RelicOutcome { relic, print }
    }

    /// Upload, mint and render the QR code. Stage failures degrade the
    /// relic and end the run early with no QR image.
    async fn run_stages(&self, relic: &mut Relic) -> Result<Option<QrImage>, TransitionError> {
        self.display.show(relic.source_image());

        let Some(publishing) = &self.publishing else {
            tracing::warn!("Minting credentials absent, printing receipt without NFT");
            relic.degrade(DegradeReason::MissingCredentials)?;
            return Ok(None);
        };

        let stored = match upload(publishing.uploader.as_ref(), relic).await {
            Ok(stored) => stored,
            Err(e) => {
                degrade(relic, e)?;
                return Ok(None);
            }
        };
        let token_uri = stored.token_uri.clone();
        relic.record_upload(stored)?;

        let minted = match publishing
            .minter
            .mint(&token_uri, relic.id.number())
            .await
        {
            Ok(minted) => minted,
            Err(e) => {
                degrade(relic, e.into())?;
                return Ok(None);
            }
        };
        let nft_url = minted.nft_url.clone();
        tracing::info!(nft_url = %nft_url, tx_hash = %minted.tx_hash, "Relic minted");
        relic.record_mint(minted)?;

        match self.qr.render(&nft_url) {
            Ok(image) => Ok(Some(image)),
            Err(e) => {
                metrics::record_stage_failure("qr");
                tracing::warn!(error = %e, "QR rendering failed, printing without QR code");
                Ok(None)
            }
        }
    }
}

async fn upload(uploader: &dyn RelicUploader, relic: &Relic) -> Result<StoredRelic, StageError> {
    let path = relic.source_image();
    let image = tokio::fs::read(path).await?;
    let request = UploadRequest {
        image,
        content_type: image_content_type(path),
        relic_id: relic.id,
        created: relic.timestamp.clone(),
    };
    Ok(uploader.upload(request).await?)
}

fn degrade(relic: &mut Relic, error: StageError) -> Result<(), TransitionError> {
    metrics::record_stage_failure(error.stage());
    tracing::warn!(stage = error.stage(), error = %error, "Stage failed, relic degraded");
    relic.degrade(error.degrade_reason())
}

fn mark_failed(relic: &mut Relic) {
    if relic.status().is_terminal() {
        return;
    }
    if let Err(e) = relic.transition(RelicStatus::Failed) {
        tracing::error!(error = %e, "Could not mark relic failed");
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("issued", &self.sequencer.issued())
            .field("publishing", &self.publishing.is_some())
            .field("printer", &self.printer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_mapping() {
        let read = StageError::from(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(read.stage(), "read");
        assert_eq!(read.degrade_reason(), DegradeReason::ImageUnreadable);

        let upload = StageError::from(UploadError::MissingItemId);
        assert_eq!(upload.stage(), "upload");
        assert_eq!(upload.degrade_reason(), DegradeReason::UploadFailed);

        let mint = StageError::from(MintError::MissingBaseFee);
        assert_eq!(mint.stage(), "mint");
        assert_eq!(mint.degrade_reason(), DegradeReason::MintFailed);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*payload), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*payload), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(&*payload), "non-string panic payload");
    }

    #[test]
    fn test_mark_failed_keeps_terminal_status() {
        let mut relic = Relic::new(crate::relic::RelicId::new(1), &ScanEvent::new("/s/a.png"));
        relic.degrade(DegradeReason::UploadFailed).unwrap();
        mark_failed(&mut relic);
        assert_eq!(relic.status(), RelicStatus::Degraded);

        let mut relic = Relic::new(crate::relic::RelicId::new(2), &ScanEvent::new("/s/b.png"));
        mark_failed(&mut relic);
        assert_eq!(relic.status(), RelicStatus::Failed);
    }
}
