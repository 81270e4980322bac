//! Receipt printing with guaranteed temp-file cleanup.

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use crate::observability::metrics;
use crate::printer::receipt::Receipt;
use crate::printer::sink::PrintSink;
use crate::qr::QrImage;

/// What actually reached the printer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrintReport {
    pub receipt_printed: bool,
    pub qr_printed: bool,
}

/// Prints a text receipt and, optionally, a QR image.
#[derive(Clone)]
pub struct ReceiptPrinter {
    sink: Arc<dyn PrintSink>,
}

impl ReceiptPrinter {
    pub fn new(sink: Arc<dyn PrintSink>) -> Self {
        Self { sink }
    }

    pub fn describe(&self) -> String {
        self.sink.describe()
    }

    /// Print a receipt, then the QR image if one was rendered.
    ///
    /// Never fails: problems are logged and reflected in the report. The
    /// receipt file and the QR image are deleted before this returns.
    pub async fn print(&self, receipt: &Receipt, qr: Option<QrImage>) -> PrintReport {
        let mut report = PrintReport::default();
        let relic_id = receipt.relic_id;

        match write_receipt_file(receipt) {
            Ok(file) => {
                match self.sink.submit(file.path()).await {
                    Ok(()) => {
                        report.receipt_printed = true;
                        tracing::info!(relic_id = %relic_id, "Printed receipt");
                    }
                    Err(e) => {
                        metrics::record_stage_failure("print");
                        tracing::warn!(relic_id = %relic_id, error = %e, "Receipt printing failed");
                    }
                }
                if let Err(e) = file.close() {
                    tracing::warn!(error = %e, "Failed to remove receipt file");
                }
            }
            Err(e) => {
                metrics::record_stage_failure("print");
                tracing::warn!(relic_id = %relic_id, error = %e, "Failed to write receipt file");
            }
        }

        if let Some(qr) = qr {
            if qr.path().exists() {
                match self.sink.submit(qr.path()).await {
                    Ok(()) => {
                        report.qr_printed = true;
                        tracing::info!(relic_id = %relic_id, "Printed QR code");
                    }
                    Err(e) => {
                        metrics::record_stage_failure("print");
                        tracing::warn!(relic_id = %relic_id, error = %e, "QR printing failed");
                    }
                }
            }
            if let Err(e) = qr.close() {
                tracing::debug!(error = %e, "QR image already removed");
            }
        }

        report
    }
}

fn write_receipt_file(receipt: &Receipt) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("relic-receipt-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(receipt.render().as_bytes())?;
    file.flush()?;
    Ok(file)
}

impl std::fmt::Debug for ReceiptPrinter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptPrinter")
            .field("sink", &self.sink.describe())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::PrintError;
    use crate::qr::{QrEncoder, QrRenderer};
    use crate::relic::RelicId;
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Records submitted paths and contents; optionally fails every job.
    #[derive(Default)]
    struct RecordingSink {
        jobs: Mutex<Vec<(PathBuf, Vec<u8>)>>,
        fail: bool,
    }

    #[async_trait]
    impl PrintSink for RecordingSink {
        fn describe(&self) -> String {
            "recording".into()
        }

        async fn submit(&self, file: &Path) -> Result<(), PrintError> {
            let contents = std::fs::read(file)?;
            self.jobs.lock().unwrap().push((file.to_path_buf(), contents));
            if self.fail {
                Err(PrintError::UnsupportedPlatform("test".into()))
            } else {
                Ok(())
            }
        }
    }

    fn receipt(nft_url: Option<&str>) -> Receipt {
        Receipt {
            relic_id: RelicId::new(1),
            timestamp: "2025-03-01 19:45".into(),
            nft_url: nft_url.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_prints_receipt_and_qr_then_cleans_up() {
        let sink = Arc::new(RecordingSink::default());
        let printer = ReceiptPrinter::new(sink.clone());
        let qr = QrEncoder::default().render("https://zora.co/x").unwrap();

        let report = printer.print(&receipt(Some("https://zora.co/x")), Some(qr)).await;
        assert_eq!(
            report,
            PrintReport {
                receipt_printed: true,
                qr_printed: true
            }
        );

        let jobs = sink.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 2);
        let text = String::from_utf8(jobs[0].1.clone()).unwrap();
        assert!(text.contains("NFT URL: https://zora.co/x"));
        for (path, _) in jobs.iter() {
            assert!(!path.exists(), "{} should be removed", path.display());
        }
    }

    #[tokio::test]
    async fn test_files_removed_when_printing_fails() {
        let sink = Arc::new(RecordingSink {
            fail: true,
            ..Default::default()
        });
        let printer = ReceiptPrinter::new(sink.clone());
        let qr = QrEncoder::default().render("https://zora.co/x").unwrap();

        let report = printer.print(&receipt(None), Some(qr)).await;
        assert_eq!(report, PrintReport::default());

        let jobs = sink.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 2);
        for (path, _) in jobs.iter() {
            assert!(!path.exists());
        }
    }

    #[tokio::test]
    async fn test_missing_qr_file_is_skipped() {
        let sink = Arc::new(RecordingSink::default());
        let printer = ReceiptPrinter::new(sink.clone());
        let qr = QrEncoder::default().render("https://zora.co/x").unwrap();
        std::fs::remove_file(qr.path()).unwrap();

        let report = printer.print(&receipt(None), Some(qr)).await;
        assert!(report.receipt_printed);
        assert!(!report.qr_printed);
        assert_eq!(sink.jobs.lock().unwrap().len(), 1);
    }
}
