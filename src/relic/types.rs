//! Relic records and scan events.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::blockchain::types::MintedToken;
use crate::storage::types::StoredRelic;

/// Timestamp format printed on receipts and stored in metadata.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Sequence number of a relic within one process run.
///
/// Displays zero-padded to three digits; wider numbers keep growing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelicId(u64);

impl RelicId {
    pub fn new(number: u64) -> Self {
        Self(number)
    }

    /// Numeric value, used as the on-chain token id.
    pub fn number(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RelicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// A qualifying image file observed in a watched folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub file_path: PathBuf,
    pub detected_at: DateTime<Local>,
}

impl ScanEvent {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            detected_at: Local::now(),
        }
    }

    /// File name for log output.
    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_path.display().to_string())
    }
}

/// Processing state of a relic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelicStatus {
    Pending,
    Uploaded,
    Minted,
    Printed,
    /// Receipt printed without blockchain fields.
    Degraded,
    /// The run broke down before reaching the receipt stage.
    Failed,
}

impl RelicStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RelicStatus::Pending => "pending",
            RelicStatus::Uploaded => "uploaded",
            RelicStatus::Minted => "minted",
            RelicStatus::Printed => "printed",
            RelicStatus::Degraded => "degraded",
            RelicStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RelicStatus::Printed | RelicStatus::Degraded | RelicStatus::Failed
        )
    }

    /// Forward-only transition table.
    pub fn can_transition_to(self, next: RelicStatus) -> bool {
        use RelicStatus::*;
        matches!(
            (self, next),
            (Pending, Uploaded)
                | (Pending, Degraded)
                | (Pending, Failed)
                | (Uploaded, Minted)
                | (Uploaded, Degraded)
                | (Uploaded, Failed)
                | (Minted, Printed)
                | (Minted, Failed)
        )
    }
}

impl fmt::Display for RelicStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a relic skipped its blockchain presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    MissingCredentials,
    ImageUnreadable,
    UploadFailed,
    MintFailed,
}

impl DegradeReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DegradeReason::MissingCredentials => "missing_credentials",
            DegradeReason::ImageUnreadable => "image_unreadable",
            DegradeReason::UploadFailed => "upload_failed",
            DegradeReason::MintFailed => "mint_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("relic {id}: invalid status transition {from} -> {to}")]
pub struct TransitionError {
    pub id: RelicId,
    pub from: RelicStatus,
    pub to: RelicStatus,
}

/// One processed scan.
#[derive(Debug, Clone)]
pub struct Relic {
    pub id: RelicId,
    pub source_image_path: PathBuf,
    pub timestamp: String,
    pub storage_image_uri: Option<String>,
    pub token_uri: Option<String>,
    pub nft_url: Option<String>,
    pub tx_hash: Option<String>,
    status: RelicStatus,
    history: Vec<RelicStatus>,
    degrade_reason: Option<DegradeReason>,
}

impl Relic {
    pub fn new(id: RelicId, event: &ScanEvent) -> Self {
        Self {
            id,
            source_image_path: event.file_path.clone(),
            timestamp: event.detected_at.format(TIMESTAMP_FORMAT).to_string(),
            storage_image_uri: None,
            token_uri: None,
            nft_url: None,
            tx_hash: None,
            status: RelicStatus::Pending,
            history: vec![RelicStatus::Pending],
            degrade_reason: None,
        }
    }

    pub fn status(&self) -> RelicStatus {
        self.status
    }

    /// Every status the relic has held, oldest first.
    pub fn history(&self) -> &[RelicStatus] {
        &self.history
    }

    pub fn degrade_reason(&self) -> Option<DegradeReason> {
        self.degrade_reason
    }

    pub fn source_image(&self) -> &Path {
        &self.source_image_path
    }

    pub fn transition(&mut self, next: RelicStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.history.push(next);
        Ok(())
    }

    pub fn record_upload(&mut self, stored: StoredRelic) -> Result<(), TransitionError> {
        self.transition(RelicStatus::Uploaded)?;
        self.storage_image_uri = Some(stored.image_uri);
        self.token_uri = Some(stored.token_uri);
        Ok(())
    }

    pub fn record_mint(&mut self, minted: MintedToken) -> Result<(), TransitionError> {
        self.transition(RelicStatus::Minted)?;
        self.nft_url = Some(minted.nft_url);
        self.tx_hash = Some(minted.tx_hash);
        Ok(())
    }

    pub fn degrade(&mut self, reason: DegradeReason) -> Result<(), TransitionError> {
        self.transition(RelicStatus::Degraded)?;
        self.degrade_reason = Some(reason);
        Ok(())
    }

    /// NFT URL to print, only for relics that actually minted.
    pub fn printable_nft_url(&self) -> Option<&str> {
        match self.status {
            RelicStatus::Minted | RelicStatus::Printed => self.nft_url.as_deref(),
            _ => None,
        }
    }
}
