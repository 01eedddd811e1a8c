//! Logging transport used when no reporting backend is configured
//!
//! Serializes the submission, logs it, waits for the configured delay and
//! acknowledges it with a fresh receipt. Nothing leaves the process.

use super::traits::{SubmissionReceipt, SubmissionTransport};
use crate::state::SightingSubmission;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Default simulated round trip
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(500);

/// Transport that records submissions instead of sending them
#[derive(Debug, Clone)]
pub struct LoggingTransport {
    delay: Duration,
    /// Number of submissions acknowledged
    submitted: u64,
    last_receipt: Option<SubmissionReceipt>,
}

impl LoggingTransport {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            submitted: 0,
            last_receipt: None,
        }
    }

    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Receipt of the most recent submission
    pub fn last_receipt(&self) -> Option<&SubmissionReceipt> {
        self.last_receipt.as_ref()
    }
}

impl Default for LoggingTransport {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl SubmissionTransport for LoggingTransport {
    async fn submit(&mut self, submission: &SightingSubmission) -> Result<SubmissionReceipt> {
        let payload =
            serde_json::to_string(submission).context("Failed to serialize sighting")?;
        tracing::info!(
            "Reporting sighting ({} fields, variant={}, accept_emails={})",
            submission.values.len(),
            submission.variant,
            submission.accept_emails
        );
        tracing::debug!("Sighting payload: {payload}");

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let receipt = SubmissionReceipt::new();
        tracing::info!("Sighting submitted as {}", receipt.id);
        self.submitted += 1;
        self.last_receipt = Some(receipt.clone());
        Ok(receipt)
    }
}
