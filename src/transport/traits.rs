//! Trait abstraction for the submission transport to enable mocking in tests

use crate::state::SightingSubmission;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement returned once a sighting has been accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
        }
    }
}

impl Default for SubmissionReceipt {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivers validated sightings, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    /// Hand a validated sighting to the backend
    async fn submit(&mut self, submission: &SightingSubmission) -> Result<SubmissionReceipt>;
}
