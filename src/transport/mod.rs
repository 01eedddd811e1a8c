//! Submission transport for validated sightings

mod client;
mod traits;

pub use client::{LoggingTransport, DEFAULT_SUBMIT_DELAY};
pub use traits::{SubmissionReceipt, SubmissionTransport};

#[cfg(test)]
pub use traits::MockSubmissionTransport;
