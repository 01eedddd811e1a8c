//! Sighting Report - validation and submission gate for wildlife sightings
//!
//! A schema provider supplies field and category descriptors, a rendering
//! layer reports edits into a [`state::FormSession`], and the session decides
//! whether a report may be handed to a [`transport::SubmissionTransport`].

pub mod config;
pub mod error;
pub mod schema;
pub mod state;
pub mod summary;
pub mod transport;
