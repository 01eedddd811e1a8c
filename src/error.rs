//! Error types for schema loading and form sessions

use crate::schema::FieldKind;
use crate::state::FormPhase;

/// Contract violations in an externally supplied sighting schema
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("duplicate field name: {0}")]
    DuplicateField(String),
    #[error("duplicate category name: {0}")]
    DuplicateCategory(String),
    #[error("field {field} references unknown category {category}")]
    DanglingCategory { field: String, category: String },
    #[error("default value of field {field} is not a valid {kind} value")]
    InvalidDefault { field: String, kind: FieldKind },
    #[error("malformed schema document: {0}")]
    Malformed(String),
}

/// Rejected edits and out-of-order operations on a form session
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("value for field {field} is not a valid {kind} value")]
    KindMismatch { field: String, kind: FieldKind },
    #[error("file {file} rejected for field {field}: {reason}")]
    FileRejected {
        field: String,
        file: String,
        reason: String,
    },
    #[error("form is {0}, edits and submissions are only accepted while editing")]
    NotEditing(FormPhase),
}
