//! Sighting schema domain layer
//!
//! Field and category descriptors supplied by the schema provider, checked
//! once when a form session is created and read-only afterwards.

mod category;
mod field;
mod sighting_schema;

pub use category::{CategoryDescriptor, GENERAL_CATEGORY};
pub use field::{
    FieldDescriptor, FieldKind, FieldValue, FileRestrictions, UploadedFile,
    DEFAULT_MAX_FILE_SIZE,
};
pub use sighting_schema::SightingSchema;
