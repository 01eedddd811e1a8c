//! Form session state module

mod form_session;
mod form_values;
mod grouping;
mod validation;

pub use form_session::*;
pub use form_values::FormValues;
pub use grouping::{group_fields_by_category, CategoryGroup, ReportVariant};
pub use validation::{
    validate_submission, IncompleteField, ValidationFeedback, ValidationResult,
};
