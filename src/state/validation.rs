//! Required-field and terms checks that gate a submission

use super::form_values::FormValues;
use crate::schema::FieldDescriptor;
use serde::Serialize;

/// Outcome of checking a form against its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult<'a> {
    /// Required fields still at their default value, in schema order
    pub incomplete_fields: Vec<&'a FieldDescriptor>,
    pub terms_error: bool,
}

impl ValidationResult<'_> {
    /// The gate: nothing incomplete and terms accepted
    pub fn passes(&self) -> bool {
        self.incomplete_fields.is_empty() && !self.terms_error
    }

    /// Detach the result from the schema so it can be kept on a session
    pub fn to_feedback(&self) -> ValidationFeedback {
        ValidationFeedback {
            incomplete_fields: self
                .incomplete_fields
                .iter()
                .map(|f| IncompleteField {
                    name: f.name.clone(),
                    label_id: f.label_id.clone(),
                })
                .collect(),
            terms_error: self.terms_error,
        }
    }
}

/// A required field that was left untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteField {
    pub name: String,
    pub label_id: String,
}

/// Error annotations surfaced after a blocked submit attempt
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFeedback {
    pub incomplete_fields: Vec<IncompleteField>,
    pub terms_error: bool,
}

impl ValidationFeedback {
    pub fn is_clean(&self) -> bool {
        self.incomplete_fields.is_empty() && !self.terms_error
    }
}

/// Collect required fields whose value still equals their default.
///
/// A missing entry counts as unset. Completeness is plain equality with the
/// default, so a value identical to the default is indistinguishable from an
/// untouched field.
pub fn validate_submission<'a, I>(
    fields: I,
    values: &FormValues,
    terms_accepted: bool,
) -> ValidationResult<'a>
where
    I: IntoIterator<Item = &'a FieldDescriptor>,
{
    let incomplete_fields = fields
        .into_iter()
        .filter(|f| f.required)
        .filter(|f| values.get(&f.name).map_or(true, |v| f.is_unset(v)))
        .collect();

    ValidationResult {
        incomplete_fields,
        terms_error: !terms_accepted,
    }
}
