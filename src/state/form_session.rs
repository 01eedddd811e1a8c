//! Form session: values, checkbox state and the submission state machine
//!
//! A session moves `Editing -> Submitting -> Done`. Validation runs
//! synchronously inside a submit attempt; a blocked attempt leaves the
//! session in `Editing` with the error annotations recorded.

use super::form_values::FormValues;
use super::grouping::{group_fields_by_category, CategoryGroup, ReportVariant};
use super::validation::{validate_submission, ValidationFeedback, ValidationResult};
use crate::error::{SchemaError, SessionError};
use crate::schema::{FieldDescriptor, FieldValue, SightingSchema, DEFAULT_MAX_FILE_SIZE};
use crate::transport::{SubmissionReceipt, SubmissionTransport};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Lifecycle phase of a form session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Editing,
    Submitting,
    Done,
}

impl FormPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Submitting => "submitting",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for FormPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payload handed to the transport once the gate passes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SightingSubmission {
    pub values: FormValues,
    pub terms_accepted: bool,
    pub accept_emails: bool,
    pub variant: ReportVariant,
}

/// Edits collected outside the session, e.g. from a JSON file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDraft {
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default)]
    pub accept_emails: bool,
}

/// Result of running the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    Blocked(ValidationFeedback),
    Ready(SightingSubmission),
}

/// Result of a full submit, including the transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Blocked(ValidationFeedback),
    Submitted(SubmissionReceipt),
}

/// State of one sighting report form
#[derive(Debug, Clone)]
pub struct FormSession {
    schema: Arc<SightingSchema>,
    variant: ReportVariant,
    values: FormValues,
    terms_accepted: bool,
    accept_emails: bool,
    phase: FormPhase,
    /// Annotations from the most recent blocked attempt
    feedback: Option<ValidationFeedback>,
    receipt: Option<SubmissionReceipt>,
    max_file_size: u64,
}

impl FormSession {
    pub fn new(schema: Arc<SightingSchema>, variant: ReportVariant) -> Self {
        let values = FormValues::from_defaults(&schema);
        Self {
            schema,
            variant,
            values,
            terms_accepted: false,
            accept_emails: false,
            phase: FormPhase::Editing,
            feedback: None,
            receipt: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Create a session straight from a schema document
    pub fn from_json(json: &str, variant: ReportVariant) -> Result<Self, SchemaError> {
        let schema = SightingSchema::from_json(json)?;
        Ok(Self::new(Arc::new(schema), variant))
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    pub fn schema(&self) -> &SightingSchema {
        &self.schema
    }

    pub fn variant(&self) -> ReportVariant {
        self.variant
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// True while a submission is in flight
    pub fn is_loading(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn accept_emails(&self) -> bool {
        self.accept_emails
    }

    pub fn feedback(&self) -> Option<&ValidationFeedback> {
        self.feedback.as_ref()
    }

    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        self.receipt.as_ref()
    }

    /// Categories and their fields as shown for this session's variant
    pub fn groups(&self) -> Vec<CategoryGroup<'_>> {
        group_fields_by_category(self.schema.fields(), self.schema.categories(), self.variant)
    }

    /// Whether a field is checked by this form rather than per item
    fn is_aggregate_field(&self, field: &FieldDescriptor) -> bool {
        !self.variant.is_multiple()
            || self
                .schema
                .category(&field.category)
                .is_some_and(|c| !c.individual_fields)
    }

    /// Run the checks without touching session state.
    ///
    /// In multi-item reports, fields of individual-fields categories are left
    /// to per-item validation.
    pub fn validate(&self) -> ValidationResult<'_> {
        let fields = self
            .schema
            .fields()
            .iter()
            .filter(|f| self.is_aggregate_field(f));
        validate_submission(fields, &self.values, self.terms_accepted)
    }

    fn ensure_editing(&self) -> Result<(), SessionError> {
        match self.phase {
            FormPhase::Editing => Ok(()),
            phase => Err(SessionError::NotEditing(phase)),
        }
    }

    /// Check that `value` may be stored in field `name`
    fn check_value(&self, name: &str, value: &FieldValue) -> Result<(), SessionError> {
        let field = self
            .schema
            .field(name)
            .ok_or_else(|| SessionError::UnknownField(name.to_string()))?;

        if !value.fits(field.kind) {
            return Err(SessionError::KindMismatch {
                field: name.to_string(),
                kind: field.kind,
            });
        }
        if let FieldValue::File(file) = value {
            field
                .file_restrictions(self.max_file_size)
                .check(file)
                .map_err(|reason| SessionError::FileRejected {
                    field: name.to_string(),
                    file: file.name.clone(),
                    reason,
                })?;
        }
        Ok(())
    }

    /// Convert a raw JSON value by the kind of field `name` and check it
    fn convert_json(
        &self,
        name: &str,
        value: &serde_json::Value,
    ) -> Result<FieldValue, SessionError> {
        let kind = self
            .schema
            .field(name)
            .map(|f| f.kind)
            .ok_or_else(|| SessionError::UnknownField(name.to_string()))?;
        let value = FieldValue::from_json(kind, value).ok_or_else(|| SessionError::KindMismatch {
            field: name.to_string(),
            kind,
        })?;
        self.check_value(name, &value)?;
        Ok(value)
    }

    /// Field edit callback: replace the value of `name`
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.check_value(name, &value)?;
        self.values.set(name, value)?;
        tracing::debug!("Field {name} updated");
        Ok(())
    }

    /// Field edit callback taking a raw JSON value, converted by field kind
    pub fn set_json_value(
        &mut self,
        name: &str,
        value: &serde_json::Value,
    ) -> Result<(), SessionError> {
        self.ensure_editing()?;
        let value = self.convert_json(name, value)?;
        self.values.set(name, value)?;
        tracing::debug!("Field {name} updated");
        Ok(())
    }

    /// Apply every edit of a draft, or none of them if any edit is rejected
    pub fn apply_draft(&mut self, draft: &ReportDraft) -> Result<(), SessionError> {
        self.ensure_editing()?;
        let edits = draft
            .values
            .iter()
            .map(|(name, value)| {
                self.convert_json(name, value)
                    .map(|v| (name.as_str(), v))
            })
            .collect::<Result<Vec<_>, SessionError>>()?;

        for (name, value) in edits {
            self.values.set(name, value)?;
        }
        self.terms_accepted = draft.terms_accepted;
        self.accept_emails = draft.accept_emails;
        tracing::debug!("Draft applied ({} field(s))", draft.values.len());
        Ok(())
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.terms_accepted = accepted;
        Ok(())
    }

    pub fn toggle_terms(&mut self) -> Result<(), SessionError> {
        self.set_terms_accepted(!self.terms_accepted)
    }

    pub fn set_accept_emails(&mut self, accepted: bool) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.accept_emails = accepted;
        Ok(())
    }

    pub fn toggle_accept_emails(&mut self) -> Result<(), SessionError> {
        self.set_accept_emails(!self.accept_emails)
    }

    /// Run the gate. On success the session enters `Submitting` and the
    /// payload is returned; otherwise the feedback is recorded and returned.
    pub fn attempt_submit(&mut self) -> Result<SubmitAttempt, SessionError> {
        self.ensure_editing()?;

        let result = self.validate();
        let passes = result.passes();
        let feedback = result.to_feedback();
        self.feedback = Some(feedback.clone());

        if !passes {
            tracing::info!(
                "Submission blocked: {} incomplete field(s), terms_error={}",
                feedback.incomplete_fields.len(),
                feedback.terms_error
            );
            return Ok(SubmitAttempt::Blocked(feedback));
        }

        self.phase = FormPhase::Submitting;
        tracing::info!("Gate passed, reporting sighting");
        Ok(SubmitAttempt::Ready(SightingSubmission {
            values: self.values.clone(),
            terms_accepted: self.terms_accepted,
            accept_emails: self.accept_emails,
            variant: self.variant,
        }))
    }

    /// Run the gate and, if it passes, hand the sighting to the transport once
    pub async fn submit(
        &mut self,
        transport: &mut dyn SubmissionTransport,
    ) -> Result<SubmitOutcome> {
        let submission = match self.attempt_submit()? {
            SubmitAttempt::Blocked(feedback) => return Ok(SubmitOutcome::Blocked(feedback)),
            SubmitAttempt::Ready(submission) => submission,
        };

        match transport.submit(&submission).await {
            Ok(receipt) => {
                self.phase = FormPhase::Done;
                self.receipt = Some(receipt.clone());
                Ok(SubmitOutcome::Submitted(receipt))
            }
            Err(e) => {
                tracing::warn!("Sighting submission failed: {e:#}");
                self.phase = FormPhase::Editing;
                Err(e.context("Failed to submit sighting"))
            }
        }
    }
}
