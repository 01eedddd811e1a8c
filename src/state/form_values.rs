//! Current field values of a form session

use crate::error::SessionError;
use crate::schema::{FieldValue, SightingSchema};
use serde::Serialize;
use std::collections::BTreeMap;

/// One value per schema field, keyed by field name.
///
/// Keys are fixed at construction; edits can replace values but never add or
/// remove entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FormValues {
    values: BTreeMap<String, FieldValue>,
}

impl FormValues {
    /// Initialise every field to its default value
    pub fn from_defaults(schema: &SightingSchema) -> Self {
        let values = schema
            .fields()
            .iter()
            .map(|f| (f.name.clone(), f.default_value.clone()))
            .collect();
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Replace the value of an existing field, returning the previous value
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<FieldValue, SessionError> {
        match self.values.get_mut(name) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(SessionError::UnknownField(name.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
