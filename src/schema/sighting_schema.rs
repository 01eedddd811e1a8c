//! The sighting schema document: ordered categories and fields

use super::category::CategoryDescriptor;
use super::field::{FieldDescriptor, FieldValue, RawFieldDescriptor};
use crate::error::SchemaError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(default)]
    categories: Vec<CategoryDescriptor>,
    #[serde(default)]
    fields: Vec<RawFieldDescriptor>,
}

/// A checked schema: unique names and every field in a known category
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SightingSchema {
    categories: Vec<CategoryDescriptor>,
    fields: Vec<FieldDescriptor>,
}

impl SightingSchema {
    /// Build a schema, rejecting duplicate names and dangling categories
    pub fn new(
        categories: Vec<CategoryDescriptor>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<Self, SchemaError> {
        let mut category_names = HashSet::new();
        for category in &categories {
            if !category_names.insert(category.name.as_str()) {
                return Err(SchemaError::DuplicateCategory(category.name.clone()));
            }
        }

        let mut field_names = HashSet::new();
        for field in &fields {
            if !field_names.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            if !category_names.contains(field.category.as_str()) {
                return Err(SchemaError::DanglingCategory {
                    field: field.name.clone(),
                    category: field.category.clone(),
                });
            }
            if !field.default_value.fits(field.kind) {
                return Err(SchemaError::InvalidDefault {
                    field: field.name.clone(),
                    kind: field.kind,
                });
            }
        }

        Ok(Self { categories, fields })
    }

    /// Parse a JSON schema document (`{"categories": [...], "fields": [...]}`)
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let raw: RawSchema =
            serde_json::from_str(json).map_err(|e| SchemaError::Malformed(e.to_string()))?;

        let fields = raw
            .fields
            .into_iter()
            .map(|f| {
                let default_value = FieldValue::from_json(f.kind, &f.default_value).ok_or_else(
                    || SchemaError::InvalidDefault {
                        field: f.name.clone(),
                        kind: f.kind,
                    },
                )?;
                Ok(FieldDescriptor {
                    name: f.name,
                    category: f.category,
                    required: f.required,
                    kind: f.kind,
                    default_value,
                    label_id: f.label_id,
                    allowed_file_types: f.allowed_file_types,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Self::new(raw.categories, fields)
    }

    /// Load a schema document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema {}", path.display()))?;
        let schema = Self::from_json(&content)
            .with_context(|| format!("Invalid schema {}", path.display()))?;
        tracing::debug!(
            "Loaded schema {} ({} categories, {} fields)",
            path.display(),
            schema.categories.len(),
            schema.fields.len()
        );
        Ok(schema)
    }

    pub fn categories(&self) -> &[CategoryDescriptor] {
        &self.categories
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn category(&self, name: &str) -> Option<&CategoryDescriptor> {
        self.categories.iter().find(|c| c.name == name)
    }
}
