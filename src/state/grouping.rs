//! Grouping of schema fields into display categories

use crate::schema::{CategoryDescriptor, FieldDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the report covers one animal or several
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportVariant {
    #[default]
    Single,
    Multiple,
}

impl ReportVariant {
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple)
    }
}

impl fmt::Display for ReportVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Multiple => f.write_str("multiple"),
        }
    }
}

/// A category together with its member fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub category: &'a CategoryDescriptor,
    /// Member fields in schema order
    pub fields: Vec<&'a FieldDescriptor>,
    /// At least one member field is required
    pub is_required: bool,
}

impl CategoryGroup<'_> {
    /// Only the general category starts expanded
    pub fn default_expanded(&self) -> bool {
        self.category.is_general()
    }
}

/// Group fields by category, in category order.
///
/// In multi-item reports, categories flagged `individual_fields` are left out
/// entirely: their fields are filled in per item, not in the aggregate form.
pub fn group_fields_by_category<'a>(
    fields: &'a [FieldDescriptor],
    categories: &'a [CategoryDescriptor],
    variant: ReportVariant,
) -> Vec<CategoryGroup<'a>> {
    categories
        .iter()
        .filter(|category| !(variant.is_multiple() && category.individual_fields))
        .map(|category| {
            let fields: Vec<&FieldDescriptor> = fields
                .iter()
                .filter(|f| f.category == category.name)
                .collect();
            let is_required = fields.iter().any(|f| f.required);
            CategoryGroup {
                category,
                fields,
                is_required,
            }
        })
        .collect()
}
