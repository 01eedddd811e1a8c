//! Category descriptors used to group sighting fields

use serde::{Deserialize, Serialize};

/// Name of the category shown expanded when the form opens
pub const GENERAL_CATEGORY: &str = "general";

/// A grouping key for related fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDescriptor {
    pub name: String,
    /// Fields of this category are filled in per item in multi-item reports
    #[serde(default)]
    pub individual_fields: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_id: Option<String>,
    /// Plain label used when no label id is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl CategoryDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            individual_fields: false,
            label_id: None,
            label: None,
        }
    }

    pub fn individual(mut self) -> Self {
        self.individual_fields = true;
        self
    }

    pub fn with_label_id(mut self, label_id: &str) -> Self {
        self.label_id = Some(label_id.to_string());
        self
    }

    /// Label id, then plain label, then the category name
    pub fn display_label(&self) -> &str {
        self.label_id
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(&self.name)
    }

    pub fn is_general(&self) -> bool {
        self.name == GENERAL_CATEGORY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label_fallbacks() {
        let mut category = CategoryDescriptor::new("location");
        assert_eq!(category.display_label(), "location");

        category.label = Some("Location".to_string());
        assert_eq!(category.display_label(), "Location");

        category.label_id = Some("LOCATION".to_string());
        assert_eq!(category.display_label(), "LOCATION");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{"name": "animal", "individualFields": true, "labelId": "ANIMAL"}"#;
        let category: CategoryDescriptor = serde_json::from_str(json).unwrap();
        assert!(category.individual_fields);
        assert_eq!(category.label_id.as_deref(), Some("ANIMAL"));
        assert!(category.label.is_none());
    }

    #[test]
    fn test_deserialize_minimal() {
        let category: CategoryDescriptor = serde_json::from_str(r#"{"name": "general"}"#).unwrap();
        assert!(!category.individual_fields);
        assert!(category.is_general());
    }
}
