//! Field descriptors and typed field values

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default upper bound for an uploaded file (10 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10_000_000;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Closed set of input kinds a sighting field can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Text,
    Boolean,
    Date,
    File,
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::File => "file",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metadata of a file that finished uploading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    /// MIME type reported by the uploader
    #[serde(rename = "type", default)]
    pub mime_type: String,
    /// Size in bytes
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
}

impl UploadedFile {
    pub fn new(name: &str, mime_type: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size,
            upload_url: None,
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.contains("image")
    }

    fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// No value (JSON `null`)
    #[default]
    Empty,
    Text(String),
    Boolean(bool),
    Date(NaiveDate),
    File(UploadedFile),
}

impl FieldValue {
    pub fn text(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }

    /// Convert a raw JSON value according to the field kind.
    ///
    /// `null` is accepted for every kind and maps to [`FieldValue::Empty`].
    /// Returns `None` when the JSON value does not fit the kind.
    pub fn from_json(kind: FieldKind, value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match (kind, value) {
            (_, Value::Null) => Some(FieldValue::Empty),
            (FieldKind::Text, Value::String(s)) => Some(FieldValue::Text(s.clone())),
            (FieldKind::Boolean, Value::Bool(b)) => Some(FieldValue::Boolean(*b)),
            (FieldKind::Date, Value::String(s)) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .ok()
                .map(FieldValue::Date),
            (FieldKind::File, Value::Object(_)) => {
                serde_json::from_value::<UploadedFile>(value.clone())
                    .ok()
                    .map(FieldValue::File)
            }
            _ => None,
        }
    }

    /// Whether this value can be stored in a field of the given kind
    pub fn fits(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::Empty, _)
                | (FieldValue::Text(_), FieldKind::Text)
                | (FieldValue::Boolean(_), FieldKind::Boolean)
                | (FieldValue::Date(_), FieldKind::Date)
                | (FieldValue::File(_), FieldKind::File)
        )
    }

    /// Get the display value for summaries
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Empty => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Boolean(true) => "Yes".to_string(),
            FieldValue::Boolean(false) => "No".to_string(),
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            FieldValue::File(f) if f.is_image() => format!("{} (image)", f.name),
            FieldValue::File(f) => f.name.clone(),
        }
    }
}

/// Upload constraints applied to file fields before a value is accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRestrictions {
    /// MIME types (`image/png`), wildcards (`image/*`) or extensions (`.jpg`)
    pub allowed_file_types: Option<Vec<String>>,
    pub max_file_size: u64,
}

impl Default for FileRestrictions {
    fn default() -> Self {
        Self {
            allowed_file_types: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl FileRestrictions {
    /// Check a file against the restrictions, returning the rejection reason
    pub fn check(&self, file: &UploadedFile) -> Result<(), String> {
        if file.size > self.max_file_size {
            return Err(format!(
                "{} bytes exceeds the {} byte limit",
                file.size, self.max_file_size
            ));
        }
        if let Some(allowed) = &self.allowed_file_types {
            if !allowed.iter().any(|pattern| type_matches(pattern, file)) {
                return Err(format!("type must be one of {}", allowed.join(", ")));
            }
        }
        Ok(())
    }
}

fn type_matches(pattern: &str, file: &UploadedFile) -> bool {
    if let Some(ext) = pattern.strip_prefix('.') {
        return file
            .extension()
            .is_some_and(|actual| actual == ext.to_ascii_lowercase());
    }
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return file
            .mime_type
            .split_once('/')
            .is_some_and(|(top, _)| top.eq_ignore_ascii_case(prefix));
    }
    file.mime_type.eq_ignore_ascii_case(pattern)
}

/// Field descriptor as it appears in the schema document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFieldDescriptor {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub default_value: serde_json::Value,
    #[serde(default)]
    pub label_id: String,
    #[serde(default)]
    pub allowed_file_types: Option<Vec<String>>,
}

/// A validated field descriptor with a typed default value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub category: String,
    pub required: bool,
    pub kind: FieldKind,
    /// The value that counts as "unset"
    pub default_value: FieldValue,
    pub label_id: String,
    pub allowed_file_types: Option<Vec<String>>,
}

impl FieldDescriptor {
    /// Create an optional field whose default is the empty value for its kind
    pub fn new(name: &str, category: &str, kind: FieldKind) -> Self {
        let default_value = match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::Boolean => FieldValue::Boolean(false),
            FieldKind::Date | FieldKind::File => FieldValue::Empty,
        };
        Self {
            name: name.to_string(),
            category: category.to_string(),
            required: false,
            kind,
            default_value,
            label_id: name.to_ascii_uppercase(),
            allowed_file_types: None,
        }
    }

    pub fn text(name: &str, category: &str) -> Self {
        Self::new(name, category, FieldKind::Text)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default_value = value;
        self
    }

    pub fn with_label_id(mut self, label_id: &str) -> Self {
        self.label_id = label_id.to_string();
        self
    }

    pub fn with_allowed_file_types(mut self, types: &[&str]) -> Self {
        self.allowed_file_types = Some(types.iter().map(|t| t.to_string()).collect());
        self
    }

    /// Restrictions for file values, combining the field's types with a size cap
    pub fn file_restrictions(&self, max_file_size: u64) -> FileRestrictions {
        FileRestrictions {
            allowed_file_types: self.allowed_file_types.clone(),
            max_file_size,
        }
    }

    /// The current value still equals the default, i.e. the field is untouched
    pub fn is_unset(&self, value: &FieldValue) -> bool {
        *value == self.default_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod field_value {
        use super::*;

        #[test]
        fn test_null_is_empty_for_every_kind() {
            for kind in [
                FieldKind::Text,
                FieldKind::Boolean,
                FieldKind::Date,
                FieldKind::File,
            ] {
                assert_eq!(
                    FieldValue::from_json(kind, &json!(null)),
                    Some(FieldValue::Empty)
                );
            }
        }

        #[test]
        fn test_from_json_by_kind() {
            assert_eq!(
                FieldValue::from_json(FieldKind::Text, &json!("Heron")),
                Some(FieldValue::text("Heron"))
            );
            assert_eq!(
                FieldValue::from_json(FieldKind::Boolean, &json!(true)),
                Some(FieldValue::Boolean(true))
            );
            assert_eq!(
                FieldValue::from_json(FieldKind::Date, &json!("2024-05-17")),
                Some(FieldValue::Date(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap()))
            );
        }

        #[test]
        fn test_from_json_file_object() {
            let value = json!({
                "name": "heron.jpg",
                "type": "image/jpeg",
                "size": 2048,
                "uploadUrl": "https://uploads.example/heron.jpg"
            });
            let parsed = FieldValue::from_json(FieldKind::File, &value).unwrap();
            match parsed {
                FieldValue::File(file) => {
                    assert_eq!(file.name, "heron.jpg");
                    assert_eq!(file.mime_type, "image/jpeg");
                    assert_eq!(file.size, 2048);
                    assert!(file.is_image());
                    assert_eq!(
                        file.upload_url.as_deref(),
                        Some("https://uploads.example/heron.jpg")
                    );
                }
                other => panic!("expected file value, got {other:?}"),
            }
        }

        #[test]
        fn test_from_json_rejects_mismatched_kind() {
            assert!(FieldValue::from_json(FieldKind::Text, &json!(3)).is_none());
            assert!(FieldValue::from_json(FieldKind::Boolean, &json!("yes")).is_none());
            assert!(FieldValue::from_json(FieldKind::Date, &json!("17/05/2024")).is_none());
            assert!(FieldValue::from_json(FieldKind::File, &json!("heron.jpg")).is_none());
        }

        #[test]
        fn test_fits() {
            assert!(FieldValue::Empty.fits(FieldKind::Date));
            assert!(FieldValue::text("x").fits(FieldKind::Text));
            assert!(!FieldValue::text("x").fits(FieldKind::Boolean));
            assert!(!FieldValue::Boolean(true).fits(FieldKind::File));
        }

        #[test]
        fn test_display_value() {
            assert_eq!(FieldValue::Empty.display_value(), "");
            assert_eq!(FieldValue::Boolean(true).display_value(), "Yes");
            assert_eq!(
                FieldValue::Date(NaiveDate::from_ymd_opt(2023, 1, 9).unwrap()).display_value(),
                "2023-01-09"
            );
            assert_eq!(
                FieldValue::File(UploadedFile::new("a.png", "image/png", 1)).display_value(),
                "a.png (image)"
            );
            assert_eq!(
                FieldValue::File(UploadedFile::new("a.csv", "text/csv", 1)).display_value(),
                "a.csv"
            );
        }

        #[test]
        fn test_serializes_untagged() {
            let value = FieldValue::Date(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
            assert_eq!(serde_json::to_value(&value).unwrap(), json!("2024-05-17"));
            assert_eq!(serde_json::to_value(FieldValue::Empty).unwrap(), json!(null));
        }
    }

    mod file_restrictions {
        use super::*;

        #[test]
        fn test_default_allows_any_type_under_limit() {
            let restrictions = FileRestrictions::default();
            let file = UploadedFile::new("notes.pdf", "application/pdf", 1_000);
            assert!(restrictions.check(&file).is_ok());
        }

        #[test]
        fn test_rejects_oversized_file() {
            let restrictions = FileRestrictions::default();
            let file = UploadedFile::new("video.mp4", "video/mp4", DEFAULT_MAX_FILE_SIZE + 1);
            let reason = restrictions.check(&file).unwrap_err();
            assert!(reason.contains("exceeds"));
        }

        #[test]
        fn test_wildcard_extension_and_exact_patterns() {
            let restrictions = FileRestrictions {
                allowed_file_types: Some(vec![
                    "image/*".to_string(),
                    ".CSV".to_string(),
                    "application/pdf".to_string(),
                ]),
                ..Default::default()
            };
            assert!(restrictions
                .check(&UploadedFile::new("a.png", "image/png", 1))
                .is_ok());
            assert!(restrictions
                .check(&UploadedFile::new("counts.csv", "", 1))
                .is_ok());
            assert!(restrictions
                .check(&UploadedFile::new("a.pdf", "application/pdf", 1))
                .is_ok());
            let reason = restrictions
                .check(&UploadedFile::new("a.mp3", "audio/mpeg", 1))
                .unwrap_err();
            assert_eq!(reason, "type must be one of image/*, .CSV, application/pdf");
        }
    }

    mod descriptor {
        use super::*;

        #[test]
        fn test_new_uses_empty_default_for_kind() {
            assert_eq!(
                FieldDescriptor::text("species", "general").default_value,
                FieldValue::text("")
            );
            assert_eq!(
                FieldDescriptor::new("verified", "general", FieldKind::Boolean).default_value,
                FieldValue::Boolean(false)
            );
            assert_eq!(
                FieldDescriptor::new("photo", "media", FieldKind::File).default_value,
                FieldValue::Empty
            );
        }

        #[test]
        fn test_builder() {
            let field = FieldDescriptor::text("species", "general")
                .required()
                .with_label_id("SPECIES")
                .with_default(FieldValue::text("unknown"));
            assert!(field.required);
            assert_eq!(field.label_id, "SPECIES");
            assert!(field.is_unset(&FieldValue::text("unknown")));
            assert!(!field.is_unset(&FieldValue::text("")));
        }

        #[test]
        fn test_raw_descriptor_defaults() {
            let raw: RawFieldDescriptor =
                serde_json::from_value(json!({"name": "notes", "category": "general"})).unwrap();
            assert!(!raw.required);
            assert_eq!(raw.kind, FieldKind::Text);
            assert!(raw.default_value.is_null());
            assert!(raw.allowed_file_types.is_none());
        }
    }
}
