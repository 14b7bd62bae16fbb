/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Content items: the records citations are rendered for.
//!
//! A content item is a bag of named fields. Field names are whatever the
//! content system uses (`title`, `field_author`, ...); the
//! [`FieldMapping`](crate::mapping::FieldMapping) decides which of them feed
//! which CSL variables.
//!
//! Items are read-only here. On disk, a [`YamlContentSource`] holds one
//! `<id>.yaml` file per item:
//!
//! ```yaml
//! id: node-1
//! fields:
//!   title: Sample Title
//!   field_author:
//!     - family: Doe
//!       given: Jane
//!   field_edtf_date_issued: 2020-05
//!   field_csl_type: book
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// A person's name as stored on a content item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    /// Institutional or otherwise unstructured name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
}

impl PersonName {
    pub fn new(family: &str, given: &str) -> Self {
        Self {
            family: Some(family.to_string()),
            given: Some(given.to_string()),
            literal: None,
        }
    }

    pub fn literal(name: &str) -> Self {
        Self {
            literal: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.family.is_none() && self.given.is_none() && self.literal.is_none()
    }
}

/// The value of a single content field.
///
/// Variant order matters for untagged deserialization: a timestamp map must be
/// tried before a person, and a bare string is always text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Texts(Vec<String>),
    Timestamp { timestamp: DateTime<Utc> },
    Person(PersonName),
    People(Vec<PersonName>),
}

impl FieldValue {
    pub fn timestamp(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp { timestamp: value }
    }

    /// Whether the field holds nothing worth encoding.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Integer(_) | FieldValue::Timestamp { .. } => false,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Texts(v) => v.iter().all(|s| s.trim().is_empty()),
            FieldValue::Person(p) => p.is_empty(),
            FieldValue::People(v) => v.iter().all(PersonName::is_empty),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<PersonName> for FieldValue {
    fn from(p: PersonName) -> Self {
        FieldValue::Person(p)
    }
}

impl From<Vec<PersonName>> for FieldValue {
    fn from(v: Vec<PersonName>) -> Self {
        FieldValue::People(v)
    }
}

/// A routed content item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub fields: IndexMap<String, FieldValue>,
}

impl ContentItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).filter(|v| !v.is_empty())
    }
}

/// Read-only lookup of content items by id.
pub trait ContentSource: Send + Sync {
    fn load_item(&self, id: &str) -> Result<Option<ContentItem>>;
}

/// Content items held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryContentSource {
    items: IndexMap<String, ContentItem>,
}

impl MemoryContentSource {
    pub fn new(items: impl IntoIterator<Item = ContentItem>) -> Self {
        Self {
            items: items.into_iter().map(|i| (i.id.clone(), i)).collect(),
        }
    }
}

impl ContentSource for MemoryContentSource {
    fn load_item(&self, id: &str) -> Result<Option<ContentItem>> {
        Ok(self.items.get(id).cloned())
    }
}

/// Content items stored as `<id>.yaml` files in a directory.
#[derive(Debug, Clone)]
pub struct YamlContentSource {
    dir: PathBuf,
}

impl YamlContentSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn item_path(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.yaml", id)))
    }
}

impl ContentSource for YamlContentSource {
    fn load_item(&self, id: &str) -> Result<Option<ContentItem>> {
        let path = self.item_path(id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let mut item: ContentItem = serde_yaml::from_str(&content)?;
        if item.id.is_empty() {
            item.id = id.to_string();
        }
        Ok(Some(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn field_values_deserialize_by_shape() {
        let yaml = r#"
id: node-7
fields:
  title: Sample Title
  pages: 42
  keywords: [a, b]
  changed:
    timestamp: 2024-03-01T12:00:00Z
  field_author:
    - family: Doe
      given: Jane
  field_publisher:
    literal: Example Press
"#;
        let item: ContentItem = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(item.field("title"), Some(&FieldValue::Text("Sample Title".into())));
        assert_eq!(item.field("pages"), Some(&FieldValue::Integer(42)));
        assert_eq!(
            item.field("keywords"),
            Some(&FieldValue::Texts(vec!["a".into(), "b".into()]))
        );
        assert_eq!(
            item.field("changed"),
            Some(&FieldValue::timestamp(
                Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
            ))
        );
        assert_eq!(
            item.field("field_author"),
            Some(&FieldValue::People(vec![PersonName::new("Doe", "Jane")]))
        );
        assert_eq!(
            item.field("field_publisher"),
            Some(&FieldValue::Person(PersonName::literal("Example Press")))
        );
    }

    #[test]
    fn blank_fields_are_treated_as_absent() {
        let item = ContentItem::new("n1").with_field("title", "   ");
        assert!(item.field("title").is_none());
    }

    #[test]
    fn yaml_source_rejects_path_like_ids() {
        let source = YamlContentSource::new("/tmp");
        assert!(matches!(
            source.load_item("../secrets"),
            Err(StoreError::InvalidId(_))
        ));
    }
}
