/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! CSL-JSON citation items.
//!
//! A [`CitationItem`] is built fresh for every render from a content item's
//! fields and is never stored. It serializes to the CSL-JSON shape citation
//! engines consume: `title`, `author` and `issued` get typed fields, any other
//! mapped variable rides along in [`CitationItem::variables`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single bibliographic record handed to the citation engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationItem {
    pub id: String,
    /// CSL item type (`book`, `article-journal`, ...). The engine needs one.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub author: Vec<CslName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued: Option<CslDate>,
    /// Other CSL variables, in mapping order.
    #[serde(flatten)]
    pub variables: IndexMap<String, serde_json::Value>,
}

impl CitationItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn has_type(&self) -> bool {
        self.item_type.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Set the type only if none was resolved from the content item.
    pub fn ensure_type(&mut self, fallback: &str) {
        if !self.has_type() && !fallback.trim().is_empty() {
            self.item_type = Some(fallback.trim().to_string());
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        // A struct of strings, vectors and JSON values always serializes.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// A CSL name: structured parts or a literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
}

impl CslName {
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

    /// Parse `"Family, Given"`; anything without a comma stays literal.
    pub fn parse(name: &str) -> Self {
        match name.split_once(',') {
            Some((family, given)) if !family.trim().is_empty() => {
                let given = given.trim();
                Self {
                    family: Some(family.trim().to_string()),
                    given: (!given.is_empty()).then(|| given.to_string()),
                    literal: None,
                }
            }
            _ => Self::literal(name.trim()),
        }
    }
}

/// A CSL date: one `date-parts` entry, or two for a range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CslDate {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub date_parts: Vec<Vec<i32>>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub circa: bool,
    /// 1 = spring, 2 = summer, 3 = autumn, 4 = winter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
}

impl CslDate {
    pub fn from_parts(parts: Vec<i32>) -> Self {
        Self {
            date_parts: vec![parts],
            ..Default::default()
        }
    }

    pub fn year(year: i32) -> Self {
        Self::from_parts(vec![year])
    }

    pub fn literal(text: &str) -> Self {
        Self {
            literal: Some(text.to_string()),
            ..Default::default()
        }
    }
}
