/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Which content fields feed which CSL variables.
//!
//! The mapping table is read from configuration and resolved once into a
//! [`ResolvedMapping`] that already knows whether each target is a name, date,
//! type or ordinary variable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How a CSL variable is encoded in CSL-JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Name,
    Date,
    Type,
    Standard,
}

const NAME_VARIABLES: &[&str] = &[
    "author",
    "chair",
    "collection-editor",
    "compiler",
    "composer",
    "container-author",
    "contributor",
    "curator",
    "director",
    "editor",
    "editorial-director",
    "executive-producer",
    "guest",
    "host",
    "illustrator",
    "interviewer",
    "narrator",
    "organizer",
    "original-author",
    "performer",
    "producer",
    "recipient",
    "reviewed-author",
    "script-writer",
    "series-creator",
    "translator",
];

const DATE_VARIABLES: &[&str] = &[
    "accessed",
    "available-date",
    "event-date",
    "issued",
    "original-date",
    "submitted",
];

impl VariableKind {
    pub fn of(csl_variable: &str) -> Self {
        if csl_variable == "type" {
            VariableKind::Type
        } else if NAME_VARIABLES.contains(&csl_variable) {
            VariableKind::Name
        } else if DATE_VARIABLES.contains(&csl_variable) {
            VariableKind::Date
        } else {
            VariableKind::Standard
        }
    }
}

/// `{ source field: [CSL variables] }`, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(IndexMap<String, Vec<String>>);

impl Default for FieldMapping {
    fn default() -> Self {
        let mut mapping = Self::empty();
        mapping.insert("title", ["title"]);
        mapping.insert("field_author", ["author"]);
        mapping.insert("field_edtf_date_issued", ["issued"]);
        mapping.insert("field_csl_type", ["type"]);
        mapping
    }
}

impl FieldMapping {
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert<I, S>(&mut self, source: &str, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(source.to_string(), targets.into_iter().map(Into::into).collect());
    }

    pub fn targets(&self, source: &str) -> &[String] {
        self.0.get(source).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn resolve(&self) -> ResolvedMapping {
        let entries = self
            .0
            .iter()
            .map(|(source, targets)| MappingEntry {
                source: source.clone(),
                targets: targets
                    .iter()
                    .map(|t| t.trim())
                    .filter(|t| !t.is_empty())
                    .map(|t| (t.to_string(), VariableKind::of(t)))
                    .collect(),
            })
            .filter(|entry| !entry.targets.is_empty())
            .collect();
        ResolvedMapping { entries }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub source: String,
    pub targets: Vec<(String, VariableKind)>,
}

/// A field mapping with every target classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMapping {
    entries: Vec<MappingEntry>,
}

impl ResolvedMapping {
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }
}
