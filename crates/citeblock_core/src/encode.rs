/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Content item to CSL-JSON citation item.

use serde_json::Value;

use crate::content::{ContentItem, FieldValue, PersonName};
use crate::edtf::csl_date;
use crate::item::{CitationItem, CslDate, CslName};
use crate::mapping::{FieldMapping, ResolvedMapping, VariableKind};
use crate::normalizer::DateNormalizer;

/// Applies a resolved field mapping to content items.
///
/// Encoding is a pure function of the item: fields that are missing or blank
/// are skipped, and when several fields target the same scalar variable the
/// first non-empty one wins. Name variables accumulate across fields.
#[derive(Debug, Clone, Default)]
pub struct ItemEncoder {
    mapping: ResolvedMapping,
    normalizer: DateNormalizer,
}

impl ItemEncoder {
    pub fn new(mapping: &FieldMapping) -> Self {
        Self {
            mapping: mapping.resolve(),
            normalizer: DateNormalizer::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: DateNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn encode(&self, item: &ContentItem) -> CitationItem {
        let mut out = CitationItem::new(&item.id);

        for entry in self.mapping.entries() {
            let Some(value) = item.field(&entry.source) else {
                continue;
            };
            for (variable, kind) in &entry.targets {
                match kind {
                    VariableKind::Name => self.encode_names(&mut out, variable, value),
                    VariableKind::Date => self.encode_date(&mut out, variable, value),
                    VariableKind::Type => {
                        if out.item_type.is_none() {
                            out.item_type = text_of(value).map(|t| t.to_lowercase());
                        }
                    }
                    VariableKind::Standard => self.encode_standard(&mut out, variable, value),
                }
            }
        }

        out
    }

    fn encode_names(&self, out: &mut CitationItem, variable: &str, value: &FieldValue) {
        let names: Vec<CslName> = match value {
            FieldValue::Person(p) => vec![name_of(p)],
            FieldValue::People(people) => people
                .iter()
                .filter(|p| !p.is_empty())
                .map(name_of)
                .collect(),
            FieldValue::Text(s) => vec![CslName::parse(s)],
            FieldValue::Texts(v) => v
                .iter()
                .filter(|s| !s.trim().is_empty())
                .map(|s| CslName::parse(s))
                .collect(),
            FieldValue::Integer(_) | FieldValue::Timestamp { .. } => return,
        };

        if variable == "author" {
            out.author.extend(names);
            return;
        }
        let encoded: Vec<Value> = names
            .iter()
            .filter_map(|n| serde_json::to_value(n).ok())
            .collect();
        match out.variables.get_mut(variable) {
            Some(Value::Array(existing)) => existing.extend(encoded),
            _ => {
                out.variables.insert(variable.to_string(), Value::Array(encoded));
            }
        }
    }

    fn encode_date(&self, out: &mut CitationItem, variable: &str, value: &FieldValue) {
        let date = match value {
            FieldValue::Text(s) => csl_date(s),
            FieldValue::Texts(v) => match v.iter().find(|s| !s.trim().is_empty()) {
                Some(s) => csl_date(s),
                None => return,
            },
            FieldValue::Integer(year) => match i32::try_from(*year) {
                Ok(year) => CslDate::year(year),
                Err(_) => return,
            },
            FieldValue::Timestamp { timestamp } => {
                let normalized = self.normalizer.normalize(timestamp, &[variable.to_string()]);
                match normalized.get(variable) {
                    Some(date) => csl_date(date),
                    None => return,
                }
            }
            FieldValue::Person(_) | FieldValue::People(_) => return,
        };

        if variable == "issued" {
            if out.issued.is_none() {
                out.issued = Some(date);
            }
        } else if !out.variables.contains_key(variable) {
            if let Ok(encoded) = serde_json::to_value(&date) {
                out.variables.insert(variable.to_string(), encoded);
            }
        }
    }

    fn encode_standard(&self, out: &mut CitationItem, variable: &str, value: &FieldValue) {
        if variable == "title" {
            if out.title.is_none() {
                out.title = text_of(value);
            }
            return;
        }
        if out.variables.contains_key(variable) {
            return;
        }
        let encoded = match value {
            FieldValue::Integer(n) => Value::from(*n),
            FieldValue::Timestamp { timestamp } => Value::from(self.normalizer.format(timestamp)),
            other => match text_of(other) {
                Some(text) => Value::from(text),
                None => return,
            },
        };
        out.variables.insert(variable.to_string(), encoded);
    }
}

fn name_of(person: &PersonName) -> CslName {
    CslName {
        family: person.family.clone(),
        given: person.given.clone(),
        literal: person.literal.clone(),
    }
}

/// Flatten a field to display text; lists are joined with `", "`.
fn text_of(value: &FieldValue) -> Option<String> {
    let text = match value {
        FieldValue::Text(s) => s.trim().to_string(),
        FieldValue::Texts(v) => v
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        FieldValue::Integer(n) => n.to_string(),
        FieldValue::Person(p) => person_text(p),
        FieldValue::People(v) => v.iter().map(person_text).collect::<Vec<_>>().join(", "),
        FieldValue::Timestamp { .. } => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn person_text(person: &PersonName) -> String {
    if let Some(literal) = &person.literal {
        return literal.clone();
    }
    match (&person.given, &person.family) {
        (Some(given), Some(family)) => format!("{} {}", given, family),
        (None, Some(family)) => family.clone(),
        (Some(given), None) => given.clone(),
        (None, None) => String::new(),
    }
}
