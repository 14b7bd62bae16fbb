/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Timestamp fields to ISO dates in the site timezone.
//!
//! The default field mapping has no timestamp fields, so this only runs for
//! mappings that point a timestamp (e.g. `changed`) at a CSL date variable.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateNormalizer {
    timezone: Tz,
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self { timezone: Tz::UTC }
    }
}

impl DateNormalizer {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Build from an IANA timezone name such as `Europe/Berlin`.
    pub fn from_timezone_name(name: &str) -> Result<Self, String> {
        name.trim()
            .parse::<Tz>()
            .map(Self::new)
            .map_err(|e| format!("unknown timezone {:?}: {}", name, e))
    }

    /// `Y-m-d` of the timestamp as seen in the site timezone.
    pub fn format(&self, value: &DateTime<Utc>) -> String {
        value.with_timezone(&self.timezone).format("%Y-%m-%d").to_string()
    }

    /// The same ISO date written into every CSL field the value maps to.
    pub fn normalize(&self, value: &DateTime<Utc>, csl_fields: &[String]) -> IndexMap<String, String> {
        let date = self.format(value);
        csl_fields
            .iter()
            .map(|field| (field.clone(), date.clone()))
            .collect()
    }
}
