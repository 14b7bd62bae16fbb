/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use serde::{Deserialize, Serialize};

/// Settings of the placed citation block.
///
/// Both values are hints. A `default_csl` that no longer names a stored style
/// is ignored, and `default_csl_type` only applies to items whose own fields
/// resolve no CSL type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub default_csl: Option<String>,
    pub default_csl_type: Option<String>,
}

impl BlockConfig {
    pub fn new(default_csl: Option<&str>, default_csl_type: Option<&str>) -> Self {
        Self {
            default_csl: non_blank(default_csl),
            default_csl_type: non_blank(default_csl_type),
        }
    }

    pub fn default_csl(&self) -> Option<&str> {
        self.default_csl.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn default_csl_type(&self) -> Option<&str> {
        self.default_csl_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Read-only access to the citation block's configuration.
pub trait BlockConfigSource: Send + Sync {
    fn citation_block(&self) -> BlockConfig;
}

impl BlockConfigSource for BlockConfig {
    fn citation_block(&self) -> BlockConfig {
        self.clone()
    }
}
