/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Stored CSL styles and the metadata we read from them.
//!
//! Styles are kept as the raw XML the admin uploaded. Nothing here validates
//! the CSL grammar; a malformed style only surfaces when the engine tries to
//! render with it. [`inspect_style`] reads just enough of the `<info>` block to
//! list a style and to label uploads that arrive without one.

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

/// A persisted CSL style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRecord {
    /// Machine name, unique within the repository.
    pub id: String,
    /// Human-readable label shown in the picker.
    pub label: String,
    /// The CSL XML exactly as uploaded.
    #[serde(default)]
    pub file_content: String,
}

impl StyleRecord {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        file_content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            file_content: file_content.into(),
        }
    }

    /// The style payload handed to the citation engine.
    pub fn definition(&self) -> StyleDefinition {
        StyleDefinition {
            id: self.id.clone(),
            xml: self.file_content.clone(),
        }
    }
}

/// CSL content loaded for a style id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDefinition {
    pub id: String,
    pub xml: String,
}

/// Metadata found in a style's root element and `<info>` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleInfo {
    pub title: String,
    pub id: String,
    pub class: Option<String>,
    pub default_locale: Option<String>,
    pub has_bibliography: bool,
    /// `independent-parent` link of a dependent style.
    pub parent: Option<String>,
}

impl StyleInfo {
    pub fn is_dependent(&self) -> bool {
        self.parent.is_some()
    }
}

/// Read the metadata of a CSL style without interpreting its layout.
pub fn inspect_style(xml: &str) -> Result<StyleInfo, String> {
    let doc = Document::parse(xml).map_err(|e| e.to_string())?;
    let root = doc.root_element();
    if root.tag_name().name() != "style" {
        return Err(format!(
            "expected a <style> root element, found <{}>",
            root.tag_name().name()
        ));
    }

    let mut info = StyleInfo {
        class: root.attribute("class").map(|s| s.to_string()),
        default_locale: root.attribute("default-locale").map(|s| s.to_string()),
        ..Default::default()
    };

    for child in root.children() {
        if !child.is_element() {
            continue;
        }
        match child.tag_name().name() {
            "info" => parse_info(child, &mut info),
            "bibliography" => info.has_bibliography = true,
            _ => {}
        }
    }

    Ok(info)
}

fn parse_info(node: Node, info: &mut StyleInfo) {
    for child in node.children() {
        if !child.is_element() {
            continue;
        }
        match child.tag_name().name() {
            "title" => info.title = child.text().unwrap_or_default().trim().to_string(),
            "id" => info.id = child.text().unwrap_or_default().trim().to_string(),
            "link" if child.attribute("rel") == Some("independent-parent") => {
                info.parent = child.attribute("href").map(|s| s.to_string());
            }
            _ => {}
        }
    }
}

/// Whether `id` is a valid machine name: lowercase ASCII letters, digits and
/// underscores.
pub fn is_machine_name(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Derive a machine name from a label (`"APA 7th"` becomes `"apa_7th"`).
pub fn machine_name(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}
