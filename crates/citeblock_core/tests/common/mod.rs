/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use citeblock_core::{StyleUpload, UploadedFile};

// --- Fixtures ---

/// A minimal independent style with the given title.
pub fn style_xml(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<style xmlns="http://purl.org/net/xbiblio/csl" class="in-text" version="1.0">
  <info>
    <title>{title}</title>
    <id>http://example.org/styles/{title}</id>
  </info>
  <citation>
    <layout><text variable="title"/></layout>
  </citation>
</style>"#
    )
}

/// An upload of `<id>.csl` labelled `label`.
pub fn csl_upload(label: &str, file_name: &str) -> StyleUpload {
    StyleUpload::new(label, UploadedFile::new(file_name, style_xml(label)))
}
