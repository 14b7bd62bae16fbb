/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use std::sync::Arc;

use citeblock_core::{
    BlockConfig, ContentItem, FieldMapping, ItemEncoder, MemoryStyleRepository, PersonName,
    StyleRecord,
};
use citeblock_processor::{CitationHelper, HayagrivaEngine, StylePicker};

/// `family, given (year). title.` in both citation and bibliography.
pub const AUTHOR_DATE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<style xmlns="http://purl.org/net/xbiblio/csl" class="in-text" version="1.0">
  <info>
    <title>Author Date</title>
    <id>http://example.org/styles/author-date</id>
  </info>
  <citation>
    <layout>
      <names variable="author">
        <name name-as-sort-order="all" sort-separator=", "/>
      </names>
      <date variable="issued" prefix=" (" suffix=")."><date-part name="year"/></date>
      <text variable="title" prefix=" " suffix="."/>
    </layout>
  </citation>
  <bibliography>
    <layout>
      <names variable="author">
        <name name-as-sort-order="all" sort-separator=", "/>
      </names>
      <date variable="issued" prefix=" (" suffix=")."><date-part name="year"/></date>
      <text variable="title" prefix=" " suffix="."/>
    </layout>
  </bibliography>
</style>"#;

/// Title only, no bibliography section.
pub const TITLE_ONLY: &str = r#"<style xmlns="http://purl.org/net/xbiblio/csl" class="note" version="1.0">
  <info>
    <title>Title Only</title>
    <id>http://example.org/styles/title-only</id>
  </info>
  <citation>
    <layout><text variable="title" font-style="italic"/></layout>
  </citation>
</style>"#;

pub fn sample_item() -> ContentItem {
    ContentItem::new("node-1")
        .with_field("title", "Sample Title")
        .with_field("field_author", vec![PersonName::new("Doe", "Jane")])
        .with_field("field_edtf_date_issued", "2020-05-17")
        .with_field("field_csl_type", "book")
}

pub fn helper() -> CitationHelper {
    let repo = MemoryStyleRepository::with_records([
        StyleRecord::new("author_date", "Author Date", AUTHOR_DATE),
        StyleRecord::new("title_only", "Title Only", TITLE_ONLY),
        StyleRecord::new("broken", "Broken", "<style><info>"),
    ]);
    CitationHelper::new(
        Arc::new(repo),
        Arc::new(HayagrivaEngine::new()),
        ItemEncoder::new(&FieldMapping::default()),
    )
}

pub fn picker(block: BlockConfig) -> StylePicker {
    StylePicker::new(Arc::new(helper()), Arc::new(block))
}
