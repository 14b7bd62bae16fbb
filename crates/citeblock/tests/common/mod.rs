/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use citeblock::{router, AppState, Config};
use citeblock_core::{
    BlockConfig, CitationItem, ContentItem, MemoryContentSource, MemoryStyleRepository,
    StyleDefinition, StyleRecord,
};
use citeblock_processor::{CitationEngine, RenderError, RenderMode};

pub const BOUNDARY: &str = "citeblock-test-boundary";

pub fn style_xml(title: &str) -> String {
    format!(
        r#"<style xmlns="http://purl.org/net/xbiblio/csl" class="in-text" version="1.0">
  <info><title>{}</title></info>
  <citation><layout><text variable="title"/></layout></citation>
</style>"#,
        title
    )
}

/// Writes the style id, item type and title instead of running a CSL processor.
pub struct LabelEngine;

impl CitationEngine for LabelEngine {
    fn render(
        &self,
        items: &[CitationItem],
        style: &StyleDefinition,
        _mode: RenderMode,
    ) -> Result<String, RenderError> {
        let item = &items[0];
        Ok(format!(
            "<p>{} [{}] {}</p>",
            style.id,
            item.item_type.as_deref().unwrap_or_default(),
            item.title.as_deref().unwrap_or_default()
        ))
    }
}

pub fn sample_item() -> ContentItem {
    ContentItem::new("node-1")
        .with_field("title", "Sample Title")
        .with_field("field_csl_type", "book")
}

/// A router over two stored styles (`chicago` first) with `apa` as the
/// configured default.
pub fn app() -> (Arc<MemoryStyleRepository>, Router) {
    app_with_engine(Arc::new(LabelEngine))
}

pub fn app_with_engine(engine: Arc<dyn CitationEngine>) -> (Arc<MemoryStyleRepository>, Router) {
    let repository = Arc::new(MemoryStyleRepository::with_records([
        StyleRecord::new("chicago", "Chicago", style_xml("Chicago Manual of Style")),
        StyleRecord::new("apa", "APA", style_xml("American Psychological Association")),
    ]));
    let mut config = Config::default();
    config.block = BlockConfig::new(Some("apa"), None);

    let state = AppState::new(
        &config,
        repository.clone(),
        Arc::new(MemoryContentSource::new([sample_item()])),
        engine,
    )
    .unwrap();
    (repository, router(Arc::new(state)))
}

/// A multipart body with text fields and an optional `file` part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str)>) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    if let Some((file_name, content)) = file {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

pub fn multipart_request(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
