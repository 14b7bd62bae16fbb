/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Style lookup, item encoding and rendering behind one facade.

use std::sync::Arc;

use citeblock_core::{
    CitationItem, ContentItem, ItemEncoder, StoreError, StyleDefinition, StyleRepository,
};
use indexmap::IndexMap;

use crate::engine::{CitationEngine, RenderMode};
use crate::error::RenderError;
use crate::markup::escape_html;

/// The result of a render: markup, or a message to show in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(String),
    Failed(String),
}

impl RenderOutcome {
    /// HTML for the citation region. Failure messages are escaped text.
    pub fn markup(&self) -> String {
        match self {
            RenderOutcome::Rendered(html) => html.clone(),
            RenderOutcome::Failed(message) => escape_html(message),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RenderOutcome::Failed(_))
    }
}

impl From<Result<String, RenderError>> for RenderOutcome {
    fn from(result: Result<String, RenderError>) -> Self {
        match result {
            Ok(html) => RenderOutcome::Rendered(html),
            Err(e) => RenderOutcome::Failed(e.to_string()),
        }
    }
}

pub struct CitationHelper {
    repository: Arc<dyn StyleRepository>,
    engine: Arc<dyn CitationEngine>,
    encoder: ItemEncoder,
    mode: RenderMode,
}

impl CitationHelper {
    pub fn new(
        repository: Arc<dyn StyleRepository>,
        engine: Arc<dyn CitationEngine>,
        encoder: ItemEncoder,
    ) -> Self {
        Self {
            repository,
            engine,
            encoder,
            mode: RenderMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Every stored style as `id => label`, in storage order.
    pub fn list_styles(&self) -> Result<IndexMap<String, String>, StoreError> {
        Ok(self
            .repository
            .load_multiple()?
            .into_iter()
            .map(|record| (record.id, record.label))
            .collect())
    }

    pub fn load_style(&self, id: &str) -> Result<StyleDefinition, StoreError> {
        self.repository
            .load(id)?
            .map(|record| record.definition())
            .ok_or_else(|| StoreError::StyleNotFound(id.to_string()))
    }

    pub fn encode_item(&self, item: &ContentItem) -> CitationItem {
        self.encoder.encode(item)
    }

    /// Render with the helper's mode. Engine errors never escape.
    pub fn render(&self, items: &[CitationItem], style: &StyleDefinition) -> RenderOutcome {
        let result = self.engine.render(items, style, self.mode);
        if let Err(e) = &result {
            tracing::warn!(style = %style.id, error = %e, "citation render failed");
        }
        result.into()
    }

    /// Encode, apply the fallback type, load the style and render.
    pub fn render_item(
        &self,
        item: &ContentItem,
        style_id: &str,
        fallback_type: Option<&str>,
    ) -> RenderOutcome {
        let mut citation = self.encode_item(item);
        if let Some(fallback) = fallback_type {
            citation.ensure_type(fallback);
        }
        if !citation.has_type() {
            tracing::warn!(item = %item.id, "no CSL type for item");
            return RenderOutcome::Failed(RenderError::MissingType(item.id.clone()).to_string());
        }

        let style = match self.load_style(style_id) {
            Ok(style) => style,
            Err(e) => {
                tracing::warn!(style = %style_id, error = %e, "style unavailable");
                return RenderOutcome::Failed(e.to_string());
            }
        };
        self.render(&[citation], &style)
    }
}
