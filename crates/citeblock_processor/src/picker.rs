/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! The citation style picker.
//!
//! A picker shows a select list of stored styles and the citation of the
//! current content item rendered with the selected one. Every change of the
//! selection is an independent render; the browser swaps the returned
//! fragment into the `formatted-citation` region.

use std::sync::Arc;

use citeblock_core::{BlockConfig, BlockConfigSource, ContentItem, StoreError};
use indexmap::IndexMap;
use serde::Serialize;

use crate::helper::{CitationHelper, RenderOutcome};
use crate::markup::escape_html;

/// Shown in place of a citation until a style is chosen.
pub const PROMPT: &str = "Select CSL";
/// Label of the empty option at the top of the list.
pub const EMPTY_OPTION: &str = "- Select csl -";
pub const ARIA_LABEL: &str = "Select CSL";
/// Id of the element whose content a change replaces.
pub const WRAPPER_ID: &str = "formatted-citation";
/// Form field carrying the selected style id.
pub const FIELD_NAME: &str = "csl_list";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PickerState {
    Unselected,
    Selected { style_id: String },
    Rendering { style_id: String },
    Rendered { style_id: String, html: String },
    Errored { style_id: String, message: String },
}

impl PickerState {
    /// Select a style; blank ids leave the picker unselected.
    pub fn select(selection: Option<&str>) -> Self {
        match selection.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => PickerState::Selected {
                style_id: id.to_string(),
            },
            None => PickerState::Unselected,
        }
    }

    /// `Selected` moves to `Rendering`; other states are unchanged.
    pub fn begin(self) -> Self {
        match self {
            PickerState::Selected { style_id } => PickerState::Rendering { style_id },
            other => other,
        }
    }

    /// `Rendering` settles into `Rendered` or `Errored`.
    pub fn finish(self, outcome: RenderOutcome) -> Self {
        match (self, outcome) {
            (PickerState::Rendering { style_id }, RenderOutcome::Rendered(html)) => {
                PickerState::Rendered { style_id, html }
            }
            (PickerState::Rendering { style_id }, RenderOutcome::Failed(message)) => {
                PickerState::Errored { style_id, message }
            }
            (other, _) => other,
        }
    }

    pub fn style_id(&self) -> Option<&str> {
        match self {
            PickerState::Unselected => None,
            PickerState::Selected { style_id }
            | PickerState::Rendering { style_id }
            | PickerState::Rendered { style_id, .. }
            | PickerState::Errored { style_id, .. } => Some(style_id),
        }
    }

    /// Markup for the `formatted-citation` region.
    pub fn fragment(&self) -> String {
        match self {
            PickerState::Rendered { html, .. } => html.clone(),
            PickerState::Errored { message, .. } => escape_html(message),
            _ => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Everything needed to draw the picker block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerView {
    pub item_id: String,
    /// The empty option first, then every stored style.
    pub options: Vec<SelectOption>,
    pub selected: Option<String>,
    pub state: PickerState,
}

impl PickerView {
    /// The initial content of the citation region.
    pub fn fragment(&self) -> String {
        match self.state {
            PickerState::Unselected => PROMPT.to_string(),
            _ => self.state.fragment(),
        }
    }
}

/// The style to preselect: the configured default while it still exists,
/// otherwise the first stored style.
pub fn resolve_default_style(
    block: &BlockConfig,
    styles: &IndexMap<String, String>,
) -> Option<String> {
    if let Some(configured) = block.default_csl() {
        if styles.contains_key(configured) {
            return Some(configured.to_string());
        }
        tracing::debug!(configured, "configured default style no longer exists");
    }
    styles.keys().next().cloned()
}

pub struct StylePicker {
    helper: Arc<CitationHelper>,
    block: Arc<dyn BlockConfigSource>,
}

impl StylePicker {
    pub fn new(helper: Arc<CitationHelper>, block: Arc<dyn BlockConfigSource>) -> Self {
        Self { helper, block }
    }

    /// Build the picker for an item, rendering the default style if there is one.
    pub fn build(&self, item: &ContentItem) -> Result<PickerView, StoreError> {
        let styles = self.helper.list_styles()?;
        let block = self.block.citation_block();
        let selected = resolve_default_style(&block, &styles);

        let state = self.render(item, selected.as_deref(), &block);

        let mut options = vec![SelectOption {
            value: String::new(),
            label: EMPTY_OPTION.to_string(),
        }];
        options.extend(
            styles
                .into_iter()
                .map(|(value, label)| SelectOption { value, label }),
        );

        Ok(PickerView {
            item_id: item.id.clone(),
            options,
            selected,
            state,
        })
    }

    /// Handle a selection change.
    pub fn select(&self, item: &ContentItem, selection: Option<&str>) -> PickerState {
        self.render(item, selection, &self.block.citation_block())
    }

    fn render(&self, item: &ContentItem, selection: Option<&str>, block: &BlockConfig) -> PickerState {
        let state = PickerState::select(selection).begin();
        let Some(style_id) = state.style_id() else {
            return state;
        };
        let outcome = self
            .helper
            .render_item(item, style_id, block.default_csl_type());
        state.finish(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citeblock_core::{
        CitationItem, FieldMapping, ItemEncoder, MemoryStyleRepository, StyleDefinition,
        StyleRecord,
    };

    use crate::engine::{CitationEngine, RenderMode};
    use crate::error::RenderError;

    struct LabelEngine;

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

    fn styles(ids: &[&str]) -> IndexMap<String, String> {
        ids.iter().map(|id| (id.to_string(), id.to_uppercase())).collect()
    }

    fn picker(ids: &[&str], block: BlockConfig) -> StylePicker {
        let repo = MemoryStyleRepository::with_records(
            ids.iter().map(|id| StyleRecord::new(*id, id.to_uppercase(), "<style/>")),
        );
        let helper = CitationHelper::new(
            Arc::new(repo),
            Arc::new(LabelEngine),
            ItemEncoder::new(&FieldMapping::default()),
        );
        StylePicker::new(Arc::new(helper), Arc::new(block))
    }

    fn item() -> ContentItem {
        ContentItem::new("node-1").with_field("title", "Sample Title")
    }

    #[test]
    fn configured_default_wins_while_it_exists() {
        let block = BlockConfig::new(Some("apa"), None);
        assert_eq!(
            resolve_default_style(&block, &styles(&["mla", "apa"])),
            Some("apa".into())
        );
    }

    #[test]
    fn stale_default_falls_back_to_first_style() {
        let block = BlockConfig::new(Some("chicago"), None);
        assert_eq!(
            resolve_default_style(&block, &styles(&["mla", "apa"])),
            Some("mla".into())
        );
        assert_eq!(resolve_default_style(&block, &styles(&[])), None);
        assert_eq!(
            resolve_default_style(&BlockConfig::default(), &styles(&["apa"])),
            Some("apa".into())
        );
    }

    #[test]
    fn build_renders_the_default_inline() {
        let picker = picker(&["mla", "apa"], BlockConfig::new(Some("apa"), Some("book")));
        let view = picker.build(&item()).unwrap();

        assert_eq!(view.selected.as_deref(), Some("apa"));
        assert_eq!(view.options.len(), 3);
        assert_eq!(view.options[0].label, EMPTY_OPTION);
        assert_eq!(view.options[1].value, "mla");
        assert_eq!(view.fragment(), "<p>apa [book] Sample Title</p>");
    }

    #[test]
    fn build_without_styles_shows_prompt() {
        let view = picker(&[], BlockConfig::default()).build(&item()).unwrap();
        assert_eq!(view.selected, None);
        assert_eq!(view.state, PickerState::Unselected);
        assert_eq!(view.fragment(), PROMPT);
    }

    #[test]
    fn empty_selection_yields_empty_fragment() {
        let picker = picker(&["mla"], BlockConfig::new(None, Some("book")));
        for selection in [None, Some(""), Some("  ")] {
            let state = picker.select(&item(), selection);
            assert_eq!(state, PickerState::Unselected);
            assert_eq!(state.fragment(), "");
        }
    }

    #[test]
    fn change_rerenders_with_the_new_style() {
        let picker = picker(&["mla", "apa"], BlockConfig::new(Some("apa"), Some("book")));
        let state = picker.select(&item(), Some("mla"));
        assert_eq!(
            state,
            PickerState::Rendered {
                style_id: "mla".into(),
                html: "<p>mla [book] Sample Title</p>".into(),
            }
        );
    }

    #[test]
    fn missing_type_is_shown_as_an_error() {
        let picker = picker(&["mla"], BlockConfig::default());
        let state = picker.select(&item(), Some("mla"));
        assert!(matches!(state, PickerState::Errored { .. }));
        assert_eq!(state.fragment(), "citation item node-1 has no CSL type");
    }

    #[test]
    fn state_machine_ignores_out_of_order_events() {
        let unselected = PickerState::Unselected.begin();
        assert_eq!(unselected, PickerState::Unselected);

        let selected = PickerState::select(Some("apa"));
        let unchanged = selected
            .clone()
            .finish(RenderOutcome::Rendered("<p/>".into()));
        assert_eq!(unchanged, selected);
    }
}
