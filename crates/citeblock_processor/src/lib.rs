/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! citeblock_processor - rendering citations for content items.
//!
//! The [`CitationHelper`] ties the style repository, the item encoder and a
//! [`CitationEngine`] together; the [`StylePicker`] drives it from a style
//! select list.

pub mod engine;
pub mod error;
pub mod helper;
pub mod markup;
pub mod picker;

pub use engine::{CitationEngine, HayagrivaEngine, RenderMode};
pub use error::RenderError;
pub use helper::{CitationHelper, RenderOutcome};
pub use markup::escape_html;
pub use picker::{resolve_default_style, PickerState, PickerView, SelectOption, StylePicker};
