/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! citeblock_core - style records, content items and CSL-JSON encoding.
//!
//! Everything here is engine-agnostic: storing CSL styles, reading content
//! items, and turning their fields into CSL-JSON citation items. Rendering
//! lives in `citeblock_processor`.

pub mod block;
pub mod content;
pub mod edtf;
pub mod encode;
pub mod error;
pub mod item;
pub mod mapping;
pub mod normalizer;
pub mod repository;
pub mod style;
pub mod upload;

pub use block::{BlockConfig, BlockConfigSource};
pub use content::{
    ContentItem, ContentSource, FieldValue, MemoryContentSource, PersonName, YamlContentSource,
};
pub use encode::ItemEncoder;
pub use error::{Result, StoreError};
pub use item::{CitationItem, CslDate, CslName};
pub use mapping::{FieldMapping, VariableKind};
pub use normalizer::DateNormalizer;
pub use repository::{FileStyleRepository, MemoryStyleRepository, SaveStatus, StyleRepository};
pub use style::{inspect_style, machine_name, StyleDefinition, StyleInfo, StyleRecord};
pub use upload::{StyleUpload, StyleUploadForm, UploadError, UploadOutcome, UploadedFile};
