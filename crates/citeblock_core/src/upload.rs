/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Creating and updating style records from uploaded CSL files.
//!
//! The form stores whatever XML it is given. Only the file extension, the
//! encoding and the presence of content are checked here; a style the engine
//! cannot read fails when it is first rendered.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::error::StoreError;
use crate::repository::{SaveStatus, StyleRepository};
use crate::style::{inspect_style, is_machine_name, machine_name, StyleRecord};

/// File extensions accepted for style uploads.
pub const ALLOWED_EXTENSIONS: &[&str] = &["csl", "xml"];

/// Where the admin is sent after a successful save.
pub const COLLECTION_PATH: &str = "/admin/styles";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("only files with the following extensions are allowed: {}", ALLOWED_EXTENSIONS.join(" "))]
    UnsupportedExtension(String),

    #[error("the uploaded file {0} is empty")]
    EmptyFile(String),

    #[error("the uploaded file {0} is not valid UTF-8")]
    NotUtf8(String),

    #[error("a label is required")]
    MissingLabel,

    #[error("a CSL file is required")]
    MissingFile,

    #[error("invalid machine name: {0:?}")]
    InvalidId(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A file received from the upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }

    /// Check the extension and decode the content.
    fn into_xml(self) -> Result<String, UploadError> {
        match self.extension() {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => return Err(UploadError::UnsupportedExtension(self.name)),
        }
        if self.bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(UploadError::EmptyFile(self.name));
        }
        let xml = String::from_utf8(self.bytes).map_err(|_| UploadError::NotUtf8(self.name))?;
        Ok(match xml.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_string(),
            None => xml,
        })
    }
}

/// Submitted values of the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleUpload {
    /// Machine name. Fixed when editing; derived from the label when empty.
    pub id: Option<String>,
    pub label: String,
    /// Optional when editing an existing style.
    pub file: Option<UploadedFile>,
}

impl StyleUpload {
    pub fn new(label: impl Into<String>, file: UploadedFile) -> Self {
        Self {
            id: None,
            label: label.into(),
            file: Some(file),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub record_id: String,
    pub label: String,
    pub status: SaveStatus,
    /// Status message for the admin.
    pub message: String,
    pub redirect: String,
}

/// The style add/edit form.
pub struct StyleUploadForm {
    repository: Arc<dyn StyleRepository>,
}

impl StyleUploadForm {
    pub fn new(repository: Arc<dyn StyleRepository>) -> Self {
        Self { repository }
    }

    pub fn submit(&self, upload: StyleUpload) -> Result<UploadOutcome, UploadError> {
        let xml = upload.file.map(UploadedFile::into_xml).transpose()?;

        let mut label = upload.label.trim().to_string();
        if label.is_empty() {
            label = xml
                .as_deref()
                .and_then(|x| inspect_style(x).ok())
                .map(|info| info.title)
                .unwrap_or_default();
        }

        let id = match upload.id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => id.to_string(),
            None if label.is_empty() => return Err(UploadError::MissingLabel),
            None => machine_name(&label),
        };
        if !is_machine_name(&id) {
            return Err(UploadError::InvalidId(id));
        }

        let existing = self.repository.load(&id)?;
        if label.is_empty() {
            label = match &existing {
                Some(record) => record.label.clone(),
                None => return Err(UploadError::MissingLabel),
            };
        }
        let file_content = match (xml, existing) {
            (Some(xml), _) => xml,
            (None, Some(record)) => record.file_content,
            (None, None) => return Err(UploadError::MissingFile),
        };

        let status = self
            .repository
            .save(StyleRecord::new(&id, &label, file_content))?;
        let message = match status {
            SaveStatus::New => format!("Created new citation style {}.", label),
            SaveStatus::Updated => format!("Updated citation style {}.", label),
        };
        tracing::info!(id = %id, ?status, "{}", message);

        Ok(UploadOutcome {
            record_id: id,
            label,
            status,
            message,
            redirect: COLLECTION_PATH.to_string(),
        })
    }
}
