/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Storage for CSL style records.
//!
//! Both repositories keep records in insertion order; updating a record keeps
//! its position. The directory-backed store writes a `styles.yaml` manifest
//! (ids and labels, in order) next to one `<id>.csl` file per style.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::style::{is_machine_name, StyleRecord};

/// Whether a save created a record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    New,
    Updated,
}

/// CRUD access to style records.
pub trait StyleRepository: Send + Sync {
    /// All records, in storage order.
    fn load_multiple(&self) -> Result<Vec<StyleRecord>>;

    fn load(&self, id: &str) -> Result<Option<StyleRecord>>;

    /// Existence check that does not need the style content.
    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.load(id)?.is_some())
    }

    fn save(&self, record: StyleRecord) -> Result<SaveStatus>;

    /// Remove a record, returning it.
    fn delete(&self, id: &str) -> Result<StyleRecord>;
}

/// In-memory repository, mostly for tests and ephemeral servers.
#[derive(Debug, Default)]
pub struct MemoryStyleRepository {
    records: RwLock<IndexMap<String, StyleRecord>>,
}

impl MemoryStyleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = StyleRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

impl StyleRepository for MemoryStyleRepository {
    fn load_multiple(&self) -> Result<Vec<StyleRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.values().cloned().collect())
    }

    fn load(&self, id: &str) -> Result<Option<StyleRecord>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(id).cloned())
    }

    fn exists(&self, id: &str) -> Result<bool> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.contains_key(id))
    }

    fn save(&self, record: StyleRecord) -> Result<SaveStatus> {
        if !is_machine_name(&record.id) {
            return Err(StoreError::InvalidId(record.id));
        }
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        match records.insert(record.id.clone(), record) {
            Some(_) => Ok(SaveStatus::Updated),
            None => Ok(SaveStatus::New),
        }
    }

    fn delete(&self, id: &str) -> Result<StyleRecord> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        records
            .shift_remove(id)
            .ok_or_else(|| StoreError::StyleNotFound(id.to_string()))
    }
}

const MANIFEST: &str = "styles.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestEntry {
    id: String,
    label: String,
}

/// Repository backed by a directory of `.csl` files plus an ordered manifest.
#[derive(Debug)]
pub struct FileStyleRepository {
    dir: PathBuf,
    lock: RwLock<()>,
}

impl FileStyleRepository {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            lock: RwLock::new(()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST)
    }

    fn style_path(&self, id: &str) -> Result<PathBuf> {
        if !is_machine_name(id) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(format!("{}.csl", id)))
    }

    fn read_manifest(&self) -> Result<Vec<ManifestEntry>> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    fn write_manifest(&self, entries: &[ManifestEntry]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_yaml::to_string(entries)?;
        // Readers never see a partially written manifest.
        let tmp = self.dir.join(format!("{}.tmp", MANIFEST));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, self.manifest_path())?;
        Ok(())
    }

    /// `None` when the manifest lists a style whose file is gone.
    fn read_record(&self, entry: &ManifestEntry) -> Result<Option<StyleRecord>> {
        let path = self.style_path(&entry.id)?;
        match fs::read_to_string(&path) {
            Ok(file_content) => Ok(Some(StyleRecord::new(&entry.id, &entry.label, file_content))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(id = %entry.id, path = %path.display(), "style file missing, skipping");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl StyleRepository for FileStyleRepository {
    fn load_multiple(&self) -> Result<Vec<StyleRecord>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        let mut records = Vec::new();
        for entry in self.read_manifest()? {
            records.extend(self.read_record(&entry)?);
        }
        Ok(records)
    }

    fn load(&self, id: &str) -> Result<Option<StyleRecord>> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        match self.read_manifest()?.iter().find(|e| e.id == id) {
            Some(entry) => self.read_record(entry),
            None => Ok(None),
        }
    }

    fn exists(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_manifest()?.iter().any(|e| e.id == id))
    }

    fn save(&self, record: StyleRecord) -> Result<SaveStatus> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let path = self.style_path(&record.id)?;
        let mut manifest = self.read_manifest()?;

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, &record.file_content)?;

        let status = match manifest.iter_mut().find(|e| e.id == record.id) {
            Some(entry) => {
                entry.label = record.label.clone();
                SaveStatus::Updated
            }
            None => {
                manifest.push(ManifestEntry {
                    id: record.id.clone(),
                    label: record.label.clone(),
                });
                SaveStatus::New
            }
        };
        self.write_manifest(&manifest)?;
        tracing::debug!(id = %record.id, ?status, "saved style record");
        Ok(status)
    }

    fn delete(&self, id: &str) -> Result<StyleRecord> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut manifest = self.read_manifest()?;
        let pos = manifest
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::StyleNotFound(id.to_string()))?;

        let entry = manifest.remove(pos);
        let record = self
            .read_record(&entry)?
            .unwrap_or_else(|| StyleRecord::new(&entry.id, &entry.label, ""));
        self.write_manifest(&manifest)?;
        match fs::remove_file(self.style_path(id)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
            _ => {}
        }
        tracing::debug!(id = %record.id, "deleted style record");
        Ok(record)
    }
}
