/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use std::sync::Arc;

use citeblock_core::{
    BlockConfigSource, ContentSource, DateNormalizer, FileStyleRepository, ItemEncoder,
    StyleRepository, StyleUploadForm, YamlContentSource,
};
use citeblock_processor::{CitationEngine, CitationHelper, HayagrivaEngine, StylePicker};

use crate::config::Config;
use crate::error::{Result, ServerError};

/// Collaborators shared by every request.
pub struct AppState {
    pub repository: Arc<dyn StyleRepository>,
    pub items: Arc<dyn ContentSource>,
    pub helper: Arc<CitationHelper>,
    pub picker: StylePicker,
    pub upload: StyleUploadForm,
}

impl AppState {
    /// Directory-backed storage and the hayagriva engine, as configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let repository = Arc::new(FileStyleRepository::new(&config.storage.styles_dir));
        let items = Arc::new(YamlContentSource::new(&config.storage.items_dir));
        Self::new(config, repository, items, Arc::new(HayagrivaEngine::new()))
    }

    pub fn new(
        config: &Config,
        repository: Arc<dyn StyleRepository>,
        items: Arc<dyn ContentSource>,
        engine: Arc<dyn CitationEngine>,
    ) -> Result<Self> {
        let normalizer =
            DateNormalizer::from_timezone_name(&config.site.timezone).map_err(ServerError::Config)?;
        let encoder = ItemEncoder::new(&config.mapping).with_normalizer(normalizer);
        let helper = Arc::new(
            CitationHelper::new(repository.clone(), engine, encoder).with_mode(config.render.mode),
        );
        let block: Arc<dyn BlockConfigSource> = Arc::new(config.block.clone());

        Ok(Self {
            picker: StylePicker::new(helper.clone(), block),
            upload: StyleUploadForm::new(repository.clone()),
            repository,
            items,
            helper,
        })
    }
}
