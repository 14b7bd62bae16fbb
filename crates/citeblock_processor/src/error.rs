/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

use thiserror::Error;

/// Why a citation could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("style {id} could not be parsed: {message}")]
    StyleParse { id: String, message: String },

    #[error("style {id} depends on {parent}, which is not available")]
    MissingParent { id: String, parent: String },

    #[error("style {0} not found")]
    StyleNotFound(String),

    #[error("citation item {id} is invalid: {message}")]
    Item { id: String, message: String },

    #[error("citation item {0} has no CSL type")]
    MissingType(String),

    #[error("citation engine failed: {0}")]
    Engine(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
