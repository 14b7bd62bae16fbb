/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! citeblock - a small server for managing CSL styles and showing formatted
//! citations for content items.

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod views;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::{router, serve};
pub use state::AppState;
