/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! HTTP routes: style administration, the JSON listing and the picker block.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use citeblock_core::upload::COLLECTION_PATH;
use citeblock_core::{ContentItem, SaveStatus, StoreError, StyleUpload, UploadOutcome, UploadedFile};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::state::AppState;
use crate::views::{self, Notice, StyleForm};

type SharedState = Arc<AppState>;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    style_count: usize,
}

/// Notices carried over from a redirect.
#[derive(Debug, Default, Deserialize)]
struct ListingQuery {
    created: Option<String>,
    updated: Option<String>,
    deleted: Option<String>,
}

impl ListingQuery {
    fn notice(&self) -> Option<Notice<'_>> {
        if let Some(label) = &self.created {
            return Some(Notice::Created(label));
        }
        if let Some(label) = &self.updated {
            return Some(Notice::Updated(label));
        }
        self.deleted.as_deref().map(Notice::Deleted)
    }
}

#[derive(Debug, Deserialize)]
struct SelectionForm {
    csl_list: Option<String>,
}

async fn health(State(state): State<SharedState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok",
        style_count: state.repository.load_multiple()?.len(),
    }))
}

async fn list_styles(
    State(state): State<SharedState>,
    Query(query): Query<ListingQuery>,
) -> Result<Html<String>> {
    let styles = state.repository.load_multiple()?;
    Ok(Html(views::style_list(&styles, query.notice())))
}

async fn api_styles(State(state): State<SharedState>) -> Result<Json<IndexMap<String, String>>> {
    Ok(Json(state.helper.list_styles()?))
}

async fn add_form() -> Html<String> {
    Html(views::style_form(&StyleForm::default()))
}

async fn add_style(State(state): State<SharedState>, multipart: Multipart) -> Result<Response> {
    let upload = read_upload(multipart).await?;
    submit(&state, upload, None)
}

async fn edit_form(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let style = state
        .repository
        .load(&id)?
        .ok_or(StoreError::StyleNotFound(id))?;
    Ok(Html(views::style_form(&StyleForm {
        id: Some(&style.id),
        label: &style.label,
        error: None,
    })))
}

async fn edit_style(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Response> {
    if !state.repository.exists(&id)? {
        return Err(StoreError::StyleNotFound(id).into());
    }
    let upload = read_upload(multipart).await?.with_id(&id);
    submit(&state, upload, Some(&id))
}

async fn delete_confirm(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let style = state
        .repository
        .load(&id)?
        .ok_or(StoreError::StyleNotFound(id))?;
    Ok(Html(views::delete_confirm(&style)))
}

async fn delete_style(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let style = state.repository.delete(&id)?;
    info!(id = %style.id, "Deleted citation style {}.", style.label);
    Ok(Redirect::to(&notice_url("deleted", &style.label)))
}

async fn citation_block(
    State(state): State<SharedState>,
    Path(item_id): Path<String>,
) -> Result<Html<String>> {
    let item = load_item(&state, item_id)?;
    let view = state.picker.build(&item)?;
    Ok(Html(views::page("Citation", &views::picker_block(&view))))
}

/// Re-render after a selection change. The body replaces the
/// `formatted-citation` region.
async fn citation_fragment(
    State(state): State<SharedState>,
    Path(item_id): Path<String>,
    Form(form): Form<SelectionForm>,
) -> Result<Html<String>> {
    let item = load_item(&state, item_id)?;
    let picked = state.picker.select(&item, form.csl_list.as_deref());
    Ok(Html(picked.fragment()))
}

fn load_item(state: &AppState, id: String) -> Result<ContentItem> {
    match state.items.load_item(&id)? {
        Some(item) => Ok(item),
        None => Err(StoreError::ItemNotFound(id).into()),
    }
}

fn notice_url(kind: &str, label: &str) -> String {
    format!("{}?{}={}", COLLECTION_PATH, kind, urlencoding::encode(label))
}

fn submit(state: &AppState, upload: StyleUpload, editing: Option<&str>) -> Result<Response> {
    let label = upload.label.clone();
    match state.upload.submit(upload) {
        Ok(outcome) => Ok(redirect_after_save(&outcome).into_response()),
        Err(e) => {
            let err = ServerError::from(e);
            if err.status() != StatusCode::BAD_REQUEST {
                return Err(err);
            }
            let message = err.to_string();
            let form = views::style_form(&StyleForm {
                id: editing,
                label: &label,
                error: Some(&message),
            });
            Ok((StatusCode::BAD_REQUEST, Html(form)).into_response())
        }
    }
}

fn redirect_after_save(outcome: &UploadOutcome) -> Redirect {
    let kind = match outcome.status {
        SaveStatus::New => "created",
        SaveStatus::Updated => "updated",
    };
    Redirect::to(&notice_url(kind, &outcome.label))
}

fn multipart_error(e: MultipartError) -> ServerError {
    ServerError::BadRequest(e.body_text())
}

/// Collect the `id`, `label` and `file` fields. An untouched file input
/// arrives with no name and no content and counts as no file.
async fn read_upload(mut multipart: Multipart) -> Result<StyleUpload> {
    let mut upload = StyleUpload::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "id" => upload.id = Some(field.text().await.map_err(multipart_error)?),
            "label" => upload.label = field.text().await.map_err(multipart_error)?,
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if !(file_name.is_empty() && bytes.is_empty()) {
                    upload.file = Some(UploadedFile::new(file_name, bytes.to_vec()));
                }
            }
            _ => {}
        }
    }
    Ok(upload)
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/admin/styles", get(list_styles))
        .route("/admin/styles/add", get(add_form).post(add_style))
        .route("/admin/styles/{id}/edit", get(edit_form).post(edit_style))
        .route(
            "/admin/styles/{id}/delete",
            get(delete_confirm).post(delete_style),
        )
        .route("/api/styles", get(api_styles))
        .route(
            "/items/{item}/citation",
            get(citation_block).post(citation_fragment),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to `config.server.bind` and serve until the process is stopped.
pub async fn serve(config: &Config) -> Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let listener = TcpListener::bind(&config.server.bind).await?;
    info!(
        "citeblock listening on http://{} (styles in {})",
        listener.local_addr()?,
        config.storage.styles_dir.display()
    );
    axum::serve(listener, router(state)).await?;
    Ok(())
}
