// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sketch upload endpoint.

use crate::error::ApiError;
use crate::services::{blueprint, storage};
use crate::types::{ParseResult, UploadResponse};
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};

/// Client-supplied name and content of the `file` field.
struct UploadedFile {
    name: String,
    data: Vec<u8>,
}

/// Extract file data from multipart request.
async fn extract_file(multipart: &mut Multipart) -> Result<UploadedFile, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        if field_name == "file" {
            let name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await?;
            tracing::debug!(size = bytes.len(), "Extracted file from multipart");
            return Ok(UploadedFile {
                name,
                data: bytes.to_vec(),
            });
        }
    }

    tracing::warn!("No 'file' field found in multipart request");
    Err(ApiError::MissingFile)
}

/// POST /upload - Store a sketch and report the shapes found in it.
///
/// Sketches that cannot be parsed get a fixed fallback shape set instead of
/// an error. STL uploads are stored without parsing.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let file = extract_file(&mut multipart).await?;

    if file.name.is_empty() {
        return Err(ApiError::EmptyFilename);
    }
    if file.data.len() > state.config.max_body_bytes() {
        return Err(ApiError::FileTooLarge {
            max_mb: state.config.max_file_size_mb,
        });
    }

    let extension = storage::sanitize_filename(&file.name)
        .and_then(|name| storage::allowed_extension(&name))
        .ok_or(ApiError::UnsupportedType)?;

    let filename = storage::unique_filename(&extension);
    let path = storage::store(&state.config.upload_dir, &filename, &file.data).await?;
    tracing::info!(original = %file.name, stored = %filename, size = file.data.len(), "upload stored");

    let parse_result = if storage::is_image_extension(&extension) {
        let preview = state.config.preview_path.clone();
        let shapes = tokio::task::spawn_blocking(move || {
            blueprint::parse_or(&path, &preview, blueprint::upload_fallback)
        })
        .await?;
        shapes.into_iter().map(ParseResult::Shape).collect()
    } else {
        vec![ParseResult::stl_note(&filename)]
    };

    Ok(Json(UploadResponse {
        status: "success".to_string(),
        url: state.config.upload_url(&filename),
        filename,
        parse_result,
    }))
}
