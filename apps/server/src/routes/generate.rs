// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STL generation endpoint.

use crate::error::ApiError;
use crate::services::{blueprint, storage};
use crate::types::{GenerateRequest, GenerateResponse};
use crate::AppState;
use axum::{body::Bytes, extract::State, Json};

/// POST /generate_stl - Extrude a stored sketch into a new STL file.
pub async fn generate_stl(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request: GenerateRequest = serde_json::from_slice(&body)?;
    let filename = request
        .filename
        .filter(|name| !name.is_empty())
        .ok_or(ApiError::MissingFilename)?;

    let image = storage::resolve(&state.config.upload_dir, &filename).ok_or(ApiError::NotFound)?;
    if !tokio::fs::metadata(&image)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        return Err(ApiError::NotFound);
    }

    let stl_filename = storage::unique_filename("stl");
    let output = state.config.stl_dir.join(&stl_filename);
    let preview = state.config.preview_path.clone();

    tokio::task::spawn_blocking(move || blueprint::generate_stl(&image, &preview, &output))
        .await??;

    tracing::info!(source = %filename, stl = %stl_filename, "stl generated");

    Ok(Json(GenerateResponse {
        status: "success".to_string(),
        url: state.config.stl_url(&stl_filename),
    }))
}
