// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Unsupported file type")]
    UnsupportedType,

    #[error("No filename provided")]
    MissingFilename,

    #[error("Invalid filename")]
    InvalidFilename,

    #[error("File too large: maximum size is {max_mb} MB")]
    FileTooLarge { max_mb: usize },

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("File not found")]
    NotFound,

    #[error("Mesh generation failed: {0}")]
    Geometry(#[from] planforge_geometry::Error),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
    pub code: &'static str,
}

impl ApiError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::EmptyFilename => (StatusCode::BAD_REQUEST, "EMPTY_FILENAME"),
            ApiError::UnsupportedType => (StatusCode::BAD_REQUEST, "UNSUPPORTED_TYPE"),
            ApiError::MissingFilename => (StatusCode::BAD_REQUEST, "MISSING_FILENAME"),
            ApiError::InvalidFilename => (StatusCode::BAD_REQUEST, "INVALID_FILENAME"),
            ApiError::FileTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE"),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ApiError::InvalidJson(_) => (StatusCode::BAD_REQUEST, "INVALID_JSON"),
            ApiError::Multipart(e) => (e.status(), "MULTIPART_ERROR"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::Geometry(_) => (StatusCode::INTERNAL_SERVER_ERROR, "GEOMETRY_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code, "request failed");
        }

        let body = ErrorResponse {
            status: "fail",
            message: self.to_string(),
            code,
        };

        (status, Json(body)).into_response()
    }
}
