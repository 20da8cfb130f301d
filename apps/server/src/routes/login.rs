// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Login endpoint.

use crate::error::ApiError;
use crate::types::{LoginRequest, LoginResponse};
use crate::AppState;
use axum::{body::Bytes, extract::State, Json};

/// POST /login - Verify credentials.
///
/// The body is read as JSON whatever its content type.
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoginResponse>, ApiError> {
    let request: LoginRequest = serde_json::from_slice(&body)?;

    match state.auth.authenticate(&request.username, &request.password) {
        Some(role) => {
            tracing::info!(username = %request.username, role = %role, "login");
            Ok(Json(LoginResponse {
                status: "success".to_string(),
                role,
            }))
        }
        None => {
            tracing::info!(username = %request.username, "login rejected");
            Err(ApiError::Unauthorized)
        }
    }
}
