// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub message: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "planforge-server",
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        message: "PlanForge backend is running!",
        service: "planforge-server",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            EndpointInfo {
                method: "GET",
                path: "/api/v1/health",
                description: "Health check endpoint",
            },
            EndpointInfo {
                method: "POST",
                path: "/login",
                description: "Check credentials and return the user's role",
            },
            EndpointInfo {
                method: "POST",
                path: "/upload",
                description: "Store a sketch (multipart field `file`) and parse it",
            },
            EndpointInfo {
                method: "POST",
                path: "/generate_stl",
                description: "Extrude a stored sketch into an STL file",
            },
            EndpointInfo {
                method: "GET",
                path: "/uploads/:file",
                description: "Download a stored upload",
            },
            EndpointInfo {
                method: "GET",
                path: "/generated_stls/:file",
                description: "Download a generated STL file",
            },
        ],
    })
}
