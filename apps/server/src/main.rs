// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PlanForge Server - floor-plan sketch to STL service.
//!
//! # Endpoints
//!
//! - `GET /` - Service information
//! - `GET /api/v1/health` - Health check
//! - `POST /login` - Credential check, returns the user's role
//! - `POST /upload` - Store a sketch and return the detected shapes
//! - `POST /generate_stl` - Extrude a stored sketch into an STL file
//! - `GET /uploads/:file` - Stored uploads
//! - `GET /generated_stls/:file` - Generated STL files

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod config;
mod error;
mod routes;
mod services;
mod types;

use config::Config;
use services::{Authenticator, StaticCredentials};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub auth: Arc<dyn Authenticator>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug,planforge_server=debug".into());
    if config.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).pretty().init();
    }

    let credentials =
        StaticCredentials::parse(&config.auth_users).context("invalid AUTH_USERS")?;

    tracing::info!(
        port = config.port,
        upload_dir = %config.upload_dir.display(),
        stl_dir = %config.stl_dir.display(),
        max_file_size_mb = config.max_file_size_mb,
        users = credentials.user_count(),
        "Starting PlanForge Server"
    );

    for dir in [&config.upload_dir, &config.stl_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("cannot create {}", dir.display()))?;
    }

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        auth: Arc::new(credentials),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Build the router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        // Health check
        .route("/api/v1/health", get(routes::health::check))
        .route("/login", post(routes::login::login))
        .route("/upload", post(routes::upload::upload))
        .route("/generate_stl", post(routes::generate::generate_stl))
        // Static downloads
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .nest_service("/generated_stls", ServeDir::new(&config.stl_dir))
        // Middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes()))
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
