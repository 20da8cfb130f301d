// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Directory holding uploaded sketches.
    pub upload_dir: PathBuf,
    /// Directory holding generated STL files.
    pub stl_dir: PathBuf,
    /// Where the annotated preview of the last parse is written.
    pub preview_path: PathBuf,
    /// Maximum upload size in MB.
    pub max_file_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Base of the download URLs handed back to clients.
    pub public_base_url: String,
    /// Allowed CORS origins (comma-separated, or "*" for all in development).
    pub cors_origins: Vec<String>,
    /// `user:password:role` entries, comma-separated.
    pub auth_users: String,
    /// Emit JSON log lines instead of human-readable ones.
    pub json_logs: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".into())
                .parse()
                .unwrap_or(5000),
            upload_dir: std::env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "uploads".into())
                .into(),
            stl_dir: std::env::var("STL_DIR")
                .unwrap_or_else(|_| "generated_stls".into())
                .into(),
            preview_path: std::env::var("PREVIEW_PATH")
                .unwrap_or_else(|_| "uploads/preview.jpg".into())
                .into(),
            max_file_size_mb: std::env::var("MAX_FILE_SIZE_MB")
                .unwrap_or_else(|_| "50".into())
                .parse()
                .unwrap_or(50),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".into())
                .parse()
                .unwrap_or(120),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:5000".into())
                .trim_end_matches('/')
                .to_string(),
            cors_origins: split_list(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
            ),
            auth_users: std::env::var("AUTH_USERS")
                .unwrap_or_else(|_| "admin:admin123:admin,coreuser:core123:core".into()),
            json_logs: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Public URL of an uploaded file.
    pub fn upload_url(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.public_base_url, filename)
    }

    /// Public URL of a generated STL file.
    pub fn stl_url(&self, filename: &str) -> String {
        format!("{}/generated_stls/{}", self.public_base_url, filename)
    }

    /// Upload limit in bytes.
    pub fn max_body_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(
            split_list(" http://a , ,http://b"),
            vec!["http://a".to_string(), "http://b".to_string()]
        );
    }

    #[test]
    fn test_urls() {
        let config = Config {
            public_base_url: "http://example.test".into(),
            ..Config::from_env()
        };
        assert_eq!(config.upload_url("a.png"), "http://example.test/uploads/a.png");
        assert_eq!(config.stl_url("b.stl"), "http://example.test/generated_stls/b.stl");
    }
}
