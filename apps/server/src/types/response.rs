// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use planforge_geometry::Shape;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    pub role: String,
}

/// Upload response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    /// Stored name, used later with `/generate_stl`.
    pub filename: String,
    pub parse_result: Vec<ParseResult>,
    /// Download URL of the stored upload.
    pub url: String,
}

/// One entry of an upload's `parse_result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParseResult {
    Shape(Shape),
    /// Placeholder for uploaded STL files, which are not parsed.
    Stl {
        #[serde(rename = "type")]
        kind: String,
        filename: String,
        message: String,
    },
}

impl ParseResult {
    pub fn stl_note(filename: &str) -> Self {
        ParseResult::Stl {
            kind: "stl".to_string(),
            filename: filename.to_string(),
            message: "STL file uploaded. No shape parsing.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub status: String,
    /// Download URL of the generated STL.
    pub url: String,
}
