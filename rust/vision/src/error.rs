// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for recognition operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole parse call
///
/// Per-line and per-contour problems never surface here; those candidates
/// are skipped and the parse continues.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Geometry error: {0}")]
    Geometry(#[from] planforge_geometry::Error),
}
