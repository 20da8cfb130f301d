// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Upload and output file naming.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Extensions accepted by the upload endpoint.
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "stl"];

/// Extensions parsed as sketches.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Reduce a client-supplied name to a plain file name.
///
/// Path components are dropped and every character outside
/// `[A-Za-z0-9._-]` becomes `_`. Leading dots are stripped so the result
/// can never be hidden or a parent reference. Returns `None` when nothing
/// usable is left.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Lower-cased extension, if it is on the allow-list.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext)
}

/// Fresh collision-free name with the given extension.
pub fn unique_filename(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), extension)
}

/// Locate a previously stored file by its client-visible name.
///
/// Names that do not survive sanitizing unchanged are rejected so a request
/// can never point outside `dir`.
pub fn resolve(dir: &Path, filename: &str) -> Option<PathBuf> {
    let clean = sanitize_filename(filename)?;
    (clean == filename).then(|| dir.join(clean))
}

/// Write `bytes` to `dir/filename`, creating `dir` if needed.
pub async fn store(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes).await?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "stored upload");
    Ok(path)
}
