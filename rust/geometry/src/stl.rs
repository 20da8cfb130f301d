// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STL export
//!
//! Binary layout: 80-byte header, little-endian `u32` facet count, then
//! 50 bytes per facet (normal, three vertices, `u16` attribute).

use crate::error::{Error, Result};
use crate::mesh::{facet_normal, Mesh};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;
const SOLID_NAME: &str = "planforge";

/// STL flavour to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Encode a mesh as binary STL
pub fn encode_binary(mesh: &Mesh) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + 4 + mesh.triangle_count() * FACET_LEN);

    let mut header = [0u8; HEADER_LEN];
    let label = b"binary STL exported by planforge";
    header[..label.len()].copy_from_slice(label);
    out.extend_from_slice(&header);
    out.extend_from_slice(&(mesh.triangle_count() as u32).to_le_bytes());

    for tri in mesh.triangles() {
        let normal = facet_normal(&tri);
        for val in normal.iter() {
            out.extend_from_slice(&val.to_le_bytes());
        }
        for vertex in &tri {
            for val in vertex.coords.iter() {
                out.extend_from_slice(&val.to_le_bytes());
            }
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    out
}

/// Encode a mesh as ASCII STL
pub fn encode_ascii(mesh: &Mesh) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "solid {}", SOLID_NAME);
    for tri in mesh.triangles() {
        let n = facet_normal(&tri);
        let _ = writeln!(out, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z);
        let _ = writeln!(out, "    outer loop");
        for v in &tri {
            let _ = writeln!(out, "      vertex {:e} {:e} {:e}", v.x, v.y, v.z);
        }
        let _ = writeln!(out, "    endloop");
        let _ = writeln!(out, "  endfacet");
    }
    let _ = writeln!(out, "endsolid {}", SOLID_NAME);
    out
}

/// Facet count stored in a binary STL buffer, checked against its length
pub fn read_binary_triangle_count(bytes: &[u8]) -> Result<usize> {
    if bytes.len() < HEADER_LEN + 4 {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "STL data shorter than header",
        )));
    }
    let mut count = [0u8; 4];
    count.copy_from_slice(&bytes[HEADER_LEN..HEADER_LEN + 4]);
    let count = u32::from_le_bytes(count) as usize;

    let expected = HEADER_LEN + 4 + count * FACET_LEN;
    if bytes.len() != expected {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("STL length {} does not match {} facets", bytes.len(), count),
        )));
    }
    Ok(count)
}

/// Write a mesh to `path`, creating parent directories as needed
pub fn write_stl(mesh: &Mesh, path: &Path, format: StlFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        StlFormat::Binary => fs::write(path, encode_binary(mesh))?,
        StlFormat::Ascii => fs::write(path, encode_ascii(mesh))?,
    }

    tracing::debug!(
        path = %path.display(),
        triangles = mesh.triangle_count(),
        ?format,
        "wrote STL"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Rect;
    use crate::solid::build_box;

    #[test]
    fn test_binary_layout() {
        let mesh = build_box(&Rect::new(0.0, 0.0, 1.0, 1.0), 1.0);
        let bytes = encode_binary(&mesh);
        assert_eq!(bytes.len(), 84 + 12 * 50);
        assert_eq!(read_binary_triangle_count(&bytes).unwrap(), 12);
        assert!(bytes.starts_with(b"binary STL"));
    }

    #[test]
    fn test_binary_first_facet_is_bottom() {
        let mesh = build_box(&Rect::new(0.0, 0.0, 1.0, 1.0), 1.0);
        let bytes = encode_binary(&mesh);
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, -1.0);
    }

    #[test]
    fn test_truncated_binary_is_rejected() {
        let mesh = build_box(&Rect::new(0.0, 0.0, 1.0, 1.0), 1.0);
        let bytes = encode_binary(&mesh);
        assert!(read_binary_triangle_count(&bytes[..bytes.len() - 1]).is_err());
        assert!(read_binary_triangle_count(&bytes[..10]).is_err());
    }

    #[test]
    fn test_ascii_structure() {
        let mesh = build_box(&Rect::new(0.0, 0.0, 1.0, 1.0), 1.0);
        let text = encode_ascii(&mesh);
        assert!(text.starts_with("solid planforge"));
        assert!(text.trim_end().ends_with("endsolid planforge"));
        assert_eq!(text.matches("facet normal").count(), 12);
        assert_eq!(text.matches("vertex").count(), 36);
    }
}
