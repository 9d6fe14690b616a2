//! Mesh persistence.
//!
//! Meshes are stored as JSON snapshots of their full structure, tombstones
//! included, so a reloaded mesh compares equal to the one that was saved and
//! keeps every handle meaningful. Meshes with positions can also be exported
//! as Wavefront OBJ for other tools.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | JSON snapshot | `.json` | ✓ | ✓ | Any serializable payload |
//! | Wavefront OBJ | `.obj` | ✗ | ✓ | Live polygon faces only |
//!
//! # Usage
//!
//! ```no_run
//! use wiremesh::io::{load, save};
//! use wiremesh::mesh::{make_quad_cube, Mesh};
//! use wiremesh::nalgebra::Point3;
//!
//! let cube = make_quad_cube();
//! save(&cube, "cube.json").unwrap();
//! save(&cube, "cube.obj").unwrap();
//!
//! let back: Mesh<Point3<f64>> = load("cube.json").unwrap();
//! assert_eq!(back, cube);
//! ```

pub mod json;
pub mod obj;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::algo::reconstruct::VertexPosition;
use crate::error::{MeshError, Result};
use crate::mesh::{Mesh, MeshIndex};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON snapshot of the whole mesh.
    Json,
    /// Wavefront OBJ (export only).
    Obj,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "obj" => Some(Format::Obj),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file with automatic format detection.
///
/// Only JSON snapshots can be loaded; an `.obj` path is rejected with
/// [`MeshError::UnsupportedFormat`].
pub fn load<V, H, F, I, P>(path: P) -> Result<Mesh<V, H, F, I>>
where
    I: MeshIndex,
    Mesh<V, H, F, I>: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match detect(path)? {
        Format::Json => json::load(path),
        Format::Obj => Err(MeshError::UnsupportedFormat {
            extension: "obj (export only)".to_string(),
        }),
    }
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension.
pub fn save<V, H, F, I, P>(mesh: &Mesh<V, H, F, I>, path: P) -> Result<()>
where
    V: VertexPosition,
    I: MeshIndex,
    Mesh<V, H, F, I>: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match detect(path)? {
        Format::Json => json::save(mesh, path),
        Format::Obj => obj::save(mesh, path),
    }
}
