//! JSON snapshots.
//!
//! A snapshot holds the three arenas exactly as they are in memory, removed
//! slots included. Collect garbage first with [`Mesh::gc`] for a compact file.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::mesh::{Mesh, MeshIndex};

/// Write a snapshot of `mesh` to `writer`.
pub fn to_writer<V, H, F, I, W>(mesh: &Mesh<V, H, F, I>, writer: W) -> Result<()>
where
    I: MeshIndex,
    Mesh<V, H, F, I>: Serialize,
    W: Write,
{
    serde_json::to_writer(writer, mesh)?;
    Ok(())
}

/// Read a snapshot from `reader`.
///
/// The structure is checked with [`Mesh::validate`] before it is returned, so
/// a hand-edited or truncated snapshot fails here instead of panicking later.
pub fn from_reader<V, H, F, I, R>(reader: R) -> Result<Mesh<V, H, F, I>>
where
    I: MeshIndex,
    Mesh<V, H, F, I>: DeserializeOwned,
    R: Read,
{
    let mesh: Mesh<V, H, F, I> = serde_json::from_reader(reader)?;
    mesh.validate()?;
    Ok(mesh)
}

/// Save a snapshot to a file.
///
/// # Example
///
/// ```no_run
/// use wiremesh::io::json;
/// use wiremesh::mesh::make_icosahedron_wireframe;
///
/// let mesh = make_icosahedron_wireframe();
/// json::save(&mesh, "icosahedron.json").unwrap();
/// ```
pub fn save<V, H, F, I, P>(mesh: &Mesh<V, H, F, I>, path: P) -> Result<()>
where
    I: MeshIndex,
    Mesh<V, H, F, I>: Serialize,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    to_writer(mesh, &mut writer)?;
    writer.flush()?;
    log::debug!("saved mesh snapshot to {}", path.as_ref().display());
    Ok(())
}

/// Load a snapshot from a file.
pub fn load<V, H, F, I, P>(path: P) -> Result<Mesh<V, H, F, I>>
where
    I: MeshIndex,
    Mesh<V, H, F, I>: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    from_reader(BufReader::new(file))
}
