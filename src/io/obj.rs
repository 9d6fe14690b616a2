//! Wavefront OBJ export.
//!
//! Writes one `v` line per live vertex and one `f` line per live face, with
//! vertices renumbered densely from 1. Wireframe meshes without faces are
//! written as `l` lines, one per edge, so the export stays inspectable.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::algo::reconstruct::VertexPosition;
use crate::error::Result;
use crate::mesh::{Mesh, MeshIndex};

/// Write the live part of `mesh` as OBJ text.
pub fn to_writer<V, H, F, I, W>(mesh: &Mesh<V, H, F, I>, mut writer: W) -> Result<()>
where
    V: VertexPosition,
    I: MeshIndex,
    W: Write,
{
    let mut dense = vec![0usize; mesh.vertex_capacity()];

    writeln!(writer, "# wiremesh")?;
    for (n, v) in mesh.vertex_ids().enumerate() {
        dense[v.index()] = n + 1;
        let p = mesh.vertex_data(v).position();
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    if mesh.num_faces() > 0 {
        for f in mesh.face_ids() {
            write!(writer, "f")?;
            for v in mesh.face_vertices(f) {
                write!(writer, " {}", dense[v.index()])?;
            }
            writeln!(writer)?;
        }
    } else {
        for h in mesh.halfedge_ids() {
            let (a, b) = (mesh.from(h), mesh.to(h));
            if a < b {
                writeln!(writer, "l {} {}", dense[a.index()], dense[b.index()])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

/// Save a mesh to an OBJ file.
///
/// # Example
///
/// ```no_run
/// use wiremesh::io::obj;
/// use wiremesh::mesh::make_tri_cube;
///
/// obj::save(&make_tri_cube(), "cube.obj").unwrap();
/// ```
pub fn save<V, H, F, I, P>(mesh: &Mesh<V, H, F, I>, path: P) -> Result<()>
where
    V: VertexPosition,
    I: MeshIndex,
    P: AsRef<Path>,
{
    let file = File::create(path.as_ref())?;
    to_writer(mesh, BufWriter::new(file))?;
    log::debug!(
        "exported {} faces to {}",
        mesh.num_faces(),
        path.as_ref().display()
    );
    Ok(())
}
