//! Mesh construction utilities.
//!
//! This module provides functions for building meshes from index lists as
//! commonly found in mesh file formats: face-vertex polygon lists for surfaces
//! and edge lists for wireframes.

use super::container::Mesh;
use super::index::{MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a polygon mesh from vertex payloads and polygon faces.
///
/// Each face is a list of at least three vertex indices in boundary order.
/// Edges shared by several faces are created once. When a face would claim a
/// half-edge that already bounds another face, its corner order is reversed.
///
/// # Example
/// ```
/// use wiremesh::mesh::{build_from_polygons, Mesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3]];
///
/// let mesh: Mesh<Point3<f64>> = build_from_polygons(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 4);
/// assert_eq!(mesh.num_halfedges(), 8);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_polygons<V, P, I>(vertices: &[V], faces: &[P]) -> Result<Mesh<V, (), (), I>>
where
    V: Clone,
    P: AsRef<[usize]>,
    I: MeshIndex,
{
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if let Some(&vi) = face.iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
        let n = face.len();
        if n < 3 || (0..n).any(|i| face[i] == face[(i + 1) % n]) {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let num_corners: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    let mut mesh = Mesh::with_capacity(vertices.len(), num_corners, faces.len());
    let ids: Vec<VertexId<I>> = vertices.iter().map(|v| mesh.add_vertex(v.clone())).collect();

    let mut corners = Vec::new();
    for face in faces {
        corners.clear();
        corners.extend(face.as_ref().iter().map(|&vi| ids[vi]));
        mesh.add_face_from_vertices(&corners, true, ());
    }

    Ok(mesh)
}

/// Build a wireframe (vertices and edges, no faces).
///
/// Each `[a, b]` pair adds the edge `a -> b`; repeated or reversed pairs reuse
/// the existing edge.
///
/// # Example
/// ```
/// use wiremesh::mesh::{build_wireframe, Mesh};
///
/// let mesh: Mesh<[f64; 3]> = build_wireframe(
///     &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
///     &[[0, 1], [1, 2], [2, 0], [1, 0]],
/// )
/// .unwrap();
/// assert_eq!(mesh.num_halfedges(), 6);
/// assert_eq!(mesh.num_faces(), 0);
/// ```
pub fn build_wireframe<V, I>(vertices: &[V], edges: &[[usize; 2]]) -> Result<Mesh<V, (), (), I>>
where
    V: Clone,
    I: MeshIndex,
{
    for (ei, &[a, b]) in edges.iter().enumerate() {
        if let Some(&vi) = [a, b].iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::InvalidVertexIndex { face: ei, vertex: vi });
        }
        if a == b {
            return Err(MeshError::DegenerateEdge { edge: ei, vertex: a });
        }
    }

    let mut mesh = Mesh::with_capacity(vertices.len(), edges.len(), 0);
    let ids: Vec<VertexId<I>> = vertices.iter().map(|v| mesh.add_vertex(v.clone())).collect();
    for &[a, b] in edges {
        mesh.connect(ids[a], ids[b]);
    }

    Ok(mesh)
}

/// Convert a mesh back to a face-vertex representation.
///
/// Live vertices are numbered densely in handle order. Returns the vertex
/// payloads and one index list per live face.
pub fn to_face_vertex<V, H, F, I>(mesh: &Mesh<V, H, F, I>) -> (Vec<V>, Vec<Vec<usize>>)
where
    V: Clone,
    I: MeshIndex,
{
    let mut dense = vec![usize::MAX; mesh.vertex_capacity()];
    let mut vertices = Vec::with_capacity(mesh.num_vertices());
    for (v, slot) in mesh.vertices() {
        dense[v.index()] = vertices.len();
        vertices.push(slot.data.clone());
    }

    let faces = mesh
        .face_ids()
        .map(|f| mesh.face_vertices(f).map(|v| dense[v.index()]).collect())
        .collect();

    (vertices, faces)
}
