//! Core mesh data structures.
//!
//! This module provides a half-edge mesh that can hold bare vertices and
//! edges as well as polygon faces, together with builders and a few
//! reference solids.
//!
//! # Overview
//!
//! The primary type is [`Mesh`]. Vertices, half-edges and faces live in three
//! arenas of [`Slot`]s, each pairing a topology record with a user payload.
//! Removing an element marks its slot as removed without moving anything, so
//! every other handle stays valid until [`Mesh::gc`] compacts the arenas and
//! returns a [`HandleRemap`].
//!
//! Edges are stored as pairs of opposite half-edges at consecutive indices.
//! Faces are optional: a mesh built with [`build_wireframe`] has none until
//! [`reconstruct_faces`](crate::algo::reconstruct::reconstruct_faces) finds them.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use wiremesh::mesh::{build_from_polygons, Mesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let faces = vec![vec![0, 1, 2, 3]];
//!
//! let mesh: Mesh<Point3<f64>> = build_from_polygons(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_faces(), 1);
//! assert_eq!(mesh.num_halfedges(), 8);
//! ```

mod arena;
mod builder;
mod container;
mod index;
mod primitives;
mod topology;

#[cfg(test)]
mod proptests;

pub use arena::{Arena, Slot};
pub use builder::{build_from_polygons, build_wireframe, to_face_vertex};
pub use container::{Face, HalfEdge, HandleRemap, Mesh, Vertex};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use primitives::{
    make_cube_wireframe, make_icosahedron_wireframe, make_quad_cube, make_tetrahedron,
    make_tri_cube,
};
pub use topology::{FaceTopo, HalfEdgeTopo, VertexTopo};
