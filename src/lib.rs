//! # Wiremesh
//!
//! A half-edge mesh container that holds vertices, edges and optional polygon
//! faces with arbitrary payloads, plus an engine that recovers the faces of a
//! polyhedral surface when only its vertices and edges are known.
//!
//! ## Features
//!
//! - **Half-edge container**: generic vertex, half-edge and face payloads with
//!   type-safe handles over 16-, 32- or 64-bit indices
//! - **Stable handles**: removal marks elements dead, and an explicit garbage
//!   collection pass compacts storage and reports how handles moved
//! - **Traversal**: depth-first search, connected components, pruning of
//!   dangling vertices
//! - **Face reconstruction**: a priority-driven loop search that closes edge
//!   cycles into faces, steered by a pluggable half-edge scoring function
//! - **Persistence**: serde snapshots as JSON and Wavefront OBJ export
//!
//! ## Quick Start
//!
//! ```
//! use wiremesh::prelude::*;
//!
//! // Edges only: 12 vertices, 30 edges, no faces.
//! let mut mesh = make_icosahedron_wireframe();
//! assert_eq!(mesh.num_faces(), 0);
//!
//! let report = reconstruct_all_faces(&mut mesh, &ReconstructOptions::default()).unwrap();
//! assert_eq!(report.faces.len(), 20);
//! assert!(mesh.is_valid());
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use wiremesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     vec![0, 2, 1], // bottom
//!     vec![0, 1, 3], // front
//!     vec![1, 2, 3], // right
//!     vec![2, 0, 3], // left
//! ];
//!
//! let mesh: Mesh<Point3<f64>> = build_from_polygons(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_faces(), 4);
//! assert_eq!(mesh.num_halfedges(), 12);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use wiremesh::prelude::*;
//!
//! let mesh = make_quad_cube();
//! let v = VertexId::new(0);
//! for &h in mesh.outgoing(v) {
//!     println!("{:?} -> {:?}", v, mesh.to(h));
//! }
//!
//! let f = FaceId::new(0);
//! let corners: Vec<VertexId> = mesh.face_vertices(f).collect();
//! assert_eq!(corners.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use wiremesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::progress::Progress;
    pub use crate::algo::reconstruct::{
        direction_parallelism, reconstruct_all_faces, reconstruct_faces, ReconstructOptions,
        ReconstructReport, VertexPosition,
    };
    pub use crate::algo::traversal::{
        connected_components, depth_first_search, remove_dangling_components,
    };
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_wireframe, make_cube_wireframe, make_icosahedron_wireframe,
        make_quad_cube, make_tetrahedron, make_tri_cube, to_face_vertex, FaceId, HalfEdgeId,
        HandleRemap, Mesh, MeshIndex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_wireframe_pipeline() {
        // Icosahedron plus a dangling tail on vertex 0.
        let mut mesh = make_icosahedron_wireframe();
        let tail = mesh.add_vertex(Point3::new(5.0, 5.0, 5.0));
        mesh.connect(VertexId::new(0), tail);

        assert_eq!(remove_dangling_components(&mut mesh), 1);
        mesh.gc();
        assert_eq!(mesh.num_vertices(), 12);

        let report = reconstruct_all_faces(&mut mesh, &ReconstructOptions::default()).unwrap();
        assert_eq!(report.faces.len(), 20);
        assert_eq!(report.stalled_components, 0);

        let (vertices, faces) = to_face_vertex(&mesh);
        assert_eq!(vertices.len(), 12);
        assert!(faces.iter().all(|f| f.len() == 3));

        // Closed surface: every half-edge bounds a face.
        assert!(mesh.halfedge_ids().all(|h| mesh.face_of(h).is_valid()));
        assert!(mesh.is_valid());
    }
}
