//! Topology records.
//!
//! These structs hold adjacency only, as handles. User payloads are stored next
//! to them in the arena slot, never inside them.

use serde::{Deserialize, Serialize};

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// Adjacency of a vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexTopo<I: MeshIndex = u32> {
    /// Handle of this vertex.
    pub id: VertexId<I>,
    /// Outgoing half-edges, in insertion order.
    pub halfedges: Vec<HalfEdgeId<I>>,
}

impl<I: MeshIndex> VertexTopo<I> {
    pub(crate) fn new(id: VertexId<I>) -> Self {
        Self {
            id,
            halfedges: Vec::new(),
        }
    }
}

/// Adjacency of a half-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfEdgeTopo<I: MeshIndex = u32> {
    /// Handle of this half-edge.
    pub id: HalfEdgeId<I>,
    /// Endpoints, directed `[from, to]`.
    pub ends: [VertexId<I>; 2],
    /// The half-edge running the other way.
    pub opposite: HalfEdgeId<I>,
    /// The face this half-edge bounds, invalid if none.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdgeTopo<I> {
    pub(crate) fn new(id: HalfEdgeId<I>, from: VertexId<I>, to: VertexId<I>) -> Self {
        Self {
            id,
            ends: [from, to],
            opposite: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }

    /// Origin vertex.
    #[inline]
    pub fn from(&self) -> VertexId<I> {
        self.ends[0]
    }

    /// Destination vertex.
    #[inline]
    pub fn to(&self) -> VertexId<I> {
        self.ends[1]
    }

    /// Whether no face is attached.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        !self.face.is_valid()
    }
}

/// Adjacency of a face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceTopo<I: MeshIndex = u32> {
    /// Handle of this face.
    pub id: FaceId<I>,
    /// Boundary half-edges in cyclic order.
    pub halfedges: Vec<HalfEdgeId<I>>,
}

impl<I: MeshIndex> FaceTopo<I> {
    pub(crate) fn new(id: FaceId<I>, halfedges: Vec<HalfEdgeId<I>>) -> Self {
        Self { id, halfedges }
    }
}
