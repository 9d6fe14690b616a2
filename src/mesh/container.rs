//! Half-edge polygon mesh container.
//!
//! [`Mesh`] owns three arenas (vertices, half-edges, faces). Every element is a
//! slot holding a topology record made of handles plus an arbitrary payload:
//!
//! - a vertex lists its outgoing half-edges
//! - a half-edge knows its endpoints `[from, to]`, its opposite and the face it bounds
//! - a face lists its boundary half-edges in cyclic order
//!
//! Half-edges are always created in mutually opposite pairs. Removal tombstones
//! elements and cascades (vertex -> incident half-edges -> adjacent faces);
//! [`Mesh::gc`] compacts storage and is the only operation that renumbers handles.

use std::mem;

use serde::{Deserialize, Serialize};

use super::arena::{Arena, Slot};
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use super::topology::{FaceTopo, HalfEdgeTopo, VertexTopo};
use crate::error::{MeshError, Result};

/// A vertex slot: adjacency plus payload.
pub type Vertex<V, I = u32> = Slot<VertexTopo<I>, V>;

/// A half-edge slot: adjacency plus payload.
pub type HalfEdge<H, I = u32> = Slot<HalfEdgeTopo<I>, H>;

/// A face slot: adjacency plus payload.
pub type Face<F, I = u32> = Slot<FaceTopo<I>, F>;

/// A half-edge mesh with arbitrary vertex, half-edge and face payloads.
///
/// # Example
///
/// ```
/// use wiremesh::prelude::*;
///
/// let mut mesh: Mesh<&str> = Mesh::new();
/// let a = mesh.add_vertex("a");
/// let b = mesh.add_vertex("b");
/// let c = mesh.add_vertex("c");
///
/// let face = mesh.add_face_from_vertices(&[a, b, c], true, ());
/// assert_eq!(mesh.num_halfedges(), 6);
/// assert_eq!(mesh.face_vertices(face).collect::<Vec<_>>(), vec![a, b, c]);
///
/// mesh.remove_vertex(c);
/// assert_eq!(mesh.num_faces(), 0);
/// mesh.gc();
/// assert_eq!(mesh.num_halfedges(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh<V, H = (), F = (), I: MeshIndex = u32> {
    vertices: Arena<VertexTopo<I>, V>,
    halfedges: Arena<HalfEdgeTopo<I>, H>,
    faces: Arena<FaceTopo<I>, F>,
}

impl<V, H, F, I: MeshIndex> Default for Mesh<V, H, F, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, H, F, I: MeshIndex> Mesh<V, H, F, I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Arena::new(),
            halfedges: Arena::new(),
            faces: Arena::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_vertices: usize, num_edges: usize, num_faces: usize) -> Self {
        Self {
            vertices: Arena::with_capacity(num_vertices),
            halfedges: Arena::with_capacity(num_edges * 2),
            faces: Arena::with_capacity(num_faces),
        }
    }

    /// Remove everything, including tombstones.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.halfedges.clear();
        self.faces.clear();
    }

    // ==================== Counts ====================

    /// Number of live vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.live_count()
    }

    /// Number of live half-edges (twice the number of edges).
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.live_count()
    }

    /// Number of live faces.
    pub fn num_faces(&self) -> usize {
        self.faces.live_count()
    }

    /// Number of vertex slots, including removed ones.
    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.vertices.len()
    }

    /// Number of half-edge slots, including removed ones.
    #[inline]
    pub fn halfedge_capacity(&self) -> usize {
        self.halfedges.len()
    }

    /// Number of face slots, including removed ones.
    #[inline]
    pub fn face_capacity(&self) -> usize {
        self.faces.len()
    }

    // ==================== Raw storage ====================

    /// The vertex arena, tombstones included.
    pub fn vertex_arena(&self) -> &Arena<VertexTopo<I>, V> {
        &self.vertices
    }

    /// The half-edge arena, tombstones included.
    pub fn halfedge_arena(&self) -> &Arena<HalfEdgeTopo<I>, H> {
        &self.halfedges
    }

    /// The face arena, tombstones included.
    pub fn face_arena(&self) -> &Arena<FaceTopo<I>, F> {
        &self.faces
    }

    // ==================== Liveness ====================

    /// Whether `v` is invalid, out of range, or removed.
    #[inline]
    pub fn is_vertex_removed(&self, v: VertexId<I>) -> bool {
        !v.is_valid() || !self.vertices.is_live(v.index())
    }

    /// Whether `h` is invalid, out of range, or removed.
    #[inline]
    pub fn is_halfedge_removed(&self, h: HalfEdgeId<I>) -> bool {
        !h.is_valid() || !self.halfedges.is_live(h.index())
    }

    /// Whether `f` is invalid, out of range, or removed.
    #[inline]
    pub fn is_face_removed(&self, f: FaceId<I>) -> bool {
        !f.is_valid() || !self.faces.is_live(f.index())
    }

    // ==================== Element access ====================

    /// Get a live vertex.
    ///
    /// # Panics
    /// Panics if `v` is invalid or removed.
    pub fn vertex(&self, v: VertexId<I>) -> &Vertex<V, I> {
        match self.vertices.get(v.index()) {
            Some(slot) if v.is_valid() && slot.exists() => slot,
            _ => panic!("vertex {:?} is removed or was never allocated", v),
        }
    }

    fn vertex_mut(&mut self, v: VertexId<I>) -> &mut Vertex<V, I> {
        match self.vertices.get_mut(v.index()) {
            Some(slot) if v.is_valid() && slot.exists() => slot,
            _ => panic!("vertex {:?} is removed or was never allocated", v),
        }
    }

    /// Get a live half-edge.
    ///
    /// # Panics
    /// Panics if `h` is invalid or removed.
    pub fn halfedge(&self, h: HalfEdgeId<I>) -> &HalfEdge<H, I> {
        match self.halfedges.get(h.index()) {
            Some(slot) if h.is_valid() && slot.exists() => slot,
            _ => panic!("half-edge {:?} is removed or was never allocated", h),
        }
    }

    fn halfedge_mut(&mut self, h: HalfEdgeId<I>) -> &mut HalfEdge<H, I> {
        match self.halfedges.get_mut(h.index()) {
            Some(slot) if h.is_valid() && slot.exists() => slot,
            _ => panic!("half-edge {:?} is removed or was never allocated", h),
        }
    }

    /// Get a live face.
    ///
    /// # Panics
    /// Panics if `f` is invalid or removed.
    pub fn face(&self, f: FaceId<I>) -> &Face<F, I> {
        match self.faces.get(f.index()) {
            Some(slot) if f.is_valid() && slot.exists() => slot,
            _ => panic!("face {:?} is removed or was never allocated", f),
        }
    }

    fn face_mut(&mut self, f: FaceId<I>) -> &mut Face<F, I> {
        match self.faces.get_mut(f.index()) {
            Some(slot) if f.is_valid() && slot.exists() => slot,
            _ => panic!("face {:?} is removed or was never allocated", f),
        }
    }

    /// Payload of a vertex.
    #[inline]
    pub fn vertex_data(&self, v: VertexId<I>) -> &V {
        &self.vertex(v).data
    }

    /// Mutable payload of a vertex.
    #[inline]
    pub fn vertex_data_mut(&mut self, v: VertexId<I>) -> &mut V {
        &mut self.vertex_mut(v).data
    }

    /// Payload of a half-edge.
    #[inline]
    pub fn halfedge_data(&self, h: HalfEdgeId<I>) -> &H {
        &self.halfedge(h).data
    }

    /// Mutable payload of a half-edge.
    #[inline]
    pub fn halfedge_data_mut(&mut self, h: HalfEdgeId<I>) -> &mut H {
        &mut self.halfedge_mut(h).data
    }

    /// Payload of a face.
    #[inline]
    pub fn face_data(&self, f: FaceId<I>) -> &F {
        &self.face(f).data
    }

    /// Mutable payload of a face.
    #[inline]
    pub fn face_data_mut(&mut self, f: FaceId<I>) -> &mut F {
        &mut self.face_mut(f).data
    }

    // ==================== Topology queries ====================

    /// Origin of a half-edge.
    #[inline]
    pub fn from(&self, h: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(h).topo.from()
    }

    /// Destination of a half-edge.
    #[inline]
    pub fn to(&self, h: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(h).topo.to()
    }

    /// The half-edge running the other way.
    #[inline]
    pub fn opposite(&self, h: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(h).topo.opposite
    }

    /// The face bounded by `h`, invalid if none.
    #[inline]
    pub fn face_of(&self, h: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(h).topo.face
    }

    /// Outgoing half-edges of a vertex, in insertion order.
    #[inline]
    pub fn outgoing(&self, v: VertexId<I>) -> &[HalfEdgeId<I>] {
        &self.vertex(v).topo.halfedges
    }

    /// Number of edges incident to a vertex.
    #[inline]
    pub fn degree(&self, v: VertexId<I>) -> usize {
        self.outgoing(v).len()
    }

    /// Boundary half-edges of a face, in cyclic order.
    #[inline]
    pub fn face_halfedges(&self, f: FaceId<I>) -> &[HalfEdgeId<I>] {
        &self.face(f).topo.halfedges
    }

    /// Corner vertices of a face, in boundary order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).iter().map(move |&h| self.from(h))
    }

    /// Find the half-edge going from `from` to `to`.
    ///
    /// Returns an invalid handle if there is none, or if `from` is not live.
    pub fn find_edge(&self, from: VertexId<I>, to: VertexId<I>) -> HalfEdgeId<I> {
        if self.is_vertex_removed(from) {
            return HalfEdgeId::invalid();
        }
        self.outgoing(from)
            .iter()
            .copied()
            .find(|&h| self.to(h) == to)
            .unwrap_or_default()
    }

    // ==================== Iteration ====================

    /// Iterate over live vertex handles.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertices.live_indices().map(VertexId::new)
    }

    /// Iterate over live half-edge handles.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.halfedges.live_indices().map(HalfEdgeId::new)
    }

    /// Iterate over live face handles.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.faces.live_indices().map(FaceId::new)
    }

    /// Iterate over live vertices with their handles.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<V, I>)> + '_ {
        self.vertices
            .slots()
            .enumerate()
            .filter(|(_, s)| s.exists())
            .map(|(i, s)| (VertexId::new(i), s))
    }

    /// Iterate over live half-edges with their handles.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId<I>, &HalfEdge<H, I>)> + '_ {
        self.halfedges
            .slots()
            .enumerate()
            .filter(|(_, s)| s.exists())
            .map(|(i, s)| (HalfEdgeId::new(i), s))
    }

    /// Iterate over live faces with their handles.
    pub fn faces(&self) -> impl Iterator<Item = (FaceId<I>, &Face<F, I>)> + '_ {
        self.faces
            .slots()
            .enumerate()
            .filter(|(_, s)| s.exists())
            .map(|(i, s)| (FaceId::new(i), s))
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its handle.
    pub fn add_vertex(&mut self, data: V) -> VertexId<I> {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(VertexTopo::new(id), data);
        id
    }

    /// Add an edge, reusing an existing `from -> to` half-edge if there is one.
    ///
    /// Equivalent to [`insert_edge`](Self::insert_edge) with `merge_existing = true`.
    pub fn add_edge(
        &mut self,
        from: VertexId<I>,
        to: VertexId<I>,
        data: H,
        reverse_data: H,
    ) -> HalfEdgeId<I> {
        self.insert_edge(from, to, data, reverse_data, true)
    }

    /// Add an edge with default payloads on both half-edges.
    pub fn connect(&mut self, from: VertexId<I>, to: VertexId<I>) -> HalfEdgeId<I>
    where
        H: Default,
    {
        self.add_edge(from, to, H::default(), H::default())
    }

    /// Add an edge as a pair of opposite half-edges and return the `from -> to` one.
    ///
    /// Returns an invalid handle when `from == to`. With `merge_existing`, an
    /// existing `from -> to` half-edge is returned instead of creating a parallel
    /// duplicate; `data` and `reverse_data` then overwrite the payloads of that
    /// half-edge and its opposite.
    ///
    /// # Panics
    /// Panics if either endpoint is not a live vertex.
    pub fn insert_edge(
        &mut self,
        from: VertexId<I>,
        to: VertexId<I>,
        data: H,
        reverse_data: H,
        merge_existing: bool,
    ) -> HalfEdgeId<I> {
        if from == to {
            return HalfEdgeId::invalid();
        }
        // Fail before touching anything.
        self.vertex(from);
        self.vertex(to);

        if merge_existing {
            let existing = self.find_edge(from, to);
            if existing.is_valid() {
                let opposite = self.opposite(existing);
                self.halfedge_mut(existing).data = data;
                self.halfedge_mut(opposite).data = reverse_data;
                return existing;
            }
        }

        let forward = HalfEdgeId::new(self.halfedges.len());
        let backward = HalfEdgeId::new(self.halfedges.len() + 1);

        let mut topo = HalfEdgeTopo::new(forward, from, to);
        topo.opposite = backward;
        self.halfedges.push(topo, data);

        let mut topo = HalfEdgeTopo::new(backward, to, from);
        topo.opposite = forward;
        self.halfedges.push(topo, reverse_data);

        self.vertex_mut(from).topo.halfedges.push(forward);
        self.vertex_mut(to).topo.halfedges.push(backward);
        forward
    }

    /// Add a face bounded by the given half-edges.
    ///
    /// The half-edges' face pointers are set to the new face.
    ///
    /// # Panics
    /// Panics if the boundary is empty, contains a removed half-edge, or is not a
    /// closed chain (each half-edge must end where the next one starts, wrapping).
    pub fn add_face(&mut self, boundary: &[HalfEdgeId<I>], data: F) -> FaceId<I> {
        assert!(!boundary.is_empty(), "face boundary must not be empty");
        for (i, &h) in boundary.iter().enumerate() {
            let next = boundary[(i + 1) % boundary.len()];
            let (end, start) = (self.to(h), self.from(next));
            assert!(
                end == start,
                "face boundary is not closed: {:?} ends at {:?} but {:?} starts at {:?}",
                h,
                end,
                next,
                start
            );
        }

        let id = FaceId::new(self.faces.len());
        self.faces.push(FaceTopo::new(id, boundary.to_vec()), data);
        for &h in boundary {
            self.halfedge_mut(h).topo.face = id;
        }
        id
    }

    /// Add a face through the given corner vertices, creating or reusing edges.
    ///
    /// With `auto_flip`, the corner order is reversed when the closing half-edge
    /// (last corner to first corner) already bounds a face, so that two faces never
    /// claim the same half-edge.
    ///
    /// # Panics
    /// Panics if fewer than three corners are given or two consecutive corners are equal.
    pub fn add_face_from_vertices(
        &mut self,
        corners: &[VertexId<I>],
        auto_flip: bool,
        data: F,
    ) -> FaceId<I>
    where
        H: Default,
    {
        let n = corners.len();
        assert!(n >= 3, "a face needs at least three corners");
        assert!(
            (0..n).all(|i| corners[i] != corners[(i + 1) % n]),
            "consecutive face corners must be distinct: {:?}",
            corners
        );
        let mut corners = corners.to_vec();

        if auto_flip {
            let closing = self.find_edge(corners[n - 1], corners[0]);
            if closing.is_valid() && self.face_of(closing).is_valid() {
                corners.reverse();
            }
        }

        let boundary: Vec<HalfEdgeId<I>> = (0..n)
            .map(|i| self.connect(corners[i], corners[(i + 1) % n]))
            .collect();
        self.add_face(&boundary, data)
    }

    // ==================== Removal ====================

    /// Remove a face. Its boundary half-edges stay, with their face pointer cleared.
    ///
    /// Removing an invalid or already removed face is a no-op.
    pub fn remove_face(&mut self, f: FaceId<I>) {
        if !f.is_valid() || !self.faces.kill(f.index()) {
            return;
        }
        let Some(slot) = self.faces.get_mut(f.index()) else {
            return;
        };
        let boundary = mem::take(&mut slot.topo.halfedges);
        for h in boundary {
            if let Some(he) = self.halfedges.get_mut(h.index()) {
                if he.topo.face == f {
                    he.topo.face.reset();
                }
            }
        }
    }

    /// Remove a half-edge together with its opposite and both adjacent faces.
    ///
    /// Removing an invalid or already removed half-edge is a no-op.
    pub fn remove_halfedge(&mut self, h: HalfEdgeId<I>) {
        if self.is_halfedge_removed(h) {
            return;
        }
        let topo = self.halfedge(h).topo;
        let opposite = topo.opposite;
        let opposite_topo = self.halfedges.get(opposite.index()).map(|s| s.topo);

        self.halfedges.kill(h.index());
        self.halfedges.kill(opposite.index());

        self.remove_face(topo.face);
        self.detach(topo.from(), h);
        self.clear_halfedge(h);

        if let Some(opposite_topo) = opposite_topo {
            self.remove_face(opposite_topo.face);
            self.detach(opposite_topo.from(), opposite);
            self.clear_halfedge(opposite);
        }
    }

    /// Remove a vertex together with all incident edges and their faces.
    ///
    /// Removing an invalid or already removed vertex is a no-op.
    pub fn remove_vertex(&mut self, v: VertexId<I>) {
        if !v.is_valid() || !self.vertices.kill(v.index()) {
            return;
        }
        let outgoing = match self.vertices.get_mut(v.index()) {
            Some(slot) => mem::take(&mut slot.topo.halfedges),
            None => return,
        };
        for h in outgoing {
            self.remove_halfedge(h);
        }
    }

    fn detach(&mut self, v: VertexId<I>, h: HalfEdgeId<I>) {
        if let Some(slot) = self.vertices.get_mut(v.index()) {
            slot.topo.halfedges.retain(|&x| x != h);
        }
    }

    fn clear_halfedge(&mut self, h: HalfEdgeId<I>) {
        if let Some(slot) = self.halfedges.get_mut(h.index()) {
            slot.topo.ends = [VertexId::invalid(); 2];
            slot.topo.opposite.reset();
            slot.topo.face.reset();
        }
    }

    // ==================== Merging ====================

    /// Copy all live elements of `other` into this mesh.
    ///
    /// Topology is preserved; nothing is deduplicated against elements already in
    /// `self`. Returns where each of `other`'s handles landed.
    pub fn unite(&mut self, other: &Mesh<V, H, F, I>) -> HandleRemap<I>
    where
        V: Clone,
        H: Clone,
        F: Clone,
    {
        let mut remap = HandleRemap::with_len(
            other.vertex_capacity(),
            other.halfedge_capacity(),
            other.face_capacity(),
        );

        for (v, slot) in other.vertices() {
            remap.vertices[v.index()] = self.add_vertex(slot.data.clone());
        }
        for (h, slot) in other.halfedges() {
            if remap.halfedges[h.index()].is_valid() {
                continue;
            }
            let opposite = slot.topo.opposite;
            let from = remap.vertex(slot.topo.from());
            let to = remap.vertex(slot.topo.to());
            let reverse = other.halfedge_data(opposite).clone();
            let forward = self.insert_edge(from, to, slot.data.clone(), reverse, false);
            remap.halfedges[h.index()] = forward;
            remap.halfedges[opposite.index()] = self.opposite(forward);
        }
        for (f, slot) in other.faces() {
            let boundary: Vec<HalfEdgeId<I>> = slot
                .topo
                .halfedges
                .iter()
                .map(|&h| remap.halfedge(h))
                .collect();
            remap.faces[f.index()] = self.add_face(&boundary, slot.data.clone());
        }
        remap
    }

    // ==================== Garbage collection ====================

    /// Compact all arenas, dropping removed elements and rewriting every handle.
    ///
    /// Handles held outside the mesh are stale afterwards; translate them through
    /// the returned [`HandleRemap`] or use [`gc_with`](Self::gc_with).
    pub fn gc(&mut self) -> HandleRemap<I> {
        let before = (self.vertices.len(), self.halfedges.len(), self.faces.len());
        let remap = HandleRemap::from_tables(
            &self.vertices.compact(),
            &self.halfedges.compact(),
            &self.faces.compact(),
        );

        for slot in self.vertices.slots_mut() {
            slot.topo.id = remap.vertex(slot.topo.id);
            slot.topo.halfedges = remap.halfedge_list(&slot.topo.halfedges);
        }
        for slot in self.halfedges.slots_mut() {
            let topo = &mut slot.topo;
            topo.id = remap.halfedge(topo.id);
            topo.ends = [remap.vertex(topo.ends[0]), remap.vertex(topo.ends[1])];
            topo.opposite = remap.halfedge(topo.opposite);
            topo.face = remap.face(topo.face);
        }
        for slot in self.faces.slots_mut() {
            slot.topo.id = remap.face(slot.topo.id);
            slot.topo.halfedges = remap.halfedge_list(&slot.topo.halfedges);
        }

        log::debug!(
            "gc: vertices {} -> {}, half-edges {} -> {}, faces {} -> {}",
            before.0,
            self.vertices.len(),
            before.1,
            self.halfedges.len(),
            before.2,
            self.faces.len()
        );
        remap
    }

    /// Like [`gc`](Self::gc), and also rewrite the given external handles in place.
    ///
    /// Handles to dropped elements become invalid.
    pub fn gc_with(
        &mut self,
        vertices: &mut [VertexId<I>],
        halfedges: &mut [HalfEdgeId<I>],
        faces: &mut [FaceId<I>],
    ) -> HandleRemap<I> {
        let remap = self.gc();
        for v in vertices {
            *v = remap.vertex(*v);
        }
        for h in halfedges {
            *h = remap.halfedge(*h);
        }
        for f in faces {
            *f = remap.face(*f);
        }
        remap
    }

    // ==================== Validation ====================

    /// Check the topology invariants on every live element.
    ///
    /// Returns the first violation found as [`MeshError::Topology`].
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(MeshError::Topology(msg));

        for (v, slot) in self.vertices() {
            if slot.topo.id != v {
                return fail(format!("vertex slot {:?} stores handle {:?}", v, slot.topo.id));
            }
            for &h in &slot.topo.halfedges {
                if self.is_halfedge_removed(h) {
                    return fail(format!("{:?} lists removed half-edge {:?}", v, h));
                }
                if self.from(h) != v {
                    return fail(format!("{:?} lists {:?} which starts elsewhere", v, h));
                }
            }
        }

        for (h, slot) in self.halfedges() {
            let topo = &slot.topo;
            if topo.id != h {
                return fail(format!("half-edge slot {:?} stores handle {:?}", h, topo.id));
            }
            if topo.ends.iter().any(|&v| self.is_vertex_removed(v)) {
                return fail(format!("{:?} has a removed endpoint", h));
            }
            let opposite = topo.opposite;
            if self.is_halfedge_removed(opposite) {
                return fail(format!("{:?} has no live opposite", h));
            }
            let other = &self.halfedge(opposite).topo;
            if other.opposite != h {
                return fail(format!("opposite of opposite of {:?} is {:?}", h, other.opposite));
            }
            if other.from() != topo.to() || other.to() != topo.from() {
                return fail(format!("{:?} and {:?} are not endpoint mirrors", h, opposite));
            }
            let listed = self.outgoing(topo.from()).iter().filter(|&&x| x == h).count();
            if listed != 1 {
                return fail(format!(
                    "{:?} appears {} times among outgoing half-edges of {:?}",
                    h,
                    listed,
                    topo.from()
                ));
            }
            if topo.face.is_valid() {
                if self.is_face_removed(topo.face) {
                    return fail(format!("{:?} points to removed face {:?}", h, topo.face));
                }
                if !self.face_halfedges(topo.face).contains(&h) {
                    return fail(format!("{:?} is not on the boundary of {:?}", h, topo.face));
                }
            }
        }

        for (f, slot) in self.faces() {
            let boundary = &slot.topo.halfedges;
            if slot.topo.id != f {
                return fail(format!("face slot {:?} stores handle {:?}", f, slot.topo.id));
            }
            if boundary.is_empty() {
                return fail(format!("{:?} has an empty boundary", f));
            }
            for (i, &h) in boundary.iter().enumerate() {
                if self.is_halfedge_removed(h) {
                    return fail(format!("{:?} is bounded by removed half-edge {:?}", f, h));
                }
                if self.face_of(h) != f {
                    return fail(format!("{:?} on {:?} points to {:?}", h, f, self.face_of(h)));
                }
                let next = boundary[(i + 1) % boundary.len()];
                if self.is_halfedge_removed(next) || self.to(h) != self.from(next) {
                    return fail(format!("boundary of {:?} breaks after {:?}", f, h));
                }
            }
        }

        Ok(())
    }

    /// Whether [`validate`](Self::validate) succeeds.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Old-handle to new-handle tables produced by [`Mesh::gc`] and [`Mesh::unite`].
///
/// Handles that do not appear in a table (dropped, out of range, or invalid)
/// translate to the invalid handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleRemap<I: MeshIndex = u32> {
    vertices: Vec<VertexId<I>>,
    halfedges: Vec<HalfEdgeId<I>>,
    faces: Vec<FaceId<I>>,
}

impl<I: MeshIndex> HandleRemap<I> {
    fn with_len(vertices: usize, halfedges: usize, faces: usize) -> Self {
        Self {
            vertices: vec![VertexId::invalid(); vertices],
            halfedges: vec![HalfEdgeId::invalid(); halfedges],
            faces: vec![FaceId::invalid(); faces],
        }
    }

    fn from_tables(
        vertices: &[Option<usize>],
        halfedges: &[Option<usize>],
        faces: &[Option<usize>],
    ) -> Self {
        Self {
            vertices: vertices
                .iter()
                .map(|n| n.map_or_else(VertexId::invalid, VertexId::new))
                .collect(),
            halfedges: halfedges
                .iter()
                .map(|n| n.map_or_else(HalfEdgeId::invalid, HalfEdgeId::new))
                .collect(),
            faces: faces
                .iter()
                .map(|n| n.map_or_else(FaceId::invalid, FaceId::new))
                .collect(),
        }
    }

    /// Translate a vertex handle.
    pub fn vertex(&self, old: VertexId<I>) -> VertexId<I> {
        if !old.is_valid() {
            return old;
        }
        self.vertices.get(old.index()).copied().unwrap_or_default()
    }

    /// Translate a half-edge handle.
    pub fn halfedge(&self, old: HalfEdgeId<I>) -> HalfEdgeId<I> {
        if !old.is_valid() {
            return old;
        }
        self.halfedges.get(old.index()).copied().unwrap_or_default()
    }

    /// Translate a face handle.
    pub fn face(&self, old: FaceId<I>) -> FaceId<I> {
        if !old.is_valid() {
            return old;
        }
        self.faces.get(old.index()).copied().unwrap_or_default()
    }

    /// Whether every handle maps to itself (nothing was dropped or moved).
    pub fn is_identity(&self) -> bool {
        self.vertices.iter().enumerate().all(|(i, v)| v.is_valid() && v.index() == i)
            && self.halfedges.iter().enumerate().all(|(i, h)| h.is_valid() && h.index() == i)
            && self.faces.iter().enumerate().all(|(i, f)| f.is_valid() && f.index() == i)
    }

    fn halfedge_list(&self, old: &[HalfEdgeId<I>]) -> Vec<HalfEdgeId<I>> {
        old.iter()
            .map(|&h| self.halfedge(h))
            .filter(|h| h.is_valid())
            .collect()
    }
}
