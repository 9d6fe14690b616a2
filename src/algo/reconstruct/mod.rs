//! Face reconstruction from wireframes.
//!
//! Given a mesh with vertices and edges but (some) faces missing, this module
//! infers the polygonal faces. Each eligible half-edge starts as an open loop;
//! loops are concatenated until they close into face boundaries, which are then
//! added to the mesh.
//!
//! # Algorithm
//!
//! 1. **Seeding**: every loop gets a base priority, boosted for half-edges on a
//!    triangle, on a quad with parallel opposite sides, or on two such quads.
//! 2. **Init**: at a vertex with exactly three eligible edges the three corners
//!    are joined (such a vertex is almost always a face corner). Without one, a
//!    seeded triangle is taken as the first face.
//! 3. **Search**: a state machine over a priority list of open loops:
//!    - *TopForce* joins a loop with its only possible continuation
//!    - *TopMerge* closes a loop that one continuation completes
//!    - *SubMatting*, *SubForce*, *SubMerge* work on a copy of the list and, when
//!      nothing is forced, join the pair with the best [matting](ReconstructOptions::matting_exponent)
//!      value. A closed face sends the search back to TopForce.
//! 4. **Done**: every closed loop becomes a face.
//!
//! # Example
//!
//! ```
//! use wiremesh::algo::reconstruct::{direction_parallelism, reconstruct_faces, ReconstructOptions};
//! use wiremesh::mesh::make_cube_wireframe;
//!
//! let mut mesh = make_cube_wireframe();
//! let report = reconstruct_faces(
//!     &mut mesh,
//!     direction_parallelism,
//!     |_, _| true,
//!     &ReconstructOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(report.faces.len(), 6);
//! assert_eq!(report.open_loops, 0);
//! ```

mod loops;
mod search;
mod seed;

use nalgebra::{Point3, Vector3};

use crate::algo::progress::Progress;
use crate::algo::traversal::connected_components;
use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeId, Mesh, MeshIndex};

use search::Search;

/// Options for [`reconstruct_faces`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructOptions {
    /// Priority of a loop with no recognised structure.
    pub base_priority: f64,

    /// Priority of half-edges on a triangle.
    pub triangle_priority: f64,

    /// Priority of half-edges on exactly one candidate quad.
    pub quad_priority: f64,

    /// Priority of half-edges on two or more candidate quads.
    pub double_quad_priority: f64,

    /// Minimum score for two half-edges to count as parallel (0.0 to 1.0).
    pub parallel_threshold: f64,

    /// Power applied to pairwise scores before averaging them into a matting
    /// value. Higher values reward near-parallel pairs more sharply.
    pub matting_exponent: i32,

    /// Matting value used when all pairwise scores are zero.
    pub matting_floor: f64,

    /// Factor applied to the summed priorities of two joined loops.
    pub merge_factor: f64,

    /// Consecutive sub-phases without progress after which the search stops.
    pub max_idle_phases: usize,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            base_priority: 100.0,
            triangle_priority: 110.0,
            quad_priority: 150.0,
            double_quad_priority: 200.0,
            parallel_threshold: 0.9,
            matting_exponent: 10,
            matting_floor: 0.1,
            merge_factor: 0.4,
            max_idle_phases: 3,
        }
    }
}

impl ReconstructOptions {
    /// Set the four seeding priorities (base, triangle, quad, double quad).
    pub fn with_priorities(mut self, base: f64, triangle: f64, quad: f64, double_quad: f64) -> Self {
        self.base_priority = base;
        self.triangle_priority = triangle;
        self.quad_priority = quad;
        self.double_quad_priority = double_quad;
        self
    }

    /// Set the parallelism threshold.
    pub fn with_parallel_threshold(mut self, threshold: f64) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the matting exponent.
    pub fn with_matting_exponent(mut self, exponent: i32) -> Self {
        self.matting_exponent = exponent;
        self
    }

    /// Set the matting floor.
    pub fn with_matting_floor(mut self, floor: f64) -> Self {
        self.matting_floor = floor;
        self
    }

    /// Set the merge factor.
    pub fn with_merge_factor(mut self, factor: f64) -> Self {
        self.merge_factor = factor;
        self
    }

    /// Set how many idle sub-phases end the search.
    pub fn with_max_idle_phases(mut self, phases: usize) -> Self {
        self.max_idle_phases = phases;
        self
    }

    /// Check that every value is finite and in range.
    pub fn validate(&self) -> Result<()> {
        let priorities = [
            ("base_priority", self.base_priority),
            ("triangle_priority", self.triangle_priority),
            ("quad_priority", self.quad_priority),
            ("double_quad_priority", self.double_quad_priority),
        ];
        for (name, value) in priorities {
            if !value.is_finite() || value < 0.0 {
                return Err(MeshError::invalid_param(name, value, "must be finite and non-negative"));
            }
        }
        if !(0.0..=1.0).contains(&self.parallel_threshold) {
            return Err(MeshError::invalid_param(
                "parallel_threshold",
                self.parallel_threshold,
                "must be between 0 and 1",
            ));
        }
        if self.matting_exponent < 1 {
            return Err(MeshError::invalid_param(
                "matting_exponent",
                self.matting_exponent,
                "must be at least 1",
            ));
        }
        if !(self.matting_floor > 0.0 && self.matting_floor <= 1.0) {
            return Err(MeshError::invalid_param(
                "matting_floor",
                self.matting_floor,
                "must be in (0, 1]",
            ));
        }
        if !self.merge_factor.is_finite() || self.merge_factor <= 0.0 {
            return Err(MeshError::invalid_param(
                "merge_factor",
                self.merge_factor,
                "must be finite and positive",
            ));
        }
        if self.max_idle_phases == 0 {
            return Err(MeshError::invalid_param(
                "max_idle_phases",
                self.max_idle_phases,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// What a reconstruction added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconstructReport<I: MeshIndex = u32> {
    /// Faces added, in closing order.
    pub faces: Vec<FaceId<I>>,
    /// Open loops left when the search ended.
    pub open_loops: usize,
    /// Components skipped because the search could not start
    /// (only set by [`reconstruct_all_faces`]).
    pub stalled_components: usize,
}

impl<I: MeshIndex> ReconstructReport<I> {
    fn empty() -> Self {
        Self {
            faces: Vec::new(),
            open_loops: 0,
            stalled_components: 0,
        }
    }

    fn absorb(&mut self, other: Self) {
        self.faces.extend(other.faces);
        self.open_loops += other.open_loops;
        self.stalled_components += other.stalled_components;
    }
}

/// Result of one search phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed.
    Idle,
    /// Two loops were joined into a still open loop.
    Concatenated,
    /// A loop was closed into a face boundary.
    FaceClosed,
}

/// Phases of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// First move around a 3-degree vertex or a triangle.
    Init,
    /// Join forced continuations on the master list.
    TopForce,
    /// Close loops on the master list.
    TopMerge,
    /// Join the best-matting pair on the working copy.
    SubMatting,
    /// Join forced continuations on the working copy.
    SubForce,
    /// Close loops on the working copy.
    SubMerge,
    /// Finished.
    Done,
}

impl Phase {
    /// The phase following `self` after `outcome`.
    ///
    /// Empty lists and the idle limit also lead to [`Phase::Done`]; the driver
    /// checks those before asking for the next phase.
    pub fn next(self, outcome: Outcome) -> Phase {
        use Outcome::*;
        use Phase::*;
        match (self, outcome) {
            (Init, _) => TopForce,
            (TopForce, Idle) => TopMerge,
            (TopForce, _) => TopForce,
            (TopMerge, Idle) => SubMatting,
            (TopMerge, _) => TopForce,
            (SubMatting | SubForce | SubMerge, FaceClosed) => TopForce,
            (SubMatting, _) => SubForce,
            (SubForce, Concatenated) => SubForce,
            (SubForce, Idle) => SubMerge,
            (SubMerge, _) => SubMatting,
            (Done, _) => Done,
        }
    }
}

/// Reconstruct faces from the eligible half-edges of a mesh.
///
/// A half-edge is eligible when it is live, bounds no face yet and `mask`
/// accepts it. `scorer` rates how parallel two half-edges are, from 0.0 to 1.0,
/// and must be symmetric.
///
/// Returns [`MeshError::ReconstructionStalled`] without touching the mesh when
/// eligible half-edges exist but no first move is possible (no vertex with
/// exactly three eligible edges and no triangle).
pub fn reconstruct_faces<V, H, F, I, S, M>(
    mesh: &mut Mesh<V, H, F, I>,
    scorer: S,
    mask: M,
    options: &ReconstructOptions,
) -> Result<ReconstructReport<I>>
where
    F: Default,
    I: MeshIndex,
    S: Fn(&Mesh<V, H, F, I>, HalfEdgeId<I>, HalfEdgeId<I>) -> f64,
    M: Fn(&Mesh<V, H, F, I>, HalfEdgeId<I>) -> bool,
{
    reconstruct_faces_internal(mesh, scorer, mask, options, None)
}

/// Reconstruct faces with progress reporting.
///
/// See [`reconstruct_faces`] for details.
pub fn reconstruct_faces_with_progress<V, H, F, I, S, M>(
    mesh: &mut Mesh<V, H, F, I>,
    scorer: S,
    mask: M,
    options: &ReconstructOptions,
    progress: &Progress,
) -> Result<ReconstructReport<I>>
where
    F: Default,
    I: MeshIndex,
    S: Fn(&Mesh<V, H, F, I>, HalfEdgeId<I>, HalfEdgeId<I>) -> f64,
    M: Fn(&Mesh<V, H, F, I>, HalfEdgeId<I>) -> bool,
{
    reconstruct_faces_internal(mesh, scorer, mask, options, Some(progress))
}

fn reconstruct_faces_internal<V, H, F, I, S, M>(
    mesh: &mut Mesh<V, H, F, I>,
    scorer: S,
    mask: M,
    options: &ReconstructOptions,
    progress: Option<&Progress>,
) -> Result<ReconstructReport<I>>
where
    F: Default,
    I: MeshIndex,
    S: Fn(&Mesh<V, H, F, I>, HalfEdgeId<I>, HalfEdgeId<I>) -> f64,
    M: Fn(&Mesh<V, H, F, I>, HalfEdgeId<I>) -> bool,
{
    options.validate()?;

    let (boundaries, open_loops) = {
        let view: &Mesh<V, H, F, I> = mesh;
        let score = |a: HalfEdgeId<I>, b: HalfEdgeId<I>| scorer(view, a, b);
        let mut search = Search::new(view, &score, mask, options);

        let eligible = search.eligible_count();
        if eligible == 0 {
            log::debug!("no eligible half-edges, nothing to reconstruct");
            return Ok(ReconstructReport::empty());
        }

        let (master, triangle) = search.seed();
        let open = search.run(master, triangle, progress).map_err(|e| {
            log::warn!("face reconstruction stalled: {}", e);
            e
        })?;
        if let Some(p) = progress {
            p.report(eligible, eligible, "Face reconstruction complete");
        }
        (search.into_face_boundaries(), open.len())
    };

    let faces: Vec<FaceId<I>> = boundaries
        .iter()
        .map(|boundary| mesh.add_face(boundary, F::default()))
        .collect();

    log::info!(
        "reconstructed {} faces, {} open loops left",
        faces.len(),
        open_loops
    );
    if open_loops > 0 {
        log::warn!("{} loops could not be closed", open_loops);
    }

    Ok(ReconstructReport {
        faces,
        open_loops,
        stalled_components: 0,
    })
}

/// Vertex payloads with a position in space.
pub trait VertexPosition {
    /// Position of the vertex.
    fn position(&self) -> Point3<f64>;
}

impl VertexPosition for Point3<f64> {
    #[inline]
    fn position(&self) -> Point3<f64> {
        *self
    }
}

impl VertexPosition for Vector3<f64> {
    #[inline]
    fn position(&self) -> Point3<f64> {
        Point3::from(*self)
    }
}

impl VertexPosition for [f64; 3] {
    #[inline]
    fn position(&self) -> Point3<f64> {
        Point3::from(*self)
    }
}

/// Absolute cosine of the angle between two half-edge directions.
///
/// 1.0 for parallel or anti-parallel edges, 0.0 for perpendicular ones or when
/// either edge has zero length.
pub fn direction_parallelism<V, H, F, I>(
    mesh: &Mesh<V, H, F, I>,
    a: HalfEdgeId<I>,
    b: HalfEdgeId<I>,
) -> f64
where
    V: VertexPosition,
    I: MeshIndex,
{
    let direction = |h: HalfEdgeId<I>| -> Vector3<f64> {
        mesh.vertex_data(mesh.to(h)).position() - mesh.vertex_data(mesh.from(h)).position()
    };
    let (u, v) = (direction(a), direction(b));
    let norms = u.norm() * v.norm();
    if norms == 0.0 {
        return 0.0;
    }
    (u.dot(&v) / norms).abs().min(1.0)
}

/// Reconstruct faces in every connected component, scoring by edge direction.
///
/// Components whose search cannot start are skipped with a warning and counted
/// in [`ReconstructReport::stalled_components`].
pub fn reconstruct_all_faces<V, H, F, I>(
    mesh: &mut Mesh<V, H, F, I>,
    options: &ReconstructOptions,
) -> Result<ReconstructReport<I>>
where
    V: VertexPosition,
    F: Default,
    I: MeshIndex,
{
    reconstruct_all_faces_internal(mesh, options, None)
}

/// Reconstruct faces per component with progress reporting.
///
/// Progress is reported once per component. See [`reconstruct_all_faces`].
pub fn reconstruct_all_faces_with_progress<V, H, F, I>(
    mesh: &mut Mesh<V, H, F, I>,
    options: &ReconstructOptions,
    progress: &Progress,
) -> Result<ReconstructReport<I>>
where
    V: VertexPosition,
    F: Default,
    I: MeshIndex,
{
    reconstruct_all_faces_internal(mesh, options, Some(progress))
}

fn reconstruct_all_faces_internal<V, H, F, I>(
    mesh: &mut Mesh<V, H, F, I>,
    options: &ReconstructOptions,
    progress: Option<&Progress>,
) -> Result<ReconstructReport<I>>
where
    V: VertexPosition,
    F: Default,
    I: MeshIndex,
{
    options.validate()?;

    let mut labels = vec![usize::MAX; mesh.vertex_capacity()];
    let count = connected_components(mesh, |_, v, c| labels[v.index()] = c);
    log::debug!("reconstructing faces in {} components", count);

    let mut report = ReconstructReport::empty();
    for component in 0..count {
        if let Some(p) = progress {
            p.report(component, count, "Reconstructing component");
        }
        let in_component =
            |m: &Mesh<V, H, F, I>, h: HalfEdgeId<I>| labels[m.from(h).index()] == component;
        match reconstruct_faces_internal(mesh, direction_parallelism, in_component, options, None) {
            Ok(part) => report.absorb(part),
            Err(MeshError::ReconstructionStalled { eligible_halfedges }) => {
                log::warn!(
                    "component {} skipped: no starting move among {} half-edges",
                    component,
                    eligible_halfedges
                );
                report.stalled_components += 1;
            }
            Err(e) => return Err(e),
        }
    }
    if let Some(p) = progress {
        p.report(count, count, "Face reconstruction complete");
    }

    log::info!(
        "reconstructed {} faces in {} components ({} stalled)",
        report.faces.len(),
        count,
        report.stalled_components
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{
        build_wireframe, make_cube_wireframe, make_icosahedron_wireframe, make_tetrahedron,
        make_tri_cube, VertexId,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    type PointMesh = Mesh<Point3<f64>>;

    fn run(mesh: &mut PointMesh) -> Result<ReconstructReport> {
        reconstruct_faces(
            mesh,
            direction_parallelism,
            |_, _| true,
            &ReconstructOptions::default(),
        )
    }

    fn strip_faces(mut mesh: PointMesh) -> PointMesh {
        let faces: Vec<FaceId> = mesh.face_ids().collect();
        for f in faces {
            mesh.remove_face(f);
        }
        mesh
    }

    fn assert_closed_surface(mesh: &PointMesh) {
        assert!(mesh.is_valid());
        assert!(mesh.halfedge_ids().all(|h| mesh.face_of(h).is_valid()));
    }

    #[test]
    fn test_icosahedron_wireframe() {
        let mut mesh = make_icosahedron_wireframe();
        let report = run(&mut mesh).unwrap();

        assert_eq!(report.faces.len(), 20);
        assert_eq!(report.open_loops, 0);
        assert!(report.faces.iter().all(|&f| mesh.face_halfedges(f).len() == 3));
        assert_closed_surface(&mesh);
    }

    #[test]
    fn test_cube_wireframe() {
        let mut mesh = make_cube_wireframe();
        let report = run(&mut mesh).unwrap();

        assert_eq!(report.faces.len(), 6);
        assert_eq!(report.open_loops, 0);
        assert!(report.faces.iter().all(|&f| mesh.face_halfedges(f).len() == 4));
        assert_closed_surface(&mesh);
    }

    #[test]
    fn test_tetrahedron_edges() {
        let mut mesh = strip_faces(make_tetrahedron());
        let report = run(&mut mesh).unwrap();

        assert_eq!(report.faces.len(), 4);
        assert_eq!(report.open_loops, 0);
        assert_closed_surface(&mesh);
    }

    #[test]
    fn test_triangulated_cube_edges() {
        let mut mesh = strip_faces(make_tri_cube());
        let report = run(&mut mesh).unwrap();

        assert_eq!(report.faces.len(), 12);
        assert!(report.faces.iter().all(|&f| mesh.face_halfedges(f).len() == 3));
        assert_closed_surface(&mesh);
    }

    #[test]
    fn test_prism_mixes_triangles_and_quads() {
        let points: Vec<Point3<f64>> = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
        ]
        .iter()
        .map(|&p| Point3::from(p))
        .collect();
        let edges = [
            [0, 1],
            [1, 2],
            [2, 0],
            [3, 4],
            [4, 5],
            [5, 3],
            [0, 3],
            [1, 4],
            [2, 5],
        ];
        let mut mesh: PointMesh = build_wireframe(&points, &edges).unwrap();
        let report = run(&mut mesh).unwrap();

        let mut sizes: Vec<usize> = report
            .faces
            .iter()
            .map(|&f| mesh.face_halfedges(f).len())
            .collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 3, 4, 4, 4]);
        assert_closed_surface(&mesh);
    }

    #[test]
    fn test_faces_are_consistently_oriented() {
        let mut mesh = make_cube_wireframe();
        run(&mut mesh).unwrap();
        // Each edge is used once in each direction.
        for h in mesh.halfedge_ids() {
            assert_ne!(mesh.face_of(h), mesh.face_of(mesh.opposite(h)));
        }
    }

    #[test]
    fn test_stall_without_starting_move() {
        // A square: every vertex has two edges and there is no triangle.
        let points: Vec<[f64; 3]> = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        let mut mesh: Mesh<[f64; 3]> =
            build_wireframe(&points, &[[0, 1], [1, 2], [2, 3], [3, 0]]).unwrap();
        let result = reconstruct_faces(
            &mut mesh,
            direction_parallelism,
            |_, _| true,
            &ReconstructOptions::default(),
        );

        assert!(matches!(
            result,
            Err(MeshError::ReconstructionStalled {
                eligible_halfedges: 8
            })
        ));
        assert_eq!(mesh.num_faces(), 0);
    }

    #[test]
    fn test_pendant_edges_leave_open_loops() {
        // Triangle 0-3-4 with two pendant edges hanging off vertex 0.
        let points: Vec<Point3<f64>> = [
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
            [2.0, 1.0, 0.0],
            [1.0, 0.0, 1.0],
        ]
        .iter()
        .map(|&p| Point3::from(p))
        .collect();
        let edges = [[0, 1], [0, 2], [0, 3], [0, 4], [3, 4]];

        for idle in [1, 3] {
            let mut mesh: PointMesh = build_wireframe(&points, &edges).unwrap();
            let options = ReconstructOptions::default().with_max_idle_phases(idle);
            let report =
                reconstruct_faces(&mut mesh, direction_parallelism, |_, _| true, &options).unwrap();

            assert!(report.open_loops > 0);
            assert_eq!(report.faces.len(), 2);
            assert!(report.faces.iter().all(|&f| mesh.face_halfedges(f).len() == 3));
            assert!(mesh.is_valid());

            // The pendant edges stay without faces.
            let v = |i: usize| VertexId::new(i);
            for tip in [1, 2] {
                let h = mesh.find_edge(v(0), v(tip));
                assert!(!mesh.face_of(h).is_valid());
                assert!(!mesh.face_of(mesh.opposite(h)).is_valid());
            }
        }
    }

    #[test]
    fn test_empty_mask_is_a_no_op() {
        let mut mesh = make_cube_wireframe();
        let report = reconstruct_faces(
            &mut mesh,
            direction_parallelism,
            |_, _| false,
            &ReconstructOptions::default(),
        )
        .unwrap();

        assert!(report.faces.is_empty());
        assert_eq!(report.open_loops, 0);
        assert_eq!(mesh.num_faces(), 0);
    }

    #[test]
    fn test_existing_faces_are_kept() {
        let mut mesh = make_tetrahedron();
        let report = run(&mut mesh).unwrap();
        assert!(report.faces.is_empty());
        assert_eq!(mesh.num_faces(), 4);
    }

    #[test]
    fn test_invalid_options() {
        let mut mesh = make_cube_wireframe();
        let options = ReconstructOptions::default().with_parallel_threshold(1.5);
        let result = reconstruct_faces(&mut mesh, direction_parallelism, |_, _| true, &options);
        assert!(matches!(
            result,
            Err(MeshError::InvalidParameter {
                name: "parallel_threshold",
                ..
            })
        ));

        assert!(ReconstructOptions::default().with_matting_exponent(0).validate().is_err());
        assert!(ReconstructOptions::default().with_matting_floor(0.0).validate().is_err());
        assert!(ReconstructOptions::default().with_merge_factor(f64::NAN).validate().is_err());
        assert!(ReconstructOptions::default().with_max_idle_phases(0).validate().is_err());
        assert!(ReconstructOptions::default()
            .with_priorities(100.0, f64::INFINITY, 150.0, 200.0)
            .validate()
            .is_err());
        assert!(ReconstructOptions::default().validate().is_ok());
    }

    #[test]
    fn test_phase_transitions() {
        use Outcome::*;
        use Phase::*;

        assert_eq!(Init.next(Idle), TopForce);
        assert_eq!(TopForce.next(Concatenated), TopForce);
        assert_eq!(TopForce.next(FaceClosed), TopForce);
        assert_eq!(TopForce.next(Idle), TopMerge);
        assert_eq!(TopMerge.next(FaceClosed), TopForce);
        assert_eq!(TopMerge.next(Idle), SubMatting);
        assert_eq!(SubMatting.next(Concatenated), SubForce);
        assert_eq!(SubMatting.next(Idle), SubForce);
        assert_eq!(SubForce.next(Concatenated), SubForce);
        assert_eq!(SubForce.next(Idle), SubMerge);
        assert_eq!(SubMerge.next(Idle), SubMatting);
        for phase in [SubMatting, SubForce, SubMerge] {
            assert_eq!(phase.next(FaceClosed), TopForce);
        }
        assert_eq!(Done.next(FaceClosed), Done);
    }

    #[test]
    fn test_direction_parallelism() {
        let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [2.0, 0.0, 0.0]];
        let mesh: Mesh<[f64; 3]> = build_wireframe(&points, &[[0, 1], [0, 2], [3, 1]]).unwrap();
        let v = |i: usize| VertexId::new(i);
        let x = mesh.find_edge(v(0), v(1));
        let y = mesh.find_edge(v(0), v(2));
        let back = mesh.find_edge(v(3), v(1));

        assert!((direction_parallelism(&mesh, x, back) - 1.0).abs() < 1e-12);
        assert!(direction_parallelism(&mesh, x, y).abs() < 1e-12);
    }

    #[test]
    fn test_reconstruct_all_components() {
        let mut mesh = make_icosahedron_wireframe();
        let cube = make_cube_wireframe();
        mesh.unite(&cube);

        // A lone square cannot start and is skipped.
        let corners: Vec<_> = [[5.0, 0.0, 0.0], [6.0, 0.0, 0.0], [6.0, 1.0, 0.0], [5.0, 1.0, 0.0]]
            .iter()
            .map(|&p| mesh.add_vertex(Point3::from(p)))
            .collect();
        for i in 0..4 {
            mesh.connect(corners[i], corners[(i + 1) % 4]);
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let progress = Progress::new(move |_, _, _| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        let report =
            reconstruct_all_faces_with_progress(&mut mesh, &ReconstructOptions::default(), &progress)
                .unwrap();

        assert_eq!(report.faces.len(), 26);
        assert_eq!(report.stalled_components, 1);
        assert_eq!(report.open_loops, 0);
        assert_eq!(mesh.num_faces(), 26);
        assert!(mesh.is_valid());
        // One report per component plus the final one.
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_progress_reaches_total() {
        let mut mesh = make_cube_wireframe();
        let last = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&last);
        let progress = Progress::new(move |current, total, _| {
            assert!(current <= total);
            seen.store(current, Ordering::Relaxed);
        });
        reconstruct_faces_with_progress(
            &mut mesh,
            direction_parallelism,
            |_, _| true,
            &ReconstructOptions::default(),
            &progress,
        )
        .unwrap();
        assert_eq!(last.load(Ordering::Relaxed), 24);
    }
}
