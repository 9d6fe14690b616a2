//! Reference polyhedra.
//!
//! Small closed solids used as fixtures and for sanity checks. The `*_wireframe`
//! variants carry edges only; their faces are meant to be recovered with
//! [`reconstruct_faces`](crate::algo::reconstruct::reconstruct_faces).

use nalgebra::Point3;

use super::container::Mesh;
use super::index::VertexId;

const CUBE_CORNERS: [[f64; 3]; 8] = [
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0],
];

const CUBE_QUADS: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [1, 5, 6, 2],
    [5, 4, 7, 6],
    [4, 0, 3, 7],
    [4, 5, 1, 0],
    [3, 2, 6, 7],
];

const ICOSAHEDRON_TRIANGLES: [[usize; 3]; 20] = [
    [0, 1, 2],
    [0, 2, 3],
    [0, 3, 4],
    [0, 4, 5],
    [0, 5, 1],
    [11, 6, 7],
    [11, 7, 8],
    [11, 8, 9],
    [11, 9, 10],
    [11, 10, 6],
    [1, 2, 6],
    [2, 3, 7],
    [3, 4, 8],
    [4, 5, 9],
    [5, 1, 10],
    [6, 7, 2],
    [7, 8, 3],
    [8, 9, 4],
    [9, 10, 5],
    [10, 6, 1],
];

/// Latitude of the two inner vertex rings of the icosahedron, in degrees.
const ICOSAHEDRON_RING_LATITUDE: f64 = 26.56505;

fn add_points(mesh: &mut Mesh<Point3<f64>>, points: impl IntoIterator<Item = Point3<f64>>) -> Vec<VertexId> {
    points.into_iter().map(|p| mesh.add_vertex(p)).collect()
}

fn polyhedron<const N: usize>(points: Vec<Point3<f64>>, faces: &[[usize; N]]) -> Mesh<Point3<f64>> {
    let mut mesh = Mesh::with_capacity(points.len(), faces.len() * N / 2, faces.len());
    let ids = add_points(&mut mesh, points);
    for face in faces {
        let corners: Vec<VertexId> = face.iter().map(|&i| ids[i]).collect();
        mesh.add_face_from_vertices(&corners, true, ());
    }
    mesh
}

fn cube_points() -> Vec<Point3<f64>> {
    CUBE_CORNERS.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect()
}

fn icosahedron_points() -> Vec<Point3<f64>> {
    let phi = ICOSAHEDRON_RING_LATITUDE.to_radians();
    let ring = |latitude: f64, offset: f64| {
        (0..5).map(move |k| {
            let theta = (offset + 72.0 * k as f64).to_radians();
            Point3::new(
                theta.cos() * latitude.cos(),
                theta.sin() * latitude.cos(),
                latitude.sin(),
            )
        })
    };

    let mut points = Vec::with_capacity(12);
    points.push(Point3::new(0.0, 0.0, 1.0));
    points.extend(ring(phi, 0.0));
    points.extend(ring(-phi, 36.0));
    points.push(Point3::new(0.0, 0.0, -1.0));
    points
}

/// Tetrahedron with four triangular faces on the unit corner.
pub fn make_tetrahedron() -> Mesh<Point3<f64>> {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
    ];
    polyhedron(points, &[[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]])
}

/// Unit cube with six quad faces.
pub fn make_quad_cube() -> Mesh<Point3<f64>> {
    polyhedron(cube_points(), &CUBE_QUADS)
}

/// Unit cube with each quad split into two triangles (twelve faces).
pub fn make_tri_cube() -> Mesh<Point3<f64>> {
    let triangles: Vec<[usize; 3]> = CUBE_QUADS
        .iter()
        .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
        .collect();
    polyhedron(cube_points(), &triangles)
}

/// Edges of the unit cube (8 vertices, 12 edges, no faces).
pub fn make_cube_wireframe() -> Mesh<Point3<f64>> {
    let mut mesh = Mesh::with_capacity(8, 12, 0);
    let ids = add_points(&mut mesh, cube_points());
    for quad in &CUBE_QUADS {
        for i in 0..4 {
            mesh.connect(ids[quad[i]], ids[quad[(i + 1) % 4]]);
        }
    }
    mesh
}

/// Edges of a unit-radius icosahedron (12 vertices, 30 edges, no faces).
///
/// Vertex 0 is the north pole, 11 the south pole; 1..=5 and 6..=10 form the two
/// staggered rings in between.
pub fn make_icosahedron_wireframe() -> Mesh<Point3<f64>> {
    let mut mesh = Mesh::with_capacity(12, 30, 0);
    let ids = add_points(&mut mesh, icosahedron_points());
    for &[a, b, c] in &ICOSAHEDRON_TRIANGLES {
        mesh.connect(ids[a], ids[b]);
        mesh.connect(ids[b], ids[c]);
        mesh.connect(ids[c], ids[a]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn euler_characteristic(mesh: &Mesh<Point3<f64>>) -> i64 {
        mesh.num_vertices() as i64 - (mesh.num_halfedges() / 2) as i64 + mesh.num_faces() as i64
    }

    #[test]
    fn test_tetrahedron() {
        let mesh = make_tetrahedron();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert_eq!(mesh.num_faces(), 4);
        assert!(mesh.is_valid());
        // Closed: every half-edge bounds a face.
        assert!(mesh.halfedge_ids().all(|h| mesh.face_of(h).is_valid()));
        assert_eq!(euler_characteristic(&mesh), 2);
    }

    #[test]
    fn test_quad_cube() {
        let mesh = make_quad_cube();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_halfedges(), 24);
        assert_eq!(mesh.num_faces(), 6);
        assert!(mesh.is_valid());
        assert!(mesh.halfedge_ids().all(|h| mesh.face_of(h).is_valid()));
        assert!(mesh.face_ids().all(|f| mesh.face_halfedges(f).len() == 4));
    }

    #[test]
    fn test_tri_cube() {
        let mesh = make_tri_cube();
        assert_eq!(mesh.num_halfedges(), 36);
        assert_eq!(mesh.num_faces(), 12);
        assert!(mesh.is_valid());
        assert_eq!(euler_characteristic(&mesh), 2);
    }

    #[test]
    fn test_cube_wireframe() {
        let mesh = make_cube_wireframe();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_halfedges(), 24);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.vertex_ids().all(|v| mesh.degree(v) == 3));
    }

    #[test]
    fn test_icosahedron_wireframe() {
        let mesh = make_icosahedron_wireframe();
        assert_eq!(mesh.num_vertices(), 12);
        assert_eq!(mesh.num_halfedges(), 60);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.vertex_ids().all(|v| mesh.degree(v) == 5));
        assert!(mesh.is_valid());

        for v in mesh.vertex_ids() {
            assert!((mesh.vertex_data(v).coords.norm() - 1.0).abs() < 1e-9);
        }
    }
}
