use proptest::prelude::*;

use super::*;

/// Random edge lists over `n` vertices, self loops filtered out.
fn wireframe_input() -> impl Strategy<Value = (usize, Vec<[usize; 2]>)> {
    (3usize..12).prop_flat_map(|n| {
        let edges = prop::collection::vec((0..n, 0..n), 0..30)
            .prop_map(|pairs| {
                pairs
                    .into_iter()
                    .filter(|(a, b)| a != b)
                    .map(|(a, b)| [a, b])
                    .collect::<Vec<_>>()
            });
        (Just(n), edges)
    })
}

fn points(n: usize) -> Vec<[f64; 3]> {
    (0..n).map(|i| [i as f64, 0.0, 0.0]).collect()
}

proptest! {
    #[test]
    fn prop_wireframe_is_valid((n, edges) in wireframe_input()) {
        let mesh: Mesh<[f64; 3]> = build_wireframe(&points(n), &edges).unwrap();
        prop_assert!(mesh.is_valid());
        prop_assert_eq!(mesh.num_vertices(), n);
        prop_assert_eq!(mesh.num_halfedges() % 2, 0);

        let degree_sum: usize = mesh.vertex_ids().map(|v| mesh.degree(v)).sum();
        prop_assert_eq!(degree_sum, mesh.num_halfedges());
    }

    #[test]
    fn prop_gc_after_removals(
        (n, edges) in wireframe_input(),
        doomed in prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    ) {
        let mut mesh: Mesh<[f64; 3]> = build_wireframe(&points(n), &edges).unwrap();
        for d in &doomed {
            mesh.remove_vertex(VertexId::new(d.index(n)));
        }
        prop_assert!(mesh.is_valid());

        let (nv, nh) = (mesh.num_vertices(), mesh.num_halfedges());
        let survivors: Vec<[f64; 3]> = mesh.vertex_ids().map(|v| *mesh.vertex_data(v)).collect();

        let remap = mesh.gc();
        prop_assert!(mesh.is_valid());
        prop_assert_eq!(mesh.num_vertices(), nv);
        prop_assert_eq!(mesh.num_halfedges(), nh);
        prop_assert_eq!(mesh.vertex_capacity(), nv);
        prop_assert_eq!(mesh.halfedge_capacity(), nh);

        // Relative order of survivors is kept.
        let after: Vec<[f64; 3]> = mesh.vertex_ids().map(|v| *mesh.vertex_data(v)).collect();
        prop_assert_eq!(after, survivors);

        for d in &doomed {
            prop_assert!(!remap.vertex(VertexId::new(d.index(n))).is_valid());
        }

        // A second collection has nothing left to do.
        let again = mesh.gc();
        prop_assert!(again.is_identity());
    }

    #[test]
    fn prop_polygon_roundtrip(n in 3usize..16) {
        let polygon: Vec<usize> = (0..n).collect();
        let mesh: Mesh<[f64; 3]> = build_from_polygons(&points(n), &[polygon.clone()]).unwrap();
        prop_assert_eq!(mesh.num_halfedges(), 2 * n);
        prop_assert_eq!(mesh.num_faces(), 1);

        let (vertices, faces) = to_face_vertex(&mesh);
        prop_assert_eq!(vertices, points(n));
        prop_assert_eq!(faces, vec![polygon]);
    }
}

#[test]
fn test_tetrahedron_face_removal_and_gc() {
    let mut mesh = make_tetrahedron();
    mesh.remove_face(FaceId::new(1));
    let remap = mesh.gc();

    assert_eq!(mesh.num_vertices(), 4);
    assert_eq!(mesh.num_faces(), 3);
    assert_eq!(mesh.num_halfedges(), 12);
    assert!(!remap.face(FaceId::new(1)).is_valid());
    assert_eq!(remap.face(FaceId::new(3)), FaceId::new(2));

    for f in mesh.face_ids() {
        let boundary = mesh.face_halfedges(f);
        assert_eq!(boundary.len(), 3);
        for (i, &h) in boundary.iter().enumerate() {
            let next = boundary[(i + 1) % boundary.len()];
            assert_eq!(mesh.to(h), mesh.from(next));
            assert_eq!(mesh.face_of(h), f);
        }
    }
    assert!(mesh.is_valid());
}
