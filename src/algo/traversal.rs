//! Vertex graph traversal.
//!
//! Walks follow outgoing half-edges, so removed edges are never crossed. All
//! walks use an explicit stack and visit vertices in the same preorder a
//! recursive walk over outgoing lists would produce.

use crate::mesh::{Mesh, MeshIndex, VertexId};

/// Depth-first walk from `root`, marking vertices in `visited` (indexed by slot).
///
/// `visitor` is called once per newly reached vertex. The walk stops as soon as
/// it returns `false`; the function then returns `false` too.
///
/// # Panics
/// Panics if `visited` is shorter than the vertex capacity or `root` is not live.
pub fn depth_first_search_from<V, H, F, I, C>(
    mesh: &Mesh<V, H, F, I>,
    root: VertexId<I>,
    visited: &mut [bool],
    visitor: &mut C,
) -> bool
where
    I: MeshIndex,
    C: FnMut(&Mesh<V, H, F, I>, VertexId<I>) -> bool,
{
    if visited[root.index()] {
        return true;
    }
    visited[root.index()] = true;
    if !visitor(mesh, root) {
        return false;
    }

    // (vertex, position of the next outgoing half-edge to try)
    let mut stack = vec![(root, 0usize)];
    while let Some(top) = stack.last_mut() {
        let (v, next) = *top;
        let outgoing = mesh.outgoing(v);
        if next >= outgoing.len() {
            stack.pop();
            continue;
        }
        top.1 += 1;

        let h = outgoing[next];
        if mesh.is_halfedge_removed(h) {
            continue;
        }
        let w = mesh.to(h);
        if visited[w.index()] {
            continue;
        }
        visited[w.index()] = true;
        if !visitor(mesh, w) {
            return false;
        }
        stack.push((w, 0));
    }
    true
}

/// Depth-first walk over every live vertex, restarting from each unvisited one.
///
/// Returns `true` when all live vertices were visited, `false` when `visitor`
/// stopped the walk early.
pub fn depth_first_search<V, H, F, I, C>(mesh: &Mesh<V, H, F, I>, mut visitor: C) -> bool
where
    I: MeshIndex,
    C: FnMut(&Mesh<V, H, F, I>, VertexId<I>) -> bool,
{
    let mut visited = vec![false; mesh.vertex_capacity()];
    for v in mesh.vertex_ids() {
        if !depth_first_search_from(mesh, v, &mut visited, &mut visitor) {
            return false;
        }
    }
    true
}

/// Label connected components.
///
/// `recorder` receives every live vertex with its component id; ids are dense,
/// starting at 0, in order of each component's lowest vertex handle. Returns the
/// number of components.
///
/// # Example
/// ```
/// use wiremesh::algo::traversal::connected_components;
/// use wiremesh::mesh::{build_wireframe, Mesh};
///
/// let mesh: Mesh<()> = build_wireframe(&[(); 5], &[[0, 1], [2, 3], [3, 4]]).unwrap();
/// let mut labels = vec![usize::MAX; 5];
/// let count = connected_components(&mesh, |_, v, c| labels[v.index()] = c);
///
/// assert_eq!(count, 2);
/// assert_eq!(labels, vec![0, 0, 1, 1, 1]);
/// ```
pub fn connected_components<V, H, F, I, R>(mesh: &Mesh<V, H, F, I>, mut recorder: R) -> usize
where
    I: MeshIndex,
    R: FnMut(&Mesh<V, H, F, I>, VertexId<I>, usize),
{
    let mut visited = vec![false; mesh.vertex_capacity()];
    let mut count = 0;
    for v in mesh.vertex_ids() {
        if visited[v.index()] {
            continue;
        }
        let component = count;
        depth_first_search_from(mesh, v, &mut visited, &mut |m: &Mesh<V, H, F, I>, w: VertexId<I>| {
            recorder(m, w, component);
            true
        });
        count += 1;
    }
    count
}

/// Repeatedly remove vertices with fewer than two incident edges.
///
/// Removing a vertex also removes its edges, which can expose new dangling
/// vertices; the pruning runs until none is left. Returns the number of vertices
/// removed.
pub fn remove_dangling_components<V, H, F, I>(mesh: &mut Mesh<V, H, F, I>) -> usize
where
    I: MeshIndex,
{
    let mut removed = 0;
    loop {
        let dangling: Vec<VertexId<I>> = mesh.vertex_ids().filter(|&v| mesh.degree(v) < 2).collect();
        if dangling.is_empty() {
            break;
        }
        removed += dangling.len();
        for v in dangling {
            mesh.remove_vertex(v);
        }
    }
    log::debug!("pruned {} dangling vertices", removed);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_wireframe, make_tetrahedron};

    fn path_and_triangle() -> Mesh<u32> {
        // 0-1-2 path, 3-4-5 triangle, 6 isolated
        let vertices: Vec<u32> = (0..7).collect();
        build_wireframe(&vertices, &[[0, 1], [1, 2], [3, 4], [4, 5], [5, 3]]).unwrap()
    }

    #[test]
    fn test_dfs_visits_every_live_vertex_once() {
        let mut mesh = path_and_triangle();
        mesh.remove_vertex(VertexId::new(1));

        let mut seen = Vec::new();
        assert!(depth_first_search(&mesh, |_, v| {
            seen.push(v.index());
            true
        }));
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_dfs_preorder() {
        let vertices: Vec<u32> = (0..5).collect();
        // 0 -> {1, 3}, 1 -> 2, 3 -> 4
        let mesh: Mesh<u32> = build_wireframe(&vertices, &[[0, 1], [1, 2], [0, 3], [3, 4]]).unwrap();

        let mut order = Vec::new();
        depth_first_search(&mesh, |_, v| {
            order.push(v.index());
            true
        });
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_dfs_stops_early() {
        let mesh = path_and_triangle();
        let mut calls = 0;
        let finished = depth_first_search(&mesh, |_, _| {
            calls += 1;
            calls < 2
        });
        assert!(!finished);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_connected_components() {
        let mesh = path_and_triangle();
        let mut labels = vec![usize::MAX; mesh.vertex_capacity()];
        let count = connected_components(&mesh, |_, v, c| labels[v.index()] = c);

        assert_eq!(count, 3);
        assert_eq!(labels, vec![0, 0, 0, 1, 1, 1, 2]);
    }

    #[test]
    fn test_components_split_by_removal() {
        let mut mesh = path_and_triangle();
        mesh.remove_vertex(VertexId::new(1));
        let count = connected_components(&mesh, |_, _, _| {});
        // {0}, {2}, {3, 4, 5}, {6}
        assert_eq!(count, 4);
    }

    #[test]
    fn test_prune_pendant_vertex() {
        let mut mesh = make_tetrahedron();
        let faces: Vec<_> = mesh.face_ids().collect();
        let anchor = VertexId::new(0);
        let pendant = mesh.add_vertex(nalgebra::Point3::new(-1.0, -1.0, -1.0));
        let stem = mesh.connect(anchor, pendant);

        let removed = remove_dangling_components(&mut mesh);
        assert_eq!(removed, 1);
        assert!(mesh.is_vertex_removed(pendant));
        assert!(mesh.is_halfedge_removed(stem));
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(faces.iter().all(|&f| !mesh.is_face_removed(f)));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_prune_cascades_along_tendril() {
        let mut mesh = path_and_triangle();
        let removed = remove_dangling_components(&mut mesh);

        // The whole path and the isolated vertex go; the triangle stays.
        assert_eq!(removed, 4);
        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_halfedges(), 6);
        assert_eq!(remove_dangling_components(&mut mesh), 0);
    }
}
