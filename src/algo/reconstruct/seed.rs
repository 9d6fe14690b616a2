//! Initial loops and their priorities.
//!
//! Every eligible half-edge becomes a singleton loop with the base priority.
//! Half-edges on a triangle get the triangle priority; half-edges on a
//! quadrilateral with two pairs of parallel opposite sides get the quad
//! priority, or the double-quad priority when two such quads share them.

use std::collections::BTreeSet;

use crate::mesh::{HalfEdgeId, MeshIndex};

use super::loops::LoopId;
use super::search::Search;

impl<V, H, F, I: MeshIndex> Search<'_, V, H, F, I> {
    /// Spawn and rank the singleton loops.
    ///
    /// Returns the master list (loop ids by descending priority, ties in
    /// half-edge order) and the last triangle found, if any.
    pub fn seed(&mut self) -> (Vec<LoopId>, Option<[HalfEdgeId<I>; 3]>) {
        let base = self.options.base_priority;
        for h in self.mesh.halfedge_ids() {
            if self.is_eligible(h) {
                self.loops.spawn(vec![h], base);
            }
        }

        let triangle = self.seed_triangles();
        self.seed_quads();

        let mut master: Vec<LoopId> = self.loops.ids().collect();
        master.sort_by(|&a, &b| {
            self.loops
                .get(b)
                .priority
                .total_cmp(&self.loops.get(a).priority)
        });
        log::debug!(
            "seeded {} loops, triangle: {}",
            master.len(),
            triangle.is_some()
        );
        (master, triangle)
    }

    fn boost(&mut self, h: HalfEdgeId<I>, priority: f64) {
        if let Some(l) = self.loops.owner(h) {
            self.loops.get_mut(l).priority = priority;
        }
    }

    /// Boost every triangle `v -> a -> b -> v` found from two outgoing half-edges
    /// of `v` and one half-edge joining their far ends.
    fn seed_triangles(&mut self) -> Option<[HalfEdgeId<I>; 3]> {
        let mesh = self.mesh;
        let base = self.options.base_priority;
        let boosted = self.options.triangle_priority;
        let mut triangle = None;

        for v in mesh.vertex_ids() {
            let out = mesh.outgoing(v);
            for (i, &h1) in out.iter().enumerate() {
                if !self.is_eligible(h1) {
                    continue;
                }
                let seeded = self
                    .loops
                    .owner(h1)
                    .is_some_and(|l| self.loops.get(l).priority > base);
                if seeded {
                    continue;
                }
                let a = mesh.to(h1);
                for (j, &h2) in out.iter().enumerate() {
                    if i == j || !self.is_eligible(h2) {
                        continue;
                    }
                    let b = mesh.to(h2);
                    for &h3 in mesh.outgoing(a) {
                        if !self.is_eligible(h3) || mesh.to(h3) != b {
                            continue;
                        }
                        triangle = Some([h1, h3, mesh.opposite(h2)]);
                        for h in [h1, h2, h3] {
                            self.boost(h, boosted);
                            self.boost(mesh.opposite(h), boosted);
                        }
                    }
                }
            }
        }
        triangle
    }

    /// Record quads `h1, hs, h2, he` where `h1` is parallel to `h2` and `hs` to
    /// `he`, with `hs` leaving the start of `h1` and `he` leaving its end.
    fn seed_quads(&mut self) {
        let mesh = self.mesh;
        let threshold = self.options.parallel_threshold;
        let slots = mesh.halfedge_capacity();
        let mut quad_count = 0usize;
        let mut membership: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); slots];

        for i in 0..slots {
            let h1 = HalfEdgeId::new(i);
            if !self.is_eligible(h1) {
                continue;
            }
            let (s, e) = (mesh.from(h1), mesh.to(h1));
            for k in (i + 1)..slots {
                let h2 = HalfEdgeId::new(k);
                if !self.is_eligible(h2) || (self.score)(h1, h2) < threshold {
                    continue;
                }
                if !membership[i].is_disjoint(&membership[k]) {
                    continue;
                }
                for &hs in mesh.outgoing(s) {
                    if hs == h1 || !self.is_eligible(hs) {
                        continue;
                    }
                    let end = if mesh.to(hs) == mesh.from(h2) {
                        mesh.to(h2)
                    } else if mesh.to(hs) == mesh.to(h2) {
                        mesh.from(h2)
                    } else {
                        continue;
                    };
                    for &he in mesh.outgoing(e) {
                        if he == h1 || !self.is_eligible(he) || mesh.to(he) != end {
                            continue;
                        }
                        if (self.score)(he, hs) < threshold {
                            continue;
                        }
                        let q = quad_count;
                        quad_count += 1;
                        for h in [h1, hs, h2, he] {
                            membership[h.index()].insert(q);
                            membership[mesh.opposite(h).index()].insert(q);
                        }
                    }
                }
            }
        }

        for (i, quads) in membership.iter().enumerate() {
            let priority = match quads.len() {
                0 => continue,
                1 => self.options.quad_priority,
                _ => self.options.double_quad_priority,
            };
            self.boost(HalfEdgeId::new(i), priority);
        }
        log::debug!("recorded {} candidate quads", quad_count);
    }
}
