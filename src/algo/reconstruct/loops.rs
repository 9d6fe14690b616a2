//! Loop arena for the face search.
//!
//! A loop is a chain of half-edges where each one ends where the next begins.
//! Every eligible half-edge starts out as its own singleton loop; the search
//! concatenates loops until they close into face boundaries. Half-edges refer to
//! their current loop through an id side table, so concatenation only has to
//! repoint the absorbed half-edges.

use crate::mesh::{HalfEdgeId, MeshIndex};

use super::ReconstructOptions;

/// Handle of a loop in a [`LoopArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct LoopId(usize);

#[derive(Debug, Clone)]
pub(crate) struct Loop<I: MeshIndex> {
    pub halfedges: Vec<HalfEdgeId<I>>,
    pub priority: f64,
    pub closed: bool,
}

impl<I: MeshIndex> Loop<I> {
    pub fn first(&self) -> HalfEdgeId<I> {
        self.halfedges[0]
    }

    pub fn last(&self) -> HalfEdgeId<I> {
        self.halfedges[self.halfedges.len() - 1]
    }

    pub fn is_singleton(&self) -> bool {
        self.halfedges.len() == 1
    }
}

#[derive(Debug)]
pub(crate) struct LoopArena<I: MeshIndex> {
    loops: Vec<Loop<I>>,
    owner: Vec<Option<LoopId>>,
}

impl<I: MeshIndex> LoopArena<I> {
    /// An empty arena able to track half-edges up to `halfedge_capacity`.
    pub fn new(halfedge_capacity: usize) -> Self {
        Self {
            loops: Vec::new(),
            owner: vec![None; halfedge_capacity],
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = LoopId> {
        (0..self.loops.len()).map(LoopId)
    }

    /// Create an open loop over `halfedges` and make it their owner.
    pub fn spawn(&mut self, halfedges: Vec<HalfEdgeId<I>>, priority: f64) -> LoopId {
        let id = LoopId(self.loops.len());
        for h in &halfedges {
            self.owner[h.index()] = Some(id);
        }
        self.loops.push(Loop {
            halfedges,
            priority,
            closed: false,
        });
        id
    }

    #[inline]
    pub fn get(&self, id: LoopId) -> &Loop<I> {
        &self.loops[id.0]
    }

    #[inline]
    pub fn get_mut(&mut self, id: LoopId) -> &mut Loop<I> {
        &mut self.loops[id.0]
    }

    /// The loop currently holding `h`, if any.
    #[inline]
    pub fn owner(&self, h: HalfEdgeId<I>) -> Option<LoopId> {
        if !h.is_valid() {
            return None;
        }
        self.owner.get(h.index()).copied().flatten()
    }

    /// Append `b`'s half-edges to `a`, leaving `b` empty, and set `a`'s priority.
    pub fn absorb(&mut self, a: LoopId, b: LoopId, priority: f64) {
        let moved = std::mem::take(&mut self.loops[b.0].halfedges);
        for h in &moved {
            self.owner[h.index()] = Some(a);
        }
        let target = &mut self.loops[a.0];
        target.halfedges.extend(moved);
        target.priority = priority;
    }

    /// Insert `id` before the first entry of lower priority, keeping `list` sorted
    /// by descending priority with equal priorities in arrival order.
    pub fn insert_by_priority(&self, list: &mut Vec<LoopId>, id: LoopId) {
        let priority = self.get(id).priority;
        let at = list
            .iter()
            .position(|&other| self.get(other).priority < priority)
            .unwrap_or(list.len());
        list.insert(at, id);
    }
}

/// Remove `id` from a priority list. Returns whether it was present.
pub(crate) fn take_from(list: &mut Vec<LoopId>, id: LoopId) -> bool {
    match list.iter().position(|&x| x == id) {
        Some(at) => {
            list.remove(at);
            true
        }
        None => false,
    }
}

/// How well two loops fit together, in `[0, 1]`.
///
/// Two singletons always fit perfectly. Otherwise the pairwise scores between
/// the loops' half-edges are raised to the matting exponent and averaged over
/// those at or above their mean, so a few strongly aligned pairs dominate. A
/// result of exactly zero is replaced by the matting floor.
pub(crate) fn matting<I, S>(a: &Loop<I>, b: &Loop<I>, score: &S, options: &ReconstructOptions) -> f64
where
    I: MeshIndex,
    S: Fn(HalfEdgeId<I>, HalfEdgeId<I>) -> f64 + ?Sized,
{
    if a.is_singleton() && b.is_singleton() {
        return 1.0;
    }

    let values: Vec<f64> = a
        .halfedges
        .iter()
        .flat_map(|&x| b.halfedges.iter().map(move |&y| (x, y)))
        .map(|(x, y)| score(x, y).powi(options.matting_exponent))
        .collect();
    if values.is_empty() {
        return options.matting_floor;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let (sum, count) = values
        .iter()
        .filter(|&&v| v >= mean)
        .fold((0.0, 0usize), |(sum, count), &v| (sum + v, count + 1));
    // Rounding can put the mean of equal values just above all of them.
    let fit = if count == 0 { mean } else { sum / count as f64 };
    if fit == 0.0 {
        options.matting_floor
    } else {
        fit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn he(i: usize) -> HalfEdgeId {
        HalfEdgeId::new(i)
    }

    #[test]
    fn test_spawn_and_absorb() {
        let mut arena: LoopArena<u32> = LoopArena::new(6);
        let a = arena.spawn(vec![he(0)], 100.0);
        let b = arena.spawn(vec![he(2), he(4)], 100.0);

        assert_eq!(arena.owner(he(2)), Some(b));
        assert_eq!(arena.owner(he(1)), None);
        assert_eq!(arena.owner(HalfEdgeId::invalid()), None);

        arena.absorb(a, b, 42.0);
        assert_eq!(arena.get(a).halfedges, vec![he(0), he(2), he(4)]);
        assert!(arena.get(b).halfedges.is_empty());
        assert_eq!(arena.owner(he(4)), Some(a));
        assert_eq!(arena.get(a).priority, 42.0);
    }

    #[test]
    fn test_insert_by_priority_is_stable() {
        let mut arena: LoopArena<u32> = LoopArena::new(8);
        let high = arena.spawn(vec![he(0)], 200.0);
        let mid = arena.spawn(vec![he(1)], 150.0);
        let low = arena.spawn(vec![he(2)], 100.0);
        let late = arena.spawn(vec![he(3)], 150.0);

        let mut list = vec![high, mid, low];
        arena.insert_by_priority(&mut list, late);
        assert_eq!(list, vec![high, mid, late, low]);

        assert!(take_from(&mut list, mid));
        assert!(!take_from(&mut list, mid));
        assert_eq!(list, vec![high, late, low]);
    }

    #[test]
    fn test_matting_singletons() {
        let options = ReconstructOptions::default();
        let mut arena: LoopArena<u32> = LoopArena::new(4);
        let a = arena.spawn(vec![he(0)], 100.0);
        let b = arena.spawn(vec![he(1)], 100.0);
        let zero = |_: HalfEdgeId, _: HalfEdgeId| 0.0;
        assert_eq!(matting(arena.get(a), arena.get(b), &zero, &options), 1.0);
    }

    #[test]
    fn test_matting_averages_values_above_mean() {
        let options = ReconstructOptions::default().with_matting_exponent(1);
        let mut arena: LoopArena<u32> = LoopArena::new(8);
        let a = arena.spawn(vec![he(0), he(2)], 100.0);
        let b = arena.spawn(vec![he(4)], 100.0);

        // Scores 1.0 and 0.5 have mean 0.75; only 1.0 is kept.
        let score = |x: HalfEdgeId, _: HalfEdgeId| if x.index() == 0 { 1.0 } else { 0.5 };
        assert_eq!(matting(arena.get(a), arena.get(b), &score, &options), 1.0);

        let c = arena.spawn(vec![he(6), he(7)], 100.0);
        // Four scores 1.0, 1.0, 0.5, 0.5: the two above the mean are kept.
        assert_eq!(matting(arena.get(a), arena.get(c), &score, &options), 1.0);

        // Scores 1.0, 0.5, 0.5, 0.0 have mean 0.5; ties with the mean are kept.
        let graded = |x: HalfEdgeId, y: HalfEdgeId| match (x.index(), y.index()) {
            (0, 6) => 1.0,
            (2, 7) => 0.0,
            _ => 0.5,
        };
        let fit = matting(arena.get(a), arena.get(c), &graded, &options);
        assert!((fit - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_matting_single_strong_pair() {
        let options = ReconstructOptions::default().with_matting_exponent(1);
        let mut arena: LoopArena<u32> = LoopArena::new(4);
        let a = arena.spawn(vec![he(0), he(1)], 100.0);
        let b = arena.spawn(vec![he(2), he(3)], 100.0);

        // Scores 1.0, 0.0, 0.0, 0.0: everything at or above the mean 0.25 is the one pair.
        let score = |x: HalfEdgeId, y: HalfEdgeId| {
            if x.index() == 0 && y.index() == 2 {
                1.0
            } else {
                0.0
            }
        };
        assert_eq!(matting(arena.get(a), arena.get(b), &score, &options), 1.0);
    }

    #[test]
    fn test_matting_floor() {
        let options = ReconstructOptions::default();
        let mut arena: LoopArena<u32> = LoopArena::new(4);
        let a = arena.spawn(vec![he(0), he(1)], 100.0);
        let b = arena.spawn(vec![he(2)], 100.0);
        let zero = |_: HalfEdgeId, _: HalfEdgeId| 0.0;
        assert_eq!(matting(arena.get(a), arena.get(b), &zero, &options), 0.1);
    }
}
