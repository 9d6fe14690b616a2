//! Loop concatenation search.
//!
//! [`Search`] holds the read-only view of the mesh, the eligibility table and
//! the loop arena. The phase operations below work on a priority list of open
//! loop ids (the master list or its working copy) and report an [`Outcome`].

use crate::algo::progress::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{HalfEdgeId, Mesh, MeshIndex, VertexId};

use super::loops::{matting, take_from, LoopArena, LoopId};
use super::{Outcome, Phase, ReconstructOptions};

/// Pairwise half-edge scorer with the mesh already bound.
pub(crate) type Scorer<'a, I> = dyn Fn(HalfEdgeId<I>, HalfEdgeId<I>) -> f64 + 'a;

pub(crate) struct Search<'a, V, H, F, I: MeshIndex> {
    pub(super) mesh: &'a Mesh<V, H, F, I>,
    pub(super) score: &'a Scorer<'a, I>,
    pub(super) options: &'a ReconstructOptions,
    eligible: Vec<bool>,
    pub(super) loops: LoopArena<I>,
    faces: Vec<LoopId>,
}

impl<'a, V, H, F, I: MeshIndex> Search<'a, V, H, F, I> {
    /// A half-edge is eligible when it is live, bounds no face yet and passes `mask`.
    pub fn new<M>(
        mesh: &'a Mesh<V, H, F, I>,
        score: &'a Scorer<'a, I>,
        mask: M,
        options: &'a ReconstructOptions,
    ) -> Self
    where
        M: Fn(&Mesh<V, H, F, I>, HalfEdgeId<I>) -> bool,
    {
        let mut eligible = vec![false; mesh.halfedge_capacity()];
        for h in mesh.halfedge_ids() {
            eligible[h.index()] = !mesh.face_of(h).is_valid() && mask(mesh, h);
        }
        Self {
            mesh,
            score,
            options,
            eligible,
            loops: LoopArena::new(mesh.halfedge_capacity()),
            faces: Vec::new(),
        }
    }

    #[inline]
    pub fn is_eligible(&self, h: HalfEdgeId<I>) -> bool {
        h.is_valid() && self.eligible.get(h.index()).copied().unwrap_or(false)
    }

    pub fn eligible_count(&self) -> usize {
        self.eligible.iter().filter(|&&e| e).count()
    }

    /// Eligible outgoing half-edges of `v`, in outgoing-list order.
    pub fn eligible_outgoing(&self, v: VertexId<I>) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        self.mesh
            .outgoing(v)
            .iter()
            .copied()
            .filter(move |&h| self.is_eligible(h))
    }

    /// Boundaries of every closed loop, in closing order.
    pub fn into_face_boundaries(self) -> Vec<Vec<HalfEdgeId<I>>> {
        let Self { faces, loops, .. } = self;
        faces
            .into_iter()
            .map(|l| loops.get(l).halfedges.clone())
            .collect()
    }

    // ==================== Loop geometry ====================

    fn start_vertex(&self, l: LoopId) -> VertexId<I> {
        self.mesh.from(self.loops.get(l).first())
    }

    fn end_vertex(&self, l: LoopId) -> VertexId<I> {
        self.mesh.to(self.loops.get(l).last())
    }

    fn is_closed_chain(&self, l: LoopId) -> bool {
        self.start_vertex(l) == self.end_vertex(l)
    }

    fn opposite_owner(&self, h: HalfEdgeId<I>) -> Option<LoopId> {
        self.loops.owner(self.mesh.opposite(h))
    }

    /// The opposite of `a`'s last half-edge and the opposite of `b`'s first one
    /// do not sit in the same loop. Joining across such a pair would fold a face
    /// back onto its neighbour.
    fn distinct_opposites(&self, a: LoopId, b: LoopId) -> bool {
        let x = self.opposite_owner(self.loops.get(a).last());
        let y = self.opposite_owner(self.loops.get(b).first());
        match (x, y) {
            (Some(x), Some(y)) => x != y,
            _ => true,
        }
    }

    /// Open loops starting at the end vertex of `l`, excluding the way back.
    fn continuations(&self, l: LoopId, except: &[LoopId]) -> Vec<LoopId> {
        let last = self.loops.get(l).last();
        let end = self.mesh.to(last);
        self.eligible_outgoing(end)
            .filter(|&h| self.mesh.opposite(h) != last)
            .filter_map(|h| {
                let c = self.loops.owner(h)?;
                let candidate = self.loops.get(c);
                let usable = c != l
                    && !except.contains(&c)
                    && !candidate.closed
                    && candidate.first() == h;
                usable.then_some(c)
            })
            .collect()
    }

    fn candidates(&self, l: LoopId) -> Vec<LoopId> {
        self.continuations(l, &[])
    }

    /// Whether `l` followed by `c` closes right away or after one more loop.
    fn closable(&self, l: LoopId, c: LoopId) -> bool {
        let start = self.start_vertex(l);
        if self.end_vertex(c) == start {
            return true;
        }
        self.continuations(c, &[l])
            .into_iter()
            .any(|d| self.end_vertex(d) == start)
    }

    // ==================== Loop updates ====================

    fn connect(&mut self, a: LoopId, b: LoopId) -> LoopId {
        let fit = matting(self.loops.get(a), self.loops.get(b), self.score, self.options);
        let sum = self.loops.get(a).priority + self.loops.get(b).priority;
        self.loops.absorb(a, b, self.options.merge_factor * fit * sum);
        a
    }

    fn close(&mut self, l: LoopId) {
        self.loops.get_mut(l).closed = true;
        self.faces.push(l);
    }

    /// Close `l` if it is a closed chain, otherwise put it back into `list`.
    fn finish(&mut self, list: &mut Vec<LoopId>, l: LoopId) -> Outcome {
        if self.is_closed_chain(l) {
            self.close(l);
            Outcome::FaceClosed
        } else {
            self.loops.insert_by_priority(list, l);
            Outcome::Concatenated
        }
    }

    // ==================== Phase operations ====================

    /// Join the first loop (in list order) that has exactly one continuation.
    pub fn force(&mut self, list: &mut Vec<LoopId>) -> Outcome {
        let found = list.iter().find_map(|&l| match self.candidates(l).as_slice() {
            [only] => Some((l, *only)),
            _ => None,
        });
        let Some((l, c)) = found else {
            return Outcome::Idle;
        };
        take_from(list, l);
        take_from(list, c);
        let joined = self.connect(l, c);
        self.finish(list, joined)
    }

    /// Close the first loop that already is a closed chain or that one
    /// continuation completes.
    pub fn merge(&mut self, list: &mut Vec<LoopId>) -> Outcome {
        for i in 0..list.len() {
            let l = list[i];
            if self.is_closed_chain(l) {
                list.remove(i);
                self.close(l);
                return Outcome::FaceClosed;
            }
            let start = self.start_vertex(l);
            let closing = self
                .candidates(l)
                .into_iter()
                .find(|&c| self.end_vertex(c) == start && self.distinct_opposites(l, c));
            if let Some(c) = closing {
                take_from(list, l);
                take_from(list, c);
                let joined = self.connect(l, c);
                self.close(joined);
                return Outcome::FaceClosed;
            }
        }
        Outcome::Idle
    }

    /// Join the best-fitting pair, starting from the most promising open loop.
    ///
    /// The loop is the first one with more than one half-edge, else the first
    /// singleton whose opposite already bounds a closed loop, else the list head.
    /// Candidates rank by matting value, then closability, then priority; the
    /// earliest candidate wins ties.
    pub fn best(&mut self, list: &mut Vec<LoopId>) -> Outcome {
        if list.is_empty() {
            return Outcome::Idle;
        }
        let bordered = |l: LoopId| {
            self.opposite_owner(self.loops.get(l).first())
                .is_some_and(|o| self.loops.get(o).closed)
        };
        let l = list
            .iter()
            .copied()
            .find(|&l| !self.loops.get(l).is_singleton())
            .or_else(|| list.iter().copied().find(|&l| bordered(l)))
            .unwrap_or(list[0]);

        if self.is_closed_chain(l) {
            take_from(list, l);
            self.close(l);
            return Outcome::FaceClosed;
        }

        let mut chosen: Option<(LoopId, (f64, bool, f64))> = None;
        for c in self.candidates(l) {
            if !self.distinct_opposites(l, c) {
                continue;
            }
            let rank = (
                matting(self.loops.get(l), self.loops.get(c), self.score, self.options),
                self.closable(l, c),
                self.loops.get(c).priority,
            );
            let better = match &chosen {
                None => true,
                Some((_, best)) => rank.partial_cmp(best).is_some_and(|o| o.is_gt()),
            };
            if better {
                chosen = Some((c, rank));
            }
        }

        let Some((c, _)) = chosen else {
            return Outcome::Idle;
        };
        take_from(list, l);
        take_from(list, c);
        let joined = self.connect(l, c);
        self.finish(list, joined)
    }

    /// Make the first move.
    ///
    /// At the first vertex with exactly three eligible outgoing half-edges, each
    /// incoming half-edge is joined with the next outgoing one (in outgoing-list
    /// order) until a corner closes. Without such a vertex, the seeded triangle is
    /// taken as a face.
    fn init(
        &mut self,
        master: &mut Vec<LoopId>,
        triangle: Option<[HalfEdgeId<I>; 3]>,
    ) -> Result<Outcome> {
        let corner = self.mesh.vertex_ids().find_map(|v| {
            let out: Vec<HalfEdgeId<I>> = self.eligible_outgoing(v).collect();
            <[HalfEdgeId<I>; 3]>::try_from(out).ok().map(|hs| (v, hs))
        });

        if let Some((v, hs)) = corner {
            log::debug!("init: joining loops around 3-degree {:?}", v);
            let mut outcome = Outcome::Idle;
            for j in 0..3 {
                let a = self.loops.owner(self.mesh.opposite(hs[j]));
                let b = self.loops.owner(hs[(j + 1) % 3]);
                let (Some(a), Some(b)) = (a, b) else {
                    continue;
                };
                if a == b || !master.contains(&a) || !master.contains(&b) {
                    continue;
                }
                take_from(master, a);
                take_from(master, b);
                let joined = self.connect(a, b);
                outcome = self.finish(master, joined);
                if outcome == Outcome::FaceClosed {
                    break;
                }
            }
            return Ok(outcome);
        }

        if let Some(triangle) = triangle {
            log::debug!("init: no 3-degree vertex, taking triangle {:?}", triangle);
            for h in triangle {
                if let Some(l) = self.loops.owner(h) {
                    take_from(master, l);
                }
            }
            let l = self.loops.spawn(triangle.to_vec(), 0.0);
            self.close(l);
            return Ok(Outcome::FaceClosed);
        }

        Err(MeshError::ReconstructionStalled {
            eligible_halfedges: self.eligible_count(),
        })
    }

    /// Drive the phases from Init until Done. Returns the open loops left.
    ///
    /// Fails with [`MeshError::ReconstructionStalled`] when the first move is
    /// impossible; no face has been closed at that point.
    pub fn run(
        &mut self,
        mut master: Vec<LoopId>,
        triangle: Option<[HalfEdgeId<I>; 3]>,
        progress: Option<&Progress>,
    ) -> Result<Vec<LoopId>> {
        let total = self.eligible_count();
        let mut working: Vec<LoopId> = Vec::new();
        let mut idle = 0;
        let mut phase = Phase::Init;

        loop {
            match phase {
                Phase::Done => break,
                Phase::Init => {
                    let outcome = self.init(&mut master, triangle)?;
                    let next = phase.next(outcome);
                    self.trace(phase, outcome, next, progress, total);
                    phase = next;
                }
                Phase::TopForce | Phase::TopMerge => {
                    if master.is_empty() {
                        phase = Phase::Done;
                        continue;
                    }
                    let outcome = if phase == Phase::TopForce {
                        self.force(&mut master)
                    } else {
                        self.merge(&mut master)
                    };
                    let next = phase.next(outcome);
                    if next == Phase::SubMatting {
                        working = master.clone();
                        idle = 0;
                    }
                    self.trace(phase, outcome, next, progress, total);
                    phase = next;
                }
                Phase::SubMatting | Phase::SubForce | Phase::SubMerge => {
                    if working.is_empty() {
                        master = std::mem::take(&mut working);
                        phase = Phase::Done;
                        continue;
                    }
                    let outcome = match phase {
                        Phase::SubMatting => self.best(&mut working),
                        Phase::SubForce => self.force(&mut working),
                        _ => self.merge(&mut working),
                    };
                    let mut next = phase.next(outcome);
                    match outcome {
                        Outcome::FaceClosed => {
                            master = std::mem::take(&mut working);
                        }
                        Outcome::Concatenated => idle = 0,
                        Outcome::Idle => {
                            idle += 1;
                            if idle >= self.options.max_idle_phases {
                                master = std::mem::take(&mut working);
                                next = Phase::Done;
                            }
                        }
                    }
                    self.trace(phase, outcome, next, progress, total);
                    phase = next;
                }
            }
        }
        Ok(master)
    }

    fn trace(
        &self,
        phase: Phase,
        outcome: Outcome,
        next: Phase,
        progress: Option<&Progress>,
        total: usize,
    ) {
        log::debug!("{:?}: {:?} -> {:?}", phase, outcome, next);
        if outcome == Outcome::FaceClosed {
            if let Some(p) = progress {
                let consumed: usize = self
                    .faces
                    .iter()
                    .map(|&l| self.loops.get(l).halfedges.len())
                    .sum();
                p.report(consumed, total, "Closing faces");
            }
        }
    }
}
