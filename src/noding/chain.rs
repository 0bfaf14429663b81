//! Monotone chains and an R-tree over their envelopes.
//!
//! A monotone chain is a run of segments whose direction stays in one
//! quadrant, so its envelope is spanned by its end vertices and it never
//! crosses itself. Candidate segment pairs are found by intersecting chain
//! envelopes in an `rstar` tree and then bisecting overlapping chains.

use rstar::primitives::{GeomWithData, Rectangle};
use rstar::RTree;

use crate::geometry::Envelope;
use crate::math::Coord;

type ChainEntry = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// A monotone run `start..=end` of vertices of one coordinate list.
#[derive(Debug, Clone, Copy)]
pub struct MonotoneChain {
    pub string: usize,
    pub start: usize,
    pub end: usize,
}

fn quadrant(p0: &Coord, p1: &Coord) -> u8 {
    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    match (dx >= 0.0, dy >= 0.0) {
        (true, true) => 0,
        (false, true) => 1,
        (false, false) => 2,
        (true, false) => 3,
    }
}

fn find_chain_end(pts: &[Coord], start: usize) -> usize {
    let last = pts.len() - 1;
    let mut safe_start = start;
    while safe_start < last && pts[safe_start] == pts[safe_start + 1] {
        safe_start += 1;
    }
    if safe_start >= last {
        return last;
    }
    let chain_quad = quadrant(&pts[safe_start], &pts[safe_start + 1]);
    let mut i = start + 1;
    while i < pts.len() {
        if pts[i - 1] != pts[i] && quadrant(&pts[i - 1], &pts[i]) != chain_quad {
            break;
        }
        i += 1;
    }
    i - 1
}

/// Splits a coordinate list into monotone chains.
#[must_use]
pub fn monotone_chains(pts: &[Coord], string: usize) -> Vec<MonotoneChain> {
    let mut chains = Vec::new();
    if pts.len() < 2 {
        return chains;
    }
    let mut start = 0;
    while start < pts.len() - 1 {
        let end = find_chain_end(pts, start);
        chains.push(MonotoneChain { string, start, end });
        start = end;
    }
    chains
}

impl MonotoneChain {
    /// Envelope of the chain.
    #[must_use]
    pub fn envelope(&self, pts: &[Coord]) -> Envelope {
        Envelope::new(pts[self.start], pts[self.end])
    }

    /// Calls `f(seg0, seg1)` for every pair of segments of the two chains
    /// whose envelopes overlap.
    pub fn overlaps(
        &self,
        pts: &[Coord],
        other: &MonotoneChain,
        other_pts: &[Coord],
        f: &mut impl FnMut(usize, usize),
    ) {
        compute_overlaps(pts, self.start, self.end, other_pts, other.start, other.end, f);
    }

    /// Calls `f(seg)` for every segment whose envelope meets `env`.
    pub fn select(&self, pts: &[Coord], env: &Envelope, f: &mut impl FnMut(usize)) {
        compute_select(pts, self.start, self.end, env, f);
    }
}

fn compute_overlaps(
    pts0: &[Coord],
    start0: usize,
    end0: usize,
    pts1: &[Coord],
    start1: usize,
    end1: usize,
    f: &mut impl FnMut(usize, usize),
) {
    let env0 = Envelope::new(pts0[start0], pts0[end0]);
    let env1 = Envelope::new(pts1[start1], pts1[end1]);
    if !env0.intersects(&env1) {
        return;
    }
    if end0 - start0 == 1 && end1 - start1 == 1 {
        f(start0, start1);
        return;
    }

    let mid0 = (start0 + end0) / 2;
    let mid1 = (start1 + end1) / 2;
    if start0 < mid0 {
        if start1 < mid1 {
            compute_overlaps(pts0, start0, mid0, pts1, start1, mid1, f);
        }
        if mid1 < end1 {
            compute_overlaps(pts0, start0, mid0, pts1, mid1, end1, f);
        }
    }
    if mid0 < end0 {
        if start1 < mid1 {
            compute_overlaps(pts0, mid0, end0, pts1, start1, mid1, f);
        }
        if mid1 < end1 {
            compute_overlaps(pts0, mid0, end0, pts1, mid1, end1, f);
        }
    }
}

fn compute_select(pts: &[Coord], start: usize, end: usize, env: &Envelope, f: &mut impl FnMut(usize)) {
    if !Envelope::new(pts[start], pts[end]).intersects(env) {
        return;
    }
    if end - start == 1 {
        f(start);
        return;
    }
    let mid = (start + end) / 2;
    if start < mid {
        compute_select(pts, start, mid, env, f);
    }
    if mid < end {
        compute_select(pts, mid, end, env, f);
    }
}

/// A pair of segments that may intersect: `(string0, segment0, string1, segment1)`.
pub type SegmentPair = (usize, usize, usize, usize);

/// Spatial index over the monotone chains of a set of coordinate lists.
pub struct ChainIndex {
    chains: Vec<MonotoneChain>,
    tree: RTree<ChainEntry>,
}

impl ChainIndex {
    /// Indexes the chains of every string.
    #[must_use]
    pub fn new<S: AsRef<[Coord]>>(strings: &[S]) -> Self {
        let chains: Vec<MonotoneChain> = strings
            .iter()
            .enumerate()
            .flat_map(|(i, s)| monotone_chains(s.as_ref(), i))
            .collect();
        let entries = chains
            .iter()
            .enumerate()
            .map(|(id, chain)| {
                let env = chain.envelope(strings[chain.string].as_ref());
                let rect = Rectangle::from_corners([env.min_x(), env.min_y()], [env.max_x(), env.max_y()]);
                GeomWithData::new(rect, id)
            })
            .collect();
        Self {
            chains,
            tree: RTree::bulk_load(entries),
        }
    }

    /// All chains, in string order.
    #[must_use]
    pub fn chains(&self) -> &[MonotoneChain] {
        &self.chains
    }

    /// Ids of chains whose envelopes meet `env`, in ascending order.
    #[must_use]
    pub fn query(&self, env: &Envelope) -> Vec<usize> {
        if env.is_null() {
            return Vec::new();
        }
        let mut ids: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&env.to_aabb())
            .map(|entry| entry.data)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Every pair of segments, from distinct chains, whose envelopes
    /// overlap.
    ///
    /// Pairs are produced in a deterministic order; each unordered pair of
    /// chains is visited once.
    #[must_use]
    pub fn candidate_pairs<S: AsRef<[Coord]>>(&self, strings: &[S]) -> Vec<SegmentPair> {
        let mut pairs = Vec::new();
        for (id, chain) in self.chains.iter().enumerate() {
            let pts = strings[chain.string].as_ref();
            for other_id in self.query(&chain.envelope(pts)) {
                if other_id <= id {
                    continue;
                }
                let other = &self.chains[other_id];
                let other_pts = strings[other.string].as_ref();
                chain.overlaps(pts, other, other_pts, &mut |seg0, seg1| {
                    pairs.push((chain.string, seg0, other.string, seg1));
                });
            }
        }
        pairs
    }

    /// Every segment `(string, segment)` whose envelope meets `env`.
    #[must_use]
    pub fn segments_in<S: AsRef<[Coord]>>(&self, strings: &[S], env: &Envelope) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for id in self.query(env) {
            let chain = &self.chains[id];
            chain.select(strings[chain.string].as_ref(), env, &mut |seg| out.push((chain.string, seg)));
        }
        out
    }
}
