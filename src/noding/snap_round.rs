//! Snap-rounding noder.
//!
//! Every vertex and every interior intersection defines a hot pixel: a
//! grid cell centred on the rounded point. Each segment passing through a
//! hot pixel is noded at the pixel centre, which guarantees that the noded
//! output has all vertices on the grid and no non-noded crossings.

use tracing::debug;

use super::chain::ChainIndex;
use super::intersector::InteriorIntersectionFinder;
use super::mcindex_noder::intersect_chains;
use super::segment_string::{noded_substrings, NodedSegmentString};
use super::Noder;
use crate::error::{GeometryError, Result};
use crate::geometry::Envelope;
use crate::math::{Coord, LineIntersector, PrecisionModel};

/// A grid cell around a rounded point.
#[derive(Debug, Clone)]
pub struct HotPixel {
    centre: Coord,
    envelope: Envelope,
    corners: [Coord; 4],
}

impl HotPixel {
    /// Creates the pixel of half-width `tolerance` around `centre`.
    #[must_use]
    pub fn new(centre: Coord, tolerance: f64) -> Self {
        let min_x = centre.x - tolerance;
        let max_x = centre.x + tolerance;
        let min_y = centre.y - tolerance;
        let max_y = centre.y + tolerance;
        Self {
            centre,
            envelope: Envelope::new(Coord::new(min_x, min_y), Coord::new(max_x, max_y)),
            corners: [
                Coord::new(max_x, max_y),
                Coord::new(min_x, max_y),
                Coord::new(min_x, min_y),
                Coord::new(max_x, min_y),
            ],
        }
    }

    /// The rounded point the pixel is centred on.
    #[must_use]
    pub fn centre(&self) -> Coord {
        self.centre
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Tests whether the segment `p0-p1` passes through the pixel.
    ///
    /// The pixel includes its left and bottom edges but not its top and
    /// right edges, so a segment touching only the top or right side is
    /// not snapped.
    #[must_use]
    pub fn intersects(&self, p0: &Coord, p1: &Coord) -> bool {
        if !Envelope::new(*p0, *p1).intersects(&self.envelope) {
            return false;
        }
        self.intersects_tolerance_square(p0, p1)
    }

    fn intersects_tolerance_square(&self, p0: &Coord, p1: &Coord) -> bool {
        let mut li = LineIntersector::new();
        let [c0, c1, c2, c3] = &self.corners;

        li.compute_intersection(p0, p1, c0, c1);
        if li.is_proper() {
            return true;
        }
        li.compute_intersection(p0, p1, c1, c2);
        if li.is_proper() {
            return true;
        }
        let intersects_left = li.has_intersection();

        li.compute_intersection(p0, p1, c2, c3);
        if li.is_proper() {
            return true;
        }
        let intersects_bottom = li.has_intersection();

        li.compute_intersection(p0, p1, c3, c0);
        if li.is_proper() {
            return true;
        }

        if intersects_left && intersects_bottom {
            return true;
        }
        *p0 == self.centre || *p1 == self.centre
    }
}

/// Noder that snap-rounds all linework onto a fixed precision grid.
#[derive(Debug, Clone)]
pub struct SnapRoundingNoder {
    precision: PrecisionModel,
    strings: Vec<NodedSegmentString>,
}

impl SnapRoundingNoder {
    /// Creates a snap-rounding noder for a fixed precision model.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidPrecision` for floating models, which
    /// have no grid to round to.
    pub fn new(precision: PrecisionModel) -> Result<Self> {
        if precision.scale().is_none() {
            return Err(GeometryError::InvalidPrecision(f64::NAN).into());
        }
        Ok(Self {
            precision,
            strings: Vec::new(),
        })
    }

    /// Rounds the vertices of `ss` onto the grid, dropping repeated points.
    fn round_string(&self, ss: &NodedSegmentString) -> NodedSegmentString {
        let mut pts: Vec<Coord> = Vec::with_capacity(ss.len());
        for p in ss.coords() {
            let rounded = self.precision.make_precise_coord(*p);
            if pts.last() != Some(&rounded) {
                pts.push(rounded);
            }
        }
        NodedSegmentString::new(pts, ss.context())
    }

    fn tolerance(&self) -> f64 {
        0.5 / self.precision.scale().unwrap_or(1.0)
    }

    /// Nodes every segment passing through `pixel`, skipping segment
    /// `skip` (the segment the pixel's own vertex starts). Returns `true`
    /// if any node was added.
    fn snap(&mut self, index: &ChainIndex, pixel: &HotPixel, skip: Option<(usize, usize)>) -> bool {
        let hits: Vec<(usize, usize)> = {
            let coords: Vec<&[Coord]> = self.strings.iter().map(NodedSegmentString::coords).collect();
            index
                .segments_in(&coords, pixel.envelope())
                .into_iter()
                .filter(|seg| Some(*seg) != skip)
                .filter(|&(s, i)| pixel.intersects(&coords[s][i], &coords[s][i + 1]))
                .collect()
        };
        for &(s, i) in &hits {
            self.strings[s].add_intersection(pixel.centre(), i);
        }
        !hits.is_empty()
    }
}

impl Noder for SnapRoundingNoder {
    fn compute_nodes(&mut self, strings: Vec<NodedSegmentString>) -> Result<()> {
        self.strings = strings.iter().map(|ss| self.round_string(ss)).collect();

        let li = LineIntersector::new().with_precision(self.precision);
        let mut finder = InteriorIntersectionFinder::new(li);
        intersect_chains(&mut self.strings, &mut finder);
        let intersections = finder.interior_intersections().to_vec();
        debug!(
            strings = self.strings.len(),
            intersections = intersections.len(),
            "snap rounding"
        );

        let index = {
            let coords: Vec<&[Coord]> = self.strings.iter().map(NodedSegmentString::coords).collect();
            ChainIndex::new(&coords)
        };
        let tolerance = self.tolerance();

        for pt in intersections {
            let pixel = HotPixel::new(pt, tolerance);
            self.snap(&index, &pixel, None);
        }

        for s in 0..self.strings.len() {
            for i in 0..self.strings[s].len() {
                let vertex = self.strings[s].coords()[i];
                let pixel = HotPixel::new(vertex, tolerance);
                if self.snap(&index, &pixel, Some((s, i))) {
                    self.strings[s].add_intersection(vertex, i);
                }
            }
        }
        Ok(())
    }

    fn noded_substrings(&self) -> Vec<NodedSegmentString> {
        noded_substrings(&self.strings)
    }
}
