//! Efficient union of many polygons.
//!
//! Polygons are grouped by proximity with an R-tree, unioned group by
//! group, and the group results are reduced by recursive binary union.
//! Unioning nearby polygons first eliminates shared vertices early and
//! keeps each overlay small.

use rayon::prelude::*;
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::RTree;
use tracing::debug;

use crate::error::Result;
use crate::geometry::{Envelope, Geometry, GeometryFactory, Polygon};
use crate::operations::overlay::OverlayOpCode;
use crate::operations::precision::EnhancedPrecisionOp;

/// Number of children per node of the grouping tree.
const NODE_CAPACITY: usize = 4;

/// Parameters controlling the cascaded union.
#[derive(Debug, Clone, Copy)]
pub struct UnionParams {
    /// Whether the halves of a binary union run in parallel.
    pub parallel: bool,
    /// Minimum number of items for a binary union to fork.
    pub parallel_threshold: usize,
}

impl Default for UnionParams {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 2,
        }
    }
}

enum ItemTree {
    Leaf(usize),
    Node(Vec<ItemTree>),
}

/// Unions a collection of polygons.
pub struct CascadedPolygonUnion {
    polys: Vec<Polygon>,
    factory: Option<GeometryFactory>,
    params: UnionParams,
}

impl CascadedPolygonUnion {
    /// Creates a new `CascadedPolygonUnion` operation.
    #[must_use]
    pub fn new(polys: Vec<Polygon>) -> Self {
        Self {
            polys,
            factory: None,
            params: UnionParams::default(),
        }
    }

    /// Snaps the inputs to `factory`'s precision model and computes the
    /// union in it.
    #[must_use]
    pub fn with_factory(mut self, factory: GeometryFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Sets whether subtrees are unioned on the rayon thread pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.params.parallel = parallel;
        self
    }

    /// Replaces all union parameters.
    #[must_use]
    pub fn with_params(mut self, params: UnionParams) -> Self {
        self.params = params;
        self
    }

    /// Executes the union. Returns `None` when there is no non-empty input
    /// polygon.
    ///
    /// # Errors
    ///
    /// Returns a `TopologyError` if a pairwise union fails even with
    /// enhanced precision.
    pub fn execute(&self) -> Result<Option<Geometry>> {
        let worker = UnionWorker {
            items: self.prepared_items(),
            factory: self.factory.unwrap_or_default(),
            params: self.params,
        };
        let Some(tree) = worker.build_item_tree() else {
            return Ok(None);
        };
        debug!(items = worker.items.len(), parallel = self.params.parallel, "cascaded union started");
        match tree {
            ItemTree::Leaf(i) => Ok(Some(worker.items[i].clone())),
            ItemTree::Node(children) => worker.union_tree(&children, 0),
        }
    }

    fn prepared_items(&self) -> Vec<Geometry> {
        self.polys
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| {
                let geom = Geometry::Polygon(p.clone());
                match &self.factory {
                    Some(factory) => factory.make_precise(&geom),
                    None => geom,
                }
            })
            .filter(|g| !g.is_empty())
            .collect()
    }
}

struct UnionWorker {
    items: Vec<Geometry>,
    factory: GeometryFactory,
    params: UnionParams,
}

impl UnionWorker {
    /// Groups the items along the leaf order of a bulk-loaded R-tree, then
    /// groups the groups until a single root remains.
    fn build_item_tree(&self) -> Option<ItemTree> {
        let entries: Vec<GeomWithData<Rectangle<[f64; 2]>, usize>> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, g)| GeomWithData::new(Rectangle::from_aabb(g.envelope().to_aabb()), i))
            .collect();
        let rtree = RTree::bulk_load(entries);
        let mut level: Vec<ItemTree> = rtree.iter().map(|e| ItemTree::Leaf(e.data)).collect();
        match level.len() {
            0 => return None,
            1 => return level.pop(),
            _ => {}
        }
        while level.len() > NODE_CAPACITY {
            let mut parents = Vec::with_capacity(level.len().div_ceil(NODE_CAPACITY));
            let mut children = level.into_iter().peekable();
            while children.peek().is_some() {
                parents.push(ItemTree::Node(children.by_ref().take(NODE_CAPACITY).collect()));
            }
            level = parents;
        }
        Some(ItemTree::Node(level))
    }

    fn union_tree(&self, children: &[ItemTree], depth: usize) -> Result<Option<Geometry>> {
        let reduce = |child: &ItemTree| match child {
            ItemTree::Leaf(i) => Ok(Some(self.items[*i].clone())),
            ItemTree::Node(grandchildren) => self.union_tree(grandchildren, depth + 1),
        };
        let geoms: Vec<Option<Geometry>> = if self.params.parallel {
            children.par_iter().map(reduce).collect::<Result<_>>()?
        } else {
            children.iter().map(reduce).collect::<Result<_>>()?
        };
        debug!(depth, children = geoms.len(), "union tree level reduced");
        self.binary_union(&geoms)
    }

    fn binary_union(&self, geoms: &[Option<Geometry>]) -> Result<Option<Geometry>> {
        match geoms {
            [] => Ok(None),
            [g] => self.union_safe(g.as_ref(), None),
            [g0, g1] => self.union_safe(g0.as_ref(), g1.as_ref()),
            _ => {
                let (left, right) = geoms.split_at(geoms.len() / 2);
                let (g0, g1) = if self.params.parallel && geoms.len() > self.params.parallel_threshold {
                    rayon::join(|| self.binary_union(left), || self.binary_union(right))
                } else {
                    (self.binary_union(left), self.binary_union(right))
                };
                self.union_safe(g0?.as_ref(), g1?.as_ref())
            }
        }
    }

    fn union_safe(&self, g0: Option<&Geometry>, g1: Option<&Geometry>) -> Result<Option<Geometry>> {
        match (g0, g1) {
            (None, None) => Ok(None),
            (Some(g), None) | (None, Some(g)) => Ok(Some(g.clone())),
            (Some(g0), Some(g1)) => self.union_optimized(g0, g1).map(Some),
        }
    }

    fn union_optimized(&self, g0: &Geometry, g1: &Geometry) -> Result<Geometry> {
        let env0 = g0.envelope();
        let env1 = g1.envelope();
        if !env0.intersects(&env1) {
            return Ok(self.factory.combine(&[g0, g1]));
        }
        if g0.num_geometries() <= 1 && g1.num_geometries() <= 1 {
            return self.union_actual(g0, g1);
        }
        self.union_using_envelope_intersection(g0, g1, &env0.intersection(&env1))
    }

    /// Unions only the components that reach into the common envelope and
    /// passes the rest through untouched.
    fn union_using_envelope_intersection(&self, g0: &Geometry, g1: &Geometry, common: &Envelope) -> Result<Geometry> {
        let mut disjoint = Vec::new();
        let g0_int = self.extract_by_envelope(common, g0, &mut disjoint);
        let g1_int = self.extract_by_envelope(common, g1, &mut disjoint);
        disjoint.push(self.union_actual(&g0_int, &g1_int)?);
        let parts: Vec<&Geometry> = disjoint.iter().collect();
        Ok(self.factory.combine(&parts))
    }

    fn extract_by_envelope(&self, env: &Envelope, geom: &Geometry, disjoint: &mut Vec<Geometry>) -> Geometry {
        let (intersecting, outside): (Vec<Geometry>, Vec<Geometry>) =
            geom.components().into_iter().partition(|c| c.envelope().intersects(env));
        disjoint.extend(outside);
        if intersecting.is_empty() {
            return Geometry::Polygon(Polygon::default());
        }
        self.factory.build_geometry(intersecting)
    }

    fn union_actual(&self, g0: &Geometry, g1: &Geometry) -> Result<Geometry> {
        let union = EnhancedPrecisionOp::overlay(g0, g1, OverlayOpCode::Union, self.factory.precision)?;
        Ok(restrict_to_polygons(union))
    }
}

/// Drops any non-polygonal components a union may produce.
fn restrict_to_polygons(geom: Geometry) -> Geometry {
    if matches!(geom, Geometry::Polygon(_) | Geometry::MultiPolygon(_)) {
        return geom;
    }
    let mut polys: Vec<Polygon> = geom
        .components()
        .into_iter()
        .filter_map(|c| match c {
            Geometry::Polygon(p) => Some(p),
            _ => None,
        })
        .collect();
    if polys.len() == 1 {
        return Geometry::Polygon(polys.remove(0));
    }
    Geometry::MultiPolygon(polys)
}
