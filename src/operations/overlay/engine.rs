use tracing::debug;

use crate::error::{Result, TopologyError};
use crate::geometry::{Geometry, GeometryFactory, Location, PointLocator, Position};
use crate::math::{Coord, LineIntersector};
use crate::noding::{NodedSegmentString, NodingValidator};
use crate::topology::{Edge, EdgeList, GeometryGraph, NodeId, PlanarGraph};

use super::line_builder::build_lines;
use super::point_builder::build_points;
use super::polygon_builder::PolygonBuilder;
use super::select::{is_result_of_op, OverlayOpCode};

/// Computes an overlay of two non-empty, non-collection geometries.
///
/// Orchestrates the full pipeline: noding, edge merging, labelling,
/// result edge selection and assembly of polygons, lines and points.
pub fn overlay_execute(a: &Geometry, b: &Geometry, op: OverlayOpCode, factory: &GeometryFactory) -> Result<Geometry> {
    let mut engine = OverlayEngine {
        graphs: [GeometryGraph::new(0, a), GeometryGraph::new(1, b)],
        factory: *factory,
        locator: PointLocator::default(),
        graph: PlanarGraph::new(),
    };
    let result = engine.compute(op)?;
    check_dimension(&result, a, b)?;
    Ok(result)
}

struct OverlayEngine<'a> {
    graphs: [GeometryGraph<'a>; 2],
    factory: GeometryFactory,
    locator: PointLocator,
    graph: PlanarGraph,
}

impl<'a> OverlayEngine<'a> {
    fn geometries(&self) -> [&'a Geometry; 2] {
        [self.graphs[0].geometry(), self.graphs[1].geometry()]
    }

    fn compute(&mut self, op: OverlayOpCode) -> Result<Geometry> {
        // Step 1: Copy the input nodes so that isolated points survive
        self.copy_points(0);
        self.copy_points(1);

        // Step 2: Node each input, then the inputs against each other
        let li = LineIntersector::new().with_precision(self.factory.precision);
        self.graphs[0].compute_self_nodes(li.clone(), false);
        self.graphs[1].compute_self_nodes(li.clone(), false);
        {
            let [g0, g1] = &mut self.graphs;
            g0.compute_edge_intersections(g1, li, true);
        }

        // Step 3: Split at the nodes and merge coincident edges
        let mut split = Vec::new();
        self.graphs[0].compute_split_edges(&mut split);
        self.graphs[1].compute_split_edges(&mut split);
        let mut edge_list = EdgeList::new();
        for edge in split {
            insert_unique_edge(&mut edge_list, edge);
        }
        compute_labels_from_depths(&mut edge_list);
        let edges = replace_collapsed_edges(edge_list);
        check_noding(&edges)?;
        debug!(edges = edges.len(), ?op, "overlay edges noded");

        // Step 4: Build and label the planar graph
        self.graph.add_edges(edges);
        self.compute_labelling()?;
        self.label_incomplete_nodes();

        // Step 5: Select result area edges and assemble
        self.find_result_area_edges(op);
        self.cancel_duplicate_result_edges();

        let mut polygon_builder = PolygonBuilder::new();
        polygon_builder.add(&mut self.graph)?;
        let polygons: Vec<Geometry> = polygon_builder.polygons().into_iter().map(Geometry::Polygon).collect();

        let locator = self.locator;
        let lines = build_lines(&mut self.graph, op, &self.factory, |p| is_covered(&locator, p, &polygons));
        let points = build_points(&self.graph, op, &self.factory, |p| {
            is_covered(&locator, p, &lines) || is_covered(&locator, p, &polygons)
        });
        debug!(
            polygons = polygons.len(),
            lines = lines.len(),
            points = points.len(),
            "overlay result assembled"
        );

        let parts: Vec<Geometry> = points.into_iter().chain(lines).chain(polygons).collect();
        if parts.is_empty() {
            let [a, b] = self.geometries();
            return Ok(empty_result(op, a, b, &self.factory));
        }
        Ok(self.factory.build_geometry(parts))
    }

    fn copy_points(&mut self, arg: usize) {
        let copied: Vec<(Coord, Option<Location>)> = self.graphs[arg]
            .nodes()
            .map(|n| (n.coord, n.label.on_location(arg)))
            .collect();
        for (coord, loc) in copied {
            let id = self.graph.add_node(coord);
            let node = self.graph.node_mut(id);
            node.label = node.label.with_location(arg, Position::On, loc);
        }
    }

    fn compute_labelling(&mut self) -> Result<()> {
        let geoms = self.geometries();
        let nodes = self.graph.node_ids();
        for &node in &nodes {
            self.graph.label_node_star(node, geoms)?;
        }
        for &node in &nodes {
            self.merge_sym_labels(node);
        }
        for &node in &nodes {
            let star_label = self.graph.node(node).star_label;
            let node = self.graph.node_mut(node);
            node.label = node.label.merged(&star_label);
        }
        Ok(())
    }

    /// Each directed edge fills its unknown locations from its sym.
    fn merge_sym_labels(&mut self, node: NodeId) {
        for de in self.graph.node(node).star.clone() {
            let sym = self.graph.sym(de);
            let sym_label = *self.graph.dir_edge(sym).label();
            let dir_edge = self.graph.dir_edge_mut(de);
            dir_edge.end.label = dir_edge.end.label.merged(&sym_label);
        }
    }

    /// Locates nodes known to only one input in the other input, then
    /// completes the labels of the edges in every star.
    fn label_incomplete_nodes(&mut self) {
        let geoms = self.geometries();
        for id in self.graph.node_ids() {
            let node = self.graph.node(id);
            let mut label = node.label;
            if node.is_isolated() {
                let target = usize::from(!label.is_null(0));
                let loc = self.locator.locate(&node.coord, geoms[target]);
                label = label.with_location(target, Position::On, Some(loc));
                self.graph.node_mut(id).label = label;
            }
            for de in self.graph.node(id).star.clone() {
                let dir_edge = self.graph.dir_edge_mut(de);
                let mut de_label = dir_edge.end.label;
                for i in 0..2 {
                    de_label = de_label.with_all_locations_if_null(i, label.on_location(i));
                }
                dir_edge.end.label = de_label;
            }
        }
    }

    fn find_result_area_edges(&mut self, op: OverlayOpCode) {
        for de in self.graph.dir_edge_ids().to_vec() {
            let dir_edge = self.graph.dir_edge(de);
            let label = *dir_edge.label();
            if label.is_area()
                && !dir_edge.is_interior_area_edge()
                && is_result_of_op(label.location(0, Position::Right), label.location(1, Position::Right), op)
            {
                self.graph.dir_edge_mut(de).in_result = true;
            }
        }
    }

    /// An edge in the result in both directions bounds no area.
    fn cancel_duplicate_result_edges(&mut self) {
        for de in self.graph.dir_edge_ids().to_vec() {
            let sym = self.graph.sym(de);
            if self.graph.dir_edge(de).in_result && self.graph.dir_edge(sym).in_result {
                self.graph.dir_edge_mut(de).in_result = false;
                self.graph.dir_edge_mut(sym).in_result = false;
            }
        }
    }
}

/// Adds `edge` unless an edge with the same coordinates exists, in which
/// case the labels are merged and the depths accumulated.
fn insert_unique_edge(edge_list: &mut EdgeList, edge: Edge) {
    let Some(i) = edge_list.find_equal_edge(&edge) else {
        edge_list.add(edge);
        return;
    };
    let existing = edge_list.get_mut(i);
    let to_merge = if existing.is_pointwise_equal(&edge) {
        edge.label
    } else {
        edge.label.flipped()
    };
    if existing.depth.is_null() {
        let own = existing.label;
        existing.depth.add(&own);
    }
    existing.depth.add(&to_merge);
    existing.label = existing.label.merged(&to_merge);
}

/// Rewrites the side labels of merged area edges from their depths. An
/// edge with equal depth on both sides of an input is interior to it and
/// becomes a line for that input.
fn compute_labels_from_depths(edge_list: &mut EdgeList) {
    for edge in edge_list.iter_mut() {
        if edge.depth.is_null() {
            continue;
        }
        edge.depth.normalize();
        for i in 0..2 {
            if edge.label.is_null(i) || !edge.label.is_area() || edge.depth.is_null_for(i) {
                continue;
            }
            if edge.depth.delta(i) == 0 {
                edge.label = edge.label.to_line(i);
            } else {
                let left = edge.depth.location(i, Position::Left);
                let right = edge.depth.location(i, Position::Right);
                edge.label = edge
                    .label
                    .with_location(i, Position::Left, Some(left))
                    .with_location(i, Position::Right, Some(right));
            }
        }
    }
}

/// Replaces area edges that double back on themselves by line edges.
fn replace_collapsed_edges(edge_list: EdgeList) -> Vec<Edge> {
    let (collapsed, mut edges): (Vec<Edge>, Vec<Edge>) = edge_list.into_edges().into_iter().partition(Edge::is_collapsed);
    edges.extend(collapsed.iter().map(Edge::collapsed_edge));
    edges
}

fn check_noding(edges: &[Edge]) -> Result<()> {
    let strings: Vec<NodedSegmentString> = edges
        .iter()
        .enumerate()
        .map(|(i, e)| NodedSegmentString::new(e.coords().to_vec(), i))
        .collect();
    NodingValidator::new(&strings).check_interior_intersections()
}

fn is_covered(locator: &PointLocator, p: &Coord, geoms: &[Geometry]) -> bool {
    geoms.iter().any(|g| locator.locate(p, g) != Location::Exterior)
}

/// The empty geometry typed by the dimension the result would have had.
pub fn empty_result(op: OverlayOpCode, a: &Geometry, b: &Geometry, factory: &GeometryFactory) -> Geometry {
    let dimension = match op {
        OverlayOpCode::Intersection => a.dimension().min(b.dimension()),
        OverlayOpCode::Union | OverlayOpCode::SymDifference => a.dimension().max(b.dimension()),
        OverlayOpCode::Difference => a.dimension(),
    };
    factory.create_empty(dimension)
}

/// A result of higher dimension than both inputs means the overlay went
/// wrong, typically because of robustness failures.
fn check_dimension(result: &Geometry, a: &Geometry, b: &Geometry) -> Result<()> {
    let max_input = a.dimension().max(b.dimension());
    if result.dimension() > max_input {
        return Err(TopologyError::DimensionCollapse(format!(
            "result of dimension {:?} from inputs of dimension {:?}",
            result.dimension(),
            max_input
        ))
        .into());
    }
    Ok(())
}
