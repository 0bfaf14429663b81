#![allow(clippy::unwrap_used)]

use topolis::error::OperationError;
use topolis::geometry::{Dimension, Geometry, GeometryFactory, Location, Polygon};
use topolis::math::orientation::signed_area;
use topolis::math::{Coord, PrecisionModel};
use topolis::operations::overlay::{Overlay, OverlayOpCode};
use topolis::operations::predicate::{
    contains, covered_by, covers, disjoint, equals_topo, intersects, relate, touches, within,
};
use topolis::operations::union::CascadedPolygonUnion;
use topolis::TopolisError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn area(geom: &Geometry) -> f64 {
    geom.components()
        .iter()
        .filter_map(|c| match c {
            Geometry::Polygon(p) => Some(p.rings().enumerate().fold(0.0, |acc, (i, ring)| {
                let a = signed_area(ring).abs();
                if i == 0 { acc + a } else { acc - a }
            })),
            _ => None,
        })
        .sum()
}

fn square(x: f64, y: f64, size: f64) -> Polygon {
    let exterior = vec![
        Coord::new(x, y),
        Coord::new(x + size, y),
        Coord::new(x + size, y + size),
        Coord::new(x, y + size),
        Coord::new(x, y),
    ];
    Polygon::new(exterior, Vec::new())
}

fn samples() -> Vec<Geometry> {
    vec![
        Geometry::rectangle(0.0, 0.0, 10.0, 10.0),
        Geometry::rectangle(5.0, 5.0, 15.0, 15.0),
        Geometry::rectangle(10.0, 0.0, 20.0, 10.0),
        Geometry::rectangle(2.0, 2.0, 4.0, 4.0),
        Geometry::polygon(&[(0.0, 0.0), (8.0, 0.0), (4.0, 6.0), (0.0, 0.0)], &[]),
        Geometry::line_string(&[(-5.0, 5.0), (15.0, 5.0)]),
        Geometry::line_string(&[(0.0, 0.0), (3.0, 3.0), (6.0, 0.0)]),
        Geometry::point(10.0, 5.0),
        Geometry::point(3.0, 3.0),
        Geometry::point(40.0, 40.0),
    ]
}

#[test]
fn overlapping_squares_intersect_in_a_square() {
    init_tracing();
    let a = Geometry::rectangle(0.0, 0.0, 10.0, 10.0);
    let b = Geometry::rectangle(5.0, 5.0, 15.0, 15.0);
    assert!(intersects(&a, &b).unwrap());

    let inter = a.intersection(&b).unwrap();
    let expected = Geometry::polygon(&[(10.0, 5.0), (10.0, 10.0), (5.0, 10.0), (5.0, 5.0), (10.0, 5.0)], &[]);
    assert!(equals_topo(&inter, &expected).unwrap());
    assert!(inter.normalized().equals_exact(&expected.normalized(), 0.0));
}

#[test]
fn disjoint_squares_have_empty_intersection() {
    init_tracing();
    let a = Geometry::rectangle(0.0, 0.0, 10.0, 10.0);
    let b = Geometry::rectangle(20.0, 20.0, 30.0, 30.0);
    assert!(disjoint(&a, &b).unwrap());
    assert!(!intersects(&a, &b).unwrap());
    assert!(a.intersection(&b).unwrap().is_empty());
    assert_eq!(relate(&a, &b).unwrap().to_string(), "FF2FF1212");
}

#[test]
fn vertex_touching_multipolygons_union_at_fixed_precision() {
    init_tracing();
    let a = Geometry::MultiPolygon(vec![square(0.0, 0.0, 1.0), square(2.0, 2.0, 1.0)]);
    let b = Geometry::MultiPolygon(vec![square(1.0, 1.0, 1.0)]);
    let pm = PrecisionModel::fixed(100.0).unwrap();

    let union = Overlay::new(&a, &b, OverlayOpCode::Union)
        .with_precision(pm)
        .execute()
        .unwrap();
    assert!((area(&union) - 3.0).abs() < 1e-9);
    assert!(covers(&union, &a).unwrap());
    assert!(covers(&union, &b).unwrap());

    let polys = vec![square(0.0, 0.0, 1.0), square(2.0, 2.0, 1.0), square(1.0, 1.0, 1.0)];
    let cascaded = CascadedPolygonUnion::new(polys)
        .with_factory(GeometryFactory::new(pm))
        .execute()
        .unwrap()
        .unwrap();
    assert!((area(&cascaded) - 3.0).abs() < 1e-9);
    assert!(equals_topo(&cascaded, &union).unwrap());
}

fn polygon_of(shell: &[(f64, f64)]) -> Polygon {
    Polygon::new(shell.iter().map(|&(x, y)| Coord::new(x, y)).collect(), Vec::new())
}

fn off_grid_fixture() -> Vec<Polygon> {
    vec![
        polygon_of(&[
            (-2.775, -37.382),
            (-2.769_481_895_688_469_5, -37.302_294_048_833_446),
            (-4.381, -37.19),
            (-4.379, -37.16),
            (-2.767_405_341_918_336_4, -37.272_299_383_264_858),
            (-2.766, -37.252),
            (-2.703, -37.257),
            (-2.712, -37.386),
            (-2.775, -37.382),
        ]),
        polygon_of(&[
            (-0.558, -16.355),
            (-0.556_624_473_051_351, -16.335_284_113_736_03),
            (-2.168, -16.223),
            (-2.165, -16.193),
            (-0.554_527_061_819_210_63, -16.305_221_219_408_683),
            (-0.549, -16.226),
            (-0.485, -16.23),
            (-0.494, -16.36),
            (-0.558, -16.355),
        ]),
        polygon_of(&[(-4.218, -16.08), (-4.216, -16.05), (-2.924, -16.14), (-2.926, -16.17), (-4.218, -16.08)]),
        polygon_of(&[
            (-5.291, -18.097),
            (-5.243, -17.415),
            (-5.239, -17.352),
            (-5.159_293_287_476_28, -17.357_518_157_020_873),
            (-5.071, -16.091),
            (-5.041, -16.093),
            (-5.129_230_609_705_516_9, -17.359_599_419_328_081),
            (-5.109, -17.361),
            (-5.114, -17.424),
            (-5.161, -18.106),
            (-5.291, -18.097),
        ]),
    ]
}

#[test]
fn cascaded_union_of_off_grid_polygons_at_fixed_precision() {
    init_tracing();
    let pm = PrecisionModel::fixed(100.0).unwrap();
    for parallel in [false, true] {
        let result = CascadedPolygonUnion::new(off_grid_fixture())
            .with_factory(GeometryFactory::new(pm))
            .with_parallel(parallel)
            .execute()
            .unwrap()
            .unwrap();
        assert!(matches!(result, Geometry::MultiPolygon(ref ps) if ps.len() == 4), "parallel = {parallel}");
        for c in result.coords() {
            assert_eq!(pm.make_precise_coord(c), c);
        }
    }
}

#[test]
fn point_on_polygon_boundary() {
    init_tracing();
    let poly = Geometry::rectangle(0.0, 0.0, 10.0, 10.0);
    let pt = Geometry::point(10.0, 5.0);

    let im = relate(&poly, &pt).unwrap();
    assert_eq!(im.get(Location::Interior, Location::Interior), Dimension::Empty);
    assert_eq!(im.get(Location::Boundary, Location::Interior), Dimension::Point);
    assert!(touches(&poly, &pt).unwrap());
    assert!(!contains(&poly, &pt).unwrap());
    assert!(covers(&poly, &pt).unwrap());
    assert!(covered_by(&pt, &poly).unwrap());
}

#[test]
fn cascaded_union_keeps_disjoint_squares_apart() {
    init_tracing();
    for n in [1_usize, 4, 9, 17] {
        let polys: Vec<Polygon> = (0..n)
            .map(|i| square((i % 5) as f64 * 2.0, (i / 5) as f64 * 2.0, 1.0))
            .collect();
        let result = CascadedPolygonUnion::new(polys.clone()).execute().unwrap().unwrap();
        let parts = result.components();
        assert_eq!(parts.len(), n);
        for poly in polys {
            let input = Geometry::Polygon(poly);
            assert!(parts.iter().any(|p| equals_topo(p, &input).unwrap()));
        }
    }
}

#[test]
fn relate_is_symmetric_under_transpose() {
    init_tracing();
    let geoms = samples();
    for a in &geoms {
        for b in &geoms {
            let ab = relate(a, b).unwrap();
            let ba = relate(b, a).unwrap();
            assert_eq!(ab.transpose(), ba, "{} / {}", a.type_name(), b.type_name());
            assert_eq!(intersects(a, b).unwrap(), intersects(b, a).unwrap());
            assert_eq!(touches(a, b).unwrap(), touches(b, a).unwrap());
            assert_eq!(contains(a, b).unwrap(), within(b, a).unwrap());
        }
    }
}

#[test]
fn intersects_is_the_negation_of_disjoint() {
    init_tracing();
    let geoms = samples();
    for a in &geoms {
        for b in &geoms {
            assert_eq!(intersects(a, b).unwrap(), !disjoint(a, b).unwrap());
        }
    }
}

#[test]
fn overlay_identity_laws() {
    init_tracing();
    for a in samples() {
        assert!(equals_topo(&a.union(&a).unwrap(), &a).unwrap(), "{}", a.type_name());
        assert!(equals_topo(&a.intersection(&a).unwrap(), &a).unwrap(), "{}", a.type_name());
        assert!(a.difference(&a).unwrap().is_empty());
        assert!(a.sym_difference(&a).unwrap().is_empty());
    }
}

#[test]
fn union_covers_both_inputs() {
    init_tracing();
    let geoms = samples();
    for a in &geoms {
        for b in &geoms {
            let union = a.union(b).unwrap();
            if union.is_geometry_collection() {
                assert!(matches!(
                    covers(&union, a),
                    Err(TopolisError::Operation(OperationError::GeometryCollectionArgument))
                ));
                continue;
            }
            assert!(covers(&union, a).unwrap(), "{} / {}", a.type_name(), b.type_name());
            assert!(covers(&union, b).unwrap(), "{} / {}", a.type_name(), b.type_name());
        }
    }
}

#[test]
fn rectangle_fast_path_matches_relate() {
    init_tracing();
    let rects = [
        Geometry::rectangle(0.0, 0.0, 10.0, 10.0),
        Geometry::rectangle(2.0, 2.0, 4.0, 4.0),
        Geometry::rectangle(10.0, 0.0, 20.0, 10.0),
    ];
    for rect in &rects {
        for g in samples() {
            let im = relate(rect, &g).unwrap();
            assert_eq!(intersects(rect, &g).unwrap(), im.is_intersects());
            assert_eq!(contains(rect, &g).unwrap(), im.is_contains());
            assert_eq!(covers(rect, &g).unwrap(), im.is_covers());
        }
    }
}

#[test]
fn precision_snapping_is_idempotent() {
    let models = [
        PrecisionModel::Floating,
        PrecisionModel::FloatingSingle,
        PrecisionModel::fixed(100.0).unwrap(),
        PrecisionModel::fixed(0.5).unwrap(),
    ];
    let coords = [Coord::new(1.234_567_891, -9.876_543_21), Coord::new(1e7 + 0.3, 0.005), Coord::new(-0.5, 2.5)];
    for pm in models {
        for c in coords {
            let once = pm.make_precise_coord(c);
            assert_eq!(pm.make_precise_coord(once), once);
        }
    }
}
