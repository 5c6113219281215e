#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use tessellis::crop::{AspectRatio, Crop, CropCircle, CropRect};
use tessellis::math::transform_2d::{rotation_about, translation};
use tessellis::math::{Point2, Tolerances, Transform2, Vector2};
use tessellis::motif::{ExplicitMotif, InferredMotif, OutlineMotif};
use tessellis::prototype::{DesignElement, Prototype};
use tessellis::tiling::{FillRegion, Tile, Tiling};
use tessellis::topology::Map;

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

fn unit_square() -> Tile {
    Tile::polygon(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
    ])
    .unwrap()
}

fn square_tiling(fill: FillRegion) -> Arc<Tiling> {
    let mut tiling = Tiling::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0));
    tiling.add_tile(unit_square(), vec![Transform2::identity()]);
    tiling.set_fill(fill);
    Arc::new(tiling)
}

/// Regular hexagons with unit circumradius, flat top and bottom.
fn hexagon_tiling(fill: FillRegion) -> Arc<Tiling> {
    let h = 3.0_f64.sqrt();
    let mut tiling = Tiling::new(Vector2::new(1.5, h / 2.0), Vector2::new(0.0, h));
    tiling.add_tile(Tile::regular(6).unwrap(), vec![Transform2::identity()]);
    tiling.set_fill(fill);
    Arc::new(tiling)
}

fn positions(map: &Map) -> Vec<Point2> {
    let mut points: Vec<Point2> = map.vertices().map(|(_, v)| v.position).collect();
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points
}

#[test]
fn two_unit_squares_merge_to_six_vertices_seven_edges() {
    init_tracing();
    let tol = Tolerances::default();
    let square = unit_square().boundary_map(tol);

    let mut map = Map::new(tol);
    map.merge(&square, &translation(0.0, 0.0)).unwrap();
    map.merge(&square, &translation(1.0, 0.0)).unwrap();

    assert_eq!(map.num_vertices(), 6);
    assert_eq!(map.num_edges(), 7);
    assert!(map.verify().is_empty());
}

#[test]
fn rebuilding_a_prototype_is_idempotent() {
    init_tracing();
    let tiling = hexagon_tiling(FillRegion::new(-1, 1, -1, 1));
    let mut proto = Prototype::new(&tiling, Tolerances::default());
    proto.add_element(DesignElement::new(0, Box::new(InferredMotif::new())));

    let first = proto.proto_map().clone();
    proto.wipeout_proto_map();
    let second = proto.proto_map().clone();

    assert!(!first.is_empty());
    assert_eq!(first.num_vertices(), second.num_vertices());
    assert_eq!(first.num_edges(), second.num_edges());
    for (a, b) in positions(&first).iter().zip(positions(&second).iter()) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-9);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-9);
    }
    assert!(first.verify().is_empty());
}

#[test]
fn inferred_hexagon_is_a_six_pointed_star_of_spokes() {
    init_tracing();
    let tiling = hexagon_tiling(FillRegion::default());
    let mut proto = Prototype::new(&tiling, Tolerances::default());
    proto.add_element(DesignElement::new(0, Box::new(InferredMotif::new())));

    let map = proto.proto_map();
    let center = map.find_vertex(&Point2::origin()).unwrap();
    assert_eq!(map.num_edges(), 6);
    assert_eq!(map.neighbours(center).len(), 6);
}

#[test]
fn square_grid_with_outlines_is_a_lattice() {
    init_tracing();
    let tiling = square_tiling(FillRegion::new(0, 2, 0, 2));
    let mut proto = Prototype::new(&tiling, Tolerances::default());
    proto.add_element(DesignElement::new(0, Box::new(OutlineMotif)));

    let map = proto.proto_map();
    // 4 x 4 grid points, 2 * 3 * 4 unit edges.
    assert_eq!(map.num_vertices(), 16);
    assert_eq!(map.num_edges(), 24);
    assert!(map.verify().is_empty());
}

#[test]
fn embedded_crop_stitches_into_content() {
    init_tracing();
    let tiling = square_tiling(FillRegion::new(0, 3, 0, 0));
    let mut proto = Prototype::new(&tiling, Tolerances::default());
    proto.add_element(DesignElement::new(0, Box::new(OutlineMotif)));

    let mut crop = Crop::new();
    crop.set_circle(CropCircle::new(Point2::new(2.0, 0.5), 0.9));
    crop.set_embed(true);
    proto.set_crop(crop);

    let map = proto.proto_map();
    // The circle crosses the bottom and top lines of the strip.
    let dx = 0.56_f64.sqrt();
    for p in [
        Point2::new(2.0 - dx, 0.0),
        Point2::new(2.0 + dx, 0.0),
        Point2::new(2.0 - dx, 1.0),
        Point2::new(2.0 + dx, 1.0),
    ] {
        assert!(map.find_vertex(&p).is_some(), "missing crossing at {p:?}");
    }
    // Leftmost and rightmost columns are untouched, nothing was clipped.
    assert!(map.find_vertex(&Point2::new(0.0, 0.0)).is_some());
    assert!(map.find_vertex(&Point2::new(4.0, 1.0)).is_some());
    assert!(map.verify().is_empty());
}

#[test]
fn applied_hd_crop_clips_content() {
    init_tracing();
    let tiling = square_tiling(FillRegion::new(0, 4, 0, 4));
    let mut proto = Prototype::new(&tiling, Tolerances::default());
    proto.add_element(DesignElement::new(0, Box::new(OutlineMotif)));

    let mut crop = Crop::new();
    crop.set_rect(CropRect::new(Point2::origin(), 1.0, 2.25));
    crop.set_aspect(AspectRatio::Hd);
    crop.adjust();
    crop.set_apply(true);
    proto.set_crop(crop);

    // Width becomes 2.25 * 16/9 = 4, height stays 2.25: a 4 x 2 block of cells.
    let map = proto.proto_map();
    assert_eq!(map.num_vertices(), 15);
    assert_eq!(map.num_edges(), 4 * 3 + 5 * 2);
}

#[test]
fn rotated_placement_keeps_arc_geometry() {
    init_tracing();
    let tol = Tolerances::default();
    let mut petal = Map::new(tol);
    petal
        .insert_arc(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), Point2::new(0.5, 0.0), true)
        .unwrap();
    petal.insert_line(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).unwrap_err();

    let mut map = Map::new(tol);
    for k in 0..4 {
        let angle = f64::from(k) * std::f64::consts::FRAC_PI_2;
        map.merge(&petal, &rotation_about(&Point2::origin(), angle)).unwrap();
    }
    assert_eq!(map.num_edges(), 4);
    for (id, _) in map.edges() {
        let arc = map.arc_data(id).unwrap();
        assert_abs_diff_eq!(arc.radius(), 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(arc.span(), -std::f64::consts::PI, epsilon = 1e-9);
    }
}

#[test]
fn explicit_motif_repeats_over_fill() {
    init_tracing();
    let tol = Tolerances::default();
    let mut diagonal = Map::new(tol);
    diagonal.insert_line(Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)).unwrap();

    let tiling = square_tiling(FillRegion::new(0, 2, 0, 0));
    let mut proto = Prototype::new(&tiling, tol);
    proto.add_element(DesignElement::new(0, Box::new(ExplicitMotif::new(diagonal))));
    proto.add_element(DesignElement::new(0, Box::new(OutlineMotif)));

    let map = proto.proto_map();
    // 3 diagonals plus the 10 edges of a 3 x 1 strip.
    assert_eq!(map.num_edges(), 13);
    assert_eq!(map.num_vertices(), 8);
    assert!(map.verify().is_empty());
}
