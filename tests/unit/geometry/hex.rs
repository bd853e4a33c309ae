use super::*;

fn approx(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn vertices_are_flat_top_and_clockwise_on_screen() {
    let v = hex_vertices(Point::new(0.0, 0.0), 10.0);
    assert!(approx(v[0], Point::new(10.0, 0.0)));
    assert!(approx(v[3], Point::new(-10.0, 0.0)));
    // Bottom and top edges are horizontal.
    assert!((v[1].y - v[2].y).abs() < 1e-9);
    assert!((v[4].y - v[5].y).abs() < 1e-9);
    // Vertex 1 is below the center in screen coordinates.
    assert!(v[1].y > 0.0);

    // Positive shoelace sum in a y-down frame means clockwise on screen.
    let mut area2 = 0.0;
    for i in 0..HEX_SIDES {
        let (a, b) = edge(&v, i);
        area2 += a.x * b.y - b.x * a.y;
    }
    assert!(area2 > 0.0);
}

#[test]
fn every_edge_has_side_length_radius() {
    let v = hex_vertices(Point::new(3.0, -7.0), 28.0);
    for i in 0..HEX_SIDES {
        let (a, b) = edge(&v, i);
        assert!((a.distance(b) - 28.0).abs() < 1e-9);
    }
}

#[test]
fn edge_wraps_modulo_six() {
    let v = hex_vertices(Point::ZERO, 5.0);
    assert_eq!(edge(&v, 5), (v[5], v[0]));
    assert_eq!(edge(&v, 6), edge(&v, 0));
}

#[test]
fn lattice_offsets_odd_columns_including_negative() {
    let r = 20.0;
    let (dx, dy) = lattice_strides(r);
    assert_eq!(lattice_center(0, 0, r), Point::new(0.0, 0.0));
    assert!(approx(lattice_center(1, 0, r), Point::new(dx, dy / 2.0)));
    assert!(approx(lattice_center(-1, 0, r), Point::new(-dx, dy / 2.0)));
    assert!(approx(lattice_center(-2, 1, r), Point::new(-2.0 * dx, dy)));
}

#[test]
fn neighbours_share_lower_edges_exactly() {
    let r = 10.0;
    let a = hex_vertices(lattice_center(0, 0, r), r);
    let below = hex_vertices(lattice_center(0, 1, r), r);
    let lower_right = hex_vertices(lattice_center(1, 0, r), r);

    // Bottom edge of `a` is the top edge of the cell below.
    let (p, q) = edge(&a, 1);
    let (s, t) = edge(&below, 4);
    assert!(approx(p, t) && approx(q, s));

    // Lower-right edge of `a` is the upper-left edge of its lower-right neighbour.
    let (p, q) = edge(&a, 0);
    let (s, t) = edge(&lower_right, 3);
    assert!(approx(p, t) && approx(q, s));
}

#[test]
fn centroid_scaling_expands_around_center() {
    let c = Point::new(50.0, 40.0);
    let v = hex_vertices(c, 10.0);
    assert!(approx(centroid(&v), c));
    let big = scale_about_centroid(&v, 1.5);
    for p in big {
        assert!((p.distance(c) - 15.0).abs() < 1e-9);
    }
}

#[test]
fn contains_matches_hexagon_shape() {
    let c = Point::new(0.0, 0.0);
    let r = 10.0;
    assert!(hex_contains(c, r, c));
    assert!(hex_contains(c, r, Point::new(10.0, 0.0)));
    assert!(hex_contains(c, r, Point::new(0.0, 8.6)));
    assert!(!hex_contains(c, r, Point::new(0.0, 8.7)));
    // Near a corner of the bounding box but outside the slanted edge.
    assert!(!hex_contains(c, r, Point::new(9.0, 8.0)));
}
