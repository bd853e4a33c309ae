//! Flat-top hexagons in screen space (y grows downward).
//!
//! Vertex `i` sits at angle `60° * i`, so the ring runs clockwise on screen:
//! right, lower-right, lower-left, left, upper-left, upper-right. Edge `i` joins
//! vertex `i` to vertex `(i + 1) % 6`.
//!
//! This convention is paired with the offset-column lattice (column stride `1.5r`,
//! row stride `r√3`, odd columns shifted down half a row). In that lattice the lower
//! three edges of a cell are exactly the edges it shares with its lower-right, lower,
//! and lower-left neighbours, so stroking [`STROKE_EDGES`] for every cell draws each
//! edge of the tiling once.

use crate::foundation::core::{Point, Vec2};

pub const HEX_SIDES: usize = 6;

/// Edges stroked per cell: lower-right, bottom, lower-left.
pub const STROKE_EDGES: [usize; 3] = [0, 1, 2];

/// `√3`, the row stride in units of radius.
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

pub fn hex_vertices(center: Point, radius: f64) -> [Point; HEX_SIDES] {
    std::array::from_fn(|i| {
        let a = std::f64::consts::FRAC_PI_3 * i as f64;
        Point::new(center.x + a.cos() * radius, center.y + a.sin() * radius)
    })
}

/// `(column stride, row stride)` of the offset-column lattice.
pub fn lattice_strides(radius: f64) -> (f64, f64) {
    (1.5 * radius, SQRT_3 * radius)
}

/// Center of lattice cell `(col, row)`; odd columns (negative ones included) sit half a row lower.
pub fn lattice_center(col: i32, row: i32, radius: f64) -> Point {
    let (dx, dy) = lattice_strides(radius);
    let y_off = if col.rem_euclid(2) == 1 { dy / 2.0 } else { 0.0 };
    Point::new(f64::from(col) * dx, f64::from(row) * dy + y_off)
}

pub fn edge(vertices: &[Point; HEX_SIDES], i: usize) -> (Point, Point) {
    (vertices[i % HEX_SIDES], vertices[(i + 1) % HEX_SIDES])
}

pub fn centroid(vertices: &[Point; HEX_SIDES]) -> Point {
    let sum = vertices
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / HEX_SIDES as f64).to_point()
}

/// Vertices pushed away from (or toward) their centroid by `factor`.
pub fn scale_about_centroid(vertices: &[Point; HEX_SIDES], factor: f64) -> [Point; HEX_SIDES] {
    let c = centroid(vertices);
    std::array::from_fn(|i| c + (vertices[i] - c) * factor)
}

/// Point-in-hexagon for a flat-top hexagon; boundary points count as inside.
pub fn hex_contains(center: Point, radius: f64, p: Point) -> bool {
    const EPS: f64 = 1e-9;
    let dx = (p.x - center.x).abs();
    let dy = (p.y - center.y).abs();
    let half_h = SQRT_3 * 0.5 * radius;
    dy <= half_h + EPS && SQRT_3 * dx + dy <= SQRT_3 * radius + EPS
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/hex.rs"]
mod tests;
