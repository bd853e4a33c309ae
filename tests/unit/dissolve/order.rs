use super::*;
use crate::foundation::core::Viewport;
use crate::foundation::rng::Rng64;
use crate::grid::builder::{GridConfig, build_grid};

fn grid() -> Grid {
    build_grid(Viewport::new(800.0, 600.0), &GridConfig::default())
}

fn is_permutation(order: &[usize], n: usize) -> bool {
    let mut sorted = order.to_vec();
    sorted.sort_unstable();
    sorted == (0..n).collect::<Vec<_>>()
}

#[test]
fn sequential_is_grid_order() {
    let g = grid();
    let order = erase_order(&g, RevealPolicy::Sequential, &mut Rng64::new(0));
    assert_eq!(order, (0..g.len()).collect::<Vec<_>>());
}

#[test]
fn random_is_a_seeded_permutation() {
    let g = grid();
    let a = erase_order(&g, RevealPolicy::Random, &mut Rng64::new(7));
    let b = erase_order(&g, RevealPolicy::Random, &mut Rng64::new(7));
    let c = erase_order(&g, RevealPolicy::Random, &mut Rng64::new(8));
    assert!(is_permutation(&a, g.len()));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn distance_policy_is_monotonic() {
    let g = grid();
    let p = Point::new(400.0, 528.0);
    let order = erase_order(&g, RevealPolicy::DistanceFrom(p), &mut Rng64::new(0));
    assert!(is_permutation(&order, g.len()));
    let d: Vec<f64> = order
        .iter()
        .map(|&i| g.cells()[i].center.distance(p))
        .collect();
    assert!(d.windows(2).all(|w| w[0] <= w[1]));
    // The first cell erased is the one under the impact point.
    assert_eq!(Some(order[0]), g.cell_at(p));
}

#[test]
fn distance_ties_keep_grid_order() {
    let g = grid();
    // A lattice center is equidistant from its symmetric neighbours.
    let origin = g.cells()[g.cell_at(Point::new(400.0, 300.0)).unwrap()].center;
    let order = erase_order(&g, RevealPolicy::DistanceFrom(origin), &mut Rng64::new(0));
    let dist = |i: usize| (g.cells()[i].center - origin).hypot2();
    for w in order.windows(2) {
        if dist(w[0]) == dist(w[1]) {
            assert!(w[0] < w[1]);
        }
    }
}

#[test]
fn empty_grid_has_empty_order() {
    let g = build_grid(Viewport::new(0.0, 0.0), &GridConfig::default());
    assert!(erase_order(&g, RevealPolicy::Random, &mut Rng64::new(1)).is_empty());
}
