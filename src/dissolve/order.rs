use crate::foundation::core::Point;
use crate::foundation::rng::{RandomSource, shuffle};
use crate::grid::builder::Grid;

/// Which cells go first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RevealPolicy {
    /// Uniformly shuffled.
    Random,
    /// Outward ripple: ascending distance from the point, ties in grid order.
    DistanceFrom(Point),
    /// Grid build order.
    Sequential,
}

/// Cell indices of `grid` in erase order. Always a permutation of `0..grid.len()`.
pub fn erase_order(grid: &Grid, policy: RevealPolicy, rng: &mut dyn RandomSource) -> Vec<usize> {
    let mut order: Vec<usize> = (0..grid.len()).collect();
    match policy {
        RevealPolicy::Sequential => {}
        RevealPolicy::Random => shuffle(&mut order, rng),
        RevealPolicy::DistanceFrom(p) => {
            let cells = grid.cells();
            // `sort_by` is stable, so equidistant cells keep grid order.
            order.sort_by(|&a, &b| {
                let da = (cells[a].center - p).hypot2();
                let db = (cells[b].center - p).hypot2();
                da.total_cmp(&db)
            });
        }
    }
    order
}

#[cfg(test)]
#[path = "../../tests/unit/dissolve/order.rs"]
mod tests;
