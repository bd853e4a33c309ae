use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::{CurtainError, CurtainResult};
use crate::geometry::hex::{HEX_SIDES, hex_contains, hex_vertices, lattice_center, lattice_strides};

/// Sizing and overscan knobs for [`build_grid`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// `radius = floor(min(w, h) / radius_divisor)` before clamping.
    pub radius_divisor: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// First lattice column/row index; negative so the grid starts left of and above the viewport.
    pub start_index: i32,
    /// Extra columns/rows past `ceil(dimension / stride)`.
    pub extra_cells: i32,
    /// Cells whose center is farther than this outside the viewport are dropped.
    pub margin_px: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            radius_divisor: 26.0,
            min_radius: 22.0,
            max_radius: 34.0,
            start_index: -4,
            extra_cells: 8,
            margin_px: 160.0,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> CurtainResult<()> {
        if !self.radius_divisor.is_finite() || self.radius_divisor <= 0.0 {
            return Err(CurtainError::validation(
                "grid.radius_divisor must be finite and > 0",
            ));
        }
        if !self.min_radius.is_finite() || self.min_radius <= 0.0 {
            return Err(CurtainError::validation(
                "grid.min_radius must be finite and > 0",
            ));
        }
        if !self.max_radius.is_finite() || self.max_radius < self.min_radius {
            return Err(CurtainError::validation(
                "grid.max_radius must be finite and >= grid.min_radius",
            ));
        }
        if !self.margin_px.is_finite() || self.margin_px < 0.0 {
            return Err(CurtainError::validation(
                "grid.margin_px must be finite and >= 0",
            ));
        }
        if self.start_index > 0 {
            return Err(CurtainError::validation("grid.start_index must be <= 0"));
        }
        if self.extra_cells < 0 {
            return Err(CurtainError::validation("grid.extra_cells must be >= 0"));
        }
        Ok(())
    }

    /// Cell radius for a viewport; degenerate viewports fall back to `min_radius`.
    pub fn radius_for(&self, viewport: Viewport) -> f64 {
        if viewport.is_degenerate() {
            return self.min_radius;
        }
        (viewport.min_side() / self.radius_divisor)
            .floor()
            .clamp(self.min_radius, self.max_radius)
    }
}

/// One curtain tile.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
    pub center: Point,
    pub vertices: [Point; HEX_SIDES],
}

/// Cells covering one viewport size, in column-major build order.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    viewport: Viewport,
    radius: f64,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn empty(viewport: Viewport, radius: f64) -> Self {
        Self {
            viewport,
            radius,
            cells: Vec::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of the first cell whose hexagon contains `p`.
    pub fn cell_at(&self, p: Point) -> Option<usize> {
        self.cells
            .iter()
            .position(|c| hex_contains(c.center, self.radius, p))
    }
}

/// Lay out the curtain lattice for `viewport`.
///
/// Deterministic: the same viewport and config always produce the same cells in the same order.
#[tracing::instrument(skip(cfg), fields(cells = tracing::field::Empty))]
pub fn build_grid(viewport: Viewport, cfg: &GridConfig) -> Grid {
    let radius = cfg.radius_for(viewport);
    if viewport.is_degenerate() {
        tracing::debug!("degenerate viewport, building empty grid");
        return Grid::empty(viewport, radius);
    }

    let (dx, dy) = lattice_strides(radius);
    let cols = (viewport.width / dx).ceil() as i32 + cfg.extra_cells;
    let rows = (viewport.height / dy).ceil() as i32 + cfg.extra_cells;
    let m = cfg.margin_px;

    let mut cells = Vec::new();
    for col in cfg.start_index..cols {
        for row in cfg.start_index..rows {
            let center = lattice_center(col, row, radius);
            if center.x < -m
                || center.x > viewport.width + m
                || center.y < -m
                || center.y > viewport.height + m
            {
                continue;
            }
            cells.push(Cell {
                col,
                row,
                center,
                vertices: hex_vertices(center, radius),
            });
        }
    }

    tracing::Span::current().record("cells", cells.len());
    Grid {
        viewport,
        radius,
        cells,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/builder.rs"]
mod tests;
