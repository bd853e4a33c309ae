//! hexcurtain paints a tessellated hexagon curtain over a page and dissolves it cell by cell.
//!
//! The pieces, bottom-up:
//!
//! - [`build_grid`] lays out flat-top hexagons covering a [`Viewport`] plus an overscan margin
//! - [`CpuCurtain`] paints the curtain into a `vello_cpu` pixmap and erases single cells
//! - [`DissolveEngine`] owns grid, surface and erase schedule, one batch per [`tick`]
//! - [`RevealOrchestrator`] turns a pointer/key activation into impact, pulse, dissolve and
//!   the title scramble
//!
//! [`tick`]: DissolveEngine::tick
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod config;
pub(crate) mod dissolve;
pub(crate) mod effects;
pub(crate) mod geometry;
pub(crate) mod grid;
pub(crate) mod render;
pub(crate) mod reveal;

pub use crate::foundation::core::{
    Affine, BezPath, MAX_DEVICE_PIXEL_RATIO, MIN_DEVICE_PIXEL_RATIO, Point, Rect, Rgba8Premul,
    Vec2, Viewport, clamp_device_pixel_ratio,
};
pub use crate::foundation::error::{CurtainError, CurtainResult};
pub use crate::foundation::rng::{RandomSource, Rng64, shuffle};

pub use crate::assets::decode::{PreparedImage, decode_image, load_background, read_image};
pub use crate::config::schema::{CurtainConfig, DissolveConfig, PolicyKind, RevealConfig};
pub use crate::dissolve::engine::{DissolveEngine, ResizeOutcome};
pub use crate::dissolve::order::{RevealPolicy, erase_order};
pub use crate::dissolve::scheduler::{
    DissolveRun, DissolveScheduler, DissolveState, OnComplete, StartOutcome, TickStatus,
};
pub use crate::effects::ease::Ease;
pub use crate::effects::pulse::{ImpactPulse, PulseFrame, PulseSpec};
pub use crate::effects::scramble::{SCRAMBLE_GLYPHS, TextScramble};
pub use crate::geometry::hex::{
    HEX_SIDES, STROKE_EDGES, centroid, edge, hex_contains, hex_vertices, lattice_center,
    lattice_strides, scale_about_centroid,
};
pub use crate::grid::builder::{Cell, Grid, GridConfig, build_grid};
pub use crate::render::composite::{dest_out, over, over_in_place};
pub use crate::render::curtain::{CpuCurtain, CurtainStyle, CurtainSurface};
pub use crate::render::fx::FxLayer;
pub use crate::render::raster::cover_fit;
pub use crate::render::surface::Surface;
pub use crate::reveal::orchestrator::{Activation, AnimationPhase, RevealHost, RevealOrchestrator};
