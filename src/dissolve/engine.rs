use std::collections::BTreeSet;

use crate::assets::decode::PreparedImage;
use crate::config::schema::CurtainConfig;
use crate::dissolve::order::RevealPolicy;
use crate::dissolve::scheduler::{
    DissolveScheduler, DissolveState, OnComplete, StartOutcome, TickStatus,
};
use crate::foundation::core::{Viewport, clamp_device_pixel_ratio};
use crate::foundation::error::{CurtainError, CurtainResult};
use crate::foundation::rng::{RandomSource, Rng64};
use crate::grid::builder::{Grid, GridConfig, build_grid};
use crate::render::curtain::CurtainSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Grid rebuilt and curtain repainted for the new viewport.
    Rebuilt,
    /// A dissolve already started in this generation; the old grid stays.
    Ignored,
}

/// Owns one curtain: its grid, surface and dissolve state.
///
/// The curtain is painted synchronously by [`new`](Self::new), [`resize`](Self::resize) and
/// [`reset`](Self::reset), so every erase lands on a fully painted surface.
pub struct DissolveEngine<S: CurtainSurface> {
    surface: S,
    grid: Grid,
    grid_cfg: GridConfig,
    scheduler: DissolveScheduler,
    erased: BTreeSet<usize>,
    generation: u64,
    run_count: u64,
    batch_size: usize,
    reduced_motion: bool,
    device_pixel_ratio: f64,
    rng: Box<dyn RandomSource>,
    background: Option<PreparedImage>,
}

impl<S: CurtainSurface> std::fmt::Debug for DissolveEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DissolveEngine")
            .field("cells", &self.grid.len())
            .field("erased", &self.erased.len())
            .field("state", &self.scheduler.state())
            .field("generation", &self.generation)
            .field("run_count", &self.run_count)
            .finish()
    }
}

impl<S: CurtainSurface> DissolveEngine<S> {
    /// Fit `surface`, build the grid and paint the curtain.
    ///
    /// Fails when the config is invalid or the surface cannot be allocated; the caller then
    /// simply has no curtain.
    pub fn new(
        mut surface: S,
        config: &CurtainConfig,
        viewport: Viewport,
        device_pixel_ratio: f64,
    ) -> CurtainResult<Self> {
        config.validate()?;
        let rng: Box<dyn RandomSource> = match config.dissolve.seed {
            Some(seed) => Box::new(Rng64::new(seed)),
            None => Box::new(Rng64::from_clock()),
        };
        let dpr = clamp_device_pixel_ratio(device_pixel_ratio);
        surface.fit(viewport, dpr)?;
        let grid = build_grid(viewport, &config.grid);
        surface.paint_curtain(&grid, None)?;

        Ok(Self {
            surface,
            grid,
            grid_cfg: config.grid.clone(),
            scheduler: DissolveScheduler::new(config.reduced_motion),
            erased: BTreeSet::new(),
            generation: 0,
            run_count: 0,
            batch_size: config.dissolve.batch_size,
            reduced_motion: config.reduced_motion,
            device_pixel_ratio: dpr,
            rng,
            background: None,
        })
    }

    /// Replace the random source used by the random policy.
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Set the image painted under the cells and repaint, unless a dissolve already started.
    pub fn set_background(&mut self, image: Option<PreparedImage>) -> CurtainResult<()> {
        self.background = image;
        if self.scheduler.state() != DissolveState::Idle {
            tracing::debug!("background change deferred: dissolve already started");
            return Ok(());
        }
        self.surface
            .paint_curtain(&self.grid, self.background.as_ref())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn viewport(&self) -> Viewport {
        self.grid.viewport()
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    /// Indices erased so far in this generation.
    pub fn erased(&self) -> &BTreeSet<usize> {
        &self.erased
    }

    pub fn is_erased(&self, index: usize) -> bool {
        self.erased.contains(&index)
    }

    pub fn state(&self) -> DissolveState {
        self.scheduler.state()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Number of grid builds after the first one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Dissolve runs started over the engine's lifetime.
    pub fn run_count(&self) -> u64 {
        self.run_count
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn rebuild(&mut self, viewport: Viewport, device_pixel_ratio: f64) -> CurtainResult<()> {
        let dpr = clamp_device_pixel_ratio(device_pixel_ratio);
        self.surface.fit(viewport, dpr)?;
        self.grid = build_grid(viewport, &self.grid_cfg);
        self.device_pixel_ratio = dpr;
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            cells = self.grid.len(),
            width = viewport.width,
            height = viewport.height,
            "curtain rebuilt"
        );
        self.surface
            .paint_curtain(&self.grid, self.background.as_ref())
    }

    /// Follow a viewport change. Ignored once a dissolve has started.
    pub fn resize(
        &mut self,
        viewport: Viewport,
        device_pixel_ratio: f64,
    ) -> CurtainResult<ResizeOutcome> {
        if self.scheduler.state() != DissolveState::Idle {
            tracing::debug!(state = ?self.scheduler.state(), "resize ignored during dissolve");
            return Ok(ResizeOutcome::Ignored);
        }
        self.rebuild(viewport, device_pixel_ratio)?;
        Ok(ResizeOutcome::Rebuilt)
    }

    /// Drop any run and start a fresh generation with a fully painted curtain.
    pub fn reset(&mut self, viewport: Viewport, device_pixel_ratio: f64) -> CurtainResult<()> {
        self.scheduler.reset();
        self.erased.clear();
        self.rebuild(viewport, device_pixel_ratio)
    }

    /// Plan the dissolve. Only the first call per generation starts a run.
    pub fn start(
        &mut self,
        policy: RevealPolicy,
        on_complete: OnComplete,
    ) -> CurtainResult<StartOutcome> {
        let outcome = self.scheduler.start(
            &self.grid,
            policy,
            self.batch_size,
            self.rng.as_mut(),
            on_complete,
        )?;
        if outcome == StartOutcome::Started {
            self.run_count += 1;
        }
        Ok(outcome)
    }

    /// Erase the next batch. `delta_ms` is the frame time since the previous tick; batches
    /// are per tick, not per millisecond.
    pub fn tick(&mut self, delta_ms: f64) -> CurtainResult<TickStatus> {
        let grid = &self.grid;
        let surface = &mut self.surface;
        let erased = &mut self.erased;
        let status = self.scheduler.tick(|index| {
            let cell = grid
                .cell(index)
                .ok_or_else(|| CurtainError::validation(format!("no cell at index {index}")))?;
            surface.erase_hex(cell)?;
            erased.insert(index);
            Ok(())
        })?;
        if status.erased > 0 {
            tracing::trace!(
                delta_ms,
                erased = status.erased,
                remaining = status.remaining,
                "dissolve tick"
            );
        }
        Ok(status)
    }

    /// Cancel any run and release the surface buffer.
    pub fn teardown(&mut self) {
        self.scheduler.cancel();
        self.surface.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dissolve/engine.rs"]
mod tests;
