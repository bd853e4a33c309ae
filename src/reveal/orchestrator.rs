use std::cell::Cell;
use std::rc::Rc;

use crate::config::schema::{CurtainConfig, PolicyKind, RevealConfig};
use crate::dissolve::engine::DissolveEngine;
use crate::dissolve::scheduler::{DissolveState, StartOutcome};
use crate::effects::pulse::{ImpactPulse, PulseFrame};
use crate::effects::scramble::TextScramble;
use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::CurtainResult;
use crate::foundation::rng::{RandomSource, Rng64};
use crate::render::curtain::CurtainSurface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationPhase {
    /// Nothing painted yet.
    Idle,
    /// Curtain painted, waiting for a trigger.
    Armed,
    Revealing,
    Revealed,
}

/// User input that may trigger the reveal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    Pointer,
    /// Key name as reported by the host, e.g. `"Enter"` or `" "`.
    Key(String),
}

impl Activation {
    pub fn is_trigger(&self) -> bool {
        match self {
            Self::Pointer => true,
            Self::Key(k) => k == "Enter" || k == " ",
        }
    }
}

/// Presentation callbacks. All methods default to no-ops.
pub trait RevealHost {
    /// The curtain was hit at `point` (CSS pixels).
    fn on_impact(&mut self, _point: Point) {}

    /// Current pulse ring, or `None` when the fx layer should be cleared.
    fn on_pulse(&mut self, _frame: Option<&PulseFrame>) {}

    /// Title text for this frame.
    fn on_title(&mut self, _text: &str) {}

    /// The curtain is fully gone. Emitted once.
    fn on_revealed(&mut self) {}
}

/// Drives one reveal sequence over a [`DissolveEngine`].
pub struct RevealOrchestrator {
    config: RevealConfig,
    policy: PolicyKind,
    reduced_motion: bool,
    phase: AnimationPhase,
    hit_in_ms: Option<f64>,
    pulse: Option<ImpactPulse>,
    scramble: Option<TextScramble>,
    completed: Rc<Cell<bool>>,
    rng: Box<dyn RandomSource>,
}

impl std::fmt::Debug for RevealOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealOrchestrator")
            .field("phase", &self.phase)
            .field("hit_in_ms", &self.hit_in_ms)
            .field("pulse", &self.pulse.is_some())
            .field("scramble", &self.scramble.is_some())
            .finish()
    }
}

impl RevealOrchestrator {
    pub fn new(config: &CurtainConfig) -> Self {
        let rng: Box<dyn RandomSource> = match config.dissolve.seed {
            // Separate stream from the erase order.
            Some(seed) => Box::new(Rng64::new(seed.rotate_left(32) ^ 0x5CA7_7E12)),
            None => Box::new(Rng64::from_clock()),
        };
        Self {
            config: config.reveal.clone(),
            policy: config.dissolve.policy,
            reduced_motion: config.reduced_motion,
            phase: AnimationPhase::Idle,
            hit_in_ms: None,
            pulse: None,
            scramble: None,
            completed: Rc::new(Cell::new(false)),
            rng,
        }
    }

    /// Replace the random source used for title noise.
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    /// Mark the curtain as painted and ready for a trigger.
    pub fn arm(&mut self) {
        if self.phase == AnimationPhase::Idle {
            self.phase = AnimationPhase::Armed;
            tracing::debug!("reveal armed");
        }
    }

    /// Hard re-init: rebuild and repaint the curtain for `viewport`, drop any in-flight
    /// sequence and wait for a new trigger.
    pub fn reset<S: CurtainSurface>(
        &mut self,
        engine: &mut DissolveEngine<S>,
        viewport: Viewport,
        device_pixel_ratio: f64,
    ) -> CurtainResult<()> {
        engine.reset(viewport, device_pixel_ratio)?;
        self.rearm();
        Ok(())
    }

    fn rearm(&mut self) {
        self.hit_in_ms = None;
        self.pulse = None;
        self.scramble = None;
        // The previous run's hook keeps the old flag; it can no longer fire.
        self.completed = Rc::new(Cell::new(false));
        self.phase = AnimationPhase::Armed;
        tracing::debug!("reveal re-armed");
    }

    /// Handle a trigger. Returns whether it started the sequence; anything after the first
    /// accepted activation is a no-op.
    pub fn activate<S: CurtainSurface>(
        &mut self,
        engine: &mut DissolveEngine<S>,
        host: &mut dyn RevealHost,
        activation: &Activation,
    ) -> CurtainResult<bool> {
        if !activation.is_trigger() {
            return Ok(false);
        }
        if self.phase != AnimationPhase::Armed {
            tracing::debug!(phase = ?self.phase, ?activation, "activation ignored");
            return Ok(false);
        }
        self.phase = AnimationPhase::Revealing;
        let delay = if self.reduced_motion {
            0.0
        } else {
            self.config.hit_delay_ms
        };
        tracing::debug!(?activation, delay_ms = delay, "reveal triggered");
        if delay <= 0.0 {
            self.impact(engine, host)?;
        } else {
            self.hit_in_ms = Some(delay);
        }
        Ok(true)
    }

    fn impact<S: CurtainSurface>(
        &mut self,
        engine: &mut DissolveEngine<S>,
        host: &mut dyn RevealHost,
    ) -> CurtainResult<()> {
        self.hit_in_ms = None;
        let point = engine
            .viewport()
            .at_fraction(self.config.impact_x_frac, self.config.impact_y_frac);
        host.on_impact(point);

        if !self.reduced_motion {
            let mut pulse = ImpactPulse::new(point, self.config.pulse.clone());
            let frame = pulse.advance(0.0);
            host.on_pulse(frame.as_ref());
            self.pulse = Some(pulse);
        }

        let done = Rc::clone(&self.completed);
        let outcome = engine.start(
            self.policy.resolve(point),
            Box::new(move || done.set(true)),
        )?;
        if outcome == StartOutcome::Rejected {
            tracing::warn!("dissolve already started on this curtain; reveal re-armed");
            self.phase = AnimationPhase::Armed;
        }
        Ok(())
    }

    /// Advance the sequence by `delta_ms`: hit delay, pulse, dissolve, then title.
    pub fn tick<S: CurtainSurface>(
        &mut self,
        engine: &mut DissolveEngine<S>,
        host: &mut dyn RevealHost,
        delta_ms: f64,
    ) -> CurtainResult<()> {
        let dt = delta_ms.max(0.0);

        if let Some(left) = self.hit_in_ms {
            let left = left - dt;
            if left <= 0.0 {
                self.impact(engine, host)?;
            } else {
                self.hit_in_ms = Some(left);
            }
        } else if let Some(pulse) = self.pulse.as_mut() {
            let frame = pulse.advance(dt);
            host.on_pulse(frame.as_ref());
            if frame.is_none() {
                self.pulse = None;
            }
        }

        if engine.is_running() {
            engine.tick(dt)?;
        } else if self.phase == AnimationPhase::Revealing
            && self.hit_in_ms.is_none()
            && engine.state() == DissolveState::Idle
        {
            // The engine was reset underneath a running reveal.
            self.rearm();
            return Ok(());
        }

        if self.phase == AnimationPhase::Revealing && self.completed.get() {
            self.finish(engine, host);
        } else if let Some(scramble) = self.scramble.as_mut() {
            let text = scramble.advance(dt, self.rng.as_mut());
            host.on_title(&text);
            if scramble.is_finished() {
                self.scramble = None;
            }
        }
        Ok(())
    }

    fn finish<S: CurtainSurface>(
        &mut self,
        engine: &mut DissolveEngine<S>,
        host: &mut dyn RevealHost,
    ) {
        self.phase = AnimationPhase::Revealed;
        tracing::debug!(cells = engine.grid().len(), "curtain revealed");
        host.on_revealed();

        let duration = if self.reduced_motion {
            0.0
        } else {
            self.config.scramble_ms
        };
        let mut scramble = TextScramble::new(&self.config.title, duration);
        let text = scramble.advance(0.0, self.rng.as_mut());
        host.on_title(&text);
        if !scramble.is_finished() {
            self.scramble = Some(scramble);
        }
        engine.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/orchestrator.rs"]
mod tests;
