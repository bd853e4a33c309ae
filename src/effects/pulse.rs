use crate::effects::ease::Ease;
use crate::foundation::core::Point;
use crate::foundation::error::{CurtainError, CurtainResult};

/// Shape and timing of the impact ring.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PulseSpec {
    pub duration_ms: f64,
    pub start_radius: f64,
    pub growth: f64,
    pub peak_alpha: f64,
    pub rgb: [u8; 3],
    pub line_width: f64,
    pub ease: Ease,
}

impl Default for PulseSpec {
    fn default() -> Self {
        Self {
            duration_ms: 220.0,
            start_radius: 10.0,
            growth: 240.0,
            peak_alpha: 0.55,
            rgb: [0, 255, 190],
            line_width: 2.5,
            ease: Ease::Linear,
        }
    }
}

impl PulseSpec {
    pub fn validate(&self) -> CurtainResult<()> {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(CurtainError::validation(
                "pulse.duration_ms must be finite and > 0",
            ));
        }
        for (name, v) in [
            ("start_radius", self.start_radius),
            ("growth", self.growth),
            ("line_width", self.line_width),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(CurtainError::validation(format!(
                    "pulse.{name} must be finite and >= 0"
                )));
            }
        }
        if !self.peak_alpha.is_finite() || !(0.0..=1.0).contains(&self.peak_alpha) {
            return Err(CurtainError::validation("pulse.peak_alpha must be in [0, 1]"));
        }
        Ok(())
    }
}

/// One drawable state of the ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PulseFrame {
    pub center: Point,
    pub radius: f64,
    pub alpha: f64,
    pub rgb: [u8; 3],
    pub line_width: f64,
}

/// Expanding, fading ring at the impact point.
#[derive(Clone, Debug)]
pub struct ImpactPulse {
    center: Point,
    spec: PulseSpec,
    elapsed_ms: f64,
    finished: bool,
}

impl ImpactPulse {
    pub fn new(center: Point, spec: PulseSpec) -> Self {
        Self {
            center,
            spec,
            elapsed_ms: 0.0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance by `delta_ms`; `None` once the ring has run its course and should be cleared.
    pub fn advance(&mut self, delta_ms: f64) -> Option<PulseFrame> {
        if self.finished {
            return None;
        }
        self.elapsed_ms += delta_ms.max(0.0);
        let t = (self.elapsed_ms / self.spec.duration_ms).min(1.0);
        if t >= 1.0 {
            self.finished = true;
            return None;
        }
        let e = self.spec.ease.apply(t);
        Some(PulseFrame {
            center: self.center,
            radius: self.spec.start_radius + e * self.spec.growth,
            alpha: (1.0 - e) * self.spec.peak_alpha,
            rgb: self.spec.rgb,
            line_width: self.spec.line_width,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pulse.rs"]
mod tests;
