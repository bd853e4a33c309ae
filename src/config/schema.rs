use std::io::Read;
use std::path::Path;

use anyhow::Context as _;

use crate::dissolve::order::RevealPolicy;
use crate::effects::pulse::PulseSpec;
use crate::foundation::core::Point;
use crate::foundation::error::{CurtainError, CurtainResult};
use crate::grid::builder::GridConfig;
use crate::render::curtain::CurtainStyle;

/// Erase-order policy as written in config files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    #[default]
    Random,
    /// Outward from the impact point.
    Ripple,
    Sequential,
}

impl PolicyKind {
    /// Concrete policy; `Ripple` grows from `impact`.
    pub fn resolve(self, impact: Point) -> RevealPolicy {
        match self {
            Self::Random => RevealPolicy::Random,
            Self::Ripple => RevealPolicy::DistanceFrom(impact),
            Self::Sequential => RevealPolicy::Sequential,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DissolveConfig {
    /// Cells erased per tick.
    pub batch_size: usize,
    pub policy: PolicyKind,
    /// Fixed seed for the random policy; clock-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for DissolveConfig {
    fn default() -> Self {
        Self {
            batch_size: 18,
            policy: PolicyKind::Random,
            seed: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Delay between activation and impact.
    pub hit_delay_ms: f64,
    pub impact_x_frac: f64,
    pub impact_y_frac: f64,
    pub pulse: PulseSpec,
    /// Text scrambled into place once the curtain is gone.
    pub title: String,
    pub scramble_ms: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            hit_delay_ms: 210.0,
            impact_x_frac: 0.5,
            impact_y_frac: 0.88,
            pulse: PulseSpec::default(),
            title: "hi i'm makda".to_owned(),
            scramble_ms: 820.0,
        }
    }
}

/// Top-level settings. Every field has a default, so `{}` is a valid config.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CurtainConfig {
    pub grid: GridConfig,
    pub style: CurtainStyle,
    pub dissolve: DissolveConfig,
    pub reveal: RevealConfig,
    /// Skip the pulse and hit delay, erase everything in one tick.
    pub reduced_motion: bool,
}

impl CurtainConfig {
    pub fn from_reader(r: impl Read) -> CurtainResult<Self> {
        let cfg: Self = serde_json::from_reader(r).context("parse curtain config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> CurtainResult<Self> {
        let path = path.as_ref();
        let f = std::fs::File::open(path)
            .with_context(|| format!("open curtain config '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(f))
    }

    pub fn validate(&self) -> CurtainResult<()> {
        self.grid.validate()?;
        self.style.validate()?;
        self.reveal.pulse.validate()?;
        if self.dissolve.batch_size == 0 {
            return Err(CurtainError::validation("dissolve.batch_size must be > 0"));
        }
        let r = &self.reveal;
        if !r.hit_delay_ms.is_finite() || r.hit_delay_ms < 0.0 {
            return Err(CurtainError::validation(
                "reveal.hit_delay_ms must be finite and >= 0",
            ));
        }
        if !r.scramble_ms.is_finite() || r.scramble_ms < 0.0 {
            return Err(CurtainError::validation(
                "reveal.scramble_ms must be finite and >= 0",
            ));
        }
        for (name, v) in [
            ("impact_x_frac", r.impact_x_frac),
            ("impact_y_frac", r.impact_y_frac),
        ] {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(CurtainError::validation(format!(
                    "reveal.{name} must be in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/schema.rs"]
mod tests;
