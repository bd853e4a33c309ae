/// Progress curve for the impact ring; maps elapsed fraction `t` to ring growth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    OutQuad,
    OutCubic,
    InOutCubic,
}

/// `1 - (1 - t)^n`: fast start, soft landing.
fn ease_out(t: f64, n: i32) -> f64 {
    1.0 - (1.0 - t).powi(n)
}

impl Ease {
    /// Eased progress; `t` is clamped to `[0, 1]` and the endpoints are fixed.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutQuad => ease_out(t, 2),
            Self::OutCubic => ease_out(t, 3),
            Self::InOutCubic if t < 0.5 => 4.0 * t.powi(3),
            Self::InOutCubic => 0.5 + 0.5 * ease_out(2.0 * t - 1.0, 3),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/ease.rs"]
mod tests;
