use crate::foundation::rng::RandomSource;

/// Characters shown in place of not-yet-revealed text.
pub const SCRAMBLE_GLYPHS: &str = "!@#$%^&*()_+=-[]{}<>?/\\|~";

/// Left-to-right text reveal with random glyph noise in the unrevealed tail.
#[derive(Clone, Debug)]
pub struct TextScramble {
    target: Vec<char>,
    duration_ms: f64,
    elapsed_ms: f64,
    finished: bool,
}

impl TextScramble {
    pub fn new(target: &str, duration_ms: f64) -> Self {
        Self {
            target: target.chars().collect(),
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn target(&self) -> String {
        self.target.iter().collect()
    }

    /// Advance by `delta_ms` and return the text to display this frame.
    pub fn advance(&mut self, delta_ms: f64, rng: &mut dyn RandomSource) -> String {
        self.elapsed_ms += delta_ms.max(0.0);
        let t = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0)
        };
        if t >= 1.0 {
            self.finished = true;
            return self.target();
        }

        let glyphs: Vec<char> = SCRAMBLE_GLYPHS.chars().collect();
        let reveal = (t * self.target.len() as f64).floor() as usize;
        self.target
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if i < reveal {
                    c
                } else {
                    glyphs[rng.next_index(glyphs.len())]
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/scramble.rs"]
mod tests;
