//! Running score
//!
//! Score grows with running time, scaled by the multiplier of the current
//! difficulty tier. The reported value is the whole-number part.

/// Score for the current session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    value: f32,
    multiplier: u32,
}

impl Score {
    pub fn new(multiplier: u32) -> Self {
        Self {
            value: 0.0,
            multiplier,
        }
    }

    /// Add `multiplier * delta` (call once per frame while running)
    pub fn accrue(&mut self, delta: f32) {
        if delta > 0.0 {
            self.value += self.multiplier as f32 * delta;
        }
    }

    pub fn score(&self) -> u32 {
        self.value.floor() as u32
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: u32) {
        self.multiplier = multiplier;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accrue_uses_multiplier() {
        let mut score = Score::new(5);
        score.accrue(1.0);
        assert_eq!(score.score(), 5);

        score.set_multiplier(10);
        score.accrue(0.5);
        assert_eq!(score.score(), 10);
        assert_eq!(score.multiplier(), 10);
    }

    #[test]
    fn test_accrue_ignores_negative_delta() {
        let mut score = Score::new(5);
        score.accrue(-1.0);
        assert_eq!(score.score(), 0);
    }
}
