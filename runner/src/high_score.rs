/// Best final score seen by this process. Not persisted.
#[derive(Debug, Default)]
pub struct HighScore {
    best: u32,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    /// Returns true when `score` beats the previous best.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_not_a_record() {
        let mut high_score = HighScore::new();
        assert!(!high_score.record(0));
        assert_eq!(high_score.best(), 0);
    }

    #[test]
    fn test_only_strictly_higher_scores_count() {
        let mut high_score = HighScore::new();
        assert!(high_score.record(7));
        assert!(!high_score.record(7));
        assert!(!high_score.record(3));
        assert!(high_score.record(12));
        assert_eq!(high_score.best(), 12);
    }
}
