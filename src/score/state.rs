//! Running score and match streak.

use serde::{Deserialize, Serialize};

use crate::core::ScoringRules;

/// Score of the round in progress.
///
/// Serializes as the `ScoreData` record:
/// `{"score":30,"consecutiveMatches":2,"comboMultiplier":2}`.
///
/// # Invariants
///
/// - `combo_multiplier == 1 + consecutive_matches / 2`
/// - `score` never goes below zero
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreState {
    pub score: u32,
    pub consecutive_matches: u32,
    pub combo_multiplier: u32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self {
            score: 0,
            consecutive_matches: 0,
            combo_multiplier: 1,
        }
    }
}

impl ScoreState {
    /// Multiplier earned by a streak of `consecutive_matches`.
    ///
    /// ```
    /// use memory_match::score::ScoreState;
    ///
    /// assert_eq!(ScoreState::combo_for(0), 1);
    /// assert_eq!(ScoreState::combo_for(1), 1);
    /// assert_eq!(ScoreState::combo_for(2), 2);
    /// assert_eq!(ScoreState::combo_for(5), 3);
    /// ```
    #[must_use]
    pub const fn combo_for(consecutive_matches: u32) -> u32 {
        1 + consecutive_matches / 2
    }

    /// Extend the streak and add `match_score * combo`. Returns the points
    /// awarded.
    pub fn apply_match(&mut self, rules: ScoringRules) -> u32 {
        self.consecutive_matches = self.consecutive_matches.saturating_add(1);
        self.combo_multiplier = Self::combo_for(self.consecutive_matches);
        let points = rules.match_score.saturating_mul(self.combo_multiplier);
        self.score = self.score.saturating_add(points);
        points
    }

    /// Break the streak and subtract the penalty, flooring at zero. Returns
    /// the points actually lost.
    pub fn apply_mismatch(&mut self, rules: ScoringRules) -> u32 {
        self.consecutive_matches = 0;
        self.combo_multiplier = 1;
        let before = self.score;
        self.score = self.score.saturating_sub(rules.mismatch_penalty);
        before - self.score
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Copy with the multiplier recomputed from the streak.
    ///
    /// Saved records are not trusted to keep the invariant.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            combo_multiplier: Self::combo_for(self.consecutive_matches),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: ScoringRules = ScoringRules {
        match_score: 10,
        mismatch_penalty: 2,
    };

    #[test]
    fn test_default() {
        let s = ScoreState::default();
        assert_eq!((s.score, s.consecutive_matches, s.combo_multiplier), (0, 0, 1));
    }

    #[test]
    fn test_streak_builds_combo() {
        let mut s = ScoreState::default();

        let awarded: Vec<u32> = (0..3).map(|_| s.apply_match(RULES)).collect();

        assert_eq!(awarded, vec![10, 20, 20]);
        assert_eq!(s.score, 50);
        assert_eq!(s.consecutive_matches, 3);
        assert_eq!(s.combo_multiplier, 2);
    }

    #[test]
    fn test_mismatch_resets_streak() {
        let mut s = ScoreState {
            score: 5,
            consecutive_matches: 3,
            combo_multiplier: 2,
        };

        assert_eq!(s.apply_mismatch(RULES), 2);
        assert_eq!(s.score, 3);
        assert_eq!((s.consecutive_matches, s.combo_multiplier), (0, 1));

        assert_eq!(s.apply_match(RULES), 10);
        assert_eq!(s.score, 13);
        assert_eq!(s.combo_multiplier, 1);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let mut s = ScoreState {
            score: 1,
            ..ScoreState::default()
        };

        assert_eq!(s.apply_mismatch(RULES), 1);
        assert_eq!(s.score, 0);
        assert_eq!(s.apply_mismatch(RULES), 0);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_reset() {
        let mut s = ScoreState::default();
        s.apply_match(RULES);
        s.apply_match(RULES);
        s.reset();
        assert_eq!(s, ScoreState::default());
    }

    #[test]
    fn test_normalized_fixes_multiplier() {
        let saved = ScoreState {
            score: 40,
            consecutive_matches: 4,
            combo_multiplier: 9,
        };
        assert_eq!(saved.normalized().combo_multiplier, 3);
        assert_eq!(saved.normalized().score, 40);
    }

    #[test]
    fn test_record_format() {
        let s = ScoreState {
            score: 30,
            consecutive_matches: 2,
            combo_multiplier: 2,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"score":30,"consecutiveMatches":2,"comboMultiplier":2}"#);
        assert_eq!(serde_json::from_str::<ScoreState>(&json).unwrap(), s);
    }
}
