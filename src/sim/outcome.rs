//! End-of-session summary
//!
//! The time bonus only affects the displayed final score; the running score
//! that decided the outcome is kept unchanged.

use serde::{Deserialize, Serialize};

use super::state::{Counters, GamePhase, GameState};

/// Recap of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub won: bool,
    /// Running score at the moment the session ended
    pub score: i32,
    /// Seconds spent playing
    pub elapsed_secs: f64,
    /// Bonus for winning quickly (0 on a loss)
    pub time_bonus: i32,
    /// `score + time_bonus`, the value ranked on the leaderboard
    pub final_score: i32,
    pub counters: Counters,
}

impl SessionSummary {
    pub fn from_state(state: &GameState) -> Self {
        let won = state.phase == GamePhase::Won;
        let elapsed_secs = state.elapsed_ms / 1000.0;
        let time_bonus = if won {
            time_bonus(elapsed_secs, state.tuning.time_bonus_seconds)
        } else {
            0
        };
        Self {
            won,
            score: state.score,
            elapsed_secs,
            time_bonus,
            final_score: state.score + time_bonus,
            counters: state.counters,
        }
    }
}

/// `max(0, limit - floor(elapsed_secs))`
pub fn time_bonus(elapsed_secs: f64, limit_secs: i32) -> i32 {
    let whole = elapsed_secs.max(0.0).floor();
    (limit_secs as f64 - whole).max(0.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_bonus() {
        assert_eq!(time_bonus(0.0, 100), 100);
        assert_eq!(time_bonus(42.9, 100), 58);
        assert_eq!(time_bonus(99.99, 100), 1);
        assert_eq!(time_bonus(100.0, 100), 0);
        assert_eq!(time_bonus(1000.0, 100), 0);
    }
}
