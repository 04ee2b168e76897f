//! Data-driven game balance
//!
//! Every gameplay number lives here so a session can be replayed or rebalanced
//! from a JSON file without touching the simulation. Missing fields fall back
//! to the defaults below.

use serde::{Deserialize, Serialize};

/// Gameplay tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Win / loss ===
    /// Score at which the session is won
    pub win_score: i32,
    /// Seconds after which the win time bonus is gone
    pub time_bonus_seconds: i32,

    // === Scoring ===
    /// Points for hitting a target in the long-shot zone
    pub long_shot_points: i32,
    /// Points for any other target hit
    pub hit_points: i32,
    /// Penalty for hitting a FRED
    pub avoid_hit_penalty: i32,
    /// Penalty for a projectile leaving the top of the screen
    pub miss_penalty: i32,
    /// Penalty for a target expiring un-hit
    pub escape_penalty: i32,
    /// Long-shot line as a fraction of screen height (targets above it score more)
    pub long_shot_fraction: f32,

    // === Difficulty ramp ===
    /// Targets spawned before difficulty maxes out
    pub ramp_target_count: u32,
    /// Target lifetime at the start (ms)
    pub target_lifetime_easy_ms: f32,
    /// Target lifetime at full difficulty (ms)
    pub target_lifetime_hard_ms: f32,
    /// Spawn delay at the start (ms)
    pub spawn_delay_easy_ms: f32,
    /// Spawn delay at full difficulty (ms)
    pub spawn_delay_hard_ms: f32,
    /// Concurrent targets at the start
    pub max_targets_easy: u32,
    /// Concurrent targets at full difficulty
    pub max_targets_hard: u32,
    /// FRED spawn probability at full difficulty
    pub avoid_probability_hard: f32,
    /// Delay between session start and the first spawn attempt (ms)
    pub first_spawn_delay_ms: f32,

    // === Geometry ===
    /// Projectile speed (px/s, straight up)
    pub projectile_speed: f32,
    /// Half extent of the projectile/target hit box (px)
    pub hit_half_extent: f32,
    /// How far past an edge a projectile travels before it is culled (px)
    pub offscreen_margin: f32,
    /// Weapon distance above the bottom edge (px)
    pub weapon_offset_y: f32,
    /// Half width of the weapon sprite, used to clamp the cursor (px)
    pub weapon_half_width: f32,
    /// Horizontal spawn inset from each side (px)
    pub spawn_margin_x: f32,
    /// Top of the spawn band (px)
    pub spawn_top: f32,
    /// Clearance kept between the spawn band and the bottom edge (px)
    pub spawn_bottom_clearance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            win_score: 69,
            time_bonus_seconds: 100,

            long_shot_points: 2,
            hit_points: 1,
            avoid_hit_penalty: 5,
            miss_penalty: 1,
            escape_penalty: 1,
            long_shot_fraction: 1.0 / 3.0,

            ramp_target_count: 75,
            target_lifetime_easy_ms: 4000.0,
            target_lifetime_hard_ms: 1200.0,
            spawn_delay_easy_ms: 1200.0,
            spawn_delay_hard_ms: 300.0,
            max_targets_easy: 2,
            max_targets_hard: 5,
            avoid_probability_hard: 0.35,
            first_spawn_delay_ms: 1000.0,

            projectile_speed: 1200.0,
            hit_half_extent: 40.0,
            offscreen_margin: 50.0,
            weapon_offset_y: 50.0,
            weapon_half_width: 50.0,
            spawn_margin_x: 60.0,
            spawn_top: 60.0,
            spawn_bottom_clearance: 290.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values that would break the simulation
    pub fn sanitized(mut self) -> Self {
        self.ramp_target_count = self.ramp_target_count.max(1);
        self.max_targets_easy = self.max_targets_easy.max(1);
        self.max_targets_hard = self.max_targets_hard.max(self.max_targets_easy);
        self.target_lifetime_easy_ms = self.target_lifetime_easy_ms.max(1.0);
        self.target_lifetime_hard_ms = self.target_lifetime_hard_ms.max(1.0);
        self.spawn_delay_easy_ms = self.spawn_delay_easy_ms.max(1.0);
        self.spawn_delay_hard_ms = self.spawn_delay_hard_ms.max(1.0);
        self.avoid_probability_hard = self.avoid_probability_hard.clamp(0.0, 1.0);
        self.long_shot_fraction = self.long_shot_fraction.clamp(0.0, 1.0);
        self.win_score = self.win_score.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "win_score": 20, "avoid_hit_penalty": 1 }"#).unwrap();
        assert_eq!(tuning.win_score, 20);
        assert_eq!(tuning.avoid_hit_penalty, 1);
        assert_eq!(tuning.ramp_target_count, 75);
        assert_eq!(tuning.hit_half_extent, 40.0);
    }

    #[test]
    fn test_sanitize_clamps() {
        let tuning = Tuning::from_json(
            r#"{ "ramp_target_count": 0, "max_targets_easy": 4, "max_targets_hard": 2,
                 "avoid_probability_hard": 3.0 }"#,
        )
        .unwrap();
        assert_eq!(tuning.ramp_target_count, 1);
        assert_eq!(tuning.max_targets_hard, 4);
        assert_eq!(tuning.avoid_probability_hard, 1.0);
    }

    #[test]
    fn test_from_json_needs_no_second_sanitize() {
        let tuning = Tuning::from_json(
            r#"{ "max_targets_easy": 0, "spawn_delay_hard_ms": -5.0, "long_shot_fraction": 2.0,
                 "win_score": -3 }"#,
        )
        .unwrap();
        assert_eq!(tuning.clone().sanitized(), tuning);
        assert_eq!(tuning.max_targets_easy, 1);
        assert_eq!(tuning.spawn_delay_hard_ms, 1.0);
        assert_eq!(tuning.long_shot_fraction, 1.0);
        assert_eq!(tuning.win_score, 1);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(Tuning::from_json("{ win_score: }").is_err());
    }
}
