//! Difficulty ramp
//!
//! Difficulty depends only on how many targets have been spawned this session.
//! `ratio = min(1, spawned / ramp_target_count)` blends every output from its
//! easy bound to its hard bound.

use crate::emoji::EMOJIS;
use crate::tuning::Tuning;

/// Difficulty outputs for the current spawn count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Difficulty {
    /// Ramp progress in [0, 1]
    pub ratio: f32,
    /// Lifetime of a newly spawned target (ms)
    pub target_lifetime_ms: f32,
    /// Delay until the next spawn attempt (ms)
    pub spawn_delay_ms: f32,
    /// Cap on live targets
    pub max_targets: usize,
    /// Chance that a new target is a FRED
    pub avoid_probability: f32,
}

impl Difficulty {
    /// Compute difficulty for `spawned` targets with `avoid_count` FREDs in play
    pub fn for_spawned(spawned: u32, avoid_count: usize, tuning: &Tuning) -> Self {
        let ratio = difficulty_ratio(spawned, tuning.ramp_target_count);
        let base_avoid = avoid_count as f32 / EMOJIS.len() as f32;
        let max_targets = lerp(
            tuning.max_targets_easy as f32,
            tuning.max_targets_hard as f32,
            ratio,
        )
        .floor() as usize;

        Self {
            ratio,
            target_lifetime_ms: lerp(
                tuning.target_lifetime_easy_ms,
                tuning.target_lifetime_hard_ms,
                ratio,
            ),
            spawn_delay_ms: lerp(tuning.spawn_delay_easy_ms, tuning.spawn_delay_hard_ms, ratio),
            max_targets,
            avoid_probability: lerp(base_avoid, tuning.avoid_probability_hard, ratio),
        }
    }
}

/// Ramp progress, clamped to 1
#[inline]
pub fn difficulty_ratio(spawned: u32, ramp_target_count: u32) -> f32 {
    if ramp_target_count == 0 {
        return 1.0;
    }
    (spawned as f32 / ramp_target_count as f32).min(1.0)
}

/// Exact at both ends: t=0 yields `easy`, t=1 yields `hard`
#[inline]
fn lerp(easy: f32, hard: f32, t: f32) -> f32 {
    easy * (1.0 - t) + hard * t
}
