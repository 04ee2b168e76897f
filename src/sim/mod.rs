//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame deltas only (no clocks)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod outcome;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Exit, aabb_hit, classify_exit, first_hit};
pub use difficulty::{Difficulty, difficulty_ratio};
pub use outcome::{SessionSummary, time_bonus};
pub use spawner::{Spawner, spawn_target, update_spawner};
pub use state::{Counters, GameEvent, GamePhase, GameState, Projectile, Screen, Target};
pub use tick::{TickInput, apply_score, tick};
