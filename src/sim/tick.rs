//! Per-frame simulation tick
//!
//! Order within one tick: target decay, spawner, projectiles. A target that
//! expires this tick is gone before any projectile can hit it.

use super::collision::{Exit, classify_exit, first_hit, is_long_shot};
use super::spawner::update_spawner;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer x position (moves the weapon)
    pub cursor_x: Option<f32>,
    /// Fire a projectile (click/tap)
    pub fire: bool,
    /// Demo mode - the game aims and fires by itself
    pub autopilot: bool,
}

/// Advance the game by `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if let Some(x) = input.cursor_x {
        state.set_cursor_x(x);
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.elapsed_ms += dt_ms as f64;

    let mut fire = input.fire;
    if input.autopilot {
        fire = autopilot(state);
    }
    if fire {
        state.fire();
    }

    update_targets(state, dt_ms);
    if state.phase != GamePhase::Playing {
        return;
    }

    update_spawner(state, dt_ms);

    update_projectiles(state, dt_ms);

    state.normalize_order();
}

/// Decay every live target and remove the expired ones
pub fn update_targets(state: &mut GameState, dt_ms: f32) {
    let mut i = 0;
    while i < state.targets.len() {
        if !state.targets[i].decay(dt_ms) {
            i += 1;
            continue;
        }
        let target = state.targets.remove(i);
        let escaped = !target.avoid;
        state.push_event(GameEvent::TargetExpired {
            id: target.id,
            escaped,
        });
        // Letting a FRED live is the point; only real targets cost a point
        if escaped {
            state.counters.escapes += 1;
            let penalty = state.tuning.escape_penalty;
            if apply_score(state, -penalty) {
                return;
            }
        }
    }
}

/// Move projectiles, resolve hits and screen exits
pub fn update_projectiles(state: &mut GameState, dt_ms: f32) {
    let dt = dt_ms / 1000.0;
    let half_extent = state.tuning.hit_half_extent;
    let margin = state.tuning.offscreen_margin;

    let mut i = 0;
    while i < state.projectiles.len() {
        let vel = state.projectiles[i].vel;
        state.projectiles[i].pos += vel * dt;
        let pos = state.projectiles[i].pos;

        if let Some(t) = first_hit(pos, &state.targets, half_extent) {
            let target = state.targets.remove(t);
            let projectile = state.projectiles.remove(i);

            let points = if target.avoid {
                state.counters.avoid_hits += 1;
                -state.tuning.avoid_hit_penalty
            } else {
                state.counters.hits += 1;
                if is_long_shot(target.pos.y, &state.screen, state.tuning.long_shot_fraction) {
                    state.tuning.long_shot_points
                } else {
                    state.tuning.hit_points
                }
            };
            state.push_event(GameEvent::TargetHit {
                target_id: target.id,
                projectile_id: projectile.id,
                avoid: target.avoid,
                points,
            });
            if apply_score(state, points) {
                return;
            }
            continue;
        }

        match classify_exit(pos, &state.screen, margin) {
            Exit::None => i += 1,
            Exit::Top => {
                let projectile = state.projectiles.remove(i);
                state.counters.misses += 1;
                state.push_event(GameEvent::ProjectileMissed { id: projectile.id });
                let penalty = state.tuning.miss_penalty;
                if apply_score(state, -penalty) {
                    return;
                }
            }
            Exit::Other => {
                let projectile = state.projectiles.remove(i);
                state.push_event(GameEvent::ProjectileCulled { id: projectile.id });
            }
        }
    }
}

/// Add `delta` to the score and check for a win or loss.
/// Returns true if the session just ended.
pub fn apply_score(state: &mut GameState, delta: i32) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    state.score += delta;
    state.push_event(GameEvent::ScoreChanged {
        score: state.score,
        delta,
    });

    if state.score < 0 {
        state.finish(false)
    } else if state.score >= state.tuning.win_score {
        state.finish(true)
    } else {
        false
    }
}

/// Aim at the most urgent real target; returns whether to fire
fn autopilot(state: &mut GameState) -> bool {
    let half = state.tuning.hit_half_extent;
    let weapon_y = state.weapon_pos().y;

    // A shot stops at the first target it reaches, so skip columns with a FRED
    // below the aim point
    let column_clear = |x: f32, y: f32| {
        !state
            .targets
            .iter()
            .any(|t| t.avoid && (t.pos.x - x).abs() < half && t.pos.y > y)
    };
    let aim = state
        .targets
        .iter()
        .filter(|t| !t.avoid && column_clear(t.pos.x, t.pos.y))
        .filter(|t| {
            // Will the shot get there before the target escapes?
            let travel_ms = (weapon_y - t.pos.y) / state.tuning.projectile_speed * 1000.0;
            travel_ms < t.time_left_ms
        })
        .min_by(|a, b| {
            a.time_left_ms
                .partial_cmp(&b.time_left_ms)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|t| t.pos.x);

    let Some(x) = aim else {
        return false;
    };
    state.set_cursor_x(x);

    let aligned = (state.weapon_x - x).abs() < half * 0.5;
    let in_flight = state
        .projectiles
        .iter()
        .any(|p| (p.pos.x - x).abs() < half);
    aligned && !in_flight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT_MS;
    use crate::sim::state::Target;
    use glam::Vec2;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start_session();
        state.spawner.stop();
        state
    }

    fn put_target(state: &mut GameState, x: f32, y: f32, avoid: bool) -> u32 {
        let id = state.next_entity_id();
        state.targets.push(Target {
            id,
            emoji: 0,
            avoid,
            pos: Vec2::new(x, y),
            time_left_ms: 10_000.0,
            max_time_ms: 10_000.0,
        });
        id
    }

    #[test]
    fn test_intro_does_not_tick() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput { fire: true, ..Default::default() }, SIM_DT_MS);
        assert_eq!(state.phase, GamePhase::Intro);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.elapsed_ms, 0.0);
    }

    #[test]
    fn test_escape_penalty_only_for_real_targets() {
        let mut state = playing(2);
        state.score = 5;
        put_target(&mut state, 100.0, 100.0, false);
        put_target(&mut state, 300.0, 100.0, true);
        for t in &mut state.targets {
            t.time_left_ms = 2000.0;
            t.max_time_ms = 2000.0;
        }
        update_targets(&mut state, 2000.0);
        assert!(state.targets.is_empty());
        assert_eq!(state.score, 4);
        assert_eq!(state.counters.escapes, 1);
    }

    #[test]
    fn test_long_shot_and_regular_hit() {
        let mut state = playing(3);
        state.set_cursor_x(400.0);
        put_target(&mut state, 400.0, 100.0, false);
        state.fire();
        for _ in 0..60 {
            update_projectiles(&mut state, SIM_DT_MS);
        }
        assert_eq!(state.score, 2);

        put_target(&mut state, 400.0, 300.0, false);
        state.fire();
        for _ in 0..60 {
            update_projectiles(&mut state, SIM_DT_MS);
        }
        assert_eq!(state.score, 3);
        assert_eq!(state.counters.hits, 2);
        assert!(state.targets.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_miss_through_top() {
        let mut state = playing(4);
        state.score = 3;
        state.fire();
        for _ in 0..60 {
            update_projectiles(&mut state, SIM_DT_MS);
        }
        assert_eq!(state.score, 2);
        assert_eq!(state.counters.misses, 1);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_side_exit_is_silent() {
        let mut state = playing(5);
        state.score = 3;
        let id = state.next_entity_id();
        state.projectiles.push(crate::sim::state::Projectile {
            id,
            pos: Vec2::new(10.0, 300.0),
            vel: Vec2::new(-6000.0, 0.0),
        });
        update_projectiles(&mut state, SIM_DT_MS);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.score, 3);
        assert_eq!(state.counters.misses, 0);
    }

    #[test]
    fn test_expiry_wins_over_hit() {
        let mut state = playing(6);
        state.score = 5;
        state.set_cursor_x(400.0);
        let id = put_target(&mut state, 400.0, 520.0, false);
        state.targets[0].time_left_ms = 10.0;
        state.fire();
        // Projectile starts inside the hit box, but the target expires first
        tick(&mut state, &TickInput::default(), SIM_DT_MS);
        assert!(state.targets.iter().all(|t| t.id != id));
        assert_eq!(state.counters.hits, 0);
        assert_eq!(state.counters.escapes, 1);
        assert_eq!(state.score, 4);
    }

    #[test]
    fn test_avoid_hit_loses_from_zero() {
        let mut state = playing(7);
        state.set_cursor_x(400.0);
        put_target(&mut state, 400.0, 300.0, true);
        state.fire();
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT_MS);
        }
        assert_eq!(state.score, -5);
        assert_eq!(state.phase, GamePhase::Lost);
        assert_eq!(state.counters.avoid_hits, 1);
        let summary = state.summary.as_ref().unwrap();
        assert!(!summary.won);
        assert_eq!(summary.time_bonus, 0);
        assert_eq!(summary.final_score, -5);
    }

    #[test]
    fn test_win_fires_once() {
        let mut state = playing(8);
        state.score = state.tuning.win_score - 1;
        assert!(apply_score(&mut state, 1));
        assert_eq!(state.phase, GamePhase::Won);
        assert!(!apply_score(&mut state, 1));
        let events = state.drain_events();
        let wins = events.iter().filter(|e| **e == GameEvent::SessionWon).count();
        assert_eq!(wins, 1);
    }

    #[test]
    fn test_finished_session_stops_mutating() {
        let mut state = playing(9);
        state.score = 0;
        apply_score(&mut state, -1);
        assert_eq!(state.phase, GamePhase::Lost);
        let elapsed = state.elapsed_ms;
        state.spawner.start(0.0);
        for _ in 0..100 {
            tick(&mut state, &TickInput { fire: true, ..Default::default() }, SIM_DT_MS);
        }
        assert_eq!(state.elapsed_ms, elapsed);
        assert!(state.targets.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(4242);
        let mut b = GameState::new(4242);
        a.start_session();
        b.start_session();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut a, &input, SIM_DT_MS);
            tick(&mut b, &input, SIM_DT_MS);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.counters, b.counters);
        assert_eq!(a.targets_spawned, b.targets_spawned);
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = GameState::new(77);
        state.start_session();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT_MS);
        }
        assert!(state.counters.hits > 0);
    }
}
