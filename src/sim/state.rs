//! Game state and core simulation types
//!
//! Everything a session mutates lives in [`GameState`]; the presentation layer
//! only reads it and drains [`GameEvent`]s.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::outcome::SessionSummary;
use super::spawner::Spawner;
use crate::consts::*;
use crate::emoji::{AvoidSet, EmojiId};
use crate::tuning::Tuning;

/// Minimum target opacity while fading out
pub const MIN_TARGET_ALPHA: f32 = 0.3;
/// Extra scale a target grows by as it runs out of time
pub const TARGET_URGENCY_SCALE: f32 = 0.2;

/// Current screen of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen showing today's FREDs
    Intro,
    /// Active gameplay
    Playing,
    /// Score reached the win threshold
    Won,
    /// Score went negative
    Lost,
    /// Top 10 table
    Leaderboard,
}

impl GamePhase {
    /// Won or Lost
    pub fn is_finished(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Playfield size in pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    pub width: f32,
    pub height: f32,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

/// An emoji target counting down to its escape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub emoji: EmojiId,
    /// FRED - do not shoot
    pub avoid: bool,
    pub pos: Vec2,
    /// Remaining lifetime (ms)
    pub time_left_ms: f32,
    /// Lifetime at spawn (ms)
    pub max_time_ms: f32,
}

impl Target {
    /// Remaining lifetime as a fraction of the original, in [0, 1]
    pub fn life_ratio(&self) -> f32 {
        if self.max_time_ms <= 0.0 {
            return 0.0;
        }
        (self.time_left_ms / self.max_time_ms).clamp(0.0, 1.0)
    }

    /// Opacity for rendering (never below [`MIN_TARGET_ALPHA`])
    pub fn alpha(&self) -> f32 {
        self.life_ratio().max(MIN_TARGET_ALPHA)
    }

    /// Scale for rendering (grows as time runs out)
    pub fn scale(&self) -> f32 {
        1.0 + (1.0 - self.life_ratio()) * TARGET_URGENCY_SCALE
    }

    /// Decay by `dt_ms`; returns true once expired. Never goes below zero.
    pub fn decay(&mut self, dt_ms: f32) -> bool {
        self.time_left_ms = (self.time_left_ms - dt_ms).max(0.0);
        self.time_left_ms <= 0.0
    }
}

/// A shot travelling in a straight line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Velocity (px/s)
    pub vel: Vec2,
}

/// Per-session tallies shown on the recap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub hits: u32,
    pub misses: u32,
    pub avoid_hits: u32,
    pub escapes: u32,
}

/// Notifications for the presentation layer (sprites, sounds, effects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { session: u32 },
    TargetSpawned { id: u32, emoji: EmojiId, avoid: bool },
    /// Target ran out of time; `escaped` is false for FREDs
    TargetExpired { id: u32, escaped: bool },
    ProjectileFired { id: u32 },
    TargetHit { target_id: u32, projectile_id: u32, avoid: bool, points: i32 },
    /// Projectile left through the top edge
    ProjectileMissed { id: u32 },
    /// Projectile left through a side or the bottom (no penalty)
    ProjectileCulled { id: u32 },
    ScoreChanged { score: i32, delta: i32 },
    SessionWon,
    SessionLost,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG driving spawns and FRED picks
    pub rng: Pcg32,
    /// Balance parameters
    pub tuning: Tuning,
    /// Session generation, bumped on every start
    pub session: u32,
    /// Current phase
    pub phase: GamePhase,
    /// Running score (may go negative)
    pub score: i32,
    /// Recap tallies
    pub counters: Counters,
    /// Time spent in Playing this session (ms)
    pub elapsed_ms: f64,
    /// Today's FREDs
    pub avoid: AvoidSet,
    /// Targets spawned this session (drives difficulty)
    pub targets_spawned: u32,
    /// Live targets (sorted by id)
    pub targets: Vec<Target>,
    /// Live projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    /// Spawn countdown
    pub spawner: Spawner,
    /// Playfield size
    pub screen: Screen,
    /// Weapon x position (clamped cursor)
    pub weapon_x: f32,
    /// Summary of the finished session (Won/Lost and after)
    pub summary: Option<SessionSummary>,
    /// Pending notifications
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game on the intro screen
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let avoid = AvoidSet::pick(&mut rng);
        let screen = Screen::default();
        Self {
            seed,
            rng,
            tuning,
            session: 0,
            phase: GamePhase::Intro,
            score: 0,
            counters: Counters::default(),
            elapsed_ms: 0.0,
            avoid,
            targets_spawned: 0,
            targets: Vec::new(),
            projectiles: Vec::new(),
            spawner: Spawner::default(),
            screen,
            weapon_x: screen.width / 2.0,
            summary: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (never reused across sessions)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Difficulty for the current spawn count
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::for_spawned(self.targets_spawned, self.avoid.len(), &self.tuning)
    }

    /// Begin a fresh session (from Intro or Leaderboard)
    pub fn start_session(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Intro | GamePhase::Leaderboard) {
            log::debug!("Ignoring start from {:?}", self.phase);
            return false;
        }
        // Intro already shows the FREDs picked when the menu opened
        if self.phase == GamePhase::Leaderboard {
            self.avoid = AvoidSet::pick(&mut self.rng);
        }
        self.reset_session();
        self.session += 1;
        self.phase = GamePhase::Playing;
        self.spawner.start(self.tuning.first_spawn_delay_ms);
        self.push_event(GameEvent::SessionStarted {
            session: self.session,
        });
        log::info!(
            "Session {} started, FREDs: {}",
            self.session,
            self.avoid.display()
        );
        true
    }

    /// Move to the leaderboard (from Intro, Won or Lost)
    pub fn show_leaderboard(&mut self) -> bool {
        if !matches!(
            self.phase,
            GamePhase::Intro | GamePhase::Won | GamePhase::Lost
        ) {
            log::debug!("Ignoring leaderboard from {:?}", self.phase);
            return false;
        }
        self.phase = GamePhase::Leaderboard;
        true
    }

    /// Back to the title screen with a new set of FREDs
    pub fn return_to_intro(&mut self) -> bool {
        if self.phase != GamePhase::Leaderboard {
            log::debug!("Ignoring main menu from {:?}", self.phase);
            return false;
        }
        self.reset_session();
        self.avoid = AvoidSet::pick(&mut self.rng);
        self.phase = GamePhase::Intro;
        true
    }

    /// Finish the session. Only valid while Playing, so it fires once.
    pub(crate) fn finish(&mut self, won: bool) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = if won { GamePhase::Won } else { GamePhase::Lost };
        self.spawner.stop();
        self.targets.clear();
        self.projectiles.clear();
        let summary = SessionSummary::from_state(self);
        log::info!(
            "Session {} {}: score {} final {} in {:.1}s",
            self.session,
            if won { "won" } else { "lost" },
            summary.score,
            summary.final_score,
            summary.elapsed_secs
        );
        self.summary = Some(summary);
        self.push_event(if won {
            GameEvent::SessionWon
        } else {
            GameEvent::SessionLost
        });
        true
    }

    fn reset_session(&mut self) {
        self.score = 0;
        self.counters = Counters::default();
        self.elapsed_ms = 0.0;
        self.targets_spawned = 0;
        self.targets.clear();
        self.projectiles.clear();
        self.spawner.stop();
        self.summary = None;
    }

    /// Resize the playfield
    pub fn set_screen(&mut self, width: f32, height: f32) {
        self.screen = Screen {
            width: width.max(1.0),
            height: height.max(1.0),
        };
        self.set_cursor_x(self.weapon_x);
    }

    /// Follow the pointer, keeping the weapon on screen
    pub fn set_cursor_x(&mut self, x: f32) {
        let half = self.tuning.weapon_half_width;
        let max = (self.screen.width - half).max(half);
        self.weapon_x = x.clamp(half, max);
    }

    /// Muzzle position
    pub fn weapon_pos(&self) -> Vec2 {
        Vec2::new(self.weapon_x, self.screen.height - self.tuning.weapon_offset_y)
    }

    /// Fire a projectile straight up from the weapon (Playing only)
    pub fn fire(&mut self) -> Option<u32> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let id = self.next_entity_id();
        self.projectiles.push(Projectile {
            id,
            pos: self.weapon_pos(),
            vel: Vec2::new(0.0, -self.tuning.projectile_speed),
        });
        self.push_event(GameEvent::ProjectileFired { id });
        Some(id)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure stable iteration order
    pub fn normalize_order(&mut self) {
        self.targets.sort_by_key(|t| t.id);
        self.projectiles.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_starts_on_intro() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Intro);
        assert_eq!(state.session, 0);
        assert_eq!(state.avoid.len(), 3);
    }

    #[test]
    fn test_guarded_transitions() {
        let mut state = GameState::new(1);
        assert!(!state.return_to_intro());
        assert!(state.start_session());
        assert!(!state.start_session());
        assert!(!state.show_leaderboard());
        assert!(state.finish(false));
        assert!(!state.finish(true));
        assert_eq!(state.phase, GamePhase::Lost);
        assert!(state.show_leaderboard());
        assert!(state.return_to_intro());
        assert_eq!(state.phase, GamePhase::Intro);
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::new(5);
        state.start_session();
        state.score = 12;
        state.counters.hits = 4;
        state.targets_spawned = 30;
        state.fire();
        state.finish(false);
        state.show_leaderboard();
        assert!(state.start_session());
        assert_eq!(state.session, 2);
        assert_eq!(state.score, 0);
        assert_eq!(state.counters, Counters::default());
        assert_eq!(state.targets_spawned, 0);
        assert!(state.projectiles.is_empty());
        assert!(state.summary.is_none());
    }

    #[test]
    fn test_fire_only_while_playing() {
        let mut state = GameState::new(3);
        assert!(state.fire().is_none());
        state.start_session();
        state.set_cursor_x(-100.0);
        let id = state.fire().unwrap();
        let proj = &state.projectiles[0];
        assert_eq!(proj.id, id);
        assert_eq!(proj.pos.x, state.tuning.weapon_half_width);
        assert_eq!(proj.pos.y, state.screen.height - 50.0);
        assert!(proj.vel.y < 0.0 && proj.vel.x == 0.0);
    }

    #[test]
    fn test_target_visuals() {
        let mut target = Target {
            id: 1,
            emoji: 0,
            avoid: false,
            pos: Vec2::ZERO,
            time_left_ms: 2000.0,
            max_time_ms: 2000.0,
        };
        assert_eq!(target.alpha(), 1.0);
        assert_eq!(target.scale(), 1.0);
        assert!(!target.decay(1800.0));
        assert_eq!(target.alpha(), MIN_TARGET_ALPHA);
        assert!(target.decay(500.0));
        assert_eq!(target.time_left_ms, 0.0);
        assert!((target.scale() - 1.2).abs() < 1e-6);
    }
}
