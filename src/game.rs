//! Screen flow around the simulation
//!
//! `Game` owns the [`GameState`] plus everything that outlives a session
//! (leaderboard, settings, storage) and turns pointer/keyboard input into
//! phase transitions. It runs the simulation on a fixed step and queues the
//! sim's events for the presentation layer.

use crate::consts::*;
use crate::highscores::HighScores;
use crate::initials::{InitialsEntry, InitialsKey};
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::ui::Layout;

/// How long the red FRED-hit flash takes to fade (ms)
const RED_PULSE_MS: f32 = 500.0;

/// A won session waiting for initials
#[derive(Debug, Clone, PartialEq)]
pub struct PendingHighScore {
    pub entry: InitialsEntry,
    /// Rank reported when the session ended
    pub rank: usize,
}

/// Game instance holding all state
pub struct Game {
    pub state: GameState,
    pub high_scores: HighScores,
    pub settings: Settings,
    /// Initials prompt, shown on the win screen for qualifying scores
    pub pending: Option<PendingHighScore>,
    /// Red flash intensity (0-1)
    pub red_pulse: f32,
    input: TickInput,
    /// Autopilot played some of this session (keeps it off the leaderboard)
    autopilot_used: bool,
    accumulator: f32,
    events: Vec<GameEvent>,
    store: Box<dyn KeyValueStore>,
}

impl Game {
    /// Create a game on the intro screen, loading leaderboard and settings
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn KeyValueStore>) -> Self {
        let high_scores = HighScores::load(store.as_ref());
        let settings = Settings::load(store.as_ref());
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state: GameState::with_tuning(seed, tuning),
            high_scores,
            settings,
            pending: None,
            red_pulse: 0.0,
            input: TickInput::default(),
            autopilot_used: false,
            accumulator: 0.0,
            events: Vec::new(),
            store,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Button positions for the current screen size
    pub fn layout(&self) -> Layout {
        Layout::for_screen(self.state.screen)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.set_screen(width, height);
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
        log::info!("Autopilot: {}", on);
    }

    /// Pointer moved (canvas coordinates)
    pub fn pointer_move(&mut self, x: f32) {
        self.input.cursor_x = Some(x);
        self.state.set_cursor_x(x);
    }

    /// Pointer pressed (canvas coordinates)
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        let layout = self.layout();
        if layout.music_button.contains(x, y) {
            self.toggle_music();
            return;
        }

        match self.state.phase {
            GamePhase::Intro => {
                if layout.leaderboard_button.contains(x, y) {
                    self.state.show_leaderboard();
                } else {
                    self.start();
                }
            }
            GamePhase::Playing => self.input.fire = true,
            GamePhase::Won | GamePhase::Lost => {
                // The initials prompt is keyboard driven
                if self.pending.is_none() {
                    self.state.show_leaderboard();
                }
            }
            GamePhase::Leaderboard => {
                if layout.play_again_button.contains(x, y) {
                    self.start();
                } else if layout.main_menu_button.contains(x, y) {
                    self.state.return_to_intro();
                }
            }
        }
    }

    /// Key pressed (DOM key name)
    pub fn key_down(&mut self, key: &str) {
        if let Some(pending) = self.pending.as_mut() {
            if let InitialsKey::Submitted(initials) = pending.entry.key(key) {
                self.submit_high_score(&initials);
            }
            return;
        }

        if matches!(key, "m" | "M") {
            self.toggle_music();
        }
    }

    /// Flip background music and persist the choice
    pub fn toggle_music(&mut self) -> bool {
        let on = self.settings.toggle_music();
        self.settings.save(self.store.as_mut());
        on
    }

    /// Begin a session from the intro or leaderboard screen
    pub fn start(&mut self) -> bool {
        if !self.state.start_session() {
            return false;
        }
        self.accumulator = 0.0;
        self.input.fire = false;
        self.autopilot_used = false;
        self.pending = None;
        self.red_pulse = 0.0;
        true
    }

    fn submit_high_score(&mut self, initials: &str) {
        let Some(summary) = self.state.summary.as_ref() else {
            return;
        };
        let rank = self
            .high_scores
            .add_score(initials, summary.final_score, summary.elapsed_secs);
        log::info!("{} placed #{:?} with {}", initials, rank, summary.final_score);
        self.high_scores.save(self.store.as_mut());
        self.pending = None;
        self.state.show_leaderboard();
    }

    /// Advance by a frame delta (ms) using fixed simulation steps
    pub fn update(&mut self, frame_ms: f32) {
        let frame_ms = frame_ms.clamp(0.0, MAX_FRAME_MS);
        self.accumulator += frame_ms;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT_MS && substeps < MAX_SUBSTEPS {
            if self.input.autopilot && self.state.phase == GamePhase::Playing {
                self.autopilot_used = true;
            }
            tick(&mut self.state, &self.input, SIM_DT_MS);
            self.accumulator -= SIM_DT_MS;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.fire = false;
            self.input.cursor_x = None;

            for event in self.state.drain_events() {
                self.observe(&event);
                self.events.push(event);
            }
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = 0.0;
        }

        if self.red_pulse > 0.0 {
            self.red_pulse = (self.red_pulse - frame_ms / RED_PULSE_MS).max(0.0);
        }
    }

    fn observe(&mut self, event: &GameEvent) {
        match event {
            GameEvent::TargetHit { avoid: true, .. } if self.settings.effective_red_pulse() => {
                self.red_pulse = 1.0;
            }
            GameEvent::SessionWon => {
                let Some(summary) = self.state.summary.as_ref() else {
                    return;
                };
                if self.autopilot_used {
                    log::info!("Autopilot session, not ranked");
                } else if let Some(rank) = self.high_scores.potential_rank(summary.final_score) {
                    log::info!("High score! Rank #{}", rank);
                    self.pending = Some(PendingHighScore {
                        entry: InitialsEntry::new(),
                        rank,
                    });
                }
                self.input.autopilot = false;
            }
            GameEvent::SessionLost => {
                self.red_pulse = 0.0;
                self.input.autopilot = false;
            }
            _ => {}
        }
    }

    /// Take queued events (sounds, sprite spawns/removals)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Direct access to storage (tests, tools)
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::apply_score;

    fn new_game() -> Game {
        Game::new(11, Tuning::default(), Box::new(MemoryStore::new()))
    }

    fn click_start(game: &mut Game) {
        let layout = game.layout();
        // Top edge is not a button
        assert!(!layout.leaderboard_button.contains(400.0, 10.0));
        game.pointer_down(400.0, 10.0);
    }

    fn win(game: &mut Game, elapsed_ms: f64) {
        game.state.elapsed_ms = elapsed_ms;
        game.state.score = game.state.tuning.win_score - 1;
        apply_score(&mut game.state, 1);
        for event in game.state.drain_events() {
            game.observe(&event);
        }
    }

    #[test]
    fn test_intro_click_starts() {
        let mut game = new_game();
        click_start(&mut game);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_intro_leaderboard_button() {
        let mut game = new_game();
        let b = game.layout().leaderboard_button;
        game.pointer_down(b.x + 1.0, b.y + 1.0);
        assert_eq!(game.phase(), GamePhase::Leaderboard);
        let menu = game.layout().main_menu_button;
        game.pointer_down(menu.x + 1.0, menu.y + 1.0);
        assert_eq!(game.phase(), GamePhase::Intro);
    }

    #[test]
    fn test_click_fires_while_playing() {
        let mut game = new_game();
        click_start(&mut game);
        game.pointer_move(300.0);
        game.pointer_down(300.0, 300.0);
        game.update(SIM_DT_MS);
        let fired = game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::ProjectileFired { .. }));
        assert!(fired);
        assert_eq!(game.state.projectiles.len(), 1);
        assert_eq!(game.state.projectiles[0].pos.x, 300.0);
    }

    #[test]
    fn test_won_high_score_prompts_for_initials() {
        let mut game = new_game();
        click_start(&mut game);
        win(&mut game, 42_500.0);
        assert_eq!(game.phase(), GamePhase::Won);
        let summary = game.state.summary.clone().unwrap();
        assert_eq!(summary.score, 69);
        assert_eq!(summary.time_bonus, 58);
        assert_eq!(summary.final_score, 127);
        assert_eq!(game.state.score, 69);
        assert_eq!(game.pending.as_ref().map(|p| p.rank), Some(1));

        // Clicks don't skip the prompt
        game.pointer_down(10.0, 10.0);
        assert_eq!(game.phase(), GamePhase::Won);

        for key in ["a", "c", "e", "Enter"] {
            game.key_down(key);
        }
        assert_eq!(game.phase(), GamePhase::Leaderboard);
        assert!(game.pending.is_none());
        assert_eq!(game.high_scores.entries[0].initials, "ACE");
        assert_eq!(game.high_scores.entries[0].score, 127);

        // Persisted
        let reloaded = HighScores::load(game.store());
        assert_eq!(reloaded, game.high_scores);
    }

    #[test]
    fn test_loss_goes_to_leaderboard_on_click() {
        let mut game = new_game();
        click_start(&mut game);
        apply_score(&mut game.state, -1);
        for event in game.state.drain_events() {
            game.observe(&event);
        }
        assert_eq!(game.phase(), GamePhase::Lost);
        assert!(game.pending.is_none());
        game.pointer_down(10.0, 10.0);
        assert_eq!(game.phase(), GamePhase::Leaderboard);

        let again = game.layout().play_again_button;
        game.pointer_down(again.x + 1.0, again.y + 1.0);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state.session, 2);
    }

    #[test]
    fn test_full_board_win_without_rank_skips_prompt() {
        let mut game = new_game();
        for _ in 0..10 {
            game.high_scores.add_score("TOP", 1000, 1.0);
        }
        click_start(&mut game);
        win(&mut game, 500_000.0);
        assert_eq!(game.phase(), GamePhase::Won);
        assert!(game.pending.is_none());
    }

    #[test]
    fn test_autopilot_win_is_not_ranked() {
        let mut game = new_game();
        click_start(&mut game);
        // No in-game key turns the autopilot on
        game.key_down("i");
        assert!(!game.autopilot());

        game.state.spawner.stop();
        game.set_autopilot(true);
        game.update(SIM_DT_MS);
        win(&mut game, 20_000.0);
        assert_eq!(game.phase(), GamePhase::Won);
        assert!(game.pending.is_none());
        assert!(game.high_scores.qualifies(game.state.summary.as_ref().unwrap().final_score));

        // Click straight through to the leaderboard, which stays empty
        game.pointer_down(400.0, 10.0);
        assert_eq!(game.phase(), GamePhase::Leaderboard);
        assert!(HighScores::load(game.store()).is_empty());

        // A fresh session by hand is ranked again
        let again = game.layout().play_again_button;
        game.pointer_down(again.x + 1.0, again.y + 1.0);
        win(&mut game, 20_000.0);
        assert!(game.pending.is_some());
    }

    #[test]
    fn test_music_toggle_persists() {
        let mut game = new_game();
        assert!(game.settings.music_enabled);
        game.key_down("m");
        assert!(!game.settings.music_enabled);
        assert!(!Settings::load(game.store()).music_enabled);
        let b = game.layout().music_button;
        game.pointer_down(b.x + 1.0, b.y + 1.0);
        assert!(game.settings.music_enabled);
        assert_eq!(game.phase(), GamePhase::Intro);
    }

    #[test]
    fn test_red_pulse_fades() {
        let mut game = new_game();
        game.red_pulse = 1.0;
        game.update(250.0);
        // Frame deltas are capped at MAX_FRAME_MS
        assert!((game.red_pulse - 0.8).abs() < 1e-6);
        for _ in 0..5 {
            game.update(100.0);
        }
        assert_eq!(game.red_pulse, 0.0);
    }
}
