//! SHPWAT FRED - an emoji arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, decay, projectiles, scoring)
//! - `game`: Screen flow and input routing around the simulation
//! - `highscores`: Top 10 leaderboard
//! - `persistence`: String-keyed storage slots (LocalStorage on web)
//! - `tuning`: Data-driven game balance
//! - `ui`: Screen layout and HUD text
//! - `audio`, `renderer`: Browser-only presentation

pub mod audio;
pub mod emoji;
pub mod game;
pub mod highscores;
pub mod initials;
pub mod persistence;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, one render frame)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the host loop will feed in (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Fallback playfield size before the host reports the canvas size
    pub const DEFAULT_SCREEN_WIDTH: f32 = 800.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 600.0;

    /// Leaderboard storage slot
    pub const LEADERBOARD_KEY: &str = "dote-shpwat-fred-leaderboard";
    /// Settings storage slot
    pub const SETTINGS_KEY: &str = "dote-shpwat-fred-settings";
}
