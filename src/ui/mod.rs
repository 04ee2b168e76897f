//! Screen layout and text
//!
//! Pure description of what each screen shows: button hit regions and text
//! labels. The renderer only draws what this module produces, so screen flow
//! can be tested without a canvas.

use crate::game::Game;
use crate::highscores::HighScoreEntry;
use crate::sim::{Counters, GamePhase, Screen, SessionSummary};
use crate::tuning::Tuning;

pub const COLOR_WHITE: &str = "#ffffff";
pub const COLOR_DIM: &str = "#dddddd";
pub const COLOR_RED: &str = "#ff4444";
pub const COLOR_GREEN: &str = "#44ff44";
pub const COLOR_YELLOW: &str = "#ffff44";
pub const COLOR_BLUE: &str = "#4444ff";

/// Fraction of the win score at which the HUD turns green
const NEAR_WIN_FRACTION: f32 = 0.8;

/// Axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Rectangle of size `w`x`h` centered on (`cx`, `cy`)
    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self {
            x: cx - w / 2.0,
            y: cy - h / 2.0,
            w,
            h,
        }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// Clickable regions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Always visible, bottom-left
    pub music_button: Rect,
    /// Intro screen
    pub leaderboard_button: Rect,
    /// Leaderboard screen
    pub play_again_button: Rect,
    /// Leaderboard screen
    pub main_menu_button: Rect,
}

impl Layout {
    pub fn for_screen(screen: Screen) -> Self {
        let (w, h) = (screen.width, screen.height);
        Self {
            music_button: Rect {
                x: 15.0,
                y: h - 40.0,
                w: 80.0,
                h: 30.0,
            },
            leaderboard_button: Rect::centered(w / 2.0, h - 35.0, 200.0, 30.0),
            play_again_button: Rect::centered(w / 2.0 - 100.0, h - 60.0, 160.0, 36.0),
            main_menu_button: Rect::centered(w / 2.0 + 100.0, h - 60.0, 160.0, 36.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One line of text to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f32,
    pub y: f32,
    /// Font size (px)
    pub size: f32,
    pub color: &'static str,
    pub align: Align,
    pub bold: bool,
}

impl Label {
    fn left(text: impl Into<String>, x: f32, y: f32, size: f32, color: &'static str) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            size,
            color,
            align: Align::Left,
            bold: false,
        }
    }

    fn center(text: impl Into<String>, x: f32, y: f32, size: f32, color: &'static str) -> Self {
        Self {
            align: Align::Center,
            ..Self::left(text, x, y, size, color)
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// HUD score colour: red below zero, green close to winning
pub fn score_color(score: i32, win_score: i32) -> &'static str {
    if score < 0 {
        COLOR_RED
    } else if score as f32 >= win_score as f32 * NEAR_WIN_FRACTION {
        COLOR_GREEN
    } else {
        COLOR_WHITE
    }
}

pub fn music_label(enabled: bool) -> (&'static str, &'static str) {
    if enabled {
        ("♪ ON", COLOR_GREEN)
    } else {
        ("♪ OFF", COLOR_RED)
    }
}

/// Rules text derived from the active tuning
pub fn rules_lines(tuning: &Tuning) -> Vec<String> {
    vec![
        "RULES OF DA SHPWAT:".to_string(),
        format!("Hit a target = +{}", tuning.hit_points),
        format!("Long shot (top of screen) = +{}", tuning.long_shot_points),
        format!("Hit a FRED = -{} (spare yer FREDs!)", tuning.avoid_hit_penalty),
        format!("Shot flies off the top = -{}", tuning.miss_penalty),
        format!("Target gets away = -{}", tuning.escape_penalty),
        "Score below zero = U LOSE".to_string(),
        format!("Reach {} = U WIN (faster = bonus!)", tuning.win_score),
    ]
}

/// Recap tallies, one colour per line
pub fn recap_lines(counters: &Counters) -> Vec<(String, &'static str)> {
    vec![
        (format!("Target Hits: {}", counters.hits), COLOR_GREEN),
        (format!("Misses: {}", counters.misses), COLOR_YELLOW),
        (format!("FREDs Hit: {}", counters.avoid_hits), COLOR_RED),
        (format!("Escapes: {}", counters.escapes), COLOR_DIM),
    ]
}

/// Headline block for a finished session
pub fn summary_lines(summary: &SessionSummary) -> Vec<String> {
    if summary.won {
        vec![
            "YOU WIN!".to_string(),
            format!("Score: {}", summary.score),
            format!("Time: {:.1}s", summary.elapsed_secs),
            format!("Time Bonus: +{}", summary.time_bonus),
            format!("Final Score: {}", summary.final_score),
        ]
    } else {
        vec![
            "GAME OVER".to_string(),
            "Score went negative!".to_string(),
            format!("Time: {:.1}s", summary.elapsed_secs),
        ]
    }
}

/// "1. ACE - 127 pts (42.5s)"
pub fn leaderboard_line(rank: usize, entry: &HighScoreEntry) -> String {
    format!(
        "{}. {} - {} pts ({:.1}s)",
        rank, entry.initials, entry.score, entry.time
    )
}

/// Everything to draw as text for the current screen
pub fn labels(game: &Game) -> Vec<Label> {
    let state = &game.state;
    let (w, h) = (state.screen.width, state.screen.height);
    let cx = w / 2.0;
    let layout = game.layout();
    let mut out = Vec::new();

    match state.phase {
        GamePhase::Intro => {
            out.push(Label::center("SHPWAT FRED", cx, h / 6.0, 48.0, COLOR_YELLOW).bold());
            out.push(Label::center(
                "Da rachets hav taken over da neighborhood!",
                cx,
                h / 3.0,
                18.0,
                COLOR_WHITE,
            ));
            out.push(Label::center(
                format!("Today's FREDs: {}", state.avoid.display()),
                cx,
                h / 3.0 + 36.0,
                24.0,
                COLOR_RED,
            ));
            for (i, line) in rules_lines(&state.tuning).into_iter().enumerate() {
                out.push(Label::center(
                    line,
                    cx,
                    h / 2.0 + i as f32 * 20.0,
                    14.0,
                    COLOR_DIM,
                ));
            }
            out.push(Label::center("CLICK TO START SHPWATTING!", cx, h - 80.0, 22.0, COLOR_GREEN).bold());
            let (bx, by) = layout.leaderboard_button.center();
            out.push(Label::center("View Leaderboard", bx, by, 16.0, COLOR_YELLOW));
        }
        GamePhase::Playing => {
            out.push(Label::left(
                format!("Score: {}", state.score),
                15.0,
                15.0,
                32.0,
                score_color(state.score, state.tuning.win_score),
            ));
            out.push(Label::left(
                format!("FREDS: {}", state.avoid.display()),
                15.0,
                60.0,
                28.0,
                COLOR_RED,
            ));
            if game.autopilot() {
                out.push(Label::left("AUTOPILOT", w - 140.0, 15.0, 18.0, COLOR_YELLOW));
            }
        }
        GamePhase::Won | GamePhase::Lost => {
            if let Some(summary) = state.summary.as_ref() {
                let color = if summary.won { COLOR_GREEN } else { COLOR_RED };
                let mut y = h / 6.0;
                if let Some(pending) = game.pending.as_ref() {
                    out.push(Label::center("NEW HIGH SCORE!", cx, y, 28.0, COLOR_YELLOW).bold());
                    y += 34.0;
                    out.push(Label::center(
                        format!("#{} on the leaderboard!", pending.rank),
                        cx,
                        y,
                        22.0,
                        COLOR_YELLOW,
                    ));
                    y += 40.0;
                }
                for line in summary_lines(summary) {
                    out.push(Label::center(line, cx, y, 24.0, color));
                    y += 30.0;
                }
                y += 10.0;
                out.push(Label::center("RECAP:", cx, y, 22.0, COLOR_WHITE).bold());
                y += 28.0;
                for (line, c) in recap_lines(&summary.counters) {
                    out.push(Label::center(line, cx, y, 18.0, c));
                    y += 24.0;
                }
                y += 16.0;
                match game.pending.as_ref() {
                    Some(pending) => {
                        out.push(Label::center("Enter yer initials:", cx, y, 20.0, COLOR_WHITE));
                        out.push(Label::center(pending.entry.display(), cx, y + 40.0, 36.0, COLOR_YELLOW).bold());
                        out.push(Label::center(
                            "A-Z to type, Backspace to fix, Enter to save",
                            cx,
                            y + 80.0,
                            14.0,
                            COLOR_DIM,
                        ));
                    }
                    None => out.push(Label::center("Click to see da leaderboard", cx, y, 18.0, COLOR_YELLOW)),
                }
            }
        }
        GamePhase::Leaderboard => {
            out.push(Label::center("LEADERBOARD", cx, 60.0, 36.0, COLOR_YELLOW).bold());
            if game.high_scores.is_empty() {
                out.push(Label::center("No scores yet!", cx, h / 2.0 - 20.0, 20.0, COLOR_WHITE));
                out.push(Label::center(
                    "Be the first to SHPWAT your way to glory!",
                    cx,
                    h / 2.0 + 10.0,
                    18.0,
                    COLOR_DIM,
                ));
            } else {
                for (i, entry) in game.high_scores.entries.iter().enumerate() {
                    let color = if i == 0 { COLOR_YELLOW } else { COLOR_WHITE };
                    out.push(Label::center(
                        leaderboard_line(i + 1, entry),
                        cx,
                        120.0 + i as f32 * 32.0,
                        22.0,
                        color,
                    ));
                }
            }
            let (px, py) = layout.play_again_button.center();
            out.push(Label::center("Play Again", px, py, 20.0, COLOR_GREEN).bold());
            let (mx, my) = layout.main_menu_button.center();
            out.push(Label::center("Main Menu", mx, my, 20.0, COLOR_BLUE).bold());
        }
    }

    let (text, color) = music_label(game.settings.music_enabled);
    let music = layout.music_button;
    out.push(Label::left(text, music.x + 8.0, music.y + 6.0, 18.0, color));

    out
}
