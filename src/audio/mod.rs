//! Sound effects and background music
//!
//! The mapping from simulation events to sounds is pure; playback lives in
//! the browser-only `web` module. Playback is best-effort: failures are
//! logged and never touch game state.

use crate::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

/// Background track, looped while music is enabled
pub const MUSIC_URL: &str = "assets/audio/born_to_drive.mp3";

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Projectile leaves the weapon
    Fire,
    /// Regular target hit
    Hit,
    /// Long shot near the top of the screen
    LongShot,
    /// A FRED got shot
    AvoidHit,
    /// Session won
    Win,
    /// Session lost
    Lose,
}

impl SoundEffect {
    /// Sound for a simulation event, if any
    pub fn for_event(event: &GameEvent, long_shot_points: i32) -> Option<Self> {
        match event {
            GameEvent::ProjectileFired { .. } => Some(Self::Fire),
            GameEvent::TargetHit { avoid: true, .. } => Some(Self::AvoidHit),
            GameEvent::TargetHit { points, .. } if *points >= long_shot_points => {
                Some(Self::LongShot)
            }
            GameEvent::TargetHit { .. } => Some(Self::Hit),
            GameEvent::SessionWon => Some(Self::Win),
            GameEvent::SessionLost => Some(Self::Lose),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_sounds() {
        let fired = GameEvent::ProjectileFired { id: 1 };
        assert_eq!(SoundEffect::for_event(&fired, 2), Some(SoundEffect::Fire));

        let hit = |avoid, points| GameEvent::TargetHit {
            target_id: 1,
            projectile_id: 2,
            avoid,
            points,
        };
        assert_eq!(SoundEffect::for_event(&hit(false, 1), 2), Some(SoundEffect::Hit));
        assert_eq!(
            SoundEffect::for_event(&hit(false, 2), 2),
            Some(SoundEffect::LongShot)
        );
        assert_eq!(
            SoundEffect::for_event(&hit(true, -5), 2),
            Some(SoundEffect::AvoidHit)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::SessionLost, 2), Some(SoundEffect::Lose));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::ProjectileMissed { id: 3 }, 2),
            None
        );
    }
}
