//! Hit testing and screen-exit checks
//!
//! Targets and projectiles are treated as axis-aligned squares around their
//! centers. When several targets overlap a projectile, the newest one (last
//! in id order) is hit; there is no nearest-target tie-break.

use glam::Vec2;

use super::state::{Screen, Target};

/// How a projectile left the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Still on screen (or within the margin)
    None,
    /// Past the top edge: counts as a miss
    Top,
    /// Past a side or the bottom: removed silently
    Other,
}

/// Axis-aligned overlap: |dx| < half_extent and |dy| < half_extent
#[inline]
pub fn aabb_hit(a: Vec2, b: Vec2, half_extent: f32) -> bool {
    let d = (a - b).abs();
    d.x < half_extent && d.y < half_extent
}

/// Index of the target hit by a projectile at `pos`.
/// Scans newest-first, so with `targets` sorted by id the latest spawn wins.
pub fn first_hit(pos: Vec2, targets: &[Target], half_extent: f32) -> Option<usize> {
    targets
        .iter()
        .rposition(|t| aabb_hit(pos, t.pos, half_extent))
}

/// Classify a projectile position against the screen plus `margin`
pub fn classify_exit(pos: Vec2, screen: &Screen, margin: f32) -> Exit {
    if pos.y < -margin {
        Exit::Top
    } else if pos.x < -margin || pos.x > screen.width + margin || pos.y > screen.height + margin {
        Exit::Other
    } else {
        Exit::None
    }
}

/// Whether a target sits above the long-shot line
#[inline]
pub fn is_long_shot(target_y: f32, screen: &Screen, fraction: f32) -> bool {
    target_y < screen.height * fraction
}
