//! Emoji pool and FRED selection
//!
//! Every target is one of these emoji. At the start of each session three of
//! them are drawn without replacement to become the FREDs (avoid-targets);
//! the rest form the safe pool.

use rand::Rng;

/// Number of FREDs drawn per session
pub const AVOID_SET_SIZE: usize = 3;

/// All target emoji (distinct)
pub const EMOJIS: &[&str] = &[
    "😀", "🐶", "🍕", "🚗", "👻", "🎩", "🥑", "🍄", "🦄", "⚽", //
    "🤖", "🎯", "🎪", "🎨", "🎭", "🎬", "🎵", "🎸", "🎹", "🎲", //
    "🎳", "🎮", "🎰", "🚀", "🛸", "🚁", "🚂", "🚢", "✈️", "🚙", //
    "🏎️", "🚲", "🛵", "🏠", "🏢", "🏰", "🗽", "🌟", "⭐", "🌙", //
    "☀️", "🌈", "🔥", "💎", "💰", "💡", "🔔", "🎁", "🎈", "🎊", //
    "🎉", "🧸", "🎀", "🍎", "🍌", "🍇", "🍓", "🍒", "🍑", "🥝", //
    "🍍", "🥭", "🍊", "🍋", "🥥", "🥨", "🍔", "🌭", "🍟", "🍗", //
    "🥓", "🍳", "🥞", "🧇", "🥯", "🍞", "🥖", "🧀", "🥪", "🌮", //
    "🌯", "🥙", "🍲", "🍱", "🍣", "🍤", "🍝", "🍜", "🍛", "🍚", //
    "🍘", "🥟", "🍡", "🍧", "🍨", "🍦", "🥧", "🍰", "🎂", "🍮", //
    "🍭", "🍬", "🍫", "🍿", "🧊",
];

/// Index into [`EMOJIS`]
pub type EmojiId = u16;

/// Look up the glyph for an emoji id
pub fn glyph(id: EmojiId) -> &'static str {
    EMOJIS.get(id as usize).copied().unwrap_or("?")
}

/// The session's FREDs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvoidSet {
    ids: [EmojiId; AVOID_SET_SIZE],
}

impl AvoidSet {
    /// Draw three distinct emoji from the pool
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut remaining: Vec<EmojiId> = (0..EMOJIS.len() as EmojiId).collect();
        let mut ids = [0; AVOID_SET_SIZE];
        for slot in &mut ids {
            let idx = rng.random_range(0..remaining.len());
            *slot = remaining.swap_remove(idx);
        }
        Self { ids }
    }

    /// Build from explicit ids (tests, replays). Returns None unless the ids
    /// are distinct and inside the pool.
    pub fn from_ids(ids: [EmojiId; AVOID_SET_SIZE]) -> Option<Self> {
        let in_pool = ids.iter().all(|&id| (id as usize) < EMOJIS.len());
        let distinct = ids[0] != ids[1] && ids[0] != ids[2] && ids[1] != ids[2];
        (in_pool && distinct).then_some(Self { ids })
    }

    pub fn ids(&self) -> &[EmojiId] {
        &self.ids
    }

    pub fn contains(&self, id: EmojiId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Pick one FRED at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> EmojiId {
        self.ids[rng.random_range(0..self.ids.len())]
    }

    /// Pick a random emoji that is not a FRED
    pub fn choose_safe<R: Rng + ?Sized>(&self, rng: &mut R) -> EmojiId {
        let safe_count = EMOJIS.len() - self.ids.len();
        let mut n = rng.random_range(0..safe_count);
        // Walk the pool skipping FREDs until the n-th safe emoji
        for id in 0..EMOJIS.len() as EmojiId {
            if self.contains(id) {
                continue;
            }
            if n == 0 {
                return id;
            }
            n -= 1;
        }
        unreachable!("safe pool index out of range")
    }

    /// FRED glyphs joined for display ("🍕 🎲 🚀")
    pub fn display(&self) -> String {
        self.ids
            .iter()
            .map(|&id| glyph(id))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::HashSet;

    #[test]
    fn test_pool_is_distinct() {
        let unique: HashSet<_> = EMOJIS.iter().collect();
        assert_eq!(unique.len(), EMOJIS.len());
        assert_eq!(EMOJIS.len(), 105);
    }

    #[test]
    fn test_pick_distinct() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let set = AvoidSet::pick(&mut rng);
            assert!(AvoidSet::from_ids([set.ids[0], set.ids[1], set.ids[2]]).is_some());
        }
    }

    #[test]
    fn test_choose_safe_never_fred() {
        let mut rng = Pcg32::seed_from_u64(99);
        let set = AvoidSet::from_ids([0, 1, 99]).unwrap();
        for _ in 0..2000 {
            let id = set.choose_safe(&mut rng);
            assert!(!set.contains(id));
            assert!((id as usize) < EMOJIS.len());
        }
    }

    #[test]
    fn test_from_ids_rejects_duplicates() {
        assert!(AvoidSet::from_ids([4, 4, 5]).is_none());
        assert!(AvoidSet::from_ids([4, 5, 500]).is_none());
    }
}
