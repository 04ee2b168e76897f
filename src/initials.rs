//! Three-letter initials entry for the leaderboard

/// Letters in a leaderboard name
pub const INITIALS_LEN: usize = 3;

/// What a key press did to the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialsKey {
    /// Buffer changed
    Edited,
    /// Enter with a full buffer
    Submitted(String),
    /// Key had no effect
    Ignored,
}

/// Initials typed so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialsEntry {
    letters: String,
}

impl InitialsEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.letters
    }

    pub fn is_complete(&self) -> bool {
        self.letters.len() == INITIALS_LEN
    }

    /// Handle a DOM-style key name ("a", "Backspace", "Enter")
    pub fn key(&mut self, key: &str) -> InitialsKey {
        match key {
            "Backspace" => {
                if self.letters.pop().is_some() {
                    InitialsKey::Edited
                } else {
                    InitialsKey::Ignored
                }
            }
            "Enter" if self.is_complete() => InitialsKey::Submitted(self.letters.clone()),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() && !self.is_complete() => {
                        self.letters.push(c.to_ascii_uppercase());
                        InitialsKey::Edited
                    }
                    _ => InitialsKey::Ignored,
                }
            }
        }
    }

    /// Buffer padded with underscores ("AB_")
    pub fn display(&self) -> String {
        let mut shown = self.letters.clone();
        while shown.len() < INITIALS_LEN {
            shown.push('_');
        }
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_submit() {
        let mut entry = InitialsEntry::new();
        assert_eq!(entry.display(), "___");
        assert_eq!(entry.key("Enter"), InitialsKey::Ignored);
        assert_eq!(entry.key("a"), InitialsKey::Edited);
        assert_eq!(entry.key("B"), InitialsKey::Edited);
        assert_eq!(entry.display(), "AB_");
        assert_eq!(entry.key("Enter"), InitialsKey::Ignored);
        assert_eq!(entry.key("z"), InitialsKey::Edited);
        assert_eq!(entry.key("q"), InitialsKey::Ignored);
        assert_eq!(entry.key("Enter"), InitialsKey::Submitted("ABZ".into()));
    }

    #[test]
    fn test_rejects_non_letters() {
        let mut entry = InitialsEntry::new();
        for key in ["1", " ", "Shift", "é", "ArrowLeft"] {
            assert_eq!(entry.key(key), InitialsKey::Ignored, "{key}");
        }
        assert_eq!(entry.as_str(), "");
    }

    #[test]
    fn test_backspace() {
        let mut entry = InitialsEntry::new();
        assert_eq!(entry.key("Backspace"), InitialsKey::Ignored);
        entry.key("x");
        entry.key("y");
        assert_eq!(entry.key("Backspace"), InitialsKey::Edited);
        assert_eq!(entry.as_str(), "X");
    }
}
