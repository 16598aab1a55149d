//! Player name validation.

use derive_more::{Display, Error};
use tracing::instrument;

/// Winner label persisted when nobody took the game.
///
/// Player names may not collide with it, so a stored winner string is
/// always unambiguous.
pub const DRAW_SENTINEL: &str = "Draw";

/// Longest accepted player name, in characters.
pub const MAX_NAME_LEN: usize = 15;

/// Reasons a player name is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum NameError {
    /// Blank or whitespace-only name.
    #[display("name cannot be empty")]
    Empty,
    /// More than [`MAX_NAME_LEN`] characters.
    #[display("name cannot be longer than 15 characters (got {len})")]
    TooLong {
        /// Character count of the rejected name.
        len: usize,
    },
    /// Name equals the draw sentinel.
    #[display("name \"Draw\" is reserved")]
    Reserved,
    /// Both players picked the same name.
    #[display("name is already taken by the other player")]
    SameAsOpponent,
}

/// A validated player name: non-empty, at most 15 characters, not the draw sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validates a raw name.
    ///
    /// # Errors
    ///
    /// Returns [`NameError`] describing the first rule the name breaks.
    #[instrument(skip(raw))]
    pub fn parse(raw: impl Into<String>) -> Result<Self, NameError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(NameError::Empty);
        }
        let len = raw.chars().count();
        if len > MAX_NAME_LEN {
            return Err(NameError::TooLong { len });
        }
        if raw.eq_ignore_ascii_case(DRAW_SENTINEL) {
            return Err(NameError::Reserved);
        }
        Ok(Self(raw))
    }

    /// Validates a name that must differ from `opponent`.
    ///
    /// Winners are stored by name, so two players sharing one would read
    /// back as the same seat.
    ///
    /// # Errors
    ///
    /// Returns [`NameError`] for any [`parse`](Self::parse) failure, or
    /// [`NameError::SameAsOpponent`] on an exact match.
    pub fn parse_against(
        raw: impl Into<String>,
        opponent: &PlayerName,
    ) -> Result<Self, NameError> {
        let name = Self::parse(raw)?;
        if name == *opponent {
            return Err(NameError::SameAsOpponent);
        }
        Ok(name)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_names() {
        assert_eq!(PlayerName::parse("Alice").unwrap().as_str(), "Alice");
        assert!(PlayerName::parse("a").is_ok());
        assert!(PlayerName::parse("FifteenCharName").is_ok());
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        assert_eq!(PlayerName::parse(""), Err(NameError::Empty));
        assert_eq!(PlayerName::parse("   "), Err(NameError::Empty));
    }

    #[test]
    fn test_rejects_sixteen_characters() {
        assert_eq!(
            PlayerName::parse("SixteenCharName!"),
            Err(NameError::TooLong { len: 16 })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 15 two-byte characters
        let name = "é".repeat(15);
        assert!(PlayerName::parse(name).is_ok());
    }

    #[test]
    fn test_rejects_draw_sentinel_any_case() {
        assert_eq!(PlayerName::parse("Draw"), Err(NameError::Reserved));
        assert_eq!(PlayerName::parse("dRaW"), Err(NameError::Reserved));
        assert!(PlayerName::parse("Drawer").is_ok());
    }

    #[test]
    fn test_rejects_opponents_name() {
        let sam = PlayerName::parse("Sam").unwrap();
        assert_eq!(
            PlayerName::parse_against("Sam", &sam),
            Err(NameError::SameAsOpponent)
        );
        assert!(PlayerName::parse_against("Pam", &sam).is_ok());
        assert_eq!(PlayerName::parse_against("", &sam), Err(NameError::Empty));
    }
}
