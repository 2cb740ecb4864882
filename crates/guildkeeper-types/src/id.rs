//! Identifier newtypes.
//!
//! `UserId` is the chat platform's numeric user id (a snowflake). It names
//! both the acting user and the record target; the two differ only when an
//! administrator runs a wizard on another member's behalf.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Chat-platform user id (snowflake).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl UserId {
    /// Create a user id from its raw snowflake value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw snowflake value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(UserId)
    }
}

/// Storage-assigned character record id.
///
/// Characters are addressed by their natural key (target user + in-game
/// name); this id exists for parent linkage of subclass records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub i64);

impl CharacterId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_display_and_parse() {
        let id = UserId::new(123456789012345678);
        assert_eq!(id.to_string(), "123456789012345678");
        assert_eq!("123456789012345678".parse::<UserId>().unwrap(), id);
    }

    #[test]
    fn test_user_id_serde_transparent() {
        let id = UserId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_character_id_roundtrip() {
        let id = CharacterId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        let back: CharacterId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
