//! Character records and the roster rows pushed to the external sheet.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CharacterId, UserId};

/// Combat role, always derived from the class catalog -- never set directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Dps,
    Tank,
    Support,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Dps => "dps",
            Role::Tank => "tank",
            Role::Support => "support",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dps" => Ok(Role::Dps),
            "tank" => Ok(Role::Tank),
            "support" => Ok(Role::Support),
            other => Err(format!("invalid role: '{other}'")),
        }
    }
}

/// What kind of record a character is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    /// The member's primary character.
    Main,
    /// An additional character on the same account.
    Alt,
    /// A subclass build attached to a main.
    SubclassOfMain,
    /// A subclass build attached to an alt.
    SubclassOfAlt,
}

impl CharacterKind {
    /// Whether this kind is a subclass record (always parent-linked).
    pub fn is_subclass(&self) -> bool {
        matches!(
            self,
            CharacterKind::SubclassOfMain | CharacterKind::SubclassOfAlt
        )
    }

    /// The subclass kind attached to a parent of this kind.
    ///
    /// Returns `None` when the parent is itself a subclass -- subclasses
    /// never nest.
    pub fn subclass_kind(&self) -> Option<CharacterKind> {
        match self {
            CharacterKind::Main => Some(CharacterKind::SubclassOfMain),
            CharacterKind::Alt => Some(CharacterKind::SubclassOfAlt),
            _ => None,
        }
    }
}

impl fmt::Display for CharacterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CharacterKind::Main => "main",
            CharacterKind::Alt => "alt",
            CharacterKind::SubclassOfMain => "subclass_of_main",
            CharacterKind::SubclassOfAlt => "subclass_of_alt",
        };
        write!(f, "{s}")
    }
}

impl FromStr for CharacterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(CharacterKind::Main),
            "alt" => Ok(CharacterKind::Alt),
            "subclass_of_main" => Ok(CharacterKind::SubclassOfMain),
            "subclass_of_alt" => Ok(CharacterKind::SubclassOfAlt),
            other => Err(format!("invalid character kind: '{other}'")),
        }
    }
}

/// A committed character record.
///
/// Natural key: (`target_id`, `name`). The storage-assigned `id` exists for
/// parent linkage of subclass records. `role` is stored redundantly for
/// query convenience but is always derived from `class`. `ability_score`
/// holds the representative value of the band the member selected, not
/// their raw score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub target_id: UserId,
    pub name: String,
    pub kind: CharacterKind,
    pub class: String,
    pub subclass: String,
    pub role: Role,
    pub ability_score: i64,
    pub guild: Option<String>,
    pub parent_id: Option<CharacterId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A character record before storage has assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCharacter {
    pub target_id: UserId,
    pub name: String,
    pub kind: CharacterKind,
    pub class: String,
    pub subclass: String,
    pub role: Role,
    pub ability_score: i64,
    pub guild: Option<String>,
    pub parent_id: Option<CharacterId>,
}

/// One timezone assignment per member, independent of any character.
///
/// Upserted, never historized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneAssignment {
    pub target_id: UserId,
    pub zone_id: String,
    pub updated_at: DateTime<Utc>,
}

/// One row of the external roster sheet: a character joined with its
/// member's timezone assignment (if any).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub character: Character,
    pub zone_id: Option<String>,
}
