//! Infrastructure layer for Guildkeeper.
//!
//! Contains implementations of the ports defined in `guildkeeper-core`:
//! SQLite character and timezone repositories, and the HTTP sheet
//! publisher for the external roster push.

pub mod sheet;
pub mod sqlite;
