//! Shared domain types for Guildkeeper.
//!
//! This crate contains the core domain types used across the Guildkeeper
//! roster bot: Character, Session, render instructions, configuration, and
//! their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod character;
pub mod config;
pub mod error;
pub mod id;
pub mod render;
pub mod session;
