//! Business logic and repository trait definitions for Guildkeeper.
//!
//! This crate defines the "ports" (repository and publisher traits) that
//! the infrastructure layer implements. It depends only on
//! `guildkeeper-types` -- never on `guildkeeper-infra` or any database/IO
//! crate.

pub mod catalog;
pub mod commit;
pub mod repository;
pub mod service;
pub mod session;
pub mod sync;
pub mod timezone;
pub mod wizard;
