//! Repository trait definitions ("ports").
//!
//! Implementations live in guildkeeper-infra. Uses native async fn in
//! traits (Rust 2024 edition, no async_trait macro).

pub mod character;
pub mod timezone;

pub use character::CharacterRepository;
pub use timezone::TimezoneRepository;
