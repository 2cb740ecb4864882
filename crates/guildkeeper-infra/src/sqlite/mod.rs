//! SQLite implementations of the repository traits.

pub mod character;
pub mod pool;
pub mod timezone;

pub use character::SqliteCharacterRepository;
pub use pool::DatabasePool;
pub use timezone::SqliteTimezoneRepository;
