//! External roster synchronization: publisher port + coalescing scheduler.

pub mod publisher;
pub mod scheduler;

pub use publisher::SheetPublisher;
pub use scheduler::{SyncNotifier, SyncScheduler};
