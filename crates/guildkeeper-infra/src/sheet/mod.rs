//! External roster sheet publishers.

pub mod disabled;
pub mod http;

pub use disabled::DisabledSheetPublisher;
pub use http::HttpSheetPublisher;
