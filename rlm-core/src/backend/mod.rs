//! Backend implementations
//!
//! - **REST**: [`HttpBackend`] for the evidence-management API
//! - **Recording**: in-memory backend used by the unit tests

pub mod http;
pub mod traits;

pub use http::HttpBackend;
pub use traits::RetentionBackend;
