//! # Edge Common
//!
//! Types shared by every edge crate: the error taxonomy and the service key
//! identity used as the map key throughout the registry cache.

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::{Error, Result, ResultExt};
pub use types::ServiceKey;
