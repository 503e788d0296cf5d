//! Error types for the edge crates.
//!
//! # Rust Learning Note
//!
//! Rust doesn't have exceptions - it uses `Result<T, E>` for error handling.
//! Lookups that can legitimately miss (an unknown service key, a method that
//! is not declared) still come back as `Err` here; the facade layer decides
//! whether a miss is surfaced as `None`, an empty string, or an error.
//!
//! ```rust
//! use edge_common::{Error, Result, ServiceKey};
//!
//! fn lookup(key: &ServiceKey) -> Result<()> {
//!     Err(Error::not_found(key.clone()))
//! }
//!
//! fn caller() -> Result<()> {
//!     // `?` propagates the error to our own caller
//!     lookup(&ServiceKey::from("com.example.FooService"))?;
//!     Ok(())
//! }
//! # assert!(caller().is_err());
//! ```

use thiserror::Error;
use crate::types::ServiceKey;

/// Result type alias for edge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for edge operations.
///
/// We use the `thiserror` crate to derive `std::error::Error` and `Display`.
/// Each variant carries the identifiers needed to log it without extra context.
#[derive(Debug, Error)]
pub enum Error {
    /// No endpoint is known for the service key.
    #[error("No provider found for service: {service_key}")]
    NotFound {
        service_key: ServiceKey,
    },

    /// The implementation type named by a provider is not registered.
    #[error("Type not registered: {type_name}")]
    TypeResolution {
        type_name: String,
    },

    /// The service type declares no method with the requested name.
    #[error("Method {method} not found in {type_name}")]
    MethodNotFound {
        type_name: String,
        method: String,
    },

    /// A service key string could not be parsed.
    #[error("Invalid service key '{key}': {reason}")]
    InvalidServiceKey {
        key: String,
        reason: String,
    },

    /// A registry URL could not be parsed.
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint {
        url: String,
        reason: String,
    },

    /// The RPC transport failed to build a proxy.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal error (shouldn't happen in normal operation).
    #[error("Internal error: {0}")]
    Internal(String),

    /// I/O error (wraps std::io::Error).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context.
    #[error("{message}: {source}")]
    WithContext {
        message: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Creates a NotFound error.
    pub fn not_found(service_key: ServiceKey) -> Self {
        Self::NotFound { service_key }
    }

    /// Creates a TypeResolution error.
    pub fn type_resolution(type_name: impl Into<String>) -> Self {
        Self::TypeResolution {
            type_name: type_name.into(),
        }
    }

    /// Creates a MethodNotFound error.
    pub fn method_not_found(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    pub fn invalid_service_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidServiceKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a Transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns true if this error (or the error it wraps) means "no provider yet".
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Adds context to an error.
    ///
    /// # Example
    /// ```
    /// use edge_common::{Error, Result};
    ///
    /// fn inner() -> Result<()> {
    ///     Err(Error::type_resolution("com.example.FooService"))
    /// }
    ///
    /// fn outer() -> Result<()> {
    ///     inner().map_err(|e| e.context("Failed to describe method"))
    /// }
    /// # assert!(outer().is_err());
    /// ```
    pub fn context(self, message: impl Into<String>) -> Self {
        Self::WithContext {
            message: message.into(),
            source: Box::new(self),
        }
    }
}

// Convenience methods for Result types
pub trait ResultExt<T> {
    /// Adds context to an error result.
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(message))
    }
}
