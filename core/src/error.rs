//! Error types for the storefront core.
//!
//! # Design
//! `RemoteError` covers everything that can go wrong once a request has been
//! built: the round-trip itself, a non-2xx status, a GraphQL `errors` array,
//! or a payload that does not match the expected shape. `NotFound` keeps its
//! own variant because deletes of an already-removed author surface as 404.
//!
//! `ValidationError` is local and never involves the network. A business-level
//! order rejection is not an error at all; it is reported through
//! [`OrderOutcome`](crate::order::OrderOutcome).

use thiserror::Error;

/// Failure of a call to either backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request never produced a response (connection refused, timeout,
    /// the blocking task was cancelled).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body did not match the expected payload shape.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(String),

    /// The GraphQL service answered with an `errors` array.
    #[error("graphql errors: {}", .0.join("; "))]
    Graphql(Vec<String>),

    /// A delete mutation answered with a falsy acknowledgment.
    #[error("server did not acknowledge {0}")]
    NotAcknowledged(String),
}

/// A draft failed its required-field or range checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors from catalog selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("no catalog entry with sku '{0}'")]
    UnknownSku(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_errors_are_joined() {
        let err = RemoteError::Graphql(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "graphql errors: a; b");
    }

    #[test]
    fn validation_error_displays_its_message() {
        let err = ValidationError::new("All fields are required.");
        assert_eq!(err.to_string(), "All fields are required.");
        assert_eq!(err.message(), "All fields are required.");
    }
}
