//! Error types for validation, mutation building, store access and request handling.

use std::time;
use thiserror::Error;

/// Result type of handler-level operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A field value that failed its validator.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
#[error("{field} {reason}")]
pub struct ValidationError {
    /// Name of the offending field.
    pub field: String,
    /// Why the value was rejected, phrased to follow the field name.
    pub reason: String,
}

impl ValidationError {
    /// Creates a validation error for `field`.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// An update payload without any field to change.
#[derive(Clone, Copy, Debug, Default, Eq, Error, Hash, PartialEq)]
#[error("update must contain at least one field")]
pub struct EmptyUpdateError;

/// Failure of a store gateway call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend rejected or failed the request (connectivity included).
    #[error("{operation} request failed: {source}")]
    Request {
        /// Store operation that failed.
        operation: &'static str,
        /// Backend error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// A record could not be converted to or from DynamoDB attribute values.
    #[error("failed to convert blog post record: {0}")]
    Record(#[from] serde_dynamo::Error),
    /// A record could not be converted to or from a JSON document.
    #[error("failed to convert blog post document: {0}")]
    Document(#[from] serde_json::Error),
    /// A put targeted an id that is already taken.
    #[error("blog post {id} already exists")]
    Conflict {
        /// The colliding id.
        id: String,
    },
}

impl StoreError {
    pub(crate) fn request(
        operation: &'static str,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Request {
            operation,
            source: Box::new(source),
        }
    }
}

/// Failure while resolving the startup configuration.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),
    /// A variable is set to an unusable value.
    #[error("environment variable {name} has invalid value {value:?}: {reason}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// What was expected.
        reason: String,
    },
}

/// Everything a handler can fail with.
///
/// Each variant maps to one response status, see [`Error::status_code`].
#[derive(Debug, Error)]
pub enum Error {
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// An update carried no field.
    #[error(transparent)]
    EmptyUpdate(#[from] EmptyUpdateError),
    /// The path did not carry a usable id.
    #[error("ID is missing")]
    MissingId,
    /// The body was absent, not JSON, or not a JSON object.
    #[error("malformed request body: {0}")]
    MalformedRequest(String),
    /// No blog post has the requested id.
    #[error("blog post {id} not found")]
    NotFound {
        /// Requested id.
        id: String,
    },
    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The store did not answer in time.
    #[error("store call timed out after {0:?}")]
    Timeout(time::Duration),
    /// A response body could not be encoded.
    #[error("failed to encode response body: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl Error {
    /// Response status for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::EmptyUpdate(_) | Self::MissingId => 400,
            Self::MalformedRequest(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Store(_) | Self::Timeout(_) | Self::Serialize(_) => 500,
        }
    }

    /// Whether the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
