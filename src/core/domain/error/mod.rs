use reqwest::StatusCode;
use thiserror::Error;

/// The main error type for kubelet summary operations.
///
/// Every failure of [`KubeletClient`](crate::KubeletClient) is returned as one of
/// these variants. Nothing is retried or recovered internally, so callers decide
/// whether to skip the node, retry later or alert.
#[derive(Error, Debug)]
pub enum KubeletError {
    /// The client configuration was rejected at construction time
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    #[error("Configuration error: {source}")]
    Configuration { source: ValidationError },

    /// The request URL could not be assembled from the configured parts
    #[error("invalid request url {url:?}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },

    /// The node identifier cannot be placed in the request URL
    #[error("invalid node name {node:?}: {reason}")]
    NodeName { node: String, reason: String },

    /// Network level failure while talking to the kubelet or the API server
    ///
    /// Covers connection refused, DNS and TLS failures, timeouts and
    /// failures while reading the response body.
    #[error("request to {endpoint} failed - {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The caller cancelled the request before a response was received
    #[error("request to {endpoint} cancelled")]
    Cancelled { endpoint: String },

    /// The endpoint answered with `404 Not Found`
    ///
    /// # Fields
    /// * `endpoint` - The full URL that was requested
    #[error("{endpoint:?} not found")]
    NotFound { endpoint: String },

    /// The endpoint answered with a non-success status other than 404
    #[error("request failed - {:?}, response: {body:?}", .status.to_string())]
    Status { status: StatusCode, body: String },

    /// The response was successful but its body is not a valid summary
    #[error("failed to parse output. Response: {body:?}. Error: {source}")]
    Decode {
        body: String,
        source: serde_json::Error,
    },
}

impl KubeletError {
    /// Returns true if the requested endpoint does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, KubeletError::NotFound { .. })
    }
}

impl From<ValidationError> for KubeletError {
    fn from(error: ValidationError) -> Self {
        KubeletError::Configuration { source: error }
    }
}

/// Returns true if `err` reports a missing summary endpoint.
///
/// A node that has just joined the cluster commonly answers this way until its
/// kubelet starts serving stats, so collectors usually skip it instead of failing.
pub fn is_not_found(err: &KubeletError) -> bool {
    err.is_not_found()
}

/// Specialized error type for configuration validation failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/syntax validation failures
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with a KubeletError
pub type KubeletResult<T> = Result<T, KubeletError>;
