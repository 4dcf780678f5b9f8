//! Error types exposed by the storefront review client.

use thiserror::Error;

/// Errors surfaced while validating input or communicating with the
/// storefront API and image host.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    /// A user-bound action was attempted without a logged-in user.
    #[error("please log in to continue")]
    Unauthenticated,

    /// The logged-in user lacks the ADMIN role.
    #[error("this action requires an administrator account")]
    AdminRequired,

    /// A rating outside the accepted 1–5 range was supplied.
    #[error("rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    /// The API declined the request as malformed (400/422).
    #[error("request rejected: {message}")]
    ValidationRejected {
        /// Detail returned by the API.
        message: String,
    },

    /// The API refused the caller's credentials (401/403).
    #[error("not authorised: {message}")]
    Authorization {
        /// Detail returned by the API.
        message: String,
    },

    /// The API returned another non-success status or an undecodable body.
    #[error("storefront API error: {message}")]
    Api {
        /// Response detail describing the failure.
        message: String,
    },

    /// Networking failed before a response arrived.
    #[error("network error talking to the storefront: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A request exceeded the configured timeout.
    #[error("request timed out: {message}")]
    Timeout {
        /// Which operation timed out.
        message: String,
    },

    /// An image upload failed, so the review was not submitted.
    #[error("uploaded {uploaded} of {total} images before a failure: {message}")]
    PartialUploadFailure {
        /// Number of images uploaded before the failure.
        uploaded: usize,
        /// Number of images attached to the draft.
        total: usize,
        /// Detail of the failed upload.
        message: String,
    },

    /// A URL could not be parsed or extended.
    #[error("URL is invalid: {0}")]
    InvalidUrl(String),

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The operation was interrupted before it completed.
    #[error("operation cancelled")]
    Cancelled,
}
