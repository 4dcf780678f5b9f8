//! Error mapping helpers for the reqwest gateway implementations.

use http::StatusCode;

use crate::api::error::ReviewError;

/// Checks if a status indicates the API rejected the request body.
pub(super) const fn is_validation_failure(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
    )
}

/// Checks if a status indicates an authentication or authorisation failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> ReviewError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if is_validation_failure(status) {
        ReviewError::ValidationRejected {
            message: format!("{operation} failed: {message}"),
        }
    } else if is_auth_failure(status) {
        ReviewError::Authorization {
            message: format!("{operation} failed: API returned {status} {message}"),
        }
    } else {
        ReviewError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

/// Maps a reqwest failure that happened before or while reading a response.
pub(super) fn map_transport_error(operation: &str, error: &reqwest::Error) -> ReviewError {
    if error.is_timeout() {
        return ReviewError::Timeout {
            message: format!("{operation} did not complete in time"),
        };
    }

    if error.is_decode() {
        return ReviewError::Api {
            message: format!("{operation} returned an unexpected body: {error}"),
        };
    }

    if error.is_builder() {
        return ReviewError::InvalidUrl(format!("{operation}: {error}"));
    }

    ReviewError::Network {
        message: format!("{operation} failed: {error}"),
    }
}
