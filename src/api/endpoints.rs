//! Endpoint construction for the storefront review API.

use url::Url;

use super::error::ReviewError;
use super::models::{ReviewId, TargetId};

/// Default API root used by the storefront backend.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

/// Validated base URL of the storefront API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Parses and validates an API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] when the value is not an absolute
    /// `http` or `https` URL.
    pub fn parse(raw: &str) -> Result<Self, ReviewError> {
        let url = Url::parse(raw.trim()).map_err(|error| ReviewError::InvalidUrl(error.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ReviewError::InvalidUrl(format!(
                "unsupported scheme '{}' in '{raw}'",
                url.scheme()
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ReviewError::InvalidUrl(format!("'{raw}' cannot be a base URL")));
        }
        Ok(Self(url))
    }

    /// Borrow the underlying URL.
    #[must_use]
    pub const fn as_url(&self) -> &Url {
        &self.0
    }

    /// `GET /reviews` and `POST /reviews`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] if the path cannot be extended.
    pub fn reviews(&self) -> Result<Url, ReviewError> {
        self.join(&["reviews"])
    }

    /// `POST /reviews/{id}/reply`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] if the path cannot be extended.
    pub fn review_reply(&self, id: &ReviewId) -> Result<Url, ReviewError> {
        self.join(&["reviews", id.as_str(), "reply"])
    }

    /// `POST /reviews/{id}/helpful`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] if the path cannot be extended.
    pub fn review_helpful(&self, id: &ReviewId) -> Result<Url, ReviewError> {
        self.join(&["reviews", id.as_str(), "helpful"])
    }

    /// `POST /reviews/{id}/flag`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] if the path cannot be extended.
    pub fn review_flag(&self, id: &ReviewId) -> Result<Url, ReviewError> {
        self.join(&["reviews", id.as_str(), "flag"])
    }

    /// `POST /admin/reviews/{id}/remove`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] if the path cannot be extended.
    pub fn admin_review_remove(&self, id: &ReviewId) -> Result<Url, ReviewError> {
        self.join(&["admin", "reviews", id.as_str(), "remove"])
    }

    /// `GET /admin/reviews/flagged`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] if the path cannot be extended.
    pub fn admin_flagged_reviews(&self) -> Result<Url, ReviewError> {
        self.join(&["admin", "reviews", "flagged"])
    }

    /// `GET /admin/hotels/{id}/reviews`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] if the path cannot be extended.
    pub fn admin_hotel_reviews(&self, hotel: &TargetId) -> Result<Url, ReviewError> {
        self.join(&["admin", "hotels", hotel.as_str(), "reviews"])
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] if the path cannot be extended.
    pub fn login(&self) -> Result<Url, ReviewError> {
        self.join(&["auth", "login"])
    }

    /// `POST /auth/register`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] if the path cannot be extended.
    pub fn register(&self) -> Result<Url, ReviewError> {
        self.join(&["auth", "register"])
    }

    /// Appends percent-encoded path segments to the base path.
    fn join(&self, segments: &[&str]) -> Result<Url, ReviewError> {
        let mut url = self.0.clone();
        url.path_segments_mut()
            .map_err(|()| ReviewError::InvalidUrl(format!("'{}' cannot be a base URL", self.0)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
