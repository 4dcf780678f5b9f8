//! Gateways for talking to the storefront API and the image host.
//!
//! This module provides trait-based gateways for the review HTTP contract.
//! The trait-based design enables mocking in tests while the reqwest
//! implementations handle real HTTP requests.

mod auth;
mod client;
mod error_mapping;
mod http_utils;
mod images;
mod reviews;

pub use auth::{Credentials, HttpAuthGateway, Registration};
pub use client::{DEFAULT_TIMEOUT_SECS, build_http_client};
pub use images::{DEFAULT_UPLOAD_PRESET, HttpImageHost};
pub use reviews::HttpReviewGateway;

use async_trait::async_trait;

use crate::api::attachment::ImageAttachment;
use crate::api::error::ReviewError;
use crate::api::models::{NewReply, NewReview, Review, ReviewId, ReviewQuery, TargetId};
use crate::session::SessionUser;

/// Gateway covering the review endpoints of the storefront API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewGateway: Send + Sync {
    /// List the reviews for one target in the requested order.
    async fn list_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>, ReviewError>;

    /// List every flagged review awaiting moderation.
    async fn list_flagged_reviews(&self) -> Result<Vec<Review>, ReviewError>;

    /// List a hotel's reviews through the admin endpoint.
    async fn list_hotel_reviews_for_admin(
        &self,
        hotel: &TargetId,
    ) -> Result<Vec<Review>, ReviewError>;

    /// Create a review.
    async fn create_review(&self, review: &NewReview) -> Result<(), ReviewError>;

    /// Append a reply to a review.
    async fn reply(&self, review: &ReviewId, reply: &NewReply) -> Result<(), ReviewError>;

    /// Increment a review's helpful counter.
    async fn mark_helpful(&self, review: &ReviewId) -> Result<(), ReviewError>;

    /// Flag a review for moderation.
    async fn flag(&self, review: &ReviewId) -> Result<(), ReviewError>;

    /// Remove a review (admin only).
    async fn remove(&self, review: &ReviewId) -> Result<(), ReviewError>;
}

/// Host that stores review photos and returns their public URLs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload one image and return its secure URL.
    async fn upload(&self, image: &ImageAttachment) -> Result<String, ReviewError>;
}

/// Gateway for the storefront auth service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for the user record.
    async fn login(&self, credentials: &Credentials) -> Result<SessionUser, ReviewError>;

    /// Create a new account.
    async fn register(&self, registration: &Registration) -> Result<(), ReviewError>;
}
