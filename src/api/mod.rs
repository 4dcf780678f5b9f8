//! Storefront API client: wire models, endpoint paths, and HTTP gateways.

pub mod attachment;
pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod models;

pub use attachment::ImageAttachment;
pub use endpoints::{ApiBase, DEFAULT_API_BASE};
pub use error::ReviewError;
pub use gateway::{
    AuthGateway, Credentials, DEFAULT_TIMEOUT_SECS, DEFAULT_UPLOAD_PRESET, HttpAuthGateway,
    HttpImageHost, HttpReviewGateway, ImageHost, Registration, ReviewGateway,
};
pub use models::{
    NewReply, NewReview, Rating, Reply, Review, ReviewId, ReviewQuery, ReviewState, Role,
    SortMode, TargetId, TargetRef, TargetType, UserId,
};
