//! Junket library crate for travel storefront reviews.
//!
//! The library talks to the storefront's review contract: it lists a hotel's
//! or flight's reviews, submits reviews with hosted photos, posts replies and
//! helpful votes, flags reviews, and gives administrators a moderation view.
//! Failures surface as a single [`ReviewError`] that the CLI can display.

pub mod api;
pub mod config;
pub mod reviews;
pub mod session;
pub mod telemetry;

pub use api::{
    ApiBase, AuthGateway, Credentials, HttpAuthGateway, HttpImageHost, HttpReviewGateway,
    ImageAttachment, ImageHost, Rating, Registration, Reply, Review, ReviewError, ReviewGateway,
    ReviewId, ReviewState, Role, SortMode, TargetId, TargetRef, TargetType, UserId,
};
pub use config::JunketConfig;
pub use reviews::{
    AlwaysConfirm, Confirmation, Decline, ModerationConsole, ModerationScope, RemovalOutcome,
    ReplyOutcome, ReviewAggregateManager, ReviewDraft, removal_prompt,
};
pub use session::{FileSessionStore, Session, SessionStore, SessionUser};
