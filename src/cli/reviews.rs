//! Review listing, submission, replies, votes and flags.

use async_trait::async_trait;
use junket::{
    HttpImageHost, HttpReviewGateway, ImageAttachment, ImageHost, JunketConfig,
    ReviewAggregateManager, ReviewError, SessionStore,
};

use super::Context;
use super::output::{reply_status, write_reviews, write_status};

/// Stands in for the image host when no upload endpoint is configured.
///
/// Only reached when a draft carries photos.
struct UnconfiguredImageHost;

#[async_trait]
impl ImageHost for UnconfiguredImageHost {
    async fn upload(&self, _image: &ImageAttachment) -> Result<String, ReviewError> {
        Err(ReviewError::Configuration {
            message: "image upload URL is required to attach photos (use --image-upload-url)"
                .to_owned(),
        })
    }
}

fn review_gateway(context: &Context) -> Result<HttpReviewGateway, ReviewError> {
    HttpReviewGateway::new(context.base.clone(), context.timeout)
}

fn image_host(context: &Context, config: &JunketConfig) -> Result<Box<dyn ImageHost>, ReviewError> {
    config.image_upload_url.as_deref().map_or_else(
        || Ok(Box::new(UnconfiguredImageHost) as Box<dyn ImageHost>),
        |url| {
            let host = HttpImageHost::new(url, config.upload_preset(), context.timeout)?;
            Ok(Box::new(host) as Box<dyn ImageHost>)
        },
    )
}

/// Lists the configured target's reviews.
///
/// # Errors
///
/// Returns configuration errors for a missing target and gateway errors.
pub async fn list(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let target = config.require_target()?;
    let gateway = review_gateway(context)?;
    let images = UnconfiguredImageHost;
    let mut manager = ReviewAggregateManager::new(&gateway, &images, target.clone())
        .with_telemetry(context.telemetry.clone());

    let reviews = manager.load_reviews(target.clone(), config.sort_mode()?).await?;
    write_reviews(&target.to_string(), reviews)
}

/// Submits a review as the logged-in user.
///
/// # Errors
///
/// Returns [`ReviewError::Unauthenticated`] when nobody is logged in, I/O
/// errors for unreadable images, and upload or gateway errors.
pub async fn submit(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let target = config.require_target()?;
    let session = context.store.load()?;
    session.require_user()?;

    let attachments = config
        .image_paths()
        .iter()
        .map(|path| ImageAttachment::from_path(path))
        .collect::<Result<Vec<_>, _>>()?;

    let gateway = review_gateway(context)?;
    let host = image_host(context, config)?;

    let mut manager = ReviewAggregateManager::new(&gateway, host.as_ref(), target.clone())
        .with_sort(config.sort_mode()?)
        .with_telemetry(context.telemetry.clone());
    let draft = manager.draft_mut();
    draft.rating = config.rating()?;
    draft.comment = config.comment.clone().unwrap_or_default();
    draft.images = attachments;

    manager.submit_review(&session).await?;
    write_status("Review submitted.")?;
    write_reviews(&target.to_string(), manager.reviews())
}

/// Replies to a review as the logged-in user.
///
/// # Errors
///
/// Returns [`ReviewError::Unauthenticated`] when nobody is logged in,
/// configuration errors for a missing target or review, and gateway errors.
pub async fn reply(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let target = config.require_target()?;
    let review = config.require_review_id()?;
    let session = context.store.load()?;
    session.require_user()?;
    let gateway = review_gateway(context)?;
    let images = UnconfiguredImageHost;

    let mut manager = ReviewAggregateManager::new(&gateway, &images, target.clone())
        .with_sort(config.sort_mode()?)
        .with_telemetry(context.telemetry.clone());
    manager
        .reply_drafts_mut()
        .set(review.clone(), config.message.clone().unwrap_or_default());

    let outcome = manager.submit_reply(&session, &review).await?;
    write_status(reply_status(outcome))?;
    write_reviews(&target.to_string(), manager.reviews())
}

/// Marks a review helpful and shows the refreshed listing.
///
/// # Errors
///
/// Returns configuration errors for a missing target or review and gateway
/// errors.
pub async fn helpful(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let target = config.require_target()?;
    let review = config.require_review_id()?;
    let gateway = review_gateway(context)?;
    let images = UnconfiguredImageHost;

    let mut manager = ReviewAggregateManager::new(&gateway, &images, target.clone())
        .with_sort(config.sort_mode()?)
        .with_telemetry(context.telemetry.clone());
    manager.mark_helpful(&review).await?;

    write_status("Marked helpful.")?;
    write_reviews(&target.to_string(), manager.reviews())
}

/// Flags a review for moderation.
///
/// # Errors
///
/// Returns configuration errors for a missing target or review and gateway
/// errors.
pub async fn flag(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let target = config.require_target()?;
    let review = config.require_review_id()?;
    let gateway = review_gateway(context)?;
    let images = UnconfiguredImageHost;

    let manager = ReviewAggregateManager::new(&gateway, &images, target)
        .with_telemetry(context.telemetry.clone());
    manager.flag_review(&review).await?;
    write_status("Review flagged for moderation; it will show as flagged on the next load.")
}
