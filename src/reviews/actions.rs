//! Mutations shared by the aggregate manager and the moderation console.

use std::time::Instant;

use crate::api::error::ReviewError;
use crate::api::gateway::ReviewGateway;
use crate::api::models::{NewReply, Review, ReviewId, ReviewState, TargetRef};
use crate::session::SessionUser;
use crate::telemetry::{TelemetryEvent, TelemetrySink, duration_to_millis};

use super::confirm::{Confirmation, removal_prompt};

/// Result of a reply attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The reply was accepted and the listing reloaded.
    Posted,
    /// Nothing was sent: the draft was blank or nobody was logged in.
    Skipped,
}

/// Result of a removal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The review was removed and the listing reloaded.
    Removed,
    /// The operator declined the confirmation; nothing was sent.
    Cancelled,
}

/// Fetches a listing and records its latency.
pub(super) async fn timed_listing<Fetch>(
    telemetry: &dyn TelemetrySink,
    source: String,
    fetch: Fetch,
) -> Result<Vec<Review>, ReviewError>
where
    Fetch: Future<Output = Result<Vec<Review>, ReviewError>>,
{
    let start = Instant::now();
    let reviews = fetch.await?;
    let latency_ms = duration_to_millis(start.elapsed());
    tracing::debug!("loaded {} reviews for {source} in {latency_ms}ms", reviews.len());

    for review in reviews.iter().filter(|review| review.state() == ReviewState::Removed) {
        tracing::warn!("listing for {source} returned removed review {}", review.id);
    }

    telemetry.record(TelemetryEvent::ReviewsLoaded {
        source,
        count: reviews.len(),
        latency_ms,
    });
    Ok(reviews)
}

/// Warns about entries that belong to a different target than requested.
pub(super) fn warn_on_foreign_reviews(target: &TargetRef, reviews: &[Review]) {
    for review in reviews
        .iter()
        .filter(|review| review.target_id != target.id || review.target_type != target.kind)
    {
        tracing::warn!(
            "listing for {target} returned review {} of {}",
            review.id,
            review.target()
        );
    }
}

/// Posts a reply as `author`, with the role taken from the author's claim.
pub(super) async fn post_reply<Gateway>(
    gateway: &Gateway,
    telemetry: &dyn TelemetrySink,
    review: &ReviewId,
    author: &SessionUser,
    message: &str,
) -> Result<(), ReviewError>
where
    Gateway: ReviewGateway + ?Sized,
{
    let reply = NewReply {
        user_id: Some(author.id.clone()),
        user_name: author.full_name.clone(),
        role: author.role,
        message: message.trim().to_owned(),
    };
    gateway.reply(review, &reply).await?;

    telemetry.record(TelemetryEvent::ReplyPosted {
        review_id: review.to_string(),
        role: author.role.as_str().to_owned(),
    });
    Ok(())
}

/// Asks for confirmation, then removes the review.
pub(super) async fn confirm_and_remove<Gateway, Confirm>(
    gateway: &Gateway,
    telemetry: &dyn TelemetrySink,
    review: &ReviewId,
    confirmation: &Confirm,
) -> Result<RemovalOutcome, ReviewError>
where
    Gateway: ReviewGateway + ?Sized,
    Confirm: Confirmation + ?Sized,
{
    let prompt = removal_prompt(review);
    if !confirmation.confirm(&prompt) {
        tracing::debug!("removal of review {review} declined");
        telemetry.record(TelemetryEvent::RemovalCancelled {
            review_id: review.to_string(),
        });
        return Ok(RemovalOutcome::Cancelled);
    }

    gateway.remove(review).await?;
    telemetry.record(TelemetryEvent::ReviewRemoved {
        review_id: review.to_string(),
    });
    Ok(RemovalOutcome::Removed)
}
