//! View-model for one target's review collection.

use std::sync::Arc;

use crate::api::error::ReviewError;
use crate::api::gateway::{ImageHost, ReviewGateway};
use crate::api::models::{NewReview, Review, ReviewId, ReviewQuery, SortMode, TargetRef};
use crate::session::{Session, SessionUser};
use crate::telemetry::{NoopTelemetrySink, TelemetryEvent, TelemetrySink};

use super::actions::{
    RemovalOutcome, ReplyOutcome, confirm_and_remove, post_reply, timed_listing,
    warn_on_foreign_reviews,
};
use super::confirm::Confirmation;
use super::draft::{ReplyDrafts, ReviewDraft};
use super::upload::upload_all;

/// Holds one target's reviews plus the local sort and draft state.
///
/// The listing is only ever replaced by a successful fetch. Mutations are
/// never applied optimistically: after the server accepts one, the listing is
/// reloaded (flagging excepted).
pub struct ReviewAggregateManager<'client, Gateway, Images>
where
    Gateway: ReviewGateway + ?Sized,
    Images: ImageHost + ?Sized,
{
    gateway: &'client Gateway,
    images: &'client Images,
    telemetry: Arc<dyn TelemetrySink>,
    target: TargetRef,
    sort: SortMode,
    reviews: Vec<Review>,
    draft: ReviewDraft,
    reply_drafts: ReplyDrafts,
}

impl<'client, Gateway, Images> ReviewAggregateManager<'client, Gateway, Images>
where
    Gateway: ReviewGateway + ?Sized,
    Images: ImageHost + ?Sized,
{
    /// Creates an empty manager for `target` sorted newest first.
    #[must_use]
    pub fn new(gateway: &'client Gateway, images: &'client Images, target: TargetRef) -> Self {
        Self {
            gateway,
            images,
            telemetry: Arc::new(NoopTelemetrySink),
            target,
            sort: SortMode::default(),
            reviews: Vec::new(),
            draft: ReviewDraft::default(),
            reply_drafts: ReplyDrafts::default(),
        }
    }

    /// Sets the sort mode used by the next reload without fetching.
    #[must_use]
    pub const fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Routes telemetry events to `sink`.
    #[must_use]
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = sink;
        self
    }

    /// Target whose reviews are held.
    #[must_use]
    pub const fn target(&self) -> &TargetRef {
        &self.target
    }

    /// Current sort mode.
    #[must_use]
    pub const fn sort(&self) -> SortMode {
        self.sort
    }

    /// Reviews in the order the server returned them.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        self.reviews.as_slice()
    }

    /// Looks up a held review.
    #[must_use]
    pub fn review(&self, id: &ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|review| &review.id == id)
    }

    /// Unsent review form.
    #[must_use]
    pub const fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    /// Mutable access to the review form.
    pub const fn draft_mut(&mut self) -> &mut ReviewDraft {
        &mut self.draft
    }

    /// Unsent replies keyed by review.
    #[must_use]
    pub const fn reply_drafts(&self) -> &ReplyDrafts {
        &self.reply_drafts
    }

    /// Mutable access to the reply drafts.
    pub const fn reply_drafts_mut(&mut self) -> &mut ReplyDrafts {
        &mut self.reply_drafts
    }

    /// Fetches `target`'s reviews under `sort` and replaces the listing.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures. The previous listing, target and sort are
    /// kept when the fetch fails.
    pub async fn load_reviews(
        &mut self,
        target: TargetRef,
        sort: SortMode,
    ) -> Result<&[Review], ReviewError> {
        let query = ReviewQuery { target, sort };
        let reviews = timed_listing(
            self.telemetry.as_ref(),
            query.target.to_string(),
            self.gateway.list_reviews(&query),
        )
        .await?;
        warn_on_foreign_reviews(&query.target, &reviews);

        self.target = query.target;
        self.sort = query.sort;
        self.reviews = reviews;
        Ok(self.reviews.as_slice())
    }

    /// Repeats the load for the current target and sort.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures; the listing is kept on failure.
    pub async fn reload(&mut self) -> Result<&[Review], ReviewError> {
        let target = self.target.clone();
        self.load_reviews(target, self.sort).await
    }

    /// Reloads under a different sort mode.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures; the previous sort is kept on failure.
    pub async fn set_sort(&mut self, sort: SortMode) -> Result<&[Review], ReviewError> {
        let target = self.target.clone();
        self.load_reviews(target, sort).await
    }

    /// Submits the review draft as the session's user.
    ///
    /// Photos are uploaded first, in order. The review is only created when
    /// every upload succeeded. On success the draft is reset and the listing
    /// reloaded; on failure the draft is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Unauthenticated`] without any request when
    /// nobody is logged in, [`ReviewError::PartialUploadFailure`] when a
    /// photo upload fails, and gateway errors from the create or reload.
    pub async fn submit_review(&mut self, session: &Session) -> Result<(), ReviewError> {
        let user = session.require_user()?;

        let photos = match upload_all(self.images, &self.draft.images).await {
            Ok(photos) => photos,
            Err(error) => {
                if let ReviewError::PartialUploadFailure {
                    uploaded, total, ..
                } = &error
                {
                    self.telemetry.record(TelemetryEvent::ImageUploadFailed {
                        uploaded: *uploaded,
                        total: *total,
                    });
                }
                return Err(error);
            }
        };

        let review = NewReview {
            user_id: user.id.clone(),
            user_name: user.full_name.clone(),
            target_id: self.target.id.clone(),
            target_type: self.target.kind,
            rating: self.draft.rating,
            comment: self.draft.comment.clone(),
            photos,
        };
        self.gateway.create_review(&review).await?;
        self.telemetry.record(TelemetryEvent::ReviewSubmitted {
            target_id: review.target_id.to_string(),
            photo_count: review.photos.len(),
        });

        self.draft.reset();
        self.reload().await.map(drop)
    }

    /// Posts the reply draft for `review` as the session's user.
    ///
    /// Skips without a request when the draft is blank or nobody is logged
    /// in. The reply's role is the session user's role claim.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures; the draft is kept on failure.
    pub async fn submit_reply(
        &mut self,
        session: &Session,
        review: &ReviewId,
    ) -> Result<ReplyOutcome, ReviewError> {
        let Some(user) = session.user() else {
            tracing::debug!("reply to {review} skipped: nobody is logged in");
            return Ok(ReplyOutcome::Skipped);
        };
        self.send_reply(user, review).await
    }

    /// Posts the reply draft for `review` as the session's administrator.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Unauthenticated`] or
    /// [`ReviewError::AdminRequired`] without any request when the session
    /// is not an administrator's, and propagates gateway failures.
    pub async fn reply_as_admin(
        &mut self,
        session: &Session,
        review: &ReviewId,
    ) -> Result<ReplyOutcome, ReviewError> {
        let admin = session.require_admin()?;
        self.send_reply(admin, review).await
    }

    async fn send_reply(
        &mut self,
        author: &SessionUser,
        review: &ReviewId,
    ) -> Result<ReplyOutcome, ReviewError> {
        if self.reply_drafts.is_blank(review) {
            tracing::debug!("reply to {review} skipped: draft is empty");
            return Ok(ReplyOutcome::Skipped);
        }

        let message = self.reply_drafts.get(review).to_owned();
        post_reply(self.gateway, self.telemetry.as_ref(), review, author, &message).await?;

        self.reply_drafts.clear(review);
        self.reload().await?;
        Ok(ReplyOutcome::Posted)
    }

    /// Records a helpful vote, then reloads.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn mark_helpful(&mut self, review: &ReviewId) -> Result<(), ReviewError> {
        self.gateway.mark_helpful(review).await?;
        self.telemetry.record(TelemetryEvent::HelpfulMarked {
            review_id: review.to_string(),
        });
        self.reload().await.map(drop)
    }

    /// Flags a review for moderation.
    ///
    /// The listing is neither mutated nor reloaded; the flag shows up on
    /// the next load.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn flag_review(&self, review: &ReviewId) -> Result<(), ReviewError> {
        self.gateway.flag(review).await?;
        self.telemetry.record(TelemetryEvent::ReviewFlagged {
            review_id: review.to_string(),
        });
        Ok(())
    }

    /// Removes a review after the operator confirms, then reloads.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Unauthenticated`] or
    /// [`ReviewError::AdminRequired`] without any request when the session
    /// is not an administrator's, and propagates gateway failures.
    pub async fn remove_review<Confirm>(
        &mut self,
        session: &Session,
        review: &ReviewId,
        confirmation: &Confirm,
    ) -> Result<RemovalOutcome, ReviewError>
    where
        Confirm: Confirmation + ?Sized,
    {
        session.require_admin()?;
        let outcome =
            confirm_and_remove(self.gateway, self.telemetry.as_ref(), review, confirmation)
                .await?;
        if outcome == RemovalOutcome::Removed {
            self.reload().await?;
        }
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
