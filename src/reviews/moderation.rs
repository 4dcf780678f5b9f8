//! Administrator view over reviews awaiting moderation.

use std::fmt;
use std::sync::Arc;

use crate::api::error::ReviewError;
use crate::api::gateway::ReviewGateway;
use crate::api::models::{Review, ReviewId, ReviewQuery, SortMode, TargetId, TargetRef};
use crate::session::Session;
use crate::telemetry::{NoopTelemetrySink, TelemetrySink};

use super::actions::{
    RemovalOutcome, ReplyOutcome, confirm_and_remove, post_reply, timed_listing,
};
use super::confirm::Confirmation;
use super::draft::ReplyDrafts;

/// Which reviews the console lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModerationScope {
    /// Every flagged review across targets.
    Flagged,
    /// All reviews of one hotel, via the admin listing.
    Hotel(TargetId),
    /// All reviews of one flight, via the public listing.
    Flight(TargetId),
}

impl fmt::Display for ModerationScope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flagged => formatter.write_str("flagged"),
            Self::Hotel(id) => write!(formatter, "HOTEL {id}"),
            Self::Flight(id) => write!(formatter, "FLIGHT {id}"),
        }
    }
}

/// Admin listing with reply drafts, reply-as-admin and removal.
pub struct ModerationConsole<'client, Gateway>
where
    Gateway: ReviewGateway + ?Sized,
{
    gateway: &'client Gateway,
    telemetry: Arc<dyn TelemetrySink>,
    scope: ModerationScope,
    reviews: Vec<Review>,
    reply_drafts: ReplyDrafts,
}

impl<'client, Gateway> ModerationConsole<'client, Gateway>
where
    Gateway: ReviewGateway + ?Sized,
{
    /// Checks the session is an administrator's and loads `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Unauthenticated`] or
    /// [`ReviewError::AdminRequired`] without any request when the session
    /// is not an administrator's, and propagates gateway failures.
    pub async fn open(
        gateway: &'client Gateway,
        session: &Session,
        scope: ModerationScope,
    ) -> Result<Self, ReviewError> {
        Self::open_with_telemetry(gateway, session, scope, Arc::new(NoopTelemetrySink)).await
    }

    /// Same as [`Self::open`] but routes telemetry to `sink`.
    ///
    /// # Errors
    ///
    /// See [`Self::open`].
    pub async fn open_with_telemetry(
        gateway: &'client Gateway,
        session: &Session,
        scope: ModerationScope,
        sink: Arc<dyn TelemetrySink>,
    ) -> Result<Self, ReviewError> {
        session.require_admin()?;
        let mut console = Self {
            gateway,
            telemetry: sink,
            scope,
            reviews: Vec::new(),
            reply_drafts: ReplyDrafts::default(),
        };
        console.reload().await?;
        Ok(console)
    }

    /// Scope being moderated.
    #[must_use]
    pub const fn scope(&self) -> &ModerationScope {
        &self.scope
    }

    /// Reviews in the order the server returned them.
    #[must_use]
    pub fn reviews(&self) -> &[Review] {
        self.reviews.as_slice()
    }

    /// Unsent admin replies keyed by review.
    #[must_use]
    pub const fn reply_drafts(&self) -> &ReplyDrafts {
        &self.reply_drafts
    }

    /// Mutable access to the admin reply drafts.
    pub const fn reply_drafts_mut(&mut self) -> &mut ReplyDrafts {
        &mut self.reply_drafts
    }

    /// Refetches the scope; the listing is kept on failure.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn reload(&mut self) -> Result<&[Review], ReviewError> {
        let source = self.scope.to_string();
        let telemetry = self.telemetry.as_ref();
        let reviews = match &self.scope {
            ModerationScope::Flagged => {
                timed_listing(telemetry, source, self.gateway.list_flagged_reviews()).await?
            }
            ModerationScope::Hotel(id) => {
                timed_listing(
                    telemetry,
                    source,
                    self.gateway.list_hotel_reviews_for_admin(id),
                )
                .await?
            }
            ModerationScope::Flight(id) => {
                let query = ReviewQuery {
                    target: TargetRef::flight(id.as_str()),
                    sort: SortMode::Newest,
                };
                timed_listing(telemetry, source, self.gateway.list_reviews(&query)).await?
            }
        };

        self.reviews = reviews;
        Ok(self.reviews.as_slice())
    }

    /// Posts the admin reply draft for `review`, then reloads.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::AdminRequired`] when the session is no longer
    /// an administrator's, and propagates gateway failures.
    pub async fn reply_as_admin(
        &mut self,
        session: &Session,
        review: &ReviewId,
    ) -> Result<ReplyOutcome, ReviewError> {
        let admin = session.require_admin()?;
        if self.reply_drafts.is_blank(review) {
            tracing::debug!("admin reply to {review} skipped: draft is empty");
            return Ok(ReplyOutcome::Skipped);
        }

        let message = self.reply_drafts.get(review).to_owned();
        post_reply(self.gateway, self.telemetry.as_ref(), review, admin, &message).await?;

        self.reply_drafts.clear(review);
        self.reload().await?;
        Ok(ReplyOutcome::Posted)
    }

    /// Removes a review after the operator confirms, then reloads.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::AdminRequired`] when the session is no longer
    /// an administrator's, and propagates gateway failures.
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
