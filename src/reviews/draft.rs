//! Form state for review and reply drafts.

use std::collections::HashMap;

use crate::api::attachment::ImageAttachment;
use crate::api::error::ReviewError;
use crate::api::models::{Rating, ReviewId};

/// Unsent review form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Selected star rating.
    pub rating: Rating,
    /// Review text.
    pub comment: String,
    /// Photos to upload, in submission order.
    pub images: Vec<ImageAttachment>,
}

impl ReviewDraft {
    /// Sets the rating from a raw value.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidRating`] when `value` is outside 1–5;
    /// the previous rating is kept.
    pub fn set_rating(&mut self, value: u8) -> Result<(), ReviewError> {
        self.rating = Rating::new(value)?;
        Ok(())
    }

    /// Restores the empty form: rating 5, no comment, no images.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Unsent reply text keyed by the review it answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyDrafts {
    drafts: HashMap<ReviewId, String>,
}

impl ReplyDrafts {
    /// Draft text for a review, empty when none was written.
    #[must_use]
    pub fn get(&self, review: &ReviewId) -> &str {
        self.drafts.get(review).map_or("", String::as_str)
    }

    /// Replaces the draft text for a review.
    pub fn set(&mut self, review: ReviewId, message: impl Into<String>) {
        self.drafts.insert(review, message.into());
    }

    /// Discards the draft for a review.
    pub fn clear(&mut self, review: &ReviewId) {
        self.drafts.remove(review);
    }

    /// Returns true when the draft is empty after trimming whitespace.
    #[must_use]
    pub fn is_blank(&self, review: &ReviewId) -> bool {
        self.get(review).trim().is_empty()
    }
}
