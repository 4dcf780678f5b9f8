//! Confirmation seam for destructive moderation actions.

use crate::api::models::ReviewId;

/// Question put to the operator before `review` is removed.
#[must_use]
pub fn removal_prompt(review: &ReviewId) -> String {
    format!("Remove review {review}? This cannot be undone.")
}

/// Asks the operator to approve an irreversible action.
#[cfg_attr(test, mockall::automock)]
pub trait Confirmation {
    /// Returns true when the operator approves `prompt`.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves every prompt, for non-interactive use.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Declines every prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Decline;

impl Confirmation for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
