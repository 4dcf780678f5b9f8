//! Review listing, submission and moderation workflows.
//!
//! [`ReviewAggregateManager`] holds one target's reviews for storefront
//! users; [`ModerationConsole`] gives administrators a flagged or
//! per-target view. Both reload after every accepted mutation except a
//! flag and never edit the listing locally.

mod actions;
mod confirm;
mod draft;
mod manager;
mod moderation;
mod upload;

pub use actions::{RemovalOutcome, ReplyOutcome};
pub use confirm::{AlwaysConfirm, Confirmation, Decline, removal_prompt};
pub use draft::{ReplyDrafts, ReviewDraft};
pub use manager::ReviewAggregateManager;
pub use moderation::{ModerationConsole, ModerationScope};
