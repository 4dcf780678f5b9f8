//! Admin moderation console commands.

use junket::{
    AlwaysConfirm, Confirmation, Decline, HttpReviewGateway, JunketConfig, ModerationConsole,
    ModerationScope, ReviewError, Session, SessionStore, TargetId, removal_prompt,
};

use super::Context;
use super::output::{removal_status, reply_status, write_reviews, write_status};
use super::prompt::ask;

/// Resolves the moderation scope from `--scope` and `--target-id`.
///
/// # Errors
///
/// Returns [`ReviewError::Configuration`] for an unknown scope or a hotel or
/// flight scope without a target id.
pub fn scope_from(config: &JunketConfig) -> Result<ModerationScope, ReviewError> {
    let word = config
        .scope
        .as_deref()
        .unwrap_or("flagged")
        .trim()
        .to_ascii_lowercase();
    let target = || {
        config
            .target_id
            .as_deref()
            .map(TargetId::from)
            .ok_or_else(|| ReviewError::Configuration {
                message: format!("scope '{word}' needs a target id (use --target-id)"),
            })
    };

    match word.as_str() {
        "flagged" => Ok(ModerationScope::Flagged),
        "hotel" => Ok(ModerationScope::Hotel(target()?)),
        "flight" => Ok(ModerationScope::Flight(target()?)),
        other => Err(ReviewError::Configuration {
            message: format!("scope must be flagged, hotel, or flight, got '{other}'"),
        }),
    }
}

async fn open_console<'client>(
    gateway: &'client HttpReviewGateway,
    context: &Context,
    config: &JunketConfig,
    session: &Session,
) -> Result<ModerationConsole<'client, HttpReviewGateway>, ReviewError> {
    ModerationConsole::open_with_telemetry(
        gateway,
        session,
        scope_from(config)?,
        context.telemetry.clone(),
    )
    .await
}

/// Lists the moderation scope.
///
/// # Errors
///
/// Returns admin, configuration and gateway errors.
pub async fn open(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let session = context.store.load()?;
    let gateway = HttpReviewGateway::new(context.base.clone(), context.timeout)?;
    let console = open_console(&gateway, context, config, &session).await?;

    write_reviews(&console.scope().to_string(), console.reviews())
}

/// Replies to a review as the logged-in administrator.
///
/// # Errors
///
/// Returns admin, configuration and gateway errors.
pub async fn reply(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let review = config.require_review_id()?;
    let session = context.store.load()?;
    let gateway = HttpReviewGateway::new(context.base.clone(), context.timeout)?;
    let mut console = open_console(&gateway, context, config, &session).await?;

    console
        .reply_drafts_mut()
        .set(review.clone(), config.message.clone().unwrap_or_default());
    let outcome = console.reply_as_admin(&session, &review).await?;

    write_status(reply_status(outcome))?;
    write_reviews(&console.scope().to_string(), console.reviews())
}

/// Removes a review after a terminal confirmation (skipped with `--yes`).
///
/// The question is asked once the console has loaded, so a non-admin is
/// refused before being prompted.
///
/// # Errors
///
/// Returns admin, configuration and gateway errors.
pub async fn remove(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let review = config.require_review_id()?;
    let session = context.store.load()?;
    let gateway = HttpReviewGateway::new(context.base.clone(), context.timeout)?;
    let mut console = open_console(&gateway, context, config, &session).await?;

    let confirmed = config.yes || ask(removal_prompt(&review)).await?;
    let confirmation: &dyn Confirmation = if confirmed {
        &AlwaysConfirm
    } else {
        &Decline
    };
    let outcome = console
        .remove_review(&session, &review, confirmation)
        .await?;

    write_status(removal_status(outcome))?;
    write_reviews(&console.scope().to_string(), console.reviews())
}
