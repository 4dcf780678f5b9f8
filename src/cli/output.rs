//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use junket::{ReplyOutcome, RemovalOutcome, Review, ReviewError, ReviewState, SessionUser};

fn io_error(error: &io::Error) -> ReviewError {
    ReviewError::Io {
        message: error.to_string(),
    }
}

/// Writes a review listing to stdout.
pub fn write_reviews(heading: &str, reviews: &[Review]) -> Result<(), ReviewError> {
    let mut stdout = io::stdout().lock();
    write_reviews_to(&mut stdout, heading, reviews)
}

/// Writes a review listing to the given writer.
pub fn write_reviews_to<W: Write>(
    writer: &mut W,
    heading: &str,
    reviews: &[Review],
) -> Result<(), ReviewError> {
    writeln!(writer, "Reviews for {heading}:").map_err(|e| io_error(&e))?;

    if reviews.is_empty() {
        writeln!(writer, "  (no reviews yet)").map_err(|e| io_error(&e))?;
        return Ok(());
    }

    for review in reviews {
        write_review_to(writer, review)?;
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{} reviews shown", reviews.len()).map_err(|e| io_error(&e))
}

fn write_review_to<W: Write>(writer: &mut W, review: &Review) -> Result<(), ReviewError> {
    let marker = match review.state() {
        ReviewState::Active => "",
        ReviewState::Flagged => " [flagged]",
        ReviewState::Removed => " [removed]",
    };
    let date = review
        .created_at
        .map_or_else(String::new, |at| format!(" on {}", at.format("%Y-%m-%d")));

    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "  {} {}/5 by {}{date}{marker} ({} found helpful)",
        review.id, review.rating, review.author_name, review.helpful_count
    )
    .map_err(|e| io_error(&e))?;

    if !review.comment.is_empty() {
        writeln!(writer, "    {}", review.comment).map_err(|e| io_error(&e))?;
    }
    for photo in &review.photos {
        writeln!(writer, "    photo: {photo}").map_err(|e| io_error(&e))?;
    }
    for reply in &review.replies {
        let badge = if reply.is_admin() { " (admin)" } else { "" };
        writeln!(writer, "    > {}{badge}: {}", reply.author_name, reply.message)
            .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes a one-line status message to stdout.
pub fn write_status(message: &str) -> Result<(), ReviewError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{message}").map_err(|e| io_error(&e))
}

/// Describes a reply attempt.
pub const fn reply_status(outcome: ReplyOutcome) -> &'static str {
    match outcome {
        ReplyOutcome::Posted => "Reply posted.",
        ReplyOutcome::Skipped => "Reply skipped: the message is empty.",
    }
}

/// Describes a removal attempt.
pub const fn removal_status(outcome: RemovalOutcome) -> &'static str {
    match outcome {
        RemovalOutcome::Removed => "Review removed.",
        RemovalOutcome::Cancelled => "Removal cancelled.",
    }
}

/// Describes the logged-in user.
pub fn describe_user(user: &SessionUser) -> String {
    let username = user
        .username
        .as_deref()
        .map_or_else(String::new, |name| format!(" (@{name})"));
    format!("{}{username}, {} [{}]", user.full_name, user.role, user.id)
}
