//! CLI command handlers.
//!
//! This module contains the implementations for each command word:
//! - [`account`]: login, logout, registration and the current user
//! - [`reviews`]: listing, submission, replies, votes and flags
//! - [`moderation`]: the admin console, admin replies and removal
//!
//! Output formatting utilities are in [`output`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use junket::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use junket::{ApiBase, FileSessionStore, JunketConfig, ReviewError};

pub mod account;
pub mod moderation;
pub mod output;
pub mod prompt;
pub mod reviews;

/// Command selected by the positional command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// List a target's reviews.
    #[default]
    List,
    /// Submit a review for a target.
    Submit,
    /// Reply to a review.
    Reply,
    /// Mark a review helpful.
    Helpful,
    /// Flag a review for moderation.
    Flag,
    /// Open the moderation console.
    Moderate,
    /// Reply to a review as an administrator.
    AdminReply,
    /// Remove a review as an administrator.
    Remove,
    /// Log in and persist the session.
    Login,
    /// Forget the persisted session.
    Logout,
    /// Create an account.
    Register,
    /// Show the logged-in user.
    Whoami,
}

impl Command {
    const ALL: [(&'static str, Self); 12] = [
        ("list", Self::List),
        ("submit", Self::Submit),
        ("reply", Self::Reply),
        ("helpful", Self::Helpful),
        ("flag", Self::Flag),
        ("moderate", Self::Moderate),
        ("admin-reply", Self::AdminReply),
        ("remove", Self::Remove),
        ("login", Self::Login),
        ("logout", Self::Logout),
        ("register", Self::Register),
        ("whoami", Self::Whoami),
    ];

    /// Command word as typed on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(_, command)| *command == self)
            .map_or("list", |(word, _)| word)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = ReviewError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let word = value.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .find(|(name, _)| *name == word)
            .map(|(_, command)| *command)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|(name, _)| *name).collect();
                ReviewError::Configuration {
                    message: format!(
                        "unknown command '{value}', expected one of: {}",
                        known.join(", ")
                    ),
                }
            })
    }
}

/// Shared wiring derived from configuration.
pub struct Context {
    /// Storefront API base.
    pub base: ApiBase,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Persisted session.
    pub store: FileSessionStore,
    /// Telemetry destination.
    pub telemetry: Arc<dyn TelemetrySink>,
}

impl Context {
    /// Builds the context from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns configuration errors for invalid URLs, timeouts or session
    /// paths.
    pub fn from_config(config: &JunketConfig) -> Result<Self, ReviewError> {
        config.validate()?;
        let telemetry: Arc<dyn TelemetrySink> = if config.telemetry {
            Arc::new(StderrJsonlTelemetrySink)
        } else {
            Arc::new(NoopTelemetrySink)
        };

        Ok(Self {
            base: config.api_base()?,
            timeout: config.request_timeout()?,
            store: FileSessionStore::new(config.session_path()?),
            telemetry,
        })
    }
}

/// Runs `command` and writes its report to stdout.
///
/// # Errors
///
/// Propagates configuration, session, gateway and output failures.
pub async fn run(command: Command, config: &JunketConfig) -> Result<(), ReviewError> {
    let context = Context::from_config(config)?;
    tracing::debug!("running '{command}' against {}", context.base.as_url());

    match command {
        Command::List => reviews::list(&context, config).await,
        Command::Submit => reviews::submit(&context, config).await,
        Command::Reply => reviews::reply(&context, config).await,
        Command::Helpful => reviews::helpful(&context, config).await,
        Command::Flag => reviews::flag(&context, config).await,
        Command::Moderate => moderation::open(&context, config).await,
        Command::AdminReply => moderation::reply(&context, config).await,
        Command::Remove => moderation::remove(&context, config).await,
        Command::Login => account::login(&context, config).await,
        Command::Logout => account::logout(&context),
        Command::Register => account::register(&context, config).await,
        Command::Whoami => account::whoami(&context),
    }
}
