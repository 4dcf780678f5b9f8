//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.junket.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `JUNKET_API_BASE_URL`, `JUNKET_SORT`, ...
//! 4. **Command-line arguments** – `--api-base-url`, `--sort`, ...
//!
//! # Configuration File
//!
//! Place `.junket.toml` in the current directory, home directory, or
//! XDG config directory with:
//!
//! ```toml
//! api_base_url = "https://storefront.example/api"
//! image_upload_url = "https://api.cloudinary.com/v1_1/demo/image/upload"
//! upload_preset = "review_photos"
//! request_timeout_secs = 20
//! target_type = "HOTEL"
//! sort = "helpful"
//! ```

use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::api::endpoints::{ApiBase, DEFAULT_API_BASE};
use crate::api::error::ReviewError;
use crate::api::gateway::{DEFAULT_TIMEOUT_SECS, DEFAULT_UPLOAD_PRESET};
use crate::api::models::{Rating, ReviewId, Role, SortMode, TargetRef, TargetType};
use crate::session::default_session_path;

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// Every string and numeric field can be set through a `JUNKET_` prefixed
/// variable, e.g. `JUNKET_API_BASE_URL` or `JUNKET_REQUEST_TIMEOUT_SECS`.
/// Boolean flags are only read from the CLI and configuration files.
///
/// # Example
///
/// ```no_run
/// use junket::JunketConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = JunketConfig::load().expect("failed to load configuration");
/// let target = config.require_target().expect("target required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "JUNKET",
    discovery(
        dotfile_name = ".junket.toml",
        config_file_name = "junket.toml",
        app_name = "junket"
    )
)]
pub struct JunketConfig {
    /// Base URL of the storefront REST API.
    ///
    /// Defaults to `http://localhost:8080/api`.
    #[ortho_config(cli_short = 'a')]
    pub api_base_url: Option<String>,

    /// Unsigned upload endpoint of the image host.
    #[ortho_config()]
    pub image_upload_url: Option<String>,

    /// Upload preset sent with every photo. Defaults to `review_photos`.
    #[ortho_config()]
    pub upload_preset: Option<String>,

    /// Per-request timeout, in seconds. Defaults to 20.
    #[ortho_config()]
    pub request_timeout_secs: u64,

    /// Location of the persisted session file.
    #[ortho_config()]
    pub session_path: Option<String>,

    /// Hotel or flight whose reviews are addressed.
    #[ortho_config()]
    pub target_id: Option<String>,

    /// `HOTEL` or `FLIGHT`. Defaults to `HOTEL`.
    #[ortho_config(cli_short = 'k')]
    pub target_type: Option<String>,

    /// Listing order: `newest`, `helpful` or `rating`.
    #[ortho_config()]
    pub sort: Option<String>,

    /// Review acted on by reply, helpful, flag and remove.
    #[ortho_config()]
    pub review_id: Option<String>,

    /// Star rating for a new review, 1 to 5.
    #[ortho_config()]
    pub rating: Option<String>,

    /// Text of a new review.
    #[ortho_config(cli_short = 'c')]
    pub comment: Option<String>,

    /// Comma-separated image paths attached to a new review.
    #[ortho_config()]
    pub images: Option<String>,

    /// Reply text.
    #[ortho_config(cli_short = 'm')]
    pub message: Option<String>,

    /// Login name.
    #[ortho_config()]
    pub username: Option<String>,

    /// Password for login or registration.
    #[ortho_config()]
    pub password: Option<String>,

    /// Display name for registration.
    #[ortho_config()]
    pub full_name: Option<String>,

    /// Contact email for registration.
    #[ortho_config()]
    pub email: Option<String>,

    /// Role requested at registration. Defaults to `USER`.
    #[ortho_config()]
    pub role: Option<String>,

    /// Moderation scope: `flagged` (default), `hotel` or `flight`.
    #[ortho_config()]
    pub scope: Option<String>,

    /// Skips the removal confirmation prompt.
    ///
    /// Not read from the environment because `ortho_config` does not load
    /// boolean values from it.
    #[ortho_config(cli_short = 'y')]
    pub yes: bool,

    /// Writes telemetry events to stderr as JSON lines.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for JunketConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            image_upload_url: None,
            upload_preset: None,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            session_path: None,
            target_id: None,
            target_type: None,
            sort: None,
            review_id: None,
            rating: None,
            comment: None,
            images: None,
            message: None,
            username: None,
            password: None,
            full_name: None,
            email: None,
            role: None,
            scope: None,
            yes: false,
            telemetry: false,
        }
    }
}

impl JunketConfig {
    /// Parses the configured API base, falling back to the local default.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidUrl`] when the URL is malformed.
    pub fn api_base(&self) -> Result<ApiBase, ReviewError> {
        ApiBase::parse(self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE))
    }

    /// Request timeout as a duration.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] when the timeout is zero.
    pub fn request_timeout(&self) -> Result<Duration, ReviewError> {
        if self.request_timeout_secs == 0 {
            return Err(ReviewError::Configuration {
                message: "request timeout must be at least one second".to_owned(),
            });
        }
        Ok(Duration::from_secs(self.request_timeout_secs))
    }

    /// Upload preset, defaulting to `review_photos`.
    #[must_use]
    pub fn upload_preset(&self) -> &str {
        self.upload_preset.as_deref().unwrap_or(DEFAULT_UPLOAD_PRESET)
    }

    /// Returns the image host endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] when no endpoint is configured.
    pub fn require_image_upload_url(&self) -> Result<&str, ReviewError> {
        self.image_upload_url
            .as_deref()
            .ok_or_else(|| ReviewError::Configuration {
                message: "image upload URL is required to attach photos (use --image-upload-url)"
                    .to_owned(),
            })
    }

    /// Session file location, defaulting to the XDG state directory.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] when no path is configured and
    /// no default can be resolved.
    pub fn session_path(&self) -> Result<Utf8PathBuf, ReviewError> {
        self.session_path
            .as_deref()
            .map_or_else(default_session_path, |path| Ok(Utf8PathBuf::from(path)))
    }

    /// Target kind, defaulting to hotels.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] for unknown kinds.
    pub fn target_type(&self) -> Result<TargetType, ReviewError> {
        self.target_type
            .as_deref()
            .map_or(Ok(TargetType::Hotel), str::parse)
    }

    /// Returns the addressed target.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] when the target id is missing
    /// or the kind is unknown.
    pub fn require_target(&self) -> Result<TargetRef, ReviewError> {
        let id = self
            .target_id
            .as_deref()
            .ok_or_else(|| ReviewError::Configuration {
                message: "target id is required (use --target-id)".to_owned(),
            })?;
        Ok(TargetRef::new(id, self.target_type()?))
    }

    /// Listing order, defaulting to newest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] for unknown modes.
    pub fn sort_mode(&self) -> Result<SortMode, ReviewError> {
        self.sort
            .as_deref()
            .map_or_else(|| Ok(SortMode::default()), str::parse)
    }

    /// Returns the review acted on.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] when no review id is given.
    pub fn require_review_id(&self) -> Result<ReviewId, ReviewError> {
        self.review_id
            .as_deref()
            .map(ReviewId::from)
            .ok_or_else(|| ReviewError::Configuration {
                message: "review id is required (use --review-id)".to_owned(),
            })
    }

    /// Star rating for a new review, defaulting to 5.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] when the value is not a number
    /// and [`ReviewError::InvalidRating`] when it is outside 1–5.
    pub fn rating(&self) -> Result<Rating, ReviewError> {
        let Some(raw) = self.rating.as_deref() else {
            return Ok(Rating::default());
        };
        let value: u8 = raw.trim().parse().map_err(|_| ReviewError::Configuration {
            message: format!("rating must be a whole number between 1 and 5, got '{raw}'"),
        })?;
        Rating::new(value)
    }

    /// Image paths split from the comma-separated list, in order.
    #[must_use]
    pub fn image_paths(&self) -> Vec<Utf8PathBuf> {
        self.images
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|path| !path.is_empty())
                    .map(Utf8PathBuf::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the login name and password.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] when either is missing.
    pub fn require_credentials(&self) -> Result<(&str, &str), ReviewError> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok((username.as_str(), password.as_str())),
            (None, _) => Err(ReviewError::Configuration {
                message: "username is required (use --username)".to_owned(),
            }),
            (_, None) => Err(ReviewError::Configuration {
                message: "password is required (use --password)".to_owned(),
            }),
        }
    }

    /// Role requested at registration, defaulting to `USER`.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Configuration`] for unknown roles.
    pub fn role(&self) -> Result<Role, ReviewError> {
        self.role.as_deref().map_or(Ok(Role::User), str::parse)
    }

    /// Checks that the configured values are usable before any request.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ReviewError> {
        self.api_base()?;
        self.request_timeout()?;
        self.target_type()?;
        self.sort_mode()?;
        self.rating()?;
        self.role()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
