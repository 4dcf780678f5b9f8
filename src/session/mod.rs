//! Explicit session context for the acting storefront user.
//!
//! Review operations never read ambient storage. Callers pass a [`Session`]
//! into every action that needs the acting user's identity or role, and a
//! logout invalidates the context rather than mutating shared state.

mod store;

pub use store::{FileSessionStore, SessionStore, default_session_path};

use serde::{Deserialize, Serialize};

use crate::api::error::ReviewError;
use crate::api::models::{Role, UserId};

/// User record issued by the auth service at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Account identifier.
    pub id: UserId,
    /// Display name used on reviews and replies.
    pub full_name: String,
    /// Login name, when the auth service returns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Role claim.
    pub role: Role,
}

impl SessionUser {
    /// Returns true when the user holds the ADMIN role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// The acting user, if anyone is logged in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    /// A session with nobody logged in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }

    /// A session for a logged-in user.
    #[must_use]
    pub const fn authenticated(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Returns true when a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Returns the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Unauthenticated`] when nobody is logged in.
    pub fn require_user(&self) -> Result<&SessionUser, ReviewError> {
        self.user.as_ref().ok_or(ReviewError::Unauthenticated)
    }

    /// Returns the logged-in administrator.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::Unauthenticated`] when nobody is logged in and
    /// [`ReviewError::AdminRequired`] when the user is not an admin.
    pub fn require_admin(&self) -> Result<&SessionUser, ReviewError> {
        let user = self.require_user()?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(ReviewError::AdminRequired)
        }
    }

    /// Logs the user out of this context.
    pub fn invalidate(&mut self) {
        self.user = None;
    }
}
