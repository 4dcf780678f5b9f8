//! Session builders for scenarios that act as a logged-in account.

use junket::{Role, Session, SessionUser, UserId};

/// Session for a logged-in account with `role`.
pub fn logged_in(name: &str, role: Role) -> Session {
    Session::authenticated(SessionUser {
        id: UserId::new(format!("id-{}", name.to_ascii_lowercase())),
        full_name: name.to_owned(),
        username: Some(name.to_ascii_lowercase()),
        role,
    })
}
