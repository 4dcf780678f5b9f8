//! Login, logout, registration and the current user.

use junket::{
    AuthGateway, Credentials, HttpAuthGateway, JunketConfig, Registration, ReviewError,
    SessionStore,
};

use super::Context;
use super::output::{describe_user, write_status};

/// Logs in and persists the returned user record.
///
/// # Errors
///
/// Returns configuration errors for missing credentials, auth failures and
/// session store errors.
pub async fn login(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let (username, password) = config.require_credentials()?;
    let gateway = HttpAuthGateway::new(context.base.clone(), context.timeout)?;

    let user = gateway
        .login(&Credentials::new(username, password))
        .await?;
    context.store.save(&user)?;

    write_status(&format!("Logged in as {}", describe_user(&user)))
}

/// Invalidates the persisted session and clears the store.
///
/// # Errors
///
/// Returns session store errors.
pub fn logout(context: &Context) -> Result<(), ReviewError> {
    let mut session = context.store.load()?;
    let message = session.user().map_or_else(
        || "No session to clear.".to_owned(),
        |user| format!("Logged out {}.", describe_user(user)),
    );

    session.invalidate();
    context.store.clear()?;
    write_status(&message)
}

/// Creates an account; log in separately afterwards.
///
/// # Errors
///
/// Returns configuration errors for missing fields and gateway errors.
pub async fn register(context: &Context, config: &JunketConfig) -> Result<(), ReviewError> {
    let (username, password) = config.require_credentials()?;
    let missing = |field: &str, flag: &str| ReviewError::Configuration {
        message: format!("{field} is required to register (use {flag})"),
    };
    let registration = Registration {
        full_name: config
            .full_name
            .clone()
            .ok_or_else(|| missing("full name", "--full-name"))?,
        email: config
            .email
            .clone()
            .ok_or_else(|| missing("email", "--email"))?,
        username: username.to_owned(),
        password: password.to_owned(),
        role: config.role()?,
    };

    let gateway = HttpAuthGateway::new(context.base.clone(), context.timeout)?;
    gateway.register(&registration).await?;
    write_status(&format!(
        "Registered {} as {}; log in to continue.",
        registration.username, registration.role
    ))
}

/// Shows the logged-in user, if any.
///
/// # Errors
///
/// Returns session store errors.
pub fn whoami(context: &Context) -> Result<(), ReviewError> {
    let session = context.store.load()?;
    let message = session
        .user()
        .map_or_else(|| "Not logged in.".to_owned(), describe_user);
    write_status(&message)
}
