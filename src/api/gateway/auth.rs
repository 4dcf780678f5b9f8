//! Auth gateway for storefront login and registration.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::api::endpoints::ApiBase;
use crate::api::error::ReviewError;
use crate::api::models::Role;
use crate::session::SessionUser;

use super::AuthGateway;
use super::client::build_http_client;
use super::http_utils::{decode, send};

/// Username and password submitted at login.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates login credentials.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Account details submitted at registration.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Login name.
    pub username: String,
    /// Password.
    pub password: String,
    /// Requested role.
    pub role: Role,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Registration")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// reqwest-backed auth gateway.
#[derive(Debug, Clone)]
pub struct HttpAuthGateway {
    client: Client,
    base: ApiBase,
}

impl HttpAuthGateway {
    /// Creates a gateway with its own client and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base: ApiBase, timeout: Duration) -> Result<Self, ReviewError> {
        let client = build_http_client(timeout)?;
        Ok(Self::with_client(client, base))
    }

    /// Creates a gateway that shares an existing client.
    #[must_use]
    pub const fn with_client(client: Client, base: ApiBase) -> Self {
        Self { client, base }
    }
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    async fn login(&self, credentials: &Credentials) -> Result<SessionUser, ReviewError> {
        let operation = "log in";
        let url = self.base.login()?;
        tracing::debug!("{operation}: POST {url} as {}", credentials.username());

        let response = send(operation, self.client.post(url).json(credentials)).await?;
        decode(operation, response).await
    }

    async fn register(&self, registration: &Registration) -> Result<(), ReviewError> {
        let operation = "register";
        let url = self.base.register()?;
        tracing::debug!("{operation}: POST {url} for {}", registration.username);

        send(operation, self.client.post(url).json(registration))
            .await
            .map(drop)
    }
}
