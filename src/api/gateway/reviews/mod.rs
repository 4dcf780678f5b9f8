//! reqwest-backed gateway for the review endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::api::endpoints::ApiBase;
use crate::api::error::ReviewError;
use crate::api::models::{NewReply, NewReview, Review, ReviewId, ReviewQuery, TargetId};

use super::ReviewGateway;
use super::client::build_http_client;
use super::http_utils::{decode, send};

/// Gateway for the review contract of the storefront API.
#[derive(Debug, Clone)]
pub struct HttpReviewGateway {
    client: Client,
    base: ApiBase,
}

impl HttpReviewGateway {
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

    /// Returns the API base this gateway talks to.
    #[must_use]
    pub const fn base(&self) -> &ApiBase {
        &self.base
    }

    async fn fetch_listing(
        &self,
        operation: &str,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Vec<Review>, ReviewError> {
        tracing::debug!("{operation}: GET {url}");
        let response = send(operation, self.client.get(url).query(query)).await?;
        decode(operation, response).await
    }

    async fn post_action(&self, operation: &str, url: Url) -> Result<(), ReviewError> {
        tracing::debug!("{operation}: POST {url}");
        send(operation, self.client.post(url)).await.map(drop)
    }
}

#[async_trait]
impl ReviewGateway for HttpReviewGateway {
    async fn list_reviews(&self, query: &ReviewQuery) -> Result<Vec<Review>, ReviewError> {
        let url = self.base.reviews()?;
        let params = [
            ("targetId", query.target.id.as_str()),
            ("targetType", query.target.kind.as_str()),
            ("sort", query.sort.as_str()),
        ];
        self.fetch_listing("list reviews", url, &params).await
    }

    async fn list_flagged_reviews(&self) -> Result<Vec<Review>, ReviewError> {
        let url = self.base.admin_flagged_reviews()?;
        self.fetch_listing("list flagged reviews", url, &[]).await
    }

    async fn list_hotel_reviews_for_admin(
        &self,
        hotel: &TargetId,
    ) -> Result<Vec<Review>, ReviewError> {
        let url = self.base.admin_hotel_reviews(hotel)?;
        self.fetch_listing("list hotel reviews", url, &[]).await
    }

    async fn create_review(&self, review: &NewReview) -> Result<(), ReviewError> {
        let url = self.base.reviews()?;
        tracing::debug!("create review: POST {url}");
        send("create review", self.client.post(url).json(review))
            .await
            .map(drop)
    }

    async fn reply(&self, review: &ReviewId, reply: &NewReply) -> Result<(), ReviewError> {
        let url = self.base.review_reply(review)?;
        tracing::debug!("reply to review: POST {url}");
        send("reply to review", self.client.post(url).json(reply))
            .await
            .map(drop)
    }

    async fn mark_helpful(&self, review: &ReviewId) -> Result<(), ReviewError> {
        let url = self.base.review_helpful(review)?;
        self.post_action("mark review helpful", url).await
    }

    async fn flag(&self, review: &ReviewId) -> Result<(), ReviewError> {
        let url = self.base.review_flag(review)?;
        self.post_action("flag review", url).await
    }

    async fn remove(&self, review: &ReviewId) -> Result<(), ReviewError> {
        let url = self.base.admin_review_remove(review)?;
        self.post_action("remove review", url).await
    }
}
