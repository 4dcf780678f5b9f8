//! Shared test utilities.

use junket::ApiBase;
use serde_json::{Value, json};
use wiremock::MockServer;

pub mod runtime;

/// API base rooted at `/api` on the mock server.
///
/// # Panics
///
/// Panics if the mock server URI is not a valid base URL.
pub fn api_base_for(server: &MockServer) -> ApiBase {
    ApiBase::parse(&format!("{}/api", server.uri()))
        .unwrap_or_else(|error| panic!("mock server base should parse: {error}"))
}

/// Wire representation of a review as the storefront API returns it.
pub fn review_json(id: &str, target_id: &str, target_type: &str, helpful: u64) -> Value {
    json!({
        "id": id,
        "userId": "u-1",
        "userName": "Ada",
        "targetId": target_id,
        "targetType": target_type,
        "rating": 4,
        "comment": format!("review {id}"),
        "photos": [],
        "replies": [],
        "helpfulCount": helpful,
        "flagged": false,
        "removed": false,
        "createdAt": "2025-03-01T10:00:00Z"
    })
}
