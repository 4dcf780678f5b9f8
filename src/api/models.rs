//! Data models representing reviews, replies, and their targets.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ReviewError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps an identifier value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the identifier value.
            #[must_use]
            pub const fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Server-assigned review identifier.
    ReviewId
);
string_id!(
    /// Identifier of the hotel or flight a review belongs to.
    TargetId
);
string_id!(
    /// Identifier of a storefront user account.
    UserId
);

/// Star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating, also the draft default.
    pub const MAX: u8 = 5;

    /// Validates that the rating lies within 1–5.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::InvalidRating`] for values outside the range.
    pub const fn new(value: u8) -> Result<Self, ReviewError> {
        if value < Self::MIN || value > Self::MAX {
            return Err(ReviewError::InvalidRating(value));
        }
        Ok(Self(value))
    }

    /// Returns the numeric rating.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for Rating {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Kind of entity a review is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    /// A hotel listing.
    Hotel,
    /// A flight listing.
    Flight,
}

impl TargetType {
    /// Wire spelling used in query strings and request bodies.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hotel => "HOTEL",
            Self::Flight => "FLIGHT",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = ReviewError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "HOTEL" => Ok(Self::Hotel),
            "FLIGHT" => Ok(Self::Flight),
            other => Err(ReviewError::Configuration {
                message: format!("target type must be HOTEL or FLIGHT, got '{other}'"),
            }),
        }
    }
}

/// Server-side ordering applied to a review listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most recent first.
    #[default]
    Newest,
    /// Highest helpful count first.
    Helpful,
    /// Highest rating first.
    Rating,
}

impl SortMode {
    /// Wire spelling passed through as the `sort` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Helpful => "helpful",
            Self::Rating => "rating",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = ReviewError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "helpful" => Ok(Self::Helpful),
            "rating" => Ok(Self::Rating),
            other => Err(ReviewError::Configuration {
                message: format!("sort must be newest, helpful, or rating, got '{other}'"),
            }),
        }
    }
}

/// Role attached to a user account and to the replies it writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular customer.
    User,
    /// Storefront administrator.
    Admin,
}

impl Role {
    /// Wire spelling of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ReviewError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(ReviewError::Configuration {
                message: format!("role must be USER or ADMIN, got '{other}'"),
            }),
        }
    }
}

/// The hotel or flight a review set belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetRef {
    /// Target identifier.
    pub id: TargetId,
    /// Whether the target is a hotel or a flight.
    pub kind: TargetType,
}

impl TargetRef {
    /// Creates a target reference.
    #[must_use]
    pub fn new(id: impl Into<TargetId>, kind: TargetType) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Shorthand for a hotel target.
    #[must_use]
    pub fn hotel(id: &str) -> Self {
        Self::new(TargetId::new(id), TargetType::Hotel)
    }

    /// Shorthand for a flight target.
    #[must_use]
    pub fn flight(id: &str) -> Self {
        Self::new(TargetId::new(id), TargetType::Flight)
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} {}", self.kind, self.id)
    }
}

/// Query for a single target's review listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    /// Target whose reviews are listed.
    pub target: TargetRef,
    /// Ordering requested from the server.
    pub sort: SortMode,
}

/// Lifecycle state of a review as observed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    /// Visible and unflagged.
    Active,
    /// Flagged for moderation.
    Flagged,
    /// Removed by an administrator (terminal).
    Removed,
}

/// A reply attached to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    /// Author account, absent on some admin replies.
    #[serde(rename = "userId", default)]
    pub author_id: Option<UserId>,
    /// Display name of the author.
    #[serde(rename = "userName")]
    pub author_name: String,
    /// Role the author replied as.
    pub role: Role,
    /// Reply text.
    pub message: String,
    /// When the reply was written.
    #[serde(default, with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Reply {
    /// Returns true when the reply was written by an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A review snapshot returned by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Review identifier.
    pub id: ReviewId,
    /// Author account.
    #[serde(rename = "userId", default)]
    pub author_id: Option<UserId>,
    /// Display name of the author.
    #[serde(rename = "userName")]
    pub author_name: String,
    /// Reviewed hotel or flight.
    pub target_id: TargetId,
    /// Kind of reviewed target.
    pub target_type: TargetType,
    /// Star rating.
    pub rating: Rating,
    /// Review text.
    #[serde(default)]
    pub comment: String,
    /// Hosted photo URLs in upload order.
    #[serde(default)]
    pub photos: Vec<String>,
    /// Replies in append order.
    #[serde(default)]
    pub replies: Vec<Reply>,
    /// Number of helpful votes.
    #[serde(default)]
    pub helpful_count: u64,
    /// Whether the review has been flagged.
    #[serde(default)]
    pub flagged: bool,
    /// Whether the review has been removed.
    #[serde(default)]
    pub removed: bool,
    /// When the review was created.
    #[serde(default, with = "timestamp::optional")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Derives the lifecycle state from the server flags.
    #[must_use]
    pub const fn state(&self) -> ReviewState {
        if self.removed {
            ReviewState::Removed
        } else if self.flagged {
            ReviewState::Flagged
        } else {
            ReviewState::Active
        }
    }

    /// Returns true when a flag action should still be offered.
    #[must_use]
    pub const fn can_flag(&self) -> bool {
        matches!(self.state(), ReviewState::Active)
    }

    /// Returns the target this review belongs to.
    #[must_use]
    pub fn target(&self) -> TargetRef {
        TargetRef::new(self.target_id.clone(), self.target_type)
    }
}

/// Request body for creating a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    /// Acting user.
    pub user_id: UserId,
    /// Acting user's display name.
    pub user_name: String,
    /// Reviewed target.
    pub target_id: TargetId,
    /// Kind of reviewed target.
    pub target_type: TargetType,
    /// Star rating.
    pub rating: Rating,
    /// Review text.
    pub comment: String,
    /// Hosted photo URLs in draft order.
    pub photos: Vec<String>,
}

/// Request body for appending a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReply {
    /// Acting user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Acting user's display name.
    pub user_name: String,
    /// Role taken from the acting session.
    pub role: Role,
    /// Reply text.
    pub message: String,
}

pub(crate) mod timestamp {
    //! Lenient timestamp decoding for API payloads.
    //!
    //! The backend emits RFC 3339 values as well as zone-less local date
    //! times; the latter are read as UTC.

    use chrono::{DateTime, NaiveDateTime, Utc};

    pub(crate) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub(crate) mod optional {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub(crate) fn serialize<S>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(timestamp) => serializer.serialize_some(&timestamp.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw: Option<String> = Option::deserialize(deserializer)?;
            raw.map_or(Ok(None), |value| {
                super::parse(&value)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{value}'")))
            })
        }
    }
}
