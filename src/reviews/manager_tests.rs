//! Tests for the review aggregate manager.

use std::collections::VecDeque;
use std::sync::Arc;

use rstest::{fixture, rstest};

use super::ReviewAggregateManager;
use crate::api::attachment::ImageAttachment;
use crate::api::error::ReviewError;
use crate::api::gateway::{MockImageHost, MockReviewGateway};
use crate::api::models::{
    Rating, Review, ReviewId, Role, SortMode, TargetRef, UserId,
};
use crate::reviews::actions::{RemovalOutcome, ReplyOutcome};
use crate::reviews::confirm::MockConfirmation;
use crate::session::{Session, SessionUser};
use crate::telemetry::TelemetryEvent;
use crate::telemetry::test_support::RecordingTelemetrySink;

type Listing = Result<Vec<Review>, ReviewError>;

fn review(id: &str, target: &TargetRef) -> Review {
    Review {
        id: ReviewId::new(id),
        author_id: Some(UserId::new("u-9")),
        author_name: "Traveller".to_owned(),
        target_id: target.id.clone(),
        target_type: target.kind,
        rating: Rating::default(),
        comment: String::new(),
        photos: Vec::new(),
        replies: Vec::new(),
        helpful_count: 0,
        flagged: false,
        removed: false,
        created_at: None,
    }
}

/// Answers successive listing calls from a queue.
fn expect_listings(gateway: &mut MockReviewGateway, responses: Vec<Listing>) {
    let calls = responses.len();
    let mut queue = VecDeque::from(responses);
    gateway
        .expect_list_reviews()
        .times(calls)
        .returning(move |_| queue.pop_front().unwrap_or_else(|| Ok(Vec::new())));
}

fn server_error() -> ReviewError {
    ReviewError::Api {
        message: "list reviews failed with status 500 Internal Server Error: boom".to_owned(),
    }
}

#[fixture]
fn hotel() -> TargetRef {
    TargetRef::hotel("hotel-7")
}

#[fixture]
fn customer() -> Session {
    Session::authenticated(SessionUser {
        id: UserId::new("u-1"),
        full_name: "Ada Lovelace".to_owned(),
        username: Some("ada".to_owned()),
        role: Role::User,
    })
}

#[fixture]
fn admin() -> Session {
    Session::authenticated(SessionUser {
        id: UserId::new("a-1"),
        full_name: "Grace Hopper".to_owned(),
        username: Some("grace".to_owned()),
        role: Role::Admin,
    })
}

#[rstest]
#[tokio::test]
async fn load_passes_sort_through_and_keeps_server_order() {
    let flight = TargetRef::flight("flight-1");
    let returned = vec![review("r-2", &flight), review("r-1", &flight)];
    let mut gateway = MockReviewGateway::new();
    let expected = returned.clone();
    gateway
        .expect_list_reviews()
        .withf(|query| {
            query.target == TargetRef::flight("flight-1") && query.sort == SortMode::Helpful
        })
        .times(1)
        .returning(move |_| Ok(returned.clone()));
    let images = MockImageHost::new();

    let mut manager = ReviewAggregateManager::new(&gateway, &images, TargetRef::hotel("other"));
    let reviews = manager
        .load_reviews(flight.clone(), SortMode::Helpful)
        .await
        .expect("load should succeed");

    assert_eq!(reviews, expected.as_slice());
    assert!(reviews.iter().all(|item| item.target() == flight));
    assert_eq!(manager.target(), &flight);
    assert_eq!(manager.sort(), SortMode::Helpful);
}

#[rstest]
#[tokio::test]
async fn failed_load_keeps_previous_state(hotel: TargetRef) {
    let mut gateway = MockReviewGateway::new();
    expect_listings(
        &mut gateway,
        vec![Ok(vec![review("r-1", &hotel)]), Err(server_error())],
    );
    let images = MockImageHost::new();
    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel.clone());
    manager
        .load_reviews(hotel.clone(), SortMode::Newest)
        .await
        .expect("first load should succeed");

    let error = manager
        .set_sort(SortMode::Rating)
        .await
        .expect_err("second load should fail");

    assert_eq!(error, server_error());
    assert_eq!(manager.sort(), SortMode::Newest);
    assert_eq!(manager.target(), &hotel);
    assert_eq!(manager.reviews().len(), 1);
}

#[rstest]
#[tokio::test]
async fn submit_without_user_makes_no_calls(hotel: TargetRef) {
    let gateway = MockReviewGateway::new();
    let images = MockImageHost::new();
    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    manager
        .draft_mut()
        .images
        .push(ImageAttachment::new("a.png", vec![1]));

    let error = manager
        .submit_review(&Session::anonymous())
        .await
        .expect_err("anonymous submission should fail");

    assert_eq!(error, ReviewError::Unauthenticated);
    assert_eq!(manager.draft().images.len(), 1);
}

#[rstest]
#[tokio::test]
async fn successful_submit_resets_draft_and_reloads(hotel: TargetRef, customer: Session) {
    let mut images = MockImageHost::new();
    images
        .expect_upload()
        .times(2)
        .returning(|image| Ok(format!("https://img.example/{}", image.file_name())));

    let mut created = review("r-new", &hotel);
    created.photos = vec![
        "https://img.example/a.png".to_owned(),
        "https://img.example/b.png".to_owned(),
    ];
    let mut gateway = MockReviewGateway::new();
    gateway
        .expect_create_review()
        .withf(|body| {
            body.user_id == UserId::new("u-1")
                && body.user_name == "Ada Lovelace"
                && body.rating.get() == 4
                && body.comment == "Lovely pool"
                && body.photos
                    == ["https://img.example/a.png", "https://img.example/b.png"]
        })
        .times(1)
        .returning(|_| Ok(()));
    expect_listings(&mut gateway, vec![Ok(vec![created])]);

    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    let draft = manager.draft_mut();
    draft.set_rating(4).expect("4 is a valid rating");
    draft.comment = "Lovely pool".to_owned();
    draft.images = vec![
        ImageAttachment::new("a.png", vec![1]),
        ImageAttachment::new("b.png", vec![2]),
    ];

    manager
        .submit_review(&customer)
        .await
        .expect("submission should succeed");

    assert_eq!(manager.draft().rating.get(), 5);
    assert!(manager.draft().comment.is_empty());
    assert!(manager.draft().images.is_empty());
    let photos = &manager
        .reviews()
        .first()
        .expect("reloaded listing should hold the review")
        .photos;
    assert_eq!(
        photos,
        &["https://img.example/a.png", "https://img.example/b.png"]
    );
}

#[rstest]
#[tokio::test]
async fn failed_upload_prevents_create_and_keeps_draft(hotel: TargetRef, customer: Session) {
    let mut images = MockImageHost::new();
    images.expect_upload().times(1).returning(|_| {
        Err(ReviewError::Network {
            message: "connection reset".to_owned(),
        })
    });
    let mut gateway = MockReviewGateway::new();
    gateway.expect_create_review().never();
    gateway.expect_list_reviews().never();
    let sink = Arc::new(RecordingTelemetrySink::default());

    let mut manager =
        ReviewAggregateManager::new(&gateway, &images, hotel).with_telemetry(sink.clone());
    manager.draft_mut().comment = "Great stay".to_owned();
    manager.draft_mut().images = vec![
        ImageAttachment::new("a.png", vec![1]),
        ImageAttachment::new("b.png", vec![2]),
    ];

    let error = manager
        .submit_review(&customer)
        .await
        .expect_err("upload failure should abort");

    assert!(
        matches!(
            error,
            ReviewError::PartialUploadFailure {
                uploaded: 0,
                total: 2,
                ..
            }
        ),
        "expected PartialUploadFailure, got {error:?}"
    );
    assert_eq!(manager.draft().comment, "Great stay");
    assert_eq!(manager.draft().images.len(), 2);
    assert_eq!(
        sink.take(),
        vec![TelemetryEvent::ImageUploadFailed {
            uploaded: 0,
            total: 2
        }]
    );
}

#[rstest]
#[tokio::test]
async fn rejected_create_keeps_draft(hotel: TargetRef, customer: Session) {
    let images = MockImageHost::new();
    let mut gateway = MockReviewGateway::new();
    gateway.expect_create_review().times(1).returning(|_| {
        Err(ReviewError::ValidationRejected {
            message: "create review failed: comment required".to_owned(),
        })
    });
    gateway.expect_list_reviews().never();

    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    manager
        .draft_mut()
        .set_rating(1)
        .expect("1 is a valid rating");

    let result = manager.submit_review(&customer).await;

    assert!(
        matches!(result, Err(ReviewError::ValidationRejected { .. })),
        "expected ValidationRejected, got {result:?}"
    );
    assert_eq!(manager.draft().rating.get(), 1);
}

#[rstest]
#[case::anonymous(Session::anonymous(), "hello")]
#[case::blank_anonymous(Session::anonymous(), "   ")]
#[case::blank_customer(customer(), "")]
#[case::whitespace_customer(customer(), " \t ")]
#[tokio::test]
async fn blank_or_anonymous_reply_is_skipped(
    hotel: TargetRef,
    #[case] session: Session,
    #[case] message: &str,
) {
    let gateway = MockReviewGateway::new();
    let images = MockImageHost::new();
    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    let id = ReviewId::new("r-1");
    manager.reply_drafts_mut().set(id.clone(), message);

    let outcome = manager
        .submit_reply(&session, &id)
        .await
        .expect("skipped reply is not an error");

    assert_eq!(outcome, ReplyOutcome::Skipped);
}

#[rstest]
#[case::customer(customer(), Role::User)]
#[case::admin(admin(), Role::Admin)]
#[tokio::test]
async fn reply_role_comes_from_session(
    hotel: TargetRef,
    #[case] session: Session,
    #[case] expected_role: Role,
) {
    let mut gateway = MockReviewGateway::new();
    gateway
        .expect_reply()
        .withf(move |id, body| {
            id.as_str() == "r-1" && body.role == expected_role && body.message == "Thanks!"
        })
        .times(1)
        .returning(|_, _| Ok(()));
    expect_listings(&mut gateway, vec![Ok(Vec::new())]);
    let images = MockImageHost::new();

    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    let id = ReviewId::new("r-1");
    manager.reply_drafts_mut().set(id.clone(), "  Thanks!  ");

    let outcome = manager
        .submit_reply(&session, &id)
        .await
        .expect("reply should succeed");

    assert_eq!(outcome, ReplyOutcome::Posted);
    assert_eq!(manager.reply_drafts().get(&id), "");
}

#[rstest]
#[tokio::test]
async fn failed_reply_keeps_draft(hotel: TargetRef, customer: Session) {
    let mut gateway = MockReviewGateway::new();
    gateway.expect_reply().times(1).returning(|_, _| {
        Err(ReviewError::Network {
            message: "reply to review failed".to_owned(),
        })
    });
    gateway.expect_list_reviews().never();
    let images = MockImageHost::new();

    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    let id = ReviewId::new("r-1");
    manager.reply_drafts_mut().set(id.clone(), "Thanks!");

    let result = manager.submit_reply(&customer, &id).await;

    assert!(result.is_err());
    assert_eq!(manager.reply_drafts().get(&id), "Thanks!");
}

#[rstest]
#[tokio::test]
async fn reply_as_admin_requires_admin(hotel: TargetRef, customer: Session) {
    let gateway = MockReviewGateway::new();
    let images = MockImageHost::new();
    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    let id = ReviewId::new("r-1");
    manager.reply_drafts_mut().set(id.clone(), "Official answer");

    let error = manager
        .reply_as_admin(&customer, &id)
        .await
        .expect_err("customer cannot reply as admin");

    assert_eq!(error, ReviewError::AdminRequired);
}

#[rstest]
#[tokio::test]
async fn helpful_vote_is_visible_only_after_reload(hotel: TargetRef) {
    let mut voted = review("r-1", &hotel);
    voted.helpful_count = 1;
    let mut gateway = MockReviewGateway::new();
    expect_listings(
        &mut gateway,
        vec![Ok(vec![review("r-1", &hotel)]), Ok(vec![voted])],
    );
    gateway
        .expect_mark_helpful()
        .withf(|id| id.as_str() == "r-1")
        .times(1)
        .returning(|_| Ok(()));
    let images = MockImageHost::new();

    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    manager.reload().await.expect("initial load should succeed");
    manager
        .mark_helpful(&ReviewId::new("r-1"))
        .await
        .expect("vote should succeed");

    let held = manager
        .review(&ReviewId::new("r-1"))
        .expect("review should be held");
    assert_eq!(held.helpful_count, 1);
}

#[rstest]
#[tokio::test]
async fn helpful_vote_does_not_touch_listing_when_reload_fails(hotel: TargetRef) {
    let mut gateway = MockReviewGateway::new();
    expect_listings(
        &mut gateway,
        vec![Ok(vec![review("r-1", &hotel)]), Err(server_error())],
    );
    gateway.expect_mark_helpful().times(1).returning(|_| Ok(()));
    let images = MockImageHost::new();

    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    manager.reload().await.expect("initial load should succeed");
    let result = manager.mark_helpful(&ReviewId::new("r-1")).await;

    assert!(result.is_err());
    let held = manager
        .review(&ReviewId::new("r-1"))
        .expect("review should be held");
    assert_eq!(held.helpful_count, 0);
}

#[rstest]
#[tokio::test]
async fn flag_neither_mutates_nor_reloads(hotel: TargetRef) {
    let mut gateway = MockReviewGateway::new();
    expect_listings(&mut gateway, vec![Ok(vec![review("r-1", &hotel)])]);
    gateway
        .expect_flag()
        .withf(|id| id.as_str() == "r-1")
        .times(1)
        .returning(|_| Ok(()));
    let images = MockImageHost::new();
    let sink = Arc::new(RecordingTelemetrySink::default());

    let mut manager =
        ReviewAggregateManager::new(&gateway, &images, hotel).with_telemetry(sink.clone());
    manager.reload().await.expect("initial load should succeed");
    let before = manager.reviews().to_vec();
    manager
        .flag_review(&ReviewId::new("r-1"))
        .await
        .expect("flag should succeed");

    assert_eq!(manager.reviews(), before.as_slice());
    assert!(sink.events().contains(&TelemetryEvent::ReviewFlagged {
        review_id: "r-1".to_owned()
    }));
}

#[rstest]
#[tokio::test]
async fn declined_removal_sends_nothing(hotel: TargetRef, admin: Session) {
    let mut gateway = MockReviewGateway::new();
    gateway.expect_remove().never();
    gateway.expect_list_reviews().never();
    let images = MockImageHost::new();
    let mut confirmation = MockConfirmation::new();
    confirmation
        .expect_confirm()
        .withf(|prompt| prompt.contains("r-1"))
        .times(1)
        .return_const(false);

    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    let outcome = manager
        .remove_review(&admin, &ReviewId::new("r-1"), &confirmation)
        .await
        .expect("declined removal is not an error");

    assert_eq!(outcome, RemovalOutcome::Cancelled);
}

#[rstest]
#[tokio::test]
async fn customer_cannot_remove(hotel: TargetRef, customer: Session) {
    let gateway = MockReviewGateway::new();
    let images = MockImageHost::new();
    let mut confirmation = MockConfirmation::new();
    confirmation.expect_confirm().never();

    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    let error = manager
        .remove_review(&customer, &ReviewId::new("r-1"), &confirmation)
        .await
        .expect_err("customer cannot remove");

    assert_eq!(error, ReviewError::AdminRequired);
}

#[rstest]
#[tokio::test]
async fn confirmed_removal_reloads(hotel: TargetRef, admin: Session) {
    let mut gateway = MockReviewGateway::new();
    gateway
        .expect_remove()
        .withf(|id| id.as_str() == "r-1")
        .times(1)
        .returning(|_| Ok(()));
    expect_listings(&mut gateway, vec![Ok(vec![review("r-2", &hotel)])]);
    let images = MockImageHost::new();
    let mut confirmation = MockConfirmation::new();
    confirmation.expect_confirm().times(1).return_const(true);

    let mut manager = ReviewAggregateManager::new(&gateway, &images, hotel);
    let outcome = manager
        .remove_review(&admin, &ReviewId::new("r-1"), &confirmation)
        .await
        .expect("removal should succeed");

    assert_eq!(outcome, RemovalOutcome::Removed);
    assert!(manager.review(&ReviewId::new("r-1")).is_none());
}

#[rstest]
#[tokio::test]
async fn load_records_telemetry(hotel: TargetRef) {
    let mut gateway = MockReviewGateway::new();
    expect_listings(&mut gateway, vec![Ok(vec![review("r-1", &hotel)])]);
    let images = MockImageHost::new();
    let sink = Arc::new(RecordingTelemetrySink::default());

    let mut manager =
        ReviewAggregateManager::new(&gateway, &images, hotel).with_telemetry(sink.clone());
    manager.reload().await.expect("load should succeed");

    let events = sink.take();
    assert!(
        matches!(
            events.as_slice(),
            [TelemetryEvent::ReviewsLoaded { source, count: 1, .. }] if source == "HOTEL hotel-7"
        ),
        "unexpected events: {events:?}"
    );
}
