//! Behavioural tests for submitting reviews with photos.

mod support;
#[path = "support/sessions.rs"]
mod sessions;

use std::time::Duration;

use junket::{
    HttpImageHost, HttpReviewGateway, ImageAttachment, ReviewAggregateManager, ReviewDraft,
    ReviewError, Role, Session, TargetRef,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};
use sessions::logged_in;
use support::runtime::{SharedRuntime, count_requests, mount_all};
use support::{api_base_for, review_json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REVIEWS_PATH: &str = "/api/reviews";
const UPLOAD_PATH: &str = "/upload";

#[derive(ScenarioState, Default)]
struct SubmissionState {
    runtime: Slot<SharedRuntime>,
    server: Slot<MockServer>,
    session: Slot<Session>,
    draft: Slot<ReviewDraft>,
    result: Slot<Result<(), ReviewError>>,
}

#[fixture]
fn submission_state() -> SubmissionState {
    SubmissionState::default()
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a storefront accepting reviews for hotel {hotel}")]
fn seed_storefront(submission_state: &SubmissionState, hotel: String) {
    let existing = json!([review_json("r-1", &hotel, "HOTEL", 0)]);
    let created = Mock::given(method("POST"))
        .and(path(REVIEWS_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "status": "created" })));
    let listing = Mock::given(method("GET"))
        .and(path(REVIEWS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(existing));

    mount_all(
        &submission_state.runtime,
        &submission_state.server,
        vec![created, listing],
    );
}

#[given("an image host that stores uploads")]
fn seed_image_host(submission_state: &SubmissionState) {
    let upload = Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "secure_url": "https://img.example/photo.png"
        })));

    mount_all(&submission_state.runtime, &submission_state.server, vec![upload]);
}

#[given("an image host that rejects uploads")]
fn seed_failing_image_host(submission_state: &SubmissionState) {
    let upload = Mock::given(method("POST"))
        .and(path(UPLOAD_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": { "message": "storage offline" }
        })));

    mount_all(&submission_state.runtime, &submission_state.server, vec![upload]);
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a customer named {name} is logged in")]
fn log_in_customer(submission_state: &SubmissionState, name: String) {
    submission_state.session.set(logged_in(&name, Role::User));
}

#[given("nobody is logged in")]
fn stay_anonymous(submission_state: &SubmissionState) {
    submission_state.session.set(Session::anonymous());
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("the customer submits a {stars:u8} star review with {photos:usize} photos for hotel {hotel}")]
fn submit_review(submission_state: &SubmissionState, stars: u8, photos: usize, hotel: String) {
    let runtime = submission_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));
    let (base, upload_url) = submission_state
        .server
        .with_ref(|server| (api_base_for(server), format!("{}{UPLOAD_PATH}", server.uri())))
        .unwrap_or_else(|| panic!("mock server not initialised"));
    let session = submission_state
        .session
        .get()
        .unwrap_or_else(|| panic!("session not chosen"));

    let (draft, result) = runtime
        .block_on(async {
            let gateway = HttpReviewGateway::new(base, Duration::from_secs(5))?;
            let images = HttpImageHost::new(&upload_url, "review_photos", Duration::from_secs(5))?;
            let mut manager =
                ReviewAggregateManager::new(&gateway, &images, TargetRef::hotel(&hotel));

            let draft = manager.draft_mut();
            draft.set_rating(stars)?;
            draft.comment = "Spotless rooms and a quiet pool".to_owned();
            draft.images = (1..=photos)
                .map(|index| ImageAttachment::new(format!("photo-{index}.png"), vec![0x89, 0x50]))
                .collect();

            let result = manager.submit_review(&session).await;
            Ok::<_, ReviewError>((manager.draft().clone(), result))
        })
        .unwrap_or_else(|error| panic!("failed to prepare submission: {error}"));

    submission_state.draft.set(draft);
    submission_state.result.set(result);
}

fn submission_result(submission_state: &SubmissionState) -> Result<(), ReviewError> {
    submission_state
        .result
        .get()
        .unwrap_or_else(|| panic!("no submission was attempted"))
}

fn posted_reviews(submission_state: &SubmissionState) -> Vec<Value> {
    let runtime = submission_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime not initialised"));
    let requests = submission_state
        .server
        .with_ref(|server| runtime.block_on(server.received_requests()))
        .flatten()
        .unwrap_or_default();

    requests
        .iter()
        .filter(|request| request.method.as_str() == "POST" && request.url.path() == REVIEWS_PATH)
        .map(|request| {
            serde_json::from_slice(&request.body)
                .unwrap_or_else(|error| panic!("review body should be JSON: {error}"))
        })
        .collect()
}

#[then("the submission succeeds")]
fn assert_submitted(submission_state: &SubmissionState) {
    let result = submission_result(submission_state);
    assert_eq!(result, Ok(()), "submission should succeed");
}

#[then("the storefront received a review with {count:usize} photo URLs")]
fn assert_posted_photos(submission_state: &SubmissionState, count: usize) {
    let posted = posted_reviews(submission_state);
    assert_eq!(posted.len(), 1, "exactly one review should be posted");

    let photos = posted
        .first()
        .and_then(|review| review.get("photos"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    assert_eq!(photos, count, "unexpected photo URL count");
}

#[then("the storefront received no reviews")]
fn assert_nothing_posted(submission_state: &SubmissionState) {
    assert!(
        posted_reviews(submission_state).is_empty(),
        "no review should reach the storefront"
    );
}

#[then("the image host received {count:usize} uploads")]
fn assert_upload_count(submission_state: &SubmissionState, count: usize) {
    let uploads = count_requests(
        &submission_state.runtime,
        &submission_state.server,
        "POST",
        UPLOAD_PATH,
    );
    assert_eq!(uploads, count, "unexpected number of uploads");
}

#[then("the draft is empty")]
fn assert_draft_reset(submission_state: &SubmissionState) {
    let draft = submission_state
        .draft
        .get()
        .unwrap_or_else(|| panic!("draft not captured"));
    assert_eq!(draft, ReviewDraft::default(), "draft should be reset");
}

#[then("the draft still holds {count:usize} photos")]
fn assert_draft_kept(submission_state: &SubmissionState, count: usize) {
    let draft = submission_state
        .draft
        .get()
        .unwrap_or_else(|| panic!("draft not captured"));
    assert_eq!(draft.images.len(), count, "draft photos should be kept");
    assert!(!draft.comment.is_empty(), "draft comment should be kept");
}

#[then("the submission is rejected until the visitor logs in")]
fn assert_unauthenticated(submission_state: &SubmissionState) {
    let result = submission_result(submission_state);
    assert_eq!(result, Err(ReviewError::Unauthenticated));
}

#[then("the submission reports {uploaded:usize} of {total:usize} photos uploaded")]
fn assert_partial_upload(submission_state: &SubmissionState, uploaded: usize, total: usize) {
    let result = submission_result(submission_state);
    assert!(
        matches!(
            result,
            Err(ReviewError::PartialUploadFailure { uploaded: done, total: all, .. })
                if done == uploaded && all == total
        ),
        "expected partial upload failure, got {result:?}"
    );
}

#[scenario(path = "tests/features/review_submission.feature", index = 0)]
fn submission_with_photos(submission_state: SubmissionState) {
    let _ = submission_state;
}

#[scenario(path = "tests/features/review_submission.feature", index = 1)]
fn anonymous_submission_is_rejected(submission_state: SubmissionState) {
    let _ = submission_state;
}

#[scenario(path = "tests/features/review_submission.feature", index = 2)]
fn failed_upload_keeps_draft(submission_state: SubmissionState) {
    let _ = submission_state;
}
