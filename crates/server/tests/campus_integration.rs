//! End-to-end tests for the campus endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestFixture, STAFF};

#[tokio::test]
async fn schedule_set_block_and_read_week() {
    let fixture = TestFixture::new().await;

    let denied = fixture
        .post_as(
            "/api/v1/schedule/blocks",
            json!({"day": "monday", "label": "Period 1", "details": "Math, room 2"}),
            Some("student-9"),
        )
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let response = fixture
        .post_as(
            "/api/v1/schedule/blocks",
            json!({"day": "monday", "label": "Period 1", "details": "Math, room 2"}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["position"], 1);

    let week = fixture.get_as("/api/v1/schedule/week", Some("student-9")).await;
    assert_eq!(week.status, StatusCode::OK);
    let monday = &week.body["days"][0];
    assert_eq!(monday["day"], "Monday");
    assert_eq!(monday["blocks"][0]["label"], "Period 1");

    let cleared = fixture
        .delete_as("/api/v1/schedule/monday", Some(STAFF))
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(cleared.body["rendered"], "No schedule posted yet.");
}

#[tokio::test]
async fn bad_day_is_rejected() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .post_as(
            "/api/v1/schedule/blocks",
            json!({"day": "saturday", "label": "Detention", "details": "room 1"}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn points_award_and_leaderboard() {
    let fixture = TestFixture::new().await;

    fixture
        .post_as(
            "/api/v1/points",
            json!({"account_id": "s1", "amount": 25, "reason": "great scene"}),
            Some(STAFF),
        )
        .await;
    let response = fixture
        .post_as(
            "/api/v1/points",
            json!({"account_id": "s2", "amount": 40, "reason": "led the group"}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 40);

    let board = fixture
        .get_as("/api/v1/points/leaderboard", Some("anyone"))
        .await;
    assert_eq!(board.body["entries"][0]["account_id"], "s2");
    assert_eq!(board.body["entries"][1]["account_id"], "s1");
}

#[tokio::test]
async fn points_out_of_range_rejected() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .post_as(
            "/api/v1/points",
            json!({"account_id": "s1", "amount": 900, "reason": "too generous"}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn attendance_full_flow() {
    let fixture = TestFixture::new().await;

    let opened = fixture
        .post_as(
            "/api/v1/attendance/sessions",
            json!({"class_name": "Biology"}),
            Some(STAFF),
        )
        .await;
    assert_eq!(opened.status, StatusCode::CREATED);
    let session_id = opened.body["session_id"].as_str().unwrap().to_string();

    let mark = fixture
        .post_as(
            &format!("/api/v1/attendance/sessions/{session_id}/mark"),
            json!({"status": "present"}),
            Some("student-1"),
        )
        .await;
    assert_eq!(mark.status, StatusCode::OK);

    fixture
        .post_as(
            &format!("/api/v1/attendance/sessions/{session_id}/mark"),
            json!({"status": "late"}),
            Some("student-2"),
        )
        .await;

    let closed = fixture
        .post_empty_as(
            &format!("/api/v1/attendance/sessions/{session_id}/close"),
            Some(STAFF),
        )
        .await;
    assert_eq!(closed.status, StatusCode::OK);
    assert_eq!(closed.body["totals"]["present"], 1);
    assert_eq!(closed.body["totals"]["late"], 1);

    // Marks bounce off a closed session.
    let late_mark = fixture
        .post_as(
            &format!("/api/v1/attendance/sessions/{session_id}/mark"),
            json!({"status": "present"}),
            Some("student-3"),
        )
        .await;
    assert_eq!(late_mark.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_session_is_404() {
    let fixture = TestFixture::new().await;
    let response = fixture
        .post_as(
            "/api/v1/attendance/sessions/SNOPE/mark",
            json!({"status": "present"}),
            Some("student-1"),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn pass_request_decide_and_notify() {
    let fixture = TestFixture::new().await;

    let requested = fixture
        .post_as(
            "/api/v1/passes",
            json!({"reason": "nurse", "details": "headache"}),
            Some("student-1"),
        )
        .await;
    assert_eq!(requested.status, StatusCode::CREATED);
    let pass_id = requested.body["id"].as_str().unwrap().to_string();
    assert_eq!(requested.body["status"], "pending");

    let decided = fixture
        .post_as(
            &format!("/api/v1/passes/{pass_id}/decide"),
            json!({"approve": true, "notes": "take your time"}),
            Some(STAFF),
        )
        .await;
    assert_eq!(decided.status, StatusCode::OK);
    assert_eq!(decided.body["status"], "approved");
    assert_eq!(decided.body["notified"], true);

    let deliveries = fixture.notifier.deliveries().await;
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, "student-1");
    assert!(deliveries[0].1.contains("APPROVED"));

    // A pass is decided at most once.
    let again = fixture
        .post_as(
            &format!("/api/v1/passes/{pass_id}/decide"),
            json!({"approve": false}),
            Some(STAFF),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn pass_decision_survives_failed_notification() {
    let fixture = TestFixture::new().await;
    fixture.notifier.fail_all(true);

    let requested = fixture
        .post_as(
            "/api/v1/passes",
            json!({"reason": "office"}),
            Some("student-1"),
        )
        .await;
    let pass_id = requested.body["id"].as_str().unwrap().to_string();

    let decided = fixture
        .post_as(
            &format!("/api/v1/passes/{pass_id}/decide"),
            json!({"approve": false}),
            Some(STAFF),
        )
        .await;
    assert_eq!(decided.status, StatusCode::OK);
    assert_eq!(decided.body["status"], "denied");
    assert_eq!(decided.body["notified"], false);
}

#[tokio::test]
async fn nurse_queue_is_fifo() {
    let fixture = TestFixture::new().await;

    fixture
        .post_as("/api/v1/nurse/checkin", json!({"reason": "headache"}), Some("s1"))
        .await;
    fixture
        .post_as("/api/v1/nurse/checkin", json!({"reason": "scrape"}), Some("s2"))
        .await;

    let first = fixture.post_empty_as("/api/v1/nurse/next", Some(STAFF)).await;
    assert_eq!(first.body["next"]["account_id"], "s1");

    let second = fixture.post_empty_as("/api/v1/nurse/next", Some(STAFF)).await;
    assert_eq!(second.body["next"]["account_id"], "s2");

    let empty = fixture.post_empty_as("/api/v1/nurse/next", Some(STAFF)).await;
    assert!(empty.body["next"].is_null());
}

#[tokio::test]
async fn groups_shuffle_mentions() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_as(
            "/api/v1/groups",
            json!({"mentions": "<@1> <@2> <@3> <@4> <@5>", "size": 2}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let groups = response.body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 3);

    let too_few = fixture
        .post_as(
            "/api/v1/groups",
            json!({"mentions": "<@1>", "size": 3}),
            Some(STAFF),
        )
        .await;
    assert_eq!(too_few.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn announcements_require_a_chat_platform() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_as(
            "/api/v1/announcements",
            json!({"title": "Field trip", "message": "Friday, bring a permission slip."}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn prompt_draw_is_open_to_everyone() {
    let fixture = TestFixture::new().await;

    let response = fixture.get_as("/api/v1/prompts/draw", Some("s1")).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body["prompt"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn anonymous_actors_cannot_use_student_tools() {
    let fixture = TestFixture::new().await;

    let pass = fixture
        .post_as("/api/v1/passes", json!({"reason": "nurse"}), None)
        .await;
    assert_eq!(pass.status, StatusCode::UNAUTHORIZED);

    let checkin = fixture
        .post_as("/api/v1/nurse/checkin", json!({"reason": "x"}), None)
        .await;
    assert_eq!(checkin.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_and_config_respond() {
    let fixture = TestFixture::new().await;

    let health = fixture.get_as("/api/v1/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");

    let config = fixture.get_as("/api/v1/config", Some(STAFF)).await;
    assert_eq!(config.status, StatusCode::OK);
    assert_eq!(config.body["auth"]["method"], "none");
}
