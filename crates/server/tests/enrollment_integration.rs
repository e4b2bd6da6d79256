//! End-to-end tests for the enrollment workflow endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestFixture, STAFF};
use oscar_core::testing::fixtures;
use oscar_core::{ApplicantKind, RosterError};

#[tokio::test]
async fn status_lookup_is_case_insensitive() {
    let fixture = TestFixture::new().await;

    for handle in ["ByteWolf", "bytewolf", "BYTEWOLF"] {
        let response = fixture
            .get_as(
                &format!("/api/v1/enrollment/student/status?handle={handle}"),
                Some("111"),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["handle"], "ByteWolf");
        assert_eq!(response.body["status"], "Pending");
    }
}

#[tokio::test]
async fn applicant_view_defaults_and_hides_staff_notes() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .get_as("/api/v1/enrollment/student/status?handle=bytewolf", Some("111"))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["next_steps"], "No next steps listed yet.");
    assert_eq!(response.body["payment_status"], "N/A");
    // ByteWolf's record carries staff notes; applicants never see the field.
    assert!(response.body.get("staff_notes").is_none());
}

#[tokio::test]
async fn staff_view_includes_non_empty_staff_notes() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .get_as("/api/v1/enrollment/student/status?handle=bytewolf", Some(STAFF))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["staff_notes"], "reviewed basics");
}

#[tokio::test]
async fn teacher_view_omits_payment_status() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .get_as(
            "/api/v1/enrollment/teacher/status?handle=professor-oak",
            Some("333"),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.get("payment_status").is_none());
}

#[tokio::test]
async fn unknown_handle_is_404() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .get_as("/api/v1/enrollment/student/status?handle=ghost", Some("1"))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body["error"].as_str().unwrap().contains("ghost"));
}

#[tokio::test]
async fn empty_store_reports_sheet_is_empty() {
    let fixture = TestFixture::new().await;
    fixture
        .record_store
        .set_table(ApplicantKind::Teacher, fixtures::table(&["Handle"], &[]))
        .await;

    let response = fixture
        .get_as("/api/v1/enrollment/teacher/status?handle=anyone", Some("1"))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Sheet is empty.");
}

#[tokio::test]
async fn gated_record_offers_a_ticket_instead_of_denying_existence() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .get_as("/api/v1/enrollment/student/status?handle=bytewolf", Some("999"))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(response.body["error"].as_str().unwrap().contains("ticket"));
}

#[tokio::test]
async fn unknown_kind_is_400() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .get_as("/api/v1/enrollment/alumni/status?handle=x", Some("1"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approve_then_lookup_shows_new_status() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_as(
            "/api/v1/enrollment/student/approve",
            json!({"handle": "nova99", "next_steps": "Orientation is Monday at 9."}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "Approved");
    // nova99 has no linked account: the staff actor got the notification.
    assert_eq!(response.body["notify_target"], "staff_fallback");

    let lookup = fixture
        .get_as("/api/v1/enrollment/student/status?handle=nova99", Some(STAFF))
        .await;
    assert_eq!(lookup.body["status"], "Approved");
    assert_eq!(lookup.body["next_steps"], "Orientation is Monday at 9.");

    let deliveries = fixture.notifier.deliveries().await;
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, STAFF);
}

#[tokio::test]
async fn approve_requires_staff() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_as(
            "/api/v1/enrollment/student/approve",
            json!({"handle": "nova99"}),
            Some("111"),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(fixture.record_store.update_count().await, 0);
}

#[tokio::test]
async fn deny_succeeds_even_when_notification_fails() {
    let fixture = TestFixture::new().await;
    fixture.notifier.fail_all(true);

    let response = fixture
        .post_as(
            "/api/v1/enrollment/student/deny",
            json!({"handle": "bytewolf", "reason": "incomplete paperwork"}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "Denied");
    assert_eq!(response.body["notified"], false);
    assert!(response.body["next_steps"]
        .as_str()
        .unwrap()
        .contains("incomplete paperwork"));

    // Exactly one delivery attempt, aimed at the linked account.
    let deliveries = fixture.notifier.deliveries().await;
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].0, "111");
}

#[tokio::test]
async fn deny_requires_a_reason() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_as(
            "/api/v1/enrollment/student/deny",
            json!({"handle": "bytewolf", "reason": "  "}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn confirm_payment_applies_without_prior_approval() {
    let fixture = TestFixture::new().await;

    // nova99 is Pending, not Approved; the operation still applies.
    let response = fixture
        .post_as(
            "/api/v1/enrollment/student/confirm-payment",
            json!({"handle": "nova99", "notes": "paid at the office"}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "Enrollment Complete");

    let lookup = fixture
        .get_as("/api/v1/enrollment/student/status?handle=nova99", Some(STAFF))
        .await;
    assert_eq!(lookup.body["status"], "Enrollment Complete");
    assert_eq!(lookup.body["payment_status"], "Paid");
}

#[tokio::test]
async fn link_account_then_gate_applies() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_as(
            "/api/v1/enrollment/student/link",
            json!({"handle": "nova99", "account_id": "777"}),
            Some(STAFF),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["linked_account_id"], "777");

    // A different non-staff account is now blocked.
    let blocked = fixture
        .get_as("/api/v1/enrollment/student/status?handle=nova99", Some("888"))
        .await;
    assert_eq!(blocked.status, StatusCode::FORBIDDEN);

    // The bound account and staff still resolve.
    let owner = fixture
        .get_as("/api/v1/enrollment/student/status?handle=nova99", Some("777"))
        .await;
    assert_eq!(owner.status, StatusCode::OK);
    let staff = fixture
        .get_as("/api/v1/enrollment/student/status?handle=nova99", Some(STAFF))
        .await;
    assert_eq!(staff.status, StatusCode::OK);
}

#[tokio::test]
async fn scan_reports_summary() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_empty_as("/api/v1/enrollment/scan", Some(STAFF))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["scanned"], 3);
    assert_eq!(response.body["notified"], 1);
    assert_eq!(response.body["skipped_unlinked"], 1);

    let non_staff = fixture.post_empty_as("/api/v1/enrollment/scan", Some("1")).await;
    assert_eq!(non_staff.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn store_outage_is_a_generic_retry_later() {
    let fixture = TestFixture::new().await;
    fixture
        .record_store
        .set_next_error(RosterError::Unavailable("connection refused".to_string()))
        .await;

    let response = fixture
        .get_as("/api/v1/enrollment/student/status?handle=bytewolf", Some("111"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    let message = response.body["error"].as_str().unwrap();
    assert!(message.contains("try again"));
    // The transport detail stays in the logs, not the response.
    assert!(!message.contains("connection refused"));
}

#[tokio::test]
async fn unconfigured_roster_degrades_cleanly() {
    let fixture = TestFixture::without_enrollment().await;

    let response = fixture
        .get_as("/api/v1/enrollment/student/status?handle=x", Some("1"))
        .await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}
