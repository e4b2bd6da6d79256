//! End-to-end tests for the ticket endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestFixture, STAFF};

#[tokio::test]
async fn open_ticket_creates_a_channel() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_as("/api/v1/tickets", json!({}), Some("42"))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["channel_id"], "ticket-chan-1");

    let opened = fixture.tickets.opened().await;
    assert_eq!(opened.len(), 1);
    assert_eq!(opened[0].0, "42");
    // No record named: generic snapshot.
    assert_eq!(opened[0].1.status, "Unknown");
}

#[tokio::test]
async fn open_ticket_snapshots_the_record() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .post_as(
            "/api/v1/tickets",
            json!({"kind": "student", "handle": "bytewolf"}),
            Some("111"),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let opened = fixture.tickets.opened().await;
    assert_eq!(opened[0].1.handle, "ByteWolf");
    assert_eq!(opened[0].1.status, "Pending");
    assert_eq!(opened[0].1.next_steps, "No next steps listed yet.");
}

#[tokio::test]
async fn gated_record_still_opens_a_generic_ticket() {
    let fixture = TestFixture::new().await;

    // 999 is not ByteWolf's linked account; the snapshot degrades but the
    // ticket opens, since its purpose is reaching staff.
    let response = fixture
        .post_as(
            "/api/v1/tickets",
            json!({"kind": "student", "handle": "bytewolf"}),
            Some("999"),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let opened = fixture.tickets.opened().await;
    assert_eq!(opened[0].1.status, "Unknown");
}

#[tokio::test]
async fn repeated_requests_open_fresh_channels() {
    let fixture = TestFixture::new().await;

    let first = fixture
        .post_as("/api/v1/tickets", json!({}), Some("42"))
        .await;
    let second = fixture
        .post_as("/api/v1/tickets", json!({}), Some("42"))
        .await;
    assert_ne!(first.body["channel_id"], second.body["channel_id"]);
    assert_eq!(fixture.tickets.opened().await.len(), 2);
}

#[tokio::test]
async fn anonymous_requests_are_rejected() {
    let fixture = TestFixture::new().await;

    let response = fixture.post_as("/api/v1/tickets", json!({}), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(fixture.tickets.opened().await.is_empty());
}

#[tokio::test]
async fn close_is_staff_only_and_posts_a_notice() {
    let fixture = TestFixture::new().await;
    fixture
        .post_as("/api/v1/tickets", json!({}), Some("42"))
        .await;

    let denied = fixture
        .delete_as("/api/v1/tickets/ticket-chan-1", Some("42"))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let closed = fixture
        .delete_as("/api/v1/tickets/ticket-chan-1", Some(STAFF))
        .await;
    assert_eq!(closed.status, StatusCode::OK);
    assert_eq!(closed.body["closed"], true);

    let closures = fixture.tickets.closed().await;
    assert_eq!(closures.len(), 1);
    assert!(closures[0].1.contains("closed"));
}

#[tokio::test]
async fn platform_outage_is_a_generic_failure() {
    let fixture = TestFixture::new().await;
    fixture.tickets.fail_all(true);

    let response = fixture
        .post_as("/api/v1/tickets", json!({}), Some("42"))
        .await;
    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
}
