//! Common test utilities for end-to-end testing with mocks.
//!
//! Builds an in-process router with mock external services injected, so the
//! whole command surface can be driven without a spreadsheet service or chat
//! platform.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use oscar_core::testing::{fixtures, MockNotifier, MockRecordStore, MockTicketGateway};
use oscar_core::{
    create_authenticator, ApplicantKind, Campus, EnrollmentService, Notifier, TicketGateway,
};
use oscar_server::api::create_router;
use oscar_server::state::AppState;

/// Account id the fixture config treats as staff.
pub const STAFF: &str = "staff-1";

/// Test fixture with fully controllable mock dependencies.
pub struct TestFixture {
    pub router: Router,
    pub record_store: Arc<MockRecordStore>,
    pub notifier: Arc<MockNotifier>,
    pub tickets: Arc<MockTicketGateway>,
    /// Holds the campus tables for the fixture's lifetime.
    pub temp_dir: TempDir,
}

/// Response from a test request.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Fixture with seeded student/teacher stores and all features enabled.
    pub async fn new() -> Self {
        Self::build(true).await
    }

    /// Fixture without a configured roster: enrollment endpoints degrade.
    pub async fn without_enrollment() -> Self {
        Self::build(false).await
    }

    async fn build(with_enrollment: bool) -> Self {
        let temp_dir = TempDir::new().expect("temp dir");

        let config = oscar_core::load_config_from_str(&format!(
            r#"
[auth]
method = "none"
staff_account_ids = ["{STAFF}"]

[campus]
data_dir = "{}"
"#,
            temp_dir.path().display()
        ))
        .expect("fixture config");

        let authenticator = Arc::from(create_authenticator(&config.auth).expect("authenticator"));

        let record_store = Arc::new(MockRecordStore::new());
        record_store
            .set_table(ApplicantKind::Student, fixtures::student_table())
            .await;
        record_store
            .set_table(ApplicantKind::Teacher, fixtures::teacher_table())
            .await;

        let notifier = Arc::new(MockNotifier::new());
        let tickets = Arc::new(MockTicketGateway::new());

        let enrollment = with_enrollment.then(|| {
            Arc::new(EnrollmentService::new(
                record_store.clone() as Arc<dyn oscar_core::RecordStore>,
                notifier.clone() as Arc<dyn Notifier>,
            ))
        });

        let campus = Arc::new(Campus::open(temp_dir.path()));

        let state = Arc::new(AppState::new(
            config,
            authenticator,
            enrollment,
            notifier.clone() as Arc<dyn Notifier>,
            Some(tickets.clone() as Arc<dyn TicketGateway>),
            None,
            campus,
        ));

        Self {
            router: create_router(state),
            record_store,
            notifier,
            tickets,
            temp_dir,
        }
    }

    /// GET as the given actor (None = no actor headers).
    pub async fn get_as(&self, path: &str, actor: Option<&str>) -> TestResponse {
        self.send(self.request("GET", path, actor, None)).await
    }

    /// POST a JSON body as the given actor.
    pub async fn post_as(&self, path: &str, body: Value, actor: Option<&str>) -> TestResponse {
        self.send(self.request("POST", path, actor, Some(body))).await
    }

    /// POST with no body as the given actor.
    pub async fn post_empty_as(&self, path: &str, actor: Option<&str>) -> TestResponse {
        self.send(self.request("POST", path, actor, None)).await
    }

    /// DELETE as the given actor.
    pub async fn delete_as(&self, path: &str, actor: Option<&str>) -> TestResponse {
        self.send(self.request("DELETE", path, actor, None)).await
    }

    fn request(
        &self,
        method: &str,
        path: &str,
        actor: Option<&str>,
        body: Option<Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(actor) = actor {
            builder = builder.header("x-actor-id", actor);
        }
        match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        }
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}
