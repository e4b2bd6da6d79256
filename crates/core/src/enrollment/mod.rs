//! Application enrollment workflow.
//!
//! Resolves applicants against the record stores, projects the fields safe
//! to show them, and drives the decision workflow (approve / deny / payment
//! confirmation / account linking) with idempotent store writes and
//! best-effort notification.

mod projection;
mod resolver;
mod service;
mod types;

pub use projection::{project, StatusView};
pub use resolver::{resolve_by_handle, resolve_by_linked_id, Resolution, EMPTY_SHEET_REASON};
pub use service::{
    DecisionOutcome, EnrollmentError, EnrollmentService, LinkOutcome, NotifyTarget, ScanSummary,
};
pub use types::{ApplicationRecord, StaffStatus, StudentStatus};
