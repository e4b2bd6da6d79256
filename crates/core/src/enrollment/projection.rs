//! Safe-view projection of application records.
//!
//! The projected view is built as an allow-list: a field appears because it
//! is named here, never because it survived an exclusion filter. Any new
//! sensitive column added to a store stays hidden until explicitly exposed.

use serde::Serialize;

use crate::roster::ApplicantKind;

use super::types::ApplicationRecord;

/// Shown when a record has no status yet.
const DEFAULT_STATUS: &str = "Pending";

/// Shown when staff have not written next steps yet.
const DEFAULT_NEXT_STEPS: &str = "No next steps listed yet.";

/// Shown for an unset student payment status.
const DEFAULT_PAYMENT: &str = "N/A";

/// The subset of a record safe to render for a given viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusView {
    pub status: String,
    pub next_steps: String,
    /// Student records only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    /// Staff viewers only, and only when non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_notes: Option<String>,
}

/// Project a record into the fields its viewer may see.
pub fn project(record: &ApplicationRecord, kind: ApplicantKind, viewer_is_staff: bool) -> StatusView {
    let payment_status = match kind {
        ApplicantKind::Student => Some(non_empty_or(&record.payment_status, DEFAULT_PAYMENT)),
        ApplicantKind::Teacher => None,
    };

    let staff_notes = (viewer_is_staff && !record.staff_notes.trim().is_empty())
        .then(|| record.staff_notes.clone());

    StatusView {
        status: non_empty_or(&record.status, DEFAULT_STATUS),
        next_steps: non_empty_or(&record.next_steps, DEFAULT_NEXT_STEPS),
        payment_status,
        staff_notes,
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
