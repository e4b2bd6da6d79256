//! Identity resolution against the record stores.
//!
//! Handles are compared case-insensitively and exactly (only header-name
//! matching is fuzzy, never handle matching). When a record carries a linked
//! account id, self-service access is gated to that account: other non-staff
//! viewers get [`Resolution::AccessBlocked`], which callers must render as a
//! ticket offer, not as "record does not exist".

use crate::auth::Actor;
use crate::roster::{ApplicantKind, RecordStore, RosterError, RowRef};

use super::types::ApplicationRecord;

/// `NotFound` reason reported for a store with zero data rows.
pub const EMPTY_SHEET_REASON: &str = "Sheet is empty.";

/// Outcome of resolving an applicant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found {
        record: ApplicationRecord,
        row: RowRef,
    },
    NotFound {
        reason: String,
    },
    AccessBlocked,
}

impl Resolution {
    fn of(table: &crate::roster::SheetTable, data_idx: usize, viewer: &Actor) -> Self {
        let record = ApplicationRecord::from_table(table, data_idx);
        if is_blocked(&record, viewer) {
            return Resolution::AccessBlocked;
        }
        Resolution::Found {
            row: table.row_ref(data_idx),
            record,
        }
    }
}

/// Resolve a record by its applicant-chosen handle. First matching row wins
/// on duplicates; duplicate handles are a data-quality issue upstream.
pub async fn resolve_by_handle(
    store: &dyn RecordStore,
    kind: ApplicantKind,
    handle: &str,
    viewer: &Actor,
) -> Result<Resolution, RosterError> {
    let table = store.fetch_table(kind).await?;

    if table.is_empty() {
        return Ok(Resolution::NotFound {
            reason: EMPTY_SHEET_REASON.to_string(),
        });
    }

    match table.find_by_handle(handle) {
        Some(idx) => Ok(Resolution::of(&table, idx, viewer)),
        None => Ok(Resolution::NotFound {
            reason: format!("No {} application matches handle \"{}\".", kind, handle.trim()),
        }),
    }
}

/// Resolve a record by its bound platform account id.
pub async fn resolve_by_linked_id(
    store: &dyn RecordStore,
    kind: ApplicantKind,
    linked_id: &str,
    viewer: &Actor,
) -> Result<Resolution, RosterError> {
    let table = store.fetch_table(kind).await?;

    if table.is_empty() {
        return Ok(Resolution::NotFound {
            reason: EMPTY_SHEET_REASON.to_string(),
        });
    }

    match table.find_by_linked_id(linked_id) {
        Some(idx) => Ok(Resolution::of(&table, idx, viewer)),
        None => Ok(Resolution::NotFound {
            reason: format!("No {kind} application is linked to that account."),
        }),
    }
}

fn is_blocked(record: &ApplicationRecord, viewer: &Actor) -> bool {
    match &record.linked_account_id {
        Some(linked) => !viewer.staff && linked != &viewer.account_id,
        None => false,
    }
}
