use async_trait::async_trait;

use super::types::{ApplicantKind, FieldWrite, RosterError, RowRef, SheetTable, UpdateOutcome};

/// Access to an external tabular record store.
///
/// Implementations fetch the entire (bounded) first tab per call and batch
/// all cell writes of one update into a single round trip. Lookup helpers
/// live on [`SheetTable`] so they stay pure and testable.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the full first-tab table for the given store.
    async fn fetch_table(&self, kind: ApplicantKind) -> Result<SheetTable, RosterError>;

    /// Write the given fields of one row. Fields whose header does not
    /// resolve are skipped; writing zero resolvable fields is a no-op that
    /// reports zero updated cells.
    async fn update_fields(
        &self,
        kind: ApplicantKind,
        row: RowRef,
        fields: &[FieldWrite],
    ) -> Result<UpdateOutcome, RosterError>;
}
