//! Mock record store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::roster::{
    resolve_header, ApplicantKind, FieldWrite, RecordStore, RosterError, RowRef, SheetTable,
    UpdateOutcome,
};

/// A recorded update for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedUpdate {
    pub kind: ApplicantKind,
    pub row: RowRef,
    pub fields: Vec<FieldWrite>,
}

/// In-memory implementation of the `RecordStore` trait.
///
/// Provides controllable behavior for testing:
/// - Seed tables per applicant kind
/// - Writes are applied to the in-memory table, so follow-up reads observe
///   them (the round-trip the real store provides)
/// - Record every update for assertions
/// - Inject a one-shot error
pub struct MockRecordStore {
    tables: RwLock<HashMap<ApplicantKind, SheetTable>>,
    updates: RwLock<Vec<RecordedUpdate>>,
    next_error: RwLock<Option<RosterError>>,
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecordStore {
    /// Create a mock with no tables; every fetch sees an empty sheet.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            updates: RwLock::new(Vec::new()),
            next_error: RwLock::new(None),
        }
    }

    /// Create a mock seeded with one table.
    pub fn with_table(kind: ApplicantKind, table: SheetTable) -> Self {
        let store = Self::new();
        store
            .tables
            .try_write()
            .expect("fresh lock")
            .insert(kind, table);
        store
    }

    pub async fn set_table(&self, kind: ApplicantKind, table: SheetTable) {
        self.tables.write().await.insert(kind, table);
    }

    /// Current state of a seeded table (None when never seeded).
    pub async fn table(&self, kind: ApplicantKind) -> Option<SheetTable> {
        self.tables.read().await.get(&kind).cloned()
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: RosterError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_updates(&self) -> Vec<RecordedUpdate> {
        self.updates.read().await.clone()
    }

    pub async fn update_count(&self) -> usize {
        self.updates.read().await.len()
    }

    async fn take_error(&self) -> Option<RosterError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn fetch_table(&self, kind: ApplicantKind) -> Result<SheetTable, RosterError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self
            .tables
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| SheetTable::new(Vec::new(), Vec::new())))
    }

    async fn update_fields(
        &self,
        kind: ApplicantKind,
        row: RowRef,
        fields: &[FieldWrite],
    ) -> Result<UpdateOutcome, RosterError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.updates.write().await.push(RecordedUpdate {
            kind,
            row,
            fields: fields.to_vec(),
        });

        let mut tables = self.tables.write().await;
        let Some(table) = tables.get_mut(&kind) else {
            return Ok(UpdateOutcome { updated_cells: 0 });
        };

        let data_idx = (row.0 as usize).saturating_sub(2);
        let mut updated_cells = 0;
        for field in fields {
            let Some(col) = resolve_header(&table.headers, field.key) else {
                continue;
            };
            let Some(row) = table.rows.get_mut(data_idx) else {
                continue;
            };
            if row.len() <= col {
                row.resize(col + 1, String::new());
            }
            row[col] = field.value.clone();
            updated_cells += 1;
        }

        Ok(UpdateOutcome { updated_cells })
    }
}
