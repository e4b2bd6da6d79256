//! Testing utilities and mock implementations for the external-service
//! traits, so the workflow and the server can be exercised end to end
//! without a spreadsheet service or chat platform.
//!
//! # Example
//!
//! ```rust,ignore
//! use oscar_core::testing::{fixtures, MockNotifier, MockRecordStore};
//!
//! let store = MockRecordStore::with_table(ApplicantKind::Student, fixtures::student_table());
//! let notifier = MockNotifier::new();
//!
//! // Drive the service, then assert on recorded updates and deliveries.
//! ```

mod mock_notifier;
mod mock_record_store;
mod mock_ticket_gateway;

pub use mock_notifier::MockNotifier;
pub use mock_record_store::{MockRecordStore, RecordedUpdate};
pub use mock_ticket_gateway::MockTicketGateway;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::roster::SheetTable;

    /// Build a table from string slices.
    pub fn table(headers: &[&str], rows: &[&[&str]]) -> SheetTable {
        SheetTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    /// A small student store:
    /// - `ByteWolf`: linked to account 111, pending, unsigned
    /// - `nova99`: unlinked, blank status, unsigned
    /// - `mirafox`: linked to account 222, approved, signed
    pub fn student_table() -> SheetTable {
        table(
            &[
                "Timestamp",
                "Handle",
                "Linked Account ID",
                "Status",
                "Payment Status",
                "Next Steps",
                "Staff Notes",
                "Last Updated",
                "Signature",
            ],
            &[
                &[
                    "2026-01-03",
                    "ByteWolf",
                    "111",
                    "Pending",
                    "",
                    "",
                    "reviewed basics",
                    "",
                    "",
                ],
                &["2026-01-04", "nova99", "", "", "", "", "", "", ""],
                &[
                    "2026-01-05",
                    "mirafox",
                    "222",
                    "Approved",
                    "",
                    "Pay tuition at the office",
                    "",
                    "",
                    "signed: Mira Fox",
                ],
            ],
        )
    }

    /// A small teacher store with the positions column.
    pub fn teacher_table() -> SheetTable {
        table(
            &[
                "Timestamp",
                "Handle",
                "Linked Account ID",
                "Status",
                "Next Steps",
                "Staff Notes",
                "Last Updated",
                "Positions of Interest",
            ],
            &[
                &[
                    "2026-01-02",
                    "professor-oak",
                    "333",
                    "Pending",
                    "",
                    "",
                    "",
                    "History, Science",
                ],
                &["2026-01-06", "drliz", "", "", "", "", "", "Mathematics"],
            ],
        )
    }
}
