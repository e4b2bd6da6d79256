//! Record store adapter.
//!
//! Application records live in two external tabular stores (one per
//! applicant type), operated on through the first tab of each store. Columns
//! are located by header name, not fixed position: see [`resolve_header`] for
//! the ordered matching strategies. Every lookup re-reads the full table;
//! this is the workflow's main scalability ceiling and is acceptable only
//! because the stores are small. Writes address only the header-resolved
//! cells of a single row, so unmanaged columns survive untouched.

mod header;
mod sheets;
mod traits;
mod types;

pub use header::resolve_header;
pub use sheets::{SheetsRecordStore, TabCache};
pub use traits::RecordStore;
pub use types::{
    ApplicantKind, FieldKey, FieldWrite, RosterError, RowRef, SheetTable, UpdateOutcome,
};
