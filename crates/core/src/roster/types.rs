//! Types for the record store adapter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::header::resolve_header;

/// Which application store a record lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantKind {
    Student,
    Teacher,
}

impl ApplicantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicantKind::Student => "student",
            ApplicantKind::Teacher => "teacher",
        }
    }

    /// Capitalized label for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicantKind::Student => "Student",
            ApplicantKind::Teacher => "Teacher",
        }
    }
}

impl fmt::Display for ApplicantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicantKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" | "students" => Ok(ApplicantKind::Student),
            "teacher" | "teachers" | "staff" => Ok(ApplicantKind::Teacher),
            other => Err(format!("unknown applicant kind: {other}")),
        }
    }
}

/// Canonical record fields managed by this workflow.
///
/// `Positions` and `Signature` are auxiliary: read for routing and the
/// follow-up scan, written only by the external application form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Handle,
    LinkedAccountId,
    Status,
    PaymentStatus,
    NextSteps,
    StaffNotes,
    LastUpdated,
    Positions,
    Signature,
}

impl FieldKey {
    /// The canonical header text this field is matched against.
    pub fn canonical(&self) -> &'static str {
        match self {
            FieldKey::Handle => "Handle",
            FieldKey::LinkedAccountId => "Linked Account ID",
            FieldKey::Status => "Status",
            FieldKey::PaymentStatus => "Payment Status",
            FieldKey::NextSteps => "Next Steps",
            FieldKey::StaffNotes => "Staff Notes",
            FieldKey::LastUpdated => "Last Updated",
            FieldKey::Positions => "Positions of Interest",
            FieldKey::Signature => "Signature",
        }
    }

    /// Known alternate header spellings. Only the handle column has grown
    /// synonyms in the wild; other fields rely on normalization and the
    /// substring fallback.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            FieldKey::Handle => &[
                "Username",
                "User Name",
                "Discord Username",
                "Discord Name",
                "IGN",
                "In-Game Name",
                "Nickname",
                "Applicant Name",
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

/// 1-based row number in the sheet. Row 1 is the header; data starts at 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowRef(pub u32);

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}", self.0)
    }
}

/// One field assignment in a batched row update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldWrite {
    pub key: FieldKey,
    pub value: String,
}

impl FieldWrite {
    pub fn new(key: FieldKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Result of a batched row update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOutcome {
    pub updated_cells: u32,
}

/// A full fetch of a store's first tab: the header row plus sparse data rows.
///
/// Rows may be shorter than the header when trailing cells are empty; all
/// accessors treat missing cells as empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// True when the store has zero data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Read a field from a data row, yielding `""` when the header does not
    /// resolve or the cell is absent.
    pub fn field(&self, data_idx: usize, key: FieldKey) -> &str {
        let Some(col) = resolve_header(&self.headers, key) else {
            return "";
        };
        self.rows
            .get(data_idx)
            .and_then(|row| row.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Sheet row reference for a data row index (data row 0 is sheet row 2).
    pub fn row_ref(&self, data_idx: usize) -> RowRef {
        RowRef(data_idx as u32 + 2)
    }

    /// Locate a record by handle: case-insensitive exact match, first match
    /// wins when handles are duplicated.
    pub fn find_by_handle(&self, handle: &str) -> Option<usize> {
        let wanted = handle.trim().to_lowercase();
        if wanted.is_empty() {
            return None;
        }
        (0..self.rows.len())
            .find(|&idx| self.field(idx, FieldKey::Handle).trim().to_lowercase() == wanted)
    }

    /// Locate a record by the bound platform account id (exact match).
    pub fn find_by_linked_id(&self, linked_id: &str) -> Option<usize> {
        let wanted = linked_id.trim();
        if wanted.is_empty() {
            return None;
        }
        (0..self.rows.len())
            .find(|&idx| self.field(idx, FieldKey::LinkedAccountId).trim() == wanted)
    }
}

/// Error type for record store operations.
///
/// All variants surface to the user as a generic retry-later failure while
/// the detail is logged for staff; none of them should crash the process.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    #[error("Record store rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Malformed record store response: {0}")]
    BadResponse(String),
}
