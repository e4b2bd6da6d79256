//! Application record and status types.

use serde::{Deserialize, Serialize};

use crate::roster::{FieldKey, SheetTable};

/// One applicant's row, parsed into the fields this workflow manages.
///
/// The external stores keep everything as loose text; parsing never fails,
/// it only yields empty fields. `status` stays raw here; the typed views
/// below exist for the state machine and are re-serialized as text on write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub handle: String,
    /// Platform account bound to this record; once set it gates self-service
    /// access and is never cleared by this workflow.
    pub linked_account_id: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub next_steps: String,
    pub staff_notes: String,
    pub last_updated: String,
    /// Declared positions of interest (teacher applications); read-only here.
    pub positions: String,
    /// Freeform signature text; filled by the follow-up form, checked by the
    /// auto-scan.
    pub signature: String,
}

impl ApplicationRecord {
    /// Parse a data row of a fetched table.
    pub fn from_table(table: &SheetTable, data_idx: usize) -> Self {
        let field = |key| table.field(data_idx, key).trim().to_string();
        let linked = field(FieldKey::LinkedAccountId);

        Self {
            handle: field(FieldKey::Handle),
            linked_account_id: (!linked.is_empty()).then_some(linked),
            status: field(FieldKey::Status),
            payment_status: field(FieldKey::PaymentStatus),
            next_steps: field(FieldKey::NextSteps),
            staff_notes: field(FieldKey::StaffNotes),
            last_updated: field(FieldKey::LastUpdated),
            positions: field(FieldKey::Positions),
            signature: field(FieldKey::Signature),
        }
    }

    /// Typed student status, when the stored text is recognizable.
    pub fn student_status(&self) -> Option<StudentStatus> {
        StudentStatus::parse(&self.status)
    }

    /// Typed teacher status, when the stored text is recognizable.
    pub fn staff_status(&self) -> Option<StaffStatus> {
        StaffStatus::parse(&self.status)
    }
}

/// Student application status.
///
/// The store holds free text; this enum gives the state machine
/// compile-time exhaustiveness while reads stay permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    Pending,
    Approved,
    Denied,
    EnrollmentComplete,
}

impl StudentStatus {
    pub fn label(self) -> &'static str {
        match self {
            StudentStatus::Pending => "Pending",
            StudentStatus::Approved => "Approved",
            StudentStatus::Denied => "Denied",
            StudentStatus::EnrollmentComplete => "Enrollment Complete",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "" | "pending" => Some(StudentStatus::Pending),
            "approved" => Some(StudentStatus::Approved),
            "denied" => Some(StudentStatus::Denied),
            "enrollment complete" => Some(StudentStatus::EnrollmentComplete),
            _ => None,
        }
    }
}

/// Teacher application status. Teachers have no payment step, so there is no
/// completion state beyond `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffStatus {
    Pending,
    Approved,
    Denied,
}

impl StaffStatus {
    pub fn label(self) -> &'static str {
        match self {
            StaffStatus::Pending => "Pending",
            StaffStatus::Approved => "Approved",
            StaffStatus::Denied => "Denied",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "" | "pending" => Some(StaffStatus::Pending),
            "approved" => Some(StaffStatus::Approved),
            "denied" => Some(StaffStatus::Denied),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SheetTable {
        SheetTable::new(
            vec![
                "Handle".to_string(),
                "Linked Account ID".to_string(),
                "Status".to_string(),
                "Payment Status".to_string(),
                "Next Steps".to_string(),
                "Staff Notes".to_string(),
            ],
            vec![
                vec![
                    "nova99".to_string(),
                    " 111 ".to_string(),
                    "Approved".to_string(),
                    "".to_string(),
                    "Pay tuition".to_string(),
                    "strong application".to_string(),
                ],
                vec!["drifter".to_string()],
            ],
        )
    }

    #[test]
    fn record_parses_and_trims() {
        let record = ApplicationRecord::from_table(&table(), 0);
        assert_eq!(record.handle, "nova99");
        assert_eq!(record.linked_account_id.as_deref(), Some("111"));
        assert_eq!(record.status, "Approved");
        assert_eq!(record.next_steps, "Pay tuition");
        assert_eq!(record.signature, "");
    }

    #[test]
    fn blank_linked_account_is_none() {
        let record = ApplicationRecord::from_table(&table(), 1);
        assert_eq!(record.handle, "drifter");
        assert!(record.linked_account_id.is_none());
        assert_eq!(record.status, "");
    }

    #[test]
    fn student_status_parse_is_loose() {
        assert_eq!(StudentStatus::parse(""), Some(StudentStatus::Pending));
        assert_eq!(
            StudentStatus::parse(" approved "),
            Some(StudentStatus::Approved)
        );
        assert_eq!(
            StudentStatus::parse("Enrollment Complete"),
            Some(StudentStatus::EnrollmentComplete)
        );
        assert_eq!(StudentStatus::parse("On Hold"), None);
    }

    #[test]
    fn staff_status_has_no_completion_state() {
        assert_eq!(StaffStatus::parse("Approved"), Some(StaffStatus::Approved));
        assert_eq!(StaffStatus::parse("Enrollment Complete"), None);
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for status in [
            StudentStatus::Pending,
            StudentStatus::Approved,
            StudentStatus::Denied,
            StudentStatus::EnrollmentComplete,
        ] {
            assert_eq!(StudentStatus::parse(status.label()), Some(status));
        }
    }
}
