//! The application decision workflow.
//!
//! Every operation is one atomic store update (a single batched write to the
//! row's managed cells) followed by a structurally separate notification
//! attempt. The write must succeed for the operation to succeed; the
//! notification result is a boolean consumed only for logging and reporting.
//!
//! There are deliberately no transition guards: re-invoking a decision
//! overwrites the previous one, and `confirm_payment` applies whether or not
//! the record was ever approved.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::auth::Actor;
use crate::notify::Notifier;
use crate::roster::{ApplicantKind, FieldKey, FieldWrite, RecordStore, RosterError, RowRef};

use super::resolver::{self, Resolution, EMPTY_SHEET_REASON};
use super::types::{ApplicationRecord, StaffStatus, StudentStatus};

/// Next-steps boilerplate written by an approval without custom text.
const APPROVED_NEXT_STEPS: &str =
    "Welcome to Lifeline Academy! Watch your direct messages for onboarding details.";

/// Next-steps boilerplate written by a payment confirmation.
const COMPLETE_NEXT_STEPS: &str =
    "Payment received. Enrollment is complete — welcome to Lifeline Academy!";

/// Reminder sent by the follow-up scan.
const FOLLOWUP_REMINDER: &str =
    "Reminder from Lifeline Academy: your student application is missing its signature. \
     Please complete the follow-up form so we can finish processing it.";

/// Error type for enrollment operations.
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// Handle absent from the store; the message is the user-facing reason.
    #[error("{0}")]
    NotFound(String),

    /// Record bound to a different account than the viewer's.
    #[error("Record is linked to a different account")]
    AccessBlocked,

    #[error("{0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Store(#[from] RosterError),
}

/// Who a decision notification was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyTarget {
    /// The record's linked account.
    Applicant,
    /// The record has no linked account, so the staff actor who issued the
    /// command was notified instead. The applicant sees nothing until a
    /// link is established.
    StaffFallback,
}

/// Result of a decision operation.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutcome {
    pub handle: String,
    pub kind: ApplicantKind,
    pub status: String,
    pub next_steps: String,
    pub notified: bool,
    pub notify_target: NotifyTarget,
}

/// Result of binding a platform account to a record.
#[derive(Debug, Clone, Serialize)]
pub struct LinkOutcome {
    pub handle: String,
    pub kind: ApplicantKind,
    pub linked_account_id: String,
}

/// Summary of one follow-up scan over the student store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub scanned: u32,
    pub notified: u32,
    pub failed: u32,
    pub skipped_unlinked: u32,
}

/// Drives the per-applicant decision workflow against the record stores.
pub struct EnrollmentService {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
}

impl EnrollmentService {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Resolve a record for a viewer (self-service status lookup).
    pub async fn lookup(
        &self,
        kind: ApplicantKind,
        handle: &str,
        viewer: &Actor,
    ) -> Result<Resolution, RosterError> {
        resolver::resolve_by_handle(self.store.as_ref(), kind, handle, viewer).await
    }

    /// Approve an application and notify the applicant.
    pub async fn approve(
        &self,
        kind: ApplicantKind,
        handle: &str,
        next_steps: Option<&str>,
        actor: &Actor,
    ) -> Result<DecisionOutcome, EnrollmentError> {
        let located = self.locate(kind, handle).await?;
        let status = match kind {
            ApplicantKind::Student => StudentStatus::Approved.label(),
            ApplicantKind::Teacher => StaffStatus::Approved.label(),
        };
        let next_steps = next_steps
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(APPROVED_NEXT_STEPS)
            .to_string();
        let note = format!("Approved by {}", actor.account_id);

        self.commit_decision(kind, &located, status, &next_steps, &note, &[])
            .await?;

        let message = format!(
            "Your {} application to Lifeline Academy was approved! Next steps: {}",
            kind, next_steps
        );
        let (notified, notify_target) = self.send_decision(&located.record, actor, &message).await;

        info!(kind = kind.as_str(), handle = %located.record.handle, "Application approved");
        Ok(DecisionOutcome {
            handle: located.record.handle,
            kind,
            status: status.to_string(),
            next_steps,
            notified,
            notify_target,
        })
    }

    /// Deny an application, recording the reason verbatim, and notify.
    pub async fn deny(
        &self,
        kind: ApplicantKind,
        handle: &str,
        reason: &str,
        actor: &Actor,
    ) -> Result<DecisionOutcome, EnrollmentError> {
        let located = self.locate(kind, handle).await?;
        let status = match kind {
            ApplicantKind::Student => StudentStatus::Denied.label(),
            ApplicantKind::Teacher => StaffStatus::Denied.label(),
        };
        let next_steps = format!("Denied: {reason}");
        let note = format!("Denied by {}: {}", actor.account_id, reason);

        self.commit_decision(kind, &located, status, &next_steps, &note, &[])
            .await?;

        let message = format!(
            "Your {} application to Lifeline Academy was denied. {}",
            kind, next_steps
        );
        let (notified, notify_target) = self.send_decision(&located.record, actor, &message).await;

        info!(kind = kind.as_str(), handle = %located.record.handle, "Application denied");
        Ok(DecisionOutcome {
            handle: located.record.handle,
            kind,
            status: status.to_string(),
            next_steps,
            notified,
            notify_target,
        })
    }

    /// Record a tuition payment: payment status becomes Paid and the record
    /// moves to Enrollment Complete, regardless of its previous status.
    /// Student records only.
    pub async fn confirm_payment(
        &self,
        handle: &str,
        notes: Option<&str>,
        actor: &Actor,
    ) -> Result<DecisionOutcome, EnrollmentError> {
        let kind = ApplicantKind::Student;
        let located = self.locate(kind, handle).await?;
        let status = StudentStatus::EnrollmentComplete.label();
        let note = match notes.map(str::trim).filter(|s| !s.is_empty()) {
            Some(notes) => format!("Payment confirmed by {}: {}", actor.account_id, notes),
            None => format!("Payment confirmed by {}", actor.account_id),
        };
        let extra = [FieldWrite::new(FieldKey::PaymentStatus, "Paid")];

        self.commit_decision(kind, &located, status, COMPLETE_NEXT_STEPS, &note, &extra)
            .await?;

        let message = format!(
            "Payment received — your enrollment at Lifeline Academy is complete. {}",
            COMPLETE_NEXT_STEPS
        );
        let (notified, notify_target) = self.send_decision(&located.record, actor, &message).await;

        info!(handle = %located.record.handle, "Payment confirmed, enrollment complete");
        Ok(DecisionOutcome {
            handle: located.record.handle,
            kind,
            status: status.to_string(),
            next_steps: COMPLETE_NEXT_STEPS.to_string(),
            notified,
            notify_target,
        })
    }

    /// Bind a platform account to a record, establishing the access gate.
    /// The binding is never cleared by this workflow.
    pub async fn link_account(
        &self,
        kind: ApplicantKind,
        handle: &str,
        account_id: &str,
        actor: &Actor,
    ) -> Result<LinkOutcome, EnrollmentError> {
        let account_id = account_id.trim();
        if account_id.is_empty() {
            return Err(EnrollmentError::InvalidArgument(
                "account id must not be empty".to_string(),
            ));
        }

        let located = self.locate(kind, handle).await?;
        let note_line = stamped(&format!(
            "Linked to account {} by {}",
            account_id, actor.account_id
        ));
        let writes = [
            FieldWrite::new(FieldKey::LinkedAccountId, account_id),
            FieldWrite::new(
                FieldKey::StaffNotes,
                append_note(&located.record.staff_notes, &note_line),
            ),
            FieldWrite::new(FieldKey::LastUpdated, now()),
        ];
        self.store
            .update_fields(kind, located.row, &writes)
            .await?;

        info!(kind = kind.as_str(), handle = %located.record.handle, account_id, "Account linked");
        Ok(LinkOutcome {
            handle: located.record.handle,
            kind,
            linked_account_id: account_id.to_string(),
        })
    }

    /// Walk the student store once and remind every linked applicant whose
    /// signature field is still empty. Sequential and best-effort per
    /// record: one failed delivery does not halt the scan.
    pub async fn scan_missing_followups(&self) -> Result<ScanSummary, EnrollmentError> {
        let table = self.store.fetch_table(ApplicantKind::Student).await?;
        let mut summary = ScanSummary::default();

        for idx in 0..table.rows.len() {
            let record = ApplicationRecord::from_table(&table, idx);
            summary.scanned += 1;

            if !record.signature.is_empty() {
                continue;
            }

            match &record.linked_account_id {
                Some(account_id) => {
                    if self.notifier.notify(account_id, FOLLOWUP_REMINDER).await {
                        summary.notified += 1;
                    } else {
                        warn!(handle = %record.handle, "Follow-up reminder delivery failed");
                        summary.failed += 1;
                    }
                }
                None => {
                    debug!(handle = %record.handle, "Follow-up needed but record is unlinked");
                    summary.skipped_unlinked += 1;
                }
            }
        }

        info!(
            scanned = summary.scanned,
            notified = summary.notified,
            failed = summary.failed,
            skipped = summary.skipped_unlinked,
            "Follow-up scan complete"
        );
        Ok(summary)
    }

    /// Locate a row by handle, mapping absence to the user-facing reasons.
    async fn locate(&self, kind: ApplicantKind, handle: &str) -> Result<Located, EnrollmentError> {
        let table = self.store.fetch_table(kind).await?;

        if table.is_empty() {
            return Err(EnrollmentError::NotFound(EMPTY_SHEET_REASON.to_string()));
        }

        let idx = table.find_by_handle(handle).ok_or_else(|| {
            EnrollmentError::NotFound(format!(
                "No {} application matches handle \"{}\".",
                kind,
                handle.trim()
            ))
        })?;

        Ok(Located {
            row: table.row_ref(idx),
            record: ApplicationRecord::from_table(&table, idx),
        })
    }

    /// Commit a decision as one batched write.
    async fn commit_decision(
        &self,
        kind: ApplicantKind,
        located: &Located,
        status: &str,
        next_steps: &str,
        note: &str,
        extra: &[FieldWrite],
    ) -> Result<(), EnrollmentError> {
        let mut writes = vec![
            FieldWrite::new(FieldKey::Status, status),
            FieldWrite::new(FieldKey::NextSteps, next_steps),
            FieldWrite::new(
                FieldKey::StaffNotes,
                append_note(&located.record.staff_notes, &stamped(note)),
            ),
            FieldWrite::new(FieldKey::LastUpdated, now()),
        ];
        writes.extend_from_slice(extra);

        self.store.update_fields(kind, located.row, &writes).await?;
        Ok(())
    }

    /// Deliver a decision message. The linked account is the target when one
    /// exists; otherwise the staff actor who issued the command is notified,
    /// which means an unlinked applicant never receives the real
    /// notification.
    async fn send_decision(
        &self,
        record: &ApplicationRecord,
        actor: &Actor,
        message: &str,
    ) -> (bool, NotifyTarget) {
        let (target_id, target) = match &record.linked_account_id {
            Some(linked) => (linked.as_str(), NotifyTarget::Applicant),
            None => (actor.account_id.as_str(), NotifyTarget::StaffFallback),
        };

        let delivered = self.notifier.notify(target_id, message).await;
        if !delivered {
            warn!(handle = %record.handle, ?target, "Decision notification delivery failed");
        }
        (delivered, target)
    }
}

struct Located {
    record: ApplicationRecord,
    row: RowRef,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn stamped(note: &str) -> String {
    format!("[{}] {}", now(), note)
}

fn append_note(existing: &str, line: &str) -> String {
    if existing.trim().is_empty() {
        line.to_string()
    } else {
        format!("{existing}\n{line}")
    }
}
