use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::chat::ChatError;
use crate::roster::ApplicantKind;

/// Reference to a ticket's platform channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef(pub String);

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-only record snapshot posted into a fresh ticket channel.
///
/// Captured at creation time; later record changes do not update an open
/// ticket's opening message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketContext {
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ApplicantKind>,
    pub status: String,
    pub next_steps: String,
}

impl TicketContext {
    /// Context for a requester whose record could not be resolved.
    pub fn unresolved() -> Self {
        Self {
            handle: "(unknown)".to_string(),
            kind: None,
            status: "Unknown".to_string(),
            next_steps: "No record located yet.".to_string(),
        }
    }

    /// Render the opening message for the ticket channel.
    pub fn opening_message(&self, requester_account_id: &str) -> String {
        let kind = self
            .kind
            .map(|k| k.label())
            .unwrap_or("Unknown");
        format!(
            "Support ticket opened by <@{}>.\n\
             Handle: {}\n\
             Application type: {}\n\
             Status at ticket creation: {}\n\
             Next steps at ticket creation: {}\n\n\
             Staff will respond here. This snapshot does not update.",
            requester_account_id, self.handle, kind, self.status, self.next_steps
        )
    }
}

/// Error type for ticket operations.
#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Ticketing is not configured")]
    NotConfigured,

    #[error(transparent)]
    Platform(#[from] ChatError),
}
