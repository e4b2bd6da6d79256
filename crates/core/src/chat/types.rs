use serde::Serialize;
use thiserror::Error;

/// Permission bits granted to ticket participants:
/// VIEW_CHANNEL | SEND_MESSAGES | READ_MESSAGE_HISTORY.
pub const ALLOW_TICKET_ACCESS: u64 = (1 << 10) | (1 << 11) | (1 << 16);

/// Permission bits withheld from everyone else: VIEW_CHANNEL.
pub const DENY_VIEW: u64 = 1 << 10;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat platform timed out")]
    Timeout,

    #[error("Chat platform connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Chat platform error: {0}")]
    ApiError(String),

    #[error("Malformed chat platform response: {0}")]
    BadResponse(String),
}

/// Per-channel permission overwrite for a role or member.
///
/// The platform expects `allow`/`deny` bitmasks as decimal strings and
/// distinguishes targets by a numeric type: 0 = role, 1 = member.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionOverwrite {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub allow: String,
    pub deny: String,
}

impl PermissionOverwrite {
    pub fn allow_role(role_id: impl Into<String>, allow: u64) -> Self {
        Self {
            id: role_id.into(),
            kind: 0,
            allow: allow.to_string(),
            deny: "0".to_string(),
        }
    }

    pub fn allow_member(account_id: impl Into<String>, allow: u64) -> Self {
        Self {
            id: account_id.into(),
            kind: 1,
            allow: allow.to_string(),
            deny: "0".to_string(),
        }
    }

    pub fn deny_role(role_id: impl Into<String>, deny: u64) -> Self {
        Self {
            id: role_id.into(),
            kind: 0,
            allow: "0".to_string(),
            deny: deny.to_string(),
        }
    }
}
