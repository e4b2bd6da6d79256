//! Chat platform REST client.
//!
//! Thin client over the guild platform's HTTP API (Discord-compatible v10
//! paths): direct-message channels, channel messages, scoped guild channels
//! with permission overwrites, and the best-effort operations log channel.
//! Everything here is outbound plumbing; workflow decisions never depend on
//! chat delivery succeeding.

mod client;
mod types;

pub use client::ChatClient;
pub use types::{ChatError, PermissionOverwrite, ALLOW_TICKET_ACCESS, DENY_VIEW};
