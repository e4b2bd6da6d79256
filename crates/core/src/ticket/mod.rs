//! Applicant support tickets.
//!
//! A ticket is a scoped private channel between one applicant and staff,
//! created when self-service status lookup is not enough. Every request
//! creates a fresh channel (no dedup against an existing open ticket), and
//! the channel's opening message is a snapshot of the record at creation
//! time, not a live view. Closing is a manual staff action that posts a
//! notice and deletes the channel.

mod platform;
mod traits;
mod types;

pub use platform::PlatformTicketGateway;
pub use traits::TicketGateway;
pub use types::{ChannelRef, TicketContext, TicketError};
