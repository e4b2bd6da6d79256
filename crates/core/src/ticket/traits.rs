use async_trait::async_trait;

use super::types::{ChannelRef, TicketContext, TicketError};

/// Creates and tears down scoped ticket channels.
#[async_trait]
pub trait TicketGateway: Send + Sync {
    /// Create a fresh private channel for the requesting account and seed it
    /// with the context snapshot. Succeeds whenever the platform allows it;
    /// repeated requests from the same account open additional channels.
    async fn open_ticket(
        &self,
        requester_account_id: &str,
        context: &TicketContext,
    ) -> Result<ChannelRef, TicketError>;

    /// Post a closing notice and delete the channel. Staff-only; enforced by
    /// the caller.
    async fn close_ticket(&self, channel: &ChannelRef, notice: &str) -> Result<(), TicketError>;
}
