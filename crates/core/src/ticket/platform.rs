use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::{ChatClient, PermissionOverwrite, ALLOW_TICKET_ACCESS, DENY_VIEW};

use super::traits::TicketGateway;
use super::types::{ChannelRef, TicketContext, TicketError};

/// Ticket gateway backed by the chat platform's guild-channel API.
///
/// Channels are created under the configured ticket category (when set),
/// hidden from the guild at large, and opened to the requester plus the
/// configured staff roles.
pub struct PlatformTicketGateway {
    chat: Arc<ChatClient>,
    staff_role_ids: Vec<String>,
}

impl PlatformTicketGateway {
    pub fn new(chat: Arc<ChatClient>, staff_role_ids: Vec<String>) -> Self {
        Self {
            chat,
            staff_role_ids,
        }
    }

    fn channel_name(&self, requester_account_id: &str, context: &TicketContext) -> String {
        let base = if context.handle == "(unknown)" {
            requester_account_id
        } else {
            &context.handle
        };
        let slug: String = base
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .flat_map(|c| c.to_lowercase())
            .take(24)
            .collect();
        let suffix = Uuid::new_v4().simple().to_string();
        format!("ticket-{}-{}", slug, &suffix[..8])
    }

    fn overwrites(&self, requester_account_id: &str) -> Vec<PermissionOverwrite> {
        // The @everyone role shares the guild's id.
        let mut overwrites = vec![
            PermissionOverwrite::deny_role(self.chat.guild_id(), DENY_VIEW),
            PermissionOverwrite::allow_member(requester_account_id, ALLOW_TICKET_ACCESS),
        ];
        for role_id in &self.staff_role_ids {
            overwrites.push(PermissionOverwrite::allow_role(role_id, ALLOW_TICKET_ACCESS));
        }
        overwrites
    }
}

#[async_trait]
impl TicketGateway for PlatformTicketGateway {
    async fn open_ticket(
        &self,
        requester_account_id: &str,
        context: &TicketContext,
    ) -> Result<ChannelRef, TicketError> {
        let name = self.channel_name(requester_account_id, context);
        let channel_id = self
            .chat
            .create_guild_channel(
                &name,
                self.chat.ticket_category_id(),
                self.overwrites(requester_account_id),
            )
            .await?;

        // The opening snapshot is best effort: the channel already exists,
        // and staff can see who opened it either way.
        if let Err(e) = self
            .chat
            .send_message(&channel_id, &context.opening_message(requester_account_id))
            .await
        {
            warn!(channel_id, "Failed to post ticket opening message: {}", e);
        }

        info!(channel_id, requester_account_id, "Ticket opened");
        Ok(ChannelRef(channel_id))
    }

    async fn close_ticket(&self, channel: &ChannelRef, notice: &str) -> Result<(), TicketError> {
        if let Err(e) = self.chat.send_message(&channel.0, notice).await {
            warn!(channel = %channel, "Failed to post closing notice: {}", e);
        }
        self.chat.delete_channel(&channel.0).await?;
        info!(channel = %channel.0, "Ticket closed");
        Ok(())
    }
}
