use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::chat::ChatClient;

use super::traits::Notifier;

/// Notifier delivering through the chat platform's direct-message API.
pub struct PlatformNotifier {
    chat: Arc<ChatClient>,
}

impl PlatformNotifier {
    pub fn new(chat: Arc<ChatClient>) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Notifier for PlatformNotifier {
    async fn notify(&self, account_id: &str, message: &str) -> bool {
        let channel = match self.chat.create_dm(account_id).await {
            Ok(channel) => channel,
            Err(e) => {
                warn!(account_id, "Failed to open DM channel: {}", e);
                return false;
            }
        };

        match self.chat.send_message(&channel, message).await {
            Ok(()) => {
                debug!(account_id, "Delivered notification");
                true
            }
            Err(e) => {
                warn!(account_id, "Failed to deliver notification: {}", e);
                false
            }
        }
    }
}
