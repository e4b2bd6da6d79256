use async_trait::async_trait;
use tracing::debug;

use super::traits::Notifier;

/// Notifier used when no chat platform is configured: every delivery is
/// reported as failed so callers fall back to their usual logging.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl NullNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for NullNotifier {
    async fn notify(&self, account_id: &str, _message: &str) -> bool {
        debug!(account_id, "Notification dropped: chat platform not configured");
        false
    }
}
