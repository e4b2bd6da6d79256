//! Mock ticket gateway for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tokio::sync::RwLock;

use crate::chat::ChatError;
use crate::ticket::{ChannelRef, TicketContext, TicketError, TicketGateway};

/// Recording implementation of the `TicketGateway` trait.
pub struct MockTicketGateway {
    opened: RwLock<Vec<(String, TicketContext)>>,
    closed: RwLock<Vec<(ChannelRef, String)>>,
    counter: AtomicU32,
    fail: AtomicBool,
}

impl Default for MockTicketGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTicketGateway {
    pub fn new() -> Self {
        Self {
            opened: RwLock::new(Vec::new()),
            closed: RwLock::new(Vec::new()),
            counter: AtomicU32::new(0),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every operation fail as if the platform were down.
    pub fn fail_all(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Opened tickets as (requester account id, context) pairs.
    pub async fn opened(&self) -> Vec<(String, TicketContext)> {
        self.opened.read().await.clone()
    }

    /// Closed tickets as (channel, notice) pairs.
    pub async fn closed(&self) -> Vec<(ChannelRef, String)> {
        self.closed.read().await.clone()
    }
}

#[async_trait]
impl TicketGateway for MockTicketGateway {
    async fn open_ticket(
        &self,
        requester_account_id: &str,
        context: &TicketContext,
    ) -> Result<ChannelRef, TicketError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TicketError::Platform(ChatError::ConnectionFailed(
                "mock failure".to_string(),
            )));
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.opened
            .write()
            .await
            .push((requester_account_id.to_string(), context.clone()));
        Ok(ChannelRef(format!("ticket-chan-{n}")))
    }

    async fn close_ticket(&self, channel: &ChannelRef, notice: &str) -> Result<(), TicketError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TicketError::Platform(ChatError::ConnectionFailed(
                "mock failure".to_string(),
            )));
        }
        self.closed
            .write()
            .await
            .push((channel.clone(), notice.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn each_open_creates_a_fresh_channel() {
        let gateway = MockTicketGateway::new();
        let context = TicketContext::unresolved();

        let first = gateway.open_ticket("42", &context).await.unwrap();
        let second = gateway.open_ticket("42", &context).await.unwrap();
        assert_ne!(first, second);
        assert_eq!(gateway.opened().await.len(), 2);
    }

    #[tokio::test]
    async fn failure_switch_surfaces_platform_error() {
        let gateway = MockTicketGateway::new();
        gateway.fail_all(true);
        let err = gateway
            .open_ticket("42", &TicketContext::unresolved())
            .await
            .unwrap_err();
        assert!(matches!(err, TicketError::Platform(_)));
    }
}
