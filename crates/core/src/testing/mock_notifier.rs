//! Mock notifier for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::notify::Notifier;

/// Recording implementation of the `Notifier` trait.
///
/// Every attempted delivery is recorded whether or not it "succeeds", so
/// tests can assert on exactly-one-attempt behavior.
pub struct MockNotifier {
    deliveries: RwLock<Vec<(String, String)>>,
    fail_all: AtomicBool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            deliveries: RwLock::new(Vec::new()),
            fail_all: AtomicBool::new(false),
        }
    }

    /// Make every delivery report failure.
    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Attempted deliveries as (account id, message) pairs.
    pub async fn deliveries(&self) -> Vec<(String, String)> {
        self.deliveries.read().await.clone()
    }

    pub async fn delivery_count(&self) -> usize {
        self.deliveries.read().await.len()
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, account_id: &str, message: &str) -> bool {
        self.deliveries
            .write()
            .await
            .push((account_id.to_string(), message.to_string()));
        !self.fail_all.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_deliveries() {
        let notifier = MockNotifier::new();
        assert!(notifier.notify("42", "hello").await);

        let deliveries = notifier.deliveries().await;
        assert_eq!(deliveries, vec![("42".to_string(), "hello".to_string())]);
    }

    #[tokio::test]
    async fn failure_switch_still_records() {
        let notifier = MockNotifier::new();
        notifier.fail_all(true);
        assert!(!notifier.notify("42", "hello").await);
        assert_eq!(notifier.delivery_count().await, 1);
    }
}
