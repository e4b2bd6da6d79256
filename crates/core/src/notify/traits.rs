use async_trait::async_trait;

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Attempt to deliver a direct message to the given platform account.
    /// Returns whether delivery was accepted; failures are reported as
    /// `false`, never as an error.
    async fn notify(&self, account_id: &str, message: &str) -> bool;
}
