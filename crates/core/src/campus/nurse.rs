//! Nurse station check-in queue.

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use super::store::{now_iso, JsonStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseEntry {
    pub account_id: String,
    pub reason: String,
    pub at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NurseQueueData {
    #[serde(default)]
    pub queue: Vec<NurseEntry>,
}

/// FIFO queue of students waiting for the nurse.
pub struct NurseQueue {
    store: JsonStore<NurseQueueData>,
    data: RwLock<NurseQueueData>,
}

impl NurseQueue {
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let store = JsonStore::open(path);
        let data = RwLock::new(store.load());
        Self { store, data }
    }

    pub async fn check_in(&self, account_id: &str, reason: &str) -> usize {
        let mut data = self.data.write().await;
        data.queue.push(NurseEntry {
            account_id: account_id.to_string(),
            reason: reason.to_string(),
            at: now_iso(),
        });
        let position = data.queue.len();
        self.persist(&data);
        position
    }

    pub async fn call_next(&self) -> Option<NurseEntry> {
        let mut data = self.data.write().await;
        if data.queue.is_empty() {
            return None;
        }
        let next = data.queue.remove(0);
        self.persist(&data);
        Some(next)
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.queue.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn persist(&self, data: &NurseQueueData) {
        if let Err(e) = self.store.save(data) {
            warn!("Failed to persist nurse queue: {}", e);
        }
    }
}
