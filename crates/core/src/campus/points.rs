//! Student points ledger.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::warn;

use super::store::{now_iso, JsonStore};

/// History entries kept per student.
const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsEntry {
    pub at: String,
    pub delta: i64,
    pub reason: String,
    pub by: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentPoints {
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub history: Vec<PointsEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointsBook {
    #[serde(default)]
    pub students: HashMap<String, StudentPoints>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub account_id: String,
    pub total: i64,
}

/// Points awarded and deducted by teachers, with a capped per-student
/// history.
pub struct PointsLedger {
    store: JsonStore<PointsBook>,
    data: RwLock<PointsBook>,
}

impl PointsLedger {
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let store = JsonStore::open(path);
        let data = RwLock::new(store.load());
        Self { store, data }
    }

    /// Apply a signed delta and return the student's new total. Newest
    /// history entries come first.
    pub async fn award(&self, account_id: &str, delta: i64, reason: &str, by: &str) -> i64 {
        let mut data = self.data.write().await;
        let student = data.students.entry(account_id.to_string()).or_default();
        student.total += delta;
        student.history.insert(
            0,
            PointsEntry {
                at: now_iso(),
                delta,
                reason: reason.to_string(),
                by: by.to_string(),
            },
        );
        student.history.truncate(HISTORY_LIMIT);
        let total = student.total;

        if let Err(e) = self.store.save(&data) {
            warn!("Failed to persist points ledger: {}", e);
        }
        total
    }

    /// Top students by total, descending.
    pub async fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let data = self.data.read().await;
        let mut entries: Vec<LeaderboardEntry> = data
            .students
            .iter()
            .map(|(account_id, points)| LeaderboardEntry {
                account_id: account_id.clone(),
                total: points.total,
            })
            .collect();
        entries.sort_by(|a, b| b.total.cmp(&a.total).then(a.account_id.cmp(&b.account_id)));
        entries.truncate(limit);
        entries
    }

    pub async fn history(&self, account_id: &str) -> Vec<PointsEntry> {
        self.data
            .read()
            .await
            .students
            .get(account_id)
            .map(|s| s.history.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> PointsLedger {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.json");
        std::mem::forget(dir);
        PointsLedger::open(path)
    }

    #[tokio::test]
    async fn award_accumulates_and_records_history() {
        let ledger = ledger();
        assert_eq!(ledger.award("s1", 10, "helped a classmate", "t1").await, 10);
        assert_eq!(ledger.award("s1", -3, "late to class", "t1").await, 7);

        let history = ledger.history("s1").await;
        assert_eq!(history.len(), 2);
        // Newest first.
        assert_eq!(history[0].delta, -3);
    }

    #[tokio::test]
    async fn history_is_capped() {
        let ledger = ledger();
        for i in 0..60 {
            ledger.award("s1", 1, &format!("entry {i}"), "t1").await;
        }
        let history = ledger.history("s1").await;
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0].reason, "entry 59");
    }

    #[tokio::test]
    async fn leaderboard_sorts_descending() {
        let ledger = ledger();
        ledger.award("a", 5, "r", "t").await;
        ledger.award("b", 20, "r", "t").await;
        ledger.award("c", 10, "r", "t").await;

        let board = ledger.leaderboard(2).await;
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].account_id, "b");
        assert_eq!(board[1].account_id, "c");
    }
}
