//! Hall pass requests and staff decisions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use super::store::{now_iso, JsonStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassReason {
    Nurse,
    Counselor,
    Office,
    Bathroom,
    Pickup,
}

impl PassReason {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nurse" => Some(PassReason::Nurse),
            "counselor" => Some(PassReason::Counselor),
            "office" => Some(PassReason::Office),
            "bathroom" => Some(PassReason::Bathroom),
            "pickup" | "early pickup" => Some(PassReason::Pickup),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PassReason::Nurse => "Nurse",
            PassReason::Counselor => "Counselor",
            PassReason::Office => "Office",
            PassReason::Bathroom => "Bathroom",
            PassReason::Pickup => "Early Pickup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    Pending,
    Approved,
    Denied,
}

impl PassStatus {
    pub fn label(self) -> &'static str {
        match self {
            PassStatus::Pending => "pending",
            PassStatus::Approved => "approved",
            PassStatus::Denied => "denied",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pass {
    pub id: String,
    pub student_id: String,
    pub reason: PassReason,
    pub details: String,
    pub status: PassStatus,
    pub created_at: String,
    #[serde(default)]
    pub decided_at: Option<String>,
    #[serde(default)]
    pub decided_by: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassBook {
    #[serde(default)]
    pub passes: HashMap<String, Pass>,
}

#[derive(Debug, Error)]
pub enum PassError {
    #[error("Pass not found: {0}")]
    NotFound(String),

    #[error("Pass {id} already decided: {status}")]
    AlreadyDecided { id: String, status: String },
}

/// Pass requests decided exactly once by staff.
pub struct PassDesk {
    store: JsonStore<PassBook>,
    data: RwLock<PassBook>,
}

impl PassDesk {
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let store = JsonStore::open(path);
        let data = RwLock::new(store.load());
        Self { store, data }
    }

    pub async fn request(&self, student_id: &str, reason: PassReason, details: &str) -> Pass {
        let pass = Pass {
            id: format!(
                "P{}",
                &Uuid::new_v4().simple().to_string()[..8].to_uppercase()
            ),
            student_id: student_id.to_string(),
            reason,
            details: details.to_string(),
            status: PassStatus::Pending,
            created_at: now_iso(),
            decided_at: None,
            decided_by: None,
            notes: None,
        };

        let mut data = self.data.write().await;
        data.passes.insert(pass.id.clone(), pass.clone());
        self.persist(&data);
        pass
    }

    /// Decide a pending pass. A pass is decided at most once.
    pub async fn decide(
        &self,
        pass_id: &str,
        approve: bool,
        notes: Option<String>,
        decided_by: &str,
    ) -> Result<Pass, PassError> {
        let mut data = self.data.write().await;
        let pass = data
            .passes
            .get_mut(pass_id)
            .ok_or_else(|| PassError::NotFound(pass_id.to_string()))?;

        if pass.status != PassStatus::Pending {
            return Err(PassError::AlreadyDecided {
                id: pass_id.to_string(),
                status: pass.status.label().to_string(),
            });
        }

        pass.status = if approve {
            PassStatus::Approved
        } else {
            PassStatus::Denied
        };
        pass.decided_at = Some(now_iso());
        pass.decided_by = Some(decided_by.to_string());
        pass.notes = notes.filter(|n| !n.trim().is_empty());
        let decided = pass.clone();

        self.persist(&data);
        Ok(decided)
    }

    pub async fn get(&self, pass_id: &str) -> Option<Pass> {
        self.data.read().await.passes.get(pass_id).cloned()
    }

    fn persist(&self, data: &PassBook) {
        if let Err(e) = self.store.save(data) {
            warn!("Failed to persist pass book: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desk() -> PassDesk {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passes.json");
        std::mem::forget(dir);
        PassDesk::open(path)
    }

    #[tokio::test]
    async fn request_and_approve() {
        let desk = desk();
        let pass = desk.request("s1", PassReason::Nurse, "headache").await;
        assert_eq!(pass.status, PassStatus::Pending);

        let decided = desk
            .decide(&pass.id, true, Some("take your time".to_string()), "staff-1")
            .await
            .unwrap();
        assert_eq!(decided.status, PassStatus::Approved);
        assert_eq!(decided.decided_by.as_deref(), Some("staff-1"));
        assert_eq!(decided.notes.as_deref(), Some("take your time"));
    }

    #[tokio::test]
    async fn double_decision_rejected() {
        let desk = desk();
        let pass = desk.request("s1", PassReason::Office, "").await;
        desk.decide(&pass.id, false, None, "staff-1").await.unwrap();

        let err = desk.decide(&pass.id, true, None, "staff-2").await;
        assert!(matches!(err, Err(PassError::AlreadyDecided { .. })));
    }

    #[tokio::test]
    async fn unknown_pass_rejected() {
        let desk = desk();
        assert!(matches!(
            desk.decide("PXXXX", true, None, "staff-1").await,
            Err(PassError::NotFound(_))
        ));
    }

    #[test]
    fn reason_parses() {
        assert_eq!(PassReason::parse("Nurse"), Some(PassReason::Nurse));
        assert_eq!(PassReason::parse("early pickup"), Some(PassReason::Pickup));
        assert_eq!(PassReason::parse("moon"), None);
    }
}
