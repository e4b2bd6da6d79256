//! Classroom attendance sessions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use super::store::{now_iso, JsonStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "present" => Some(AttendanceStatus::Present),
            "late" => Some(AttendanceStatus::Late),
            "excused" => Some(AttendanceStatus::Excused),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub status: AttendanceStatus,
    pub at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceSession {
    pub class_name: String,
    pub teacher_id: String,
    pub opened_at: String,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub marks: HashMap<String, AttendanceMark>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceBook {
    #[serde(default)]
    pub sessions: HashMap<String, AttendanceSession>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTotals {
    pub present: u32,
    pub late: u32,
    pub excused: u32,
}

#[derive(Debug, Error)]
pub enum AttendanceError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Session is closed: {0}")]
    SessionClosed(String),
}

/// Attendance sessions opened by teachers and marked by students.
pub struct AttendanceLog {
    store: JsonStore<AttendanceBook>,
    data: RwLock<AttendanceBook>,
}

impl AttendanceLog {
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let store = JsonStore::open(path);
        let data = RwLock::new(store.load());
        Self { store, data }
    }

    /// Open a session and return its id.
    pub async fn open_session(&self, class_name: &str, teacher_id: &str) -> String {
        let id = format!(
            "S{}",
            &Uuid::new_v4().simple().to_string()[..8].to_uppercase()
        );
        let mut data = self.data.write().await;
        data.sessions.insert(
            id.clone(),
            AttendanceSession {
                class_name: class_name.to_string(),
                teacher_id: teacher_id.to_string(),
                opened_at: now_iso(),
                closed_at: None,
                marks: HashMap::new(),
            },
        );
        self.persist(&data);
        id
    }

    /// Mark a student in an open session. Re-marking overwrites.
    pub async fn mark(
        &self,
        session_id: &str,
        account_id: &str,
        status: AttendanceStatus,
    ) -> Result<(), AttendanceError> {
        let mut data = self.data.write().await;
        let session = data
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| AttendanceError::SessionNotFound(session_id.to_string()))?;
        if session.closed_at.is_some() {
            return Err(AttendanceError::SessionClosed(session_id.to_string()));
        }
        session.marks.insert(
            account_id.to_string(),
            AttendanceMark {
                status,
                at: now_iso(),
            },
        );
        self.persist(&data);
        Ok(())
    }

    /// Close a session and return the mark totals.
    pub async fn close(&self, session_id: &str) -> Result<SessionTotals, AttendanceError> {
        let mut data = self.data.write().await;
        let session = data
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| AttendanceError::SessionNotFound(session_id.to_string()))?;
        if session.closed_at.is_some() {
            return Err(AttendanceError::SessionClosed(session_id.to_string()));
        }
        session.closed_at = Some(now_iso());

        let mut totals = SessionTotals::default();
        for mark in session.marks.values() {
            match mark.status {
                AttendanceStatus::Present => totals.present += 1,
                AttendanceStatus::Late => totals.late += 1,
                AttendanceStatus::Excused => totals.excused += 1,
            }
        }
        self.persist(&data);
        Ok(totals)
    }

    pub async fn session(&self, session_id: &str) -> Option<AttendanceSession> {
        self.data.read().await.sessions.get(session_id).cloned()
    }

    fn persist(&self, data: &AttendanceBook) {
        if let Err(e) = self.store.save(data) {
            warn!("Failed to persist attendance log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log() -> AttendanceLog {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attendance.json");
        std::mem::forget(dir);
        AttendanceLog::open(path)
    }

    #[tokio::test]
    async fn open_mark_close_totals() {
        let log = log();
        let id = log.open_session("Biology", "t1").await;

        log.mark(&id, "s1", AttendanceStatus::Present).await.unwrap();
        log.mark(&id, "s2", AttendanceStatus::Late).await.unwrap();
        log.mark(&id, "s3", AttendanceStatus::Present).await.unwrap();
        // Re-marking overwrites.
        log.mark(&id, "s3", AttendanceStatus::Excused).await.unwrap();

        let totals = log.close(&id).await.unwrap();
        assert_eq!(totals.present, 1);
        assert_eq!(totals.late, 1);
        assert_eq!(totals.excused, 1);
    }

    #[tokio::test]
    async fn marking_closed_session_fails() {
        let log = log();
        let id = log.open_session("Math", "t1").await;
        log.close(&id).await.unwrap();

        let err = log.mark(&id, "s1", AttendanceStatus::Present).await;
        assert!(matches!(err, Err(AttendanceError::SessionClosed(_))));
    }

    #[tokio::test]
    async fn closing_twice_fails() {
        let log = log();
        let id = log.open_session("Math", "t1").await;
        log.close(&id).await.unwrap();
        assert!(matches!(
            log.close(&id).await,
            Err(AttendanceError::SessionClosed(_))
        ));
    }

    #[tokio::test]
    async fn unknown_session_fails() {
        let log = log();
        assert!(matches!(
            log.mark("nope", "s1", AttendanceStatus::Present).await,
            Err(AttendanceError::SessionNotFound(_))
        ));
    }

    #[test]
    fn status_parses_loosely() {
        assert_eq!(
            AttendanceStatus::parse(" Present "),
            Some(AttendanceStatus::Present)
        );
        assert_eq!(AttendanceStatus::parse("absent"), None);
    }
}
