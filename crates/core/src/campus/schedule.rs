//! Weekly class schedule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::warn;

use super::store::{now_iso, JsonStore};

/// Most blocks a single day will hold.
const MAX_BLOCKS_PER_DAY: usize = 20;

/// School days, Monday through Friday.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum SchoolDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl SchoolDay {
    pub const ALL: [SchoolDay; 5] = [
        SchoolDay::Monday,
        SchoolDay::Tuesday,
        SchoolDay::Wednesday,
        SchoolDay::Thursday,
        SchoolDay::Friday,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SchoolDay::Monday => "Monday",
            SchoolDay::Tuesday => "Tuesday",
            SchoolDay::Wednesday => "Wednesday",
            SchoolDay::Thursday => "Thursday",
            SchoolDay::Friday => "Friday",
        }
    }

    /// Day for a chrono weekday; None on weekends.
    pub fn from_weekday(weekday: chrono::Weekday) -> Option<Self> {
        match weekday {
            chrono::Weekday::Mon => Some(SchoolDay::Monday),
            chrono::Weekday::Tue => Some(SchoolDay::Tuesday),
            chrono::Weekday::Wed => Some(SchoolDay::Wednesday),
            chrono::Weekday::Thu => Some(SchoolDay::Thursday),
            chrono::Weekday::Fri => Some(SchoolDay::Friday),
            _ => None,
        }
    }
}

impl fmt::Display for SchoolDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SchoolDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monday" => Ok(SchoolDay::Monday),
            "tuesday" => Ok(SchoolDay::Tuesday),
            "wednesday" => Ok(SchoolDay::Wednesday),
            "thursday" => Ok(SchoolDay::Thursday),
            "friday" => Ok(SchoolDay::Friday),
            other => Err(format!("not a school day: {other}")),
        }
    }
}

/// One schedule entry: a period, class or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleBlock {
    pub label: String,
    pub details: String,
    pub updated_by: String,
    pub updated_at: String,
}

/// The persisted week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekSchedule {
    #[serde(default)]
    pub days: BTreeMap<SchoolDay, Vec<ScheduleBlock>>,
    #[serde(default)]
    pub last_updated_at: Option<String>,
}

/// The academy's weekly schedule, persisted per mutation.
pub struct ScheduleBook {
    store: JsonStore<WeekSchedule>,
    data: RwLock<WeekSchedule>,
}

impl ScheduleBook {
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let store = JsonStore::open(path);
        let data = RwLock::new(store.load());
        Self { store, data }
    }

    /// Insert a block, optionally at a 1-based position (appended
    /// otherwise). Returns the 1-based position it landed at.
    pub async fn set_block(
        &self,
        day: SchoolDay,
        label: String,
        details: String,
        position: Option<usize>,
        updated_by: &str,
    ) -> usize {
        let mut data = self.data.write().await;
        let blocks = data.days.entry(day).or_default();
        let block = ScheduleBlock {
            label,
            details,
            updated_by: updated_by.to_string(),
            updated_at: now_iso(),
        };

        let at = match position {
            Some(p) if p >= 1 && p <= blocks.len().min(MAX_BLOCKS_PER_DAY) => {
                blocks.insert(p - 1, block);
                p
            }
            _ => {
                blocks.push(block);
                blocks.len()
            }
        };
        data.last_updated_at = Some(now_iso());
        self.persist(&data);
        at
    }

    /// Remove every block for a day.
    pub async fn clear_day(&self, day: SchoolDay) {
        let mut data = self.data.write().await;
        data.days.remove(&day);
        data.last_updated_at = Some(now_iso());
        self.persist(&data);
    }

    pub async fn day_blocks(&self, day: SchoolDay) -> Vec<ScheduleBlock> {
        self.data
            .read()
            .await
            .days
            .get(&day)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn week(&self) -> Vec<(SchoolDay, Vec<ScheduleBlock>)> {
        let data = self.data.read().await;
        SchoolDay::ALL
            .iter()
            .map(|day| (*day, data.days.get(day).cloned().unwrap_or_default()))
            .collect()
    }

    /// Bulletin text for a day's blocks.
    pub fn render_blocks(blocks: &[ScheduleBlock]) -> String {
        if blocks.is_empty() {
            return "No schedule posted yet.".to_string();
        }
        blocks
            .iter()
            .enumerate()
            .map(|(i, b)| format!("{}. {}: {}", i + 1, b.label, b.details))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn persist(&self, data: &WeekSchedule) {
        if let Err(e) = self.store.save(data) {
            warn!("Failed to persist schedule: {}", e);
        }
    }
}
