//! Campus day-to-day features: schedule, points, attendance, passes, the
//! nurse queue and RP prompts.
//!
//! Each feature keeps its state in a small JSON-backed table under the
//! configured data directory, mirroring the layout the academy has always
//! used. These are simple local tables, not the external record stores the
//! enrollment workflow talks to.

mod attendance;
mod groups;
mod nurse;
mod passes;
mod points;
mod prompts;
mod schedule;
mod store;

pub use attendance::{
    AttendanceError, AttendanceLog, AttendanceMark, AttendanceSession, AttendanceStatus,
    SessionTotals,
};
pub use groups::{make_groups, parse_mentions, GroupsError};
pub use nurse::{NurseEntry, NurseQueue};
pub use passes::{Pass, PassDesk, PassError, PassReason, PassStatus};
pub use points::{LeaderboardEntry, PointsEntry, PointsLedger};
pub use prompts::PromptPool;
pub use schedule::{ScheduleBlock, ScheduleBook, SchoolDay};
pub use store::JsonStore;

use std::path::Path;

/// All campus feature services, opened over one data directory.
pub struct Campus {
    pub schedule: ScheduleBook,
    pub points: PointsLedger,
    pub attendance: AttendanceLog,
    pub passes: PassDesk,
    pub nurse: NurseQueue,
    pub prompts: PromptPool,
}

impl Campus {
    pub fn open(data_dir: &Path) -> Self {
        Self {
            schedule: ScheduleBook::open(data_dir.join("oscar_schedule.json")),
            points: PointsLedger::open(data_dir.join("oscar_points.json")),
            attendance: AttendanceLog::open(data_dir.join("oscar_attendance.json")),
            passes: PassDesk::open(data_dir.join("oscar_passes.json")),
            nurse: NurseQueue::open(data_dir.join("oscar_nurse_queue.json")),
            prompts: PromptPool::open(data_dir.join("oscar_prompts.json")),
        }
    }
}
