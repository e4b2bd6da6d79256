//! Daily bulletin and prompt scheduler.
//!
//! A single background loop polls on a short interval and fires each post at
//! most once per local day, keyed by date. "Local" is the configured fixed
//! UTC offset. The loop shuts down over a broadcast channel, mirroring the
//! server's graceful-stop flow.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Timelike, Utc};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use oscar_core::campus::{ScheduleBook, SchoolDay};
use oscar_core::{Campus, ChatClient, SchedulerConfig};

/// Daily-key slots for the two scheduled posts.
#[derive(Default)]
struct FiredKeys {
    bulletin: RwLock<Option<String>>,
    prompt: RwLock<Option<String>>,
}

/// The daily scheduler: posts the bulletin and the RP prompt once per day.
pub struct DailyScheduler {
    config: SchedulerConfig,
    chat: Arc<ChatClient>,
    campus: Arc<Campus>,
    running: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
    fired: Arc<FiredKeys>,
}

impl DailyScheduler {
    pub fn new(config: SchedulerConfig, chat: Arc<ChatClient>, campus: Arc<Campus>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            chat,
            campus,
            running: Arc::new(AtomicBool::new(false)),
            shutdown_tx,
            fired: Arc::new(FiredKeys::default()),
        }
    }

    /// Start the scheduler loop.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Scheduler already running");
            return;
        }

        info!(
            bulletin_hour = self.config.bulletin_hour,
            prompt_hour = self.config.prompt_hour,
            utc_offset = self.config.utc_offset_hours,
            "Starting daily scheduler"
        );

        let config = self.config.clone();
        let chat = Arc::clone(&self.chat);
        let campus = Arc::clone(&self.campus);
        let fired = Arc::clone(&self.fired);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(config.tick_secs));
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        tick(&config, &chat, &campus, &fired, Utc::now()).await;
                    }
                    _ = shutdown_rx.recv() => {
                        info!("Daily scheduler stopped");
                        break;
                    }
                }
            }
        });
    }

    /// Stop the scheduler loop.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            let _ = self.shutdown_tx.send(());
        }
    }
}

/// One poll: fire whichever daily posts are due.
async fn tick(
    config: &SchedulerConfig,
    chat: &ChatClient,
    campus: &Campus,
    fired: &FiredKeys,
    now: DateTime<Utc>,
) {
    let local = now + chrono::Duration::hours(config.utc_offset_hours as i64);
    let date_key = local.format("%Y-%m-%d").to_string();

    if local.hour() == config.bulletin_hour as u32 {
        let key = format!("{date_key}:bulletin");
        if claim(&fired.bulletin, &key).await {
            post_bulletin(chat, campus, local).await;
        }
    }

    if local.hour() == config.prompt_hour as u32 {
        let key = format!("{date_key}:prompt");
        if claim(&fired.prompt, &key).await {
            post_prompt(chat, campus).await;
        }
    }
}

/// Mark a daily key as fired; false when it already fired today.
async fn claim(slot: &RwLock<Option<String>>, key: &str) -> bool {
    let mut last = slot.write().await;
    if last.as_deref() == Some(key) {
        return false;
    }
    *last = Some(key.to_string());
    true
}

async fn post_bulletin(chat: &ChatClient, campus: &Campus, local: DateTime<Utc>) {
    let Some(channel_id) = chat.calendar_channel_id() else {
        debug!("No calendar channel configured; skipping bulletin");
        return;
    };

    let body = match SchoolDay::from_weekday(local.weekday()) {
        Some(day) => {
            let blocks = campus.schedule.day_blocks(day).await;
            format!(
                "**Daily Bulletin** ({})\n{}\n\nStay respectful, stay in character, and ask staff if you need help.",
                day.label(),
                ScheduleBook::render_blocks(&blocks)
            )
        }
        None => "**Daily Bulletin**\nNo classes scheduled today.".to_string(),
    };

    match chat.send_message(channel_id, &body).await {
        Ok(()) => {
            info!("Auto bulletin posted");
            chat.post_log("Auto bulletin posted.").await;
        }
        Err(e) => warn!("Failed to post auto bulletin: {}", e),
    }
}

async fn post_prompt(chat: &ChatClient, campus: &Campus) {
    let Some(channel_id) = chat.lounge_channel_id() else {
        debug!("No lounge channel configured; skipping prompt");
        return;
    };

    let prompt = campus.prompts.draw().await;
    let body = format!("**Daily RP Prompt**\n{prompt}");

    match chat.send_message(channel_id, &body).await {
        Ok(()) => {
            campus.prompts.mark_posted().await;
            info!("Auto daily prompt posted");
            chat.post_log("Auto daily prompt posted.").await;
        }
        Err(e) => warn!("Failed to post auto prompt: {}", e),
    }
}
