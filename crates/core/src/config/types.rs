use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Record store access. Optional: without it the enrollment workflow is
    /// disabled and its endpoints report the feature as unavailable.
    #[serde(default)]
    pub roster: Option<RosterConfig>,
    /// Chat platform access. Optional: without it notifications, tickets,
    /// announcements and the daily scheduler are disabled.
    #[serde(default)]
    pub chat: Option<ChatConfig>,
    #[serde(default)]
    pub campus: CampusConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    /// Shared key (required when method = "api_key")
    #[serde(default)]
    pub api_key: Option<String>,
    /// Account ids always treated as staff
    #[serde(default)]
    pub staff_account_ids: Vec<String>,
    /// Role ids that grant staff standing
    #[serde(default)]
    pub staff_role_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    None,
    ApiKey,
}

/// Record store (spreadsheet service) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RosterConfig {
    /// Base URL of the tabular record store service
    /// (e.g. "https://sheets.googleapis.com")
    pub service_url: String,
    /// Bearer token for the record store service
    pub service_token: String,
    /// Store id holding student application records
    pub student_sheet_id: String,
    /// Store id holding teacher application records
    pub teacher_sheet_id: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Chat platform (Discord-compatible REST API) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    /// Base URL of the chat platform REST API
    #[serde(default = "default_chat_api_url")]
    pub api_url: String,
    /// Bot token for the chat platform
    pub bot_token: String,
    /// Guild the service operates in
    pub guild_id: String,
    /// Channel receiving operational log lines (best effort)
    #[serde(default)]
    pub log_channel_id: Option<String>,
    /// Channel receiving announcements
    #[serde(default)]
    pub announce_channel_id: Option<String>,
    /// Channel receiving daily bulletins
    #[serde(default)]
    pub calendar_channel_id: Option<String>,
    /// Channel receiving RP prompts
    #[serde(default)]
    pub lounge_channel_id: Option<String>,
    /// Category that ticket channels are created under
    #[serde(default)]
    pub ticket_category_id: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_chat_api_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Local campus data (schedule, points, attendance, passes, nurse queue)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CampusConfig {
    /// Directory holding the JSON-backed campus tables
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for CampusConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Daily bulletin/prompt scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Local hour (0-23) at which the daily bulletin posts
    #[serde(default = "default_bulletin_hour")]
    pub bulletin_hour: u8,
    /// Local hour (0-23) at which the daily RP prompt posts
    #[serde(default = "default_prompt_hour")]
    pub prompt_hour: u8,
    /// Fixed offset from UTC defining "local" time
    #[serde(default)]
    pub utc_offset_hours: i8,
    /// Poll interval for the scheduler loop (default: 20s)
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bulletin_hour: default_bulletin_hour(),
            prompt_hour: default_prompt_hour(),
            utc_offset_hours: 0,
            tick_secs: default_tick_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_bulletin_hour() -> u8 {
    8
}

fn default_prompt_hour() -> u8 {
    9
}

fn default_tick_secs() -> u64 {
    20
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roster: Option<SanitizedRosterConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat: Option<SanitizedChatConfig>,
    pub campus: CampusConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
    pub api_key_configured: bool,
    pub staff_account_ids: Vec<String>,
    pub staff_role_ids: Vec<String>,
}

/// Sanitized roster config (bearer token redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedRosterConfig {
    pub service_url: String,
    pub service_token_configured: bool,
    pub student_sheet_id: String,
    pub teacher_sheet_id: String,
    pub timeout_secs: u32,
}

/// Sanitized chat config (bot token redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedChatConfig {
    pub api_url: String,
    pub bot_token_configured: bool,
    pub guild_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announce_channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lounge_channel_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_category_id: Option<String>,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: match config.auth.method {
                    AuthMethod::None => "none".to_string(),
                    AuthMethod::ApiKey => "api_key".to_string(),
                },
                api_key_configured: config
                    .auth
                    .api_key
                    .as_ref()
                    .is_some_and(|k| !k.is_empty()),
                staff_account_ids: config.auth.staff_account_ids.clone(),
                staff_role_ids: config.auth.staff_role_ids.clone(),
            },
            server: config.server.clone(),
            roster: config.roster.as_ref().map(|r| SanitizedRosterConfig {
                service_url: r.service_url.clone(),
                service_token_configured: !r.service_token.is_empty(),
                student_sheet_id: r.student_sheet_id.clone(),
                teacher_sheet_id: r.teacher_sheet_id.clone(),
                timeout_secs: r.timeout_secs,
            }),
            chat: config.chat.as_ref().map(|c| SanitizedChatConfig {
                api_url: c.api_url.clone(),
                bot_token_configured: !c.bot_token.is_empty(),
                guild_id: c.guild_id.clone(),
                log_channel_id: c.log_channel_id.clone(),
                announce_channel_id: c.announce_channel_id.clone(),
                calendar_channel_id: c.calendar_channel_id.clone(),
                lounge_channel_id: c.lounge_channel_id.clone(),
                ticket_category_id: c.ticket_category_id.clone(),
                timeout_secs: c.timeout_secs,
            }),
            campus: config.campus.clone(),
            scheduler: config.scheduler.clone(),
        }
    }
}
