use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ChatConfig;

use super::types::{ChatError, PermissionOverwrite};

/// Platform channel type for a guild text channel.
const CHANNEL_TYPE_TEXT: u8 = 0;

/// Hard platform cap on message length.
const MAX_MESSAGE_LEN: usize = 2000;

/// Length budget for operations-log lines, leaving headroom under the cap.
const MAX_LOG_LEN: usize = 1900;

/// REST client for the guild chat platform.
pub struct ChatClient {
    client: Client,
    config: ChatConfig,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    pub fn guild_id(&self) -> &str {
        &self.config.guild_id
    }

    pub fn announce_channel_id(&self) -> Option<&str> {
        self.config.announce_channel_id.as_deref()
    }

    pub fn calendar_channel_id(&self) -> Option<&str> {
        self.config.calendar_channel_id.as_deref()
    }

    pub fn lounge_channel_id(&self) -> Option<&str> {
        self.config.lounge_channel_id.as_deref()
    }

    pub fn ticket_category_id(&self) -> Option<&str> {
        self.config.ticket_category_id.as_deref()
    }

    fn base_url(&self) -> &str {
        self.config.api_url.trim_end_matches('/')
    }

    fn auth_value(&self) -> String {
        format!("Bot {}", self.config.bot_token)
    }

    /// Open (or reuse, platform-side) a direct-message channel with a user.
    pub async fn create_dm(&self, account_id: &str) -> Result<String, ChatError> {
        let url = format!("{}/users/@me/channels", self.base_url());
        let response: ChannelResponse = self
            .post_json(
                &url,
                &CreateDmBody {
                    recipient_id: account_id,
                },
            )
            .await?;
        Ok(response.id)
    }

    /// Post a plain message to a channel. Content is clipped to the platform
    /// cap rather than rejected.
    pub async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), ChatError> {
        let url = format!(
            "{}/channels/{}/messages",
            self.base_url(),
            urlencoding::encode(channel_id)
        );
        let _: MessageResponse = self
            .post_json(
                &url,
                &MessageBody {
                    content: clip(content, MAX_MESSAGE_LEN),
                },
            )
            .await?;
        Ok(())
    }

    /// Create a guild text channel, optionally under a category, with the
    /// given permission overwrites.
    pub async fn create_guild_channel(
        &self,
        name: &str,
        parent_id: Option<&str>,
        permission_overwrites: Vec<PermissionOverwrite>,
    ) -> Result<String, ChatError> {
        let url = format!(
            "{}/guilds/{}/channels",
            self.base_url(),
            urlencoding::encode(&self.config.guild_id)
        );
        let response: ChannelResponse = self
            .post_json(
                &url,
                &CreateChannelBody {
                    name,
                    kind: CHANNEL_TYPE_TEXT,
                    parent_id,
                    permission_overwrites,
                },
            )
            .await?;
        Ok(response.id)
    }

    pub async fn delete_channel(&self, channel_id: &str) -> Result<(), ChatError> {
        let url = format!(
            "{}/channels/{}",
            self.base_url(),
            urlencoding::encode(channel_id)
        );

        let response = self
            .client
            .delete(&url)
            .header(AUTHORIZATION, self.auth_value())
            .send()
            .await
            .map_err(map_transport)?;

        check_status(response).await.map(|_| ())
    }

    /// Post a line to the operations log channel, if one is configured.
    /// Failures are logged and swallowed; the log is never load-bearing.
    pub async fn post_log(&self, message: &str) {
        let Some(channel_id) = self.config.log_channel_id.as_deref() else {
            return;
        };

        if let Err(e) = self
            .send_message(channel_id, &clip(message, MAX_LOG_LEN))
            .await
        {
            warn!("Failed to post operations log line: {}", e);
        } else {
            debug!("Posted operations log line");
        }
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ChatError> {
        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, self.auth_value())
            .json(body)
            .send()
            .await
            .map_err(map_transport)?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ChatError::BadResponse(e.to_string()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ChatError::ApiError(format!(
        "HTTP {}: {}",
        status,
        body.chars().take(200).collect::<String>()
    )))
}

fn map_transport(e: reqwest::Error) -> ChatError {
    if e.is_timeout() {
        ChatError::Timeout
    } else if e.is_connect() {
        ChatError::ConnectionFailed(e.to_string())
    } else {
        ChatError::ApiError(e.to_string())
    }
}

fn clip(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[derive(Debug, Serialize)]
struct CreateDmBody<'a> {
    recipient_id: &'a str,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    content: String,
}

#[derive(Debug, Serialize)]
struct CreateChannelBody<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
    permission_overwrites: Vec<PermissionOverwrite>,
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    #[allow(dead_code)]
    id: String,
}
