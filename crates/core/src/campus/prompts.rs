//! Daily role-play prompt pool.

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use super::store::{now_iso, JsonStore};

/// Fallback when the pool has been emptied.
const DEFAULT_PROMPT: &str = "Create a respectful RP scene that fits school life.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptBook {
    #[serde(default)]
    pub prompts: Vec<String>,
    #[serde(default)]
    pub last_posted_at: Option<String>,
}

impl Default for PromptBook {
    fn default() -> Self {
        Self {
            prompts: [
                "You're new to campus. Introduce yourself to a classmate and ask where your next class is.",
                "You forgot your homework. Roleplay how you handle it with your teacher respectfully.",
                "You overhear a rumor in the hallway. Decide how you respond in a mature way.",
                "A group project needs leadership. Step up and assign roles to your teammates.",
                "You're preparing for a school event. Coordinate with classmates to get organized.",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            last_posted_at: None,
        }
    }
}

/// Random prompt draws, with a posted-at marker for the daily scheduler.
pub struct PromptPool {
    store: JsonStore<PromptBook>,
    data: RwLock<PromptBook>,
}

impl PromptPool {
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        let store = JsonStore::open(path);
        let data = RwLock::new(store.load());
        Self { store, data }
    }

    /// Draw a random prompt without consuming it.
    pub async fn draw(&self) -> String {
        let data = self.data.read().await;
        data.prompts
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string())
    }

    /// Record that a prompt was posted publicly.
    pub async fn mark_posted(&self) {
        let mut data = self.data.write().await;
        data.last_posted_at = Some(now_iso());
        if let Err(e) = self.store.save(&data) {
            warn!("Failed to persist prompt pool: {}", e);
        }
    }

    pub async fn last_posted_at(&self) -> Option<String> {
        self.data.read().await.last_posted_at.clone()
    }
}
