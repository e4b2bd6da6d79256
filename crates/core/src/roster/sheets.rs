//! HTTP implementation of the record store against a Google-Sheets-shaped
//! values API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::config::RosterConfig;

use super::header::resolve_header;
use super::traits::RecordStore;
use super::types::{ApplicantKind, FieldWrite, RosterError, RowRef, SheetTable, UpdateOutcome};

/// Bounded range covering the whole working area of a store's first tab.
const FETCH_RANGE: &str = "A1:AZ1000";

/// Range covering just the header row.
const HEADER_RANGE: &str = "A1:AZ1";

/// Memoized first-tab name per store.
///
/// The tab name is the only thing cached about a store; table data is
/// re-read on every call. The cache is owned by whoever constructs the
/// adapter and invalidated manually via [`TabCache::reset`] (e.g. after a
/// store's tabs are reorganized).
#[derive(Debug, Clone, Default)]
pub struct TabCache {
    inner: Arc<RwLock<HashMap<ApplicantKind, String>>>,
}

impl TabCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, kind: ApplicantKind) -> Option<String> {
        self.inner.read().await.get(&kind).cloned()
    }

    pub async fn insert(&self, kind: ApplicantKind, title: String) {
        self.inner.write().await.insert(kind, title);
    }

    /// Drop all memoized tab names; the next call re-fetches them.
    pub async fn reset(&self) {
        self.inner.write().await.clear();
    }
}

/// Record store backed by a spreadsheet service's REST API.
pub struct SheetsRecordStore {
    client: Client,
    config: RosterConfig,
    tabs: TabCache,
}

impl SheetsRecordStore {
    /// Create a new store adapter with the given configuration and tab cache.
    pub fn new(config: RosterConfig, tabs: TabCache) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            tabs,
        }
    }

    fn sheet_id(&self, kind: ApplicantKind) -> &str {
        match kind {
            ApplicantKind::Student => &self.config.student_sheet_id,
            ApplicantKind::Teacher => &self.config.teacher_sheet_id,
        }
    }

    fn base_url(&self) -> &str {
        self.config.service_url.trim_end_matches('/')
    }

    /// First tab name, memoized in the tab cache.
    async fn first_tab(&self, kind: ApplicantKind) -> Result<String, RosterError> {
        if let Some(title) = self.tabs.get(kind).await {
            return Ok(title);
        }

        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties.title",
            self.base_url(),
            urlencoding::encode(self.sheet_id(kind)),
        );

        let meta: SpreadsheetMeta = self.get_json(&url).await?;
        let title = meta
            .sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| RosterError::BadResponse("store has no tabs".to_string()))?;

        debug!(kind = kind.as_str(), tab = %title, "Resolved first tab");
        self.tabs.insert(kind, title.clone()).await;
        Ok(title)
    }

    async fn fetch_range(
        &self,
        kind: ApplicantKind,
        range: &str,
    ) -> Result<Vec<Vec<String>>, RosterError> {
        let tab = self.first_tab(kind).await?;
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}?majorDimension=ROWS",
            self.base_url(),
            urlencoding::encode(self.sheet_id(kind)),
            urlencoding::encode(&a1_range(&tab, range)),
        );

        let values: ValueRange = self.get_json(&url).await?;
        Ok(values.values)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, RosterError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.service_token)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RosterError::Unauthorized(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RosterError::Unavailable(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| RosterError::BadResponse(e.to_string()))
    }
}

#[async_trait::async_trait]
impl RecordStore for SheetsRecordStore {
    async fn fetch_table(&self, kind: ApplicantKind) -> Result<SheetTable, RosterError> {
        let mut rows = self.fetch_range(kind, FETCH_RANGE).await?;
        let headers = if rows.is_empty() {
            Vec::new()
        } else {
            rows.remove(0)
        };

        debug!(
            kind = kind.as_str(),
            rows = rows.len(),
            "Fetched record store table"
        );
        Ok(SheetTable::new(headers, rows))
    }

    async fn update_fields(
        &self,
        kind: ApplicantKind,
        row: RowRef,
        fields: &[FieldWrite],
    ) -> Result<UpdateOutcome, RosterError> {
        let tab = self.first_tab(kind).await?;

        // Header positions can drift between calls; re-read them so writes
        // land in the columns the store has right now.
        let header_rows = self.fetch_range(kind, HEADER_RANGE).await?;
        let headers = header_rows.into_iter().next().unwrap_or_default();

        let data: Vec<ValueRangeWrite> = fields
            .iter()
            .filter_map(|field| {
                let col = resolve_header(&headers, field.key)?;
                Some(ValueRangeWrite {
                    range: a1_range(&tab, &format!("{}{}", column_label(col), row.0)),
                    values: vec![vec![field.value.clone()]],
                })
            })
            .collect();

        if data.is_empty() {
            debug!(kind = kind.as_str(), %row, "No writable fields resolved; skipping update");
            return Ok(UpdateOutcome { updated_cells: 0 });
        }

        let url = format!(
            "{}/v4/spreadsheets/{}/values:batchUpdate",
            self.base_url(),
            urlencoding::encode(self.sheet_id(kind)),
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.service_token)
            .json(&BatchUpdateRequest {
                value_input_option: "RAW",
                data,
            })
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(RosterError::Unauthorized(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RosterError::Unavailable(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let outcome: BatchUpdateResponse = response
            .json()
            .await
            .map_err(|e| RosterError::BadResponse(e.to_string()))?;

        debug!(
            kind = kind.as_str(),
            %row,
            cells = outcome.total_updated_cells,
            "Updated record store cells"
        );
        Ok(UpdateOutcome {
            updated_cells: outcome.total_updated_cells,
        })
    }
}

fn map_transport(e: reqwest::Error) -> RosterError {
    if e.is_timeout() {
        RosterError::Unavailable("request timed out".to_string())
    } else if e.is_connect() {
        RosterError::Unavailable(format!("connection failed: {e}"))
    } else {
        RosterError::Unavailable(e.to_string())
    }
}

/// A1 range scoped to a tab, with single quotes in the tab name doubled.
fn a1_range(tab: &str, range: &str) -> String {
    format!("'{}'!{}", tab.replace('\'', "''"), range)
}

/// Spreadsheet column label for a zero-based index: 0 -> A, 25 -> Z, 26 -> AA.
fn column_label(mut idx: usize) -> String {
    let mut label = String::new();
    loop {
        label.insert(0, (b'A' + (idx % 26) as u8) as char);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    label
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct BatchUpdateRequest {
    #[serde(rename = "valueInputOption")]
    value_input_option: &'static str,
    data: Vec<ValueRangeWrite>,
}

#[derive(Debug, Serialize)]
struct ValueRangeWrite {
    range: String,
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct BatchUpdateResponse {
    #[serde(rename = "totalUpdatedCells", default)]
    total_updated_cells: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_labels() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(1), "B");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(51), "AZ");
        assert_eq!(column_label(52), "BA");
    }

    #[test]
    fn a1_range_escapes_quotes() {
        assert_eq!(a1_range("Form Responses 1", "A1:AZ1000"), "'Form Responses 1'!A1:AZ1000");
        assert_eq!(a1_range("It's a tab", "C5"), "'It''s a tab'!C5");
    }

    #[test]
    fn value_range_defaults_to_empty() {
        let parsed: ValueRange = serde_json::from_str(r#"{"range":"'Tab'!A1:AZ1000"}"#).unwrap();
        assert!(parsed.values.is_empty());
    }

    #[tokio::test]
    async fn tab_cache_insert_get_reset() {
        let cache = TabCache::new();
        assert!(cache.get(ApplicantKind::Student).await.is_none());

        cache
            .insert(ApplicantKind::Student, "Applications".to_string())
            .await;
        assert_eq!(
            cache.get(ApplicantKind::Student).await.as_deref(),
            Some("Applications")
        );
        assert!(cache.get(ApplicantKind::Teacher).await.is_none());

        cache.reset().await;
        assert!(cache.get(ApplicantKind::Student).await.is_none());
    }
}
