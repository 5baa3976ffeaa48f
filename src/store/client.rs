use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::models::{
    CreateRecordsBody, CreatedRecords, ListQuery, NewRecord, RecordPage, StoreRecord, TableLocation,
};
use super::{RecordStore, StoreError};

/// Public Airtable REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.airtable.com/v0";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the Airtable REST API.
pub struct AirtableClient {
    client: Client,
    api_url: String,
    token: Secret<String>,
}

impl AirtableClient {
    pub fn new(api_url: impl Into<String>, token: Secret<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn table_url(&self, location: &TableLocation) -> String {
        format!("{}/{}/{}", self.api_url, location.base_id, location.table_id)
    }

    /// Read the body of a response, turning non-success statuses into errors.
    async fn read_json(response: Response) -> Result<Value, StoreError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(StoreError::Remote {
                status: status.as_u16(),
                message: remote_message(status.as_u16(), &text),
            });
        }

        serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Pick the store's own explanation out of an error body.
///
/// Prefers `error.message`, then the serialized JSON body, then the status.
fn remote_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .pointer("/error/message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| json.to_string()),
        Err(_) => format!("HTTP {status}"),
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn list_page(
        &self,
        location: &TableLocation,
        query: &ListQuery,
        offset: Option<&str>,
    ) -> Result<RecordPage, StoreError> {
        debug!(
            base = %location.base_id,
            table = %location.table_id,
            continued = offset.is_some(),
            "Listing records"
        );

        let response = self
            .client
            .get(self.table_url(location))
            .bearer_auth(self.token.expose_secret())
            .query(&query.to_pairs(offset))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let json = Self::read_json(response).await?;
        serde_json::from_value(json).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn create_records(
        &self,
        location: &TableLocation,
        records: &[NewRecord],
        typecast: bool,
    ) -> Result<Vec<StoreRecord>, StoreError> {
        debug!(
            base = %location.base_id,
            table = %location.table_id,
            count = records.len(),
            "Creating records"
        );

        let response = self
            .client
            .post(self.table_url(location))
            .bearer_auth(self.token.expose_secret())
            .json(&CreateRecordsBody { records, typecast })
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let json = Self::read_json(response).await?;
        let created: CreatedRecords =
            serde_json::from_value(json).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(created.records)
    }
}
