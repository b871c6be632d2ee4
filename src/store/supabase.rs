//! PostgREST client for the Supabase `call_analytics` table.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{header::ACCEPT, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use crate::config::RemoteConfig;
use crate::models::UserRecord;

use super::{RecordStore, StoreError};

/// Asks PostgREST for a single object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
/// PostgREST code for "single object requested, zero rows returned".
const NO_ROWS_CODE: &str = "PGRST116";
const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=minimal";

#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

pub struct SupabaseStore {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl SupabaseStore {
    pub fn new(config: &RemoteConfig, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/rest/v1/{}",
                config.url.trim_end_matches('/'),
                config.table
            ),
            api_key: config.anon_key.clone(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn send_error(&self, err: reqwest::Error) -> StoreError {
        if err.is_timeout() {
            StoreError::Timeout(self.timeout)
        } else {
            StoreError::Transport(err.to_string())
        }
    }

    async fn failure(response: Response) -> (StatusCode, Option<PostgrestError>, String) {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<PostgrestError>(&body).ok();
        (status, parsed, body)
    }
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn lookup(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let response = self
            .authorized(self.client.get(&self.endpoint))
            .query(&[("email", format!("eq.{email}")), ("select", "*".to_string())])
            .header(ACCEPT, SINGLE_OBJECT)
            .send()
            .await
            .map_err(|err| self.send_error(err))?;

        if response.status().is_success() {
            let record = response.json::<UserRecord>().await.map_err(|err| {
                if err.is_timeout() {
                    StoreError::Timeout(self.timeout)
                } else {
                    StoreError::Decode(err.to_string())
                }
            })?;
            return Ok(Some(record));
        }

        let (status, parsed, body) = Self::failure(response).await;
        let code = parsed.as_ref().and_then(|err| err.code.as_deref());
        if status == StatusCode::NOT_ACCEPTABLE && code == Some(NO_ROWS_CODE) {
            debug!("No saved record for {email}");
            return Ok(None);
        }

        Err(StoreError::Service {
            status: status.as_u16(),
            message: parsed.and_then(|err| err.message).unwrap_or(body),
        })
    }

    async fn upsert(&self, record: &UserRecord) -> Result<(), StoreError> {
        let response = self
            .authorized(self.client.post(&self.endpoint))
            .query(&[("on_conflict", "email")])
            .header("Prefer", UPSERT_PREFERENCE)
            .json(record)
            .send()
            .await
            .map_err(|err| self.send_error(err))?;

        if response.status().is_success() {
            return Ok(());
        }

        let (status, parsed, body) = Self::failure(response).await;
        Err(StoreError::Service {
            status: status.as_u16(),
            message: parsed.and_then(|err| err.message).unwrap_or(body),
        })
    }
}
