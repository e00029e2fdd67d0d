//! Practicum homework statuses API client
//!
//! Single authenticated GET with a `from_date` cursor. Status codes and
//! transport failures become `ConnectionError`; the body is returned
//! unvalidated.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use super::HomeworkSource;
use crate::error::ConnectionError;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

#[derive(Clone)]
pub struct PracticumClient {
    client: Client,
    endpoint: String,
    token: String,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn get_api_answer(&self, from_date: i64) -> Result<Value, ConnectionError> {
        debug!("Requesting {} with from_date={}", self.endpoint, from_date);

        let resp = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|source| {
                error!("Homework API request failed: {}", source);
                ConnectionError::Transport {
                    endpoint: self.endpoint.clone(),
                    from_date,
                    source,
                }
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ConnectionError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body: Value = resp.json().await.map_err(|source| ConnectionError::Decode {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        debug!("Homework API answered: {}", body);
        Ok(body)
    }
}

#[async_trait]
impl HomeworkSource for PracticumClient {
    async fn get_api_answer(&self, from_date: i64) -> Result<Value, ConnectionError> {
        PracticumClient::get_api_answer(self, from_date).await
    }
}
