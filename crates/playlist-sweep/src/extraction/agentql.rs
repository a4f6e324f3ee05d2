//! Client for the AgentQL query-data API.
//!
//! Sends rendered HTML plus a declarative query and receives the matching
//! data tree under `data`.

use crate::error::ExtractionError;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const QUERY_DATA_PATH: &str = "/v1/query-data";

#[derive(Serialize)]
struct QueryDataRequest<'a> {
    query: &'a str,
    html: &'a str,
    params: QueryParams,
}

#[derive(Serialize)]
struct QueryParams {
    mode: &'static str,
}

/// HTTP client for the structured extraction service.
pub struct AgentQlClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl AgentQlClient {
    pub fn new(api_key: &str, endpoint: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Run `query` against `html` and return the `data` tree.
    pub async fn query_data(&self, query: &str, html: &str) -> Result<Value, ExtractionError> {
        let url = format!("{}{QUERY_DATA_PATH}", self.endpoint);
        debug!(html_bytes = html.len(), "posting structured query to {url}");

        let response = self
            .http
            .post(&url)
            .header("X-API-Key", &self.api_key)
            .json(&QueryDataRequest {
                query,
                html,
                params: QueryParams { mode: "standard" },
            })
            .send()
            .await
            .map_err(|e| ExtractionError::Query(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let mut body: Value = response
            .json()
            .await
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;

        match body.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(ExtractionError::MalformedResponse(
                "response has no 'data' field".to_string(),
            )),
        }
    }
}
