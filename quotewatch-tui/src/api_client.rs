//! HTTP implementation of [`DashboardApi`].

use crate::config::{AuthConfig, TuiConfig};
use async_trait::async_trait;
use quotewatch_core::{
    AgentSetting, ApiResult, DashboardApi, ListLogsRequest, ListTasksRequest, MutationResponse,
    Page, QuotationTask, QuotationTaskSummary, RequestFailed, SettingsUpdate, SystemLog,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(String),
}

/// Client for the outreach agent's dashboard API.
///
/// Request construction is split from sending so URLs, query strings and
/// headers can be inspected without a server.
#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: Url,
    auth_headers: HeaderMap,
}

impl RestClient {
    pub fn new(config: &TuiConfig) -> Result<Self, ApiClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        Self::with_client(client, &config.api_base_url, &config.auth)
    }

    pub fn with_client(
        client: reqwest::Client,
        api_base_url: &str,
        auth: &AuthConfig,
    ) -> Result<Self, ApiClientError> {
        let base_url = Url::parse(api_base_url.trim())
            .map_err(|e| ApiClientError::Config(format!("api_base_url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::Config(format!(
                "api_base_url: {} cannot be used as a base URL",
                api_base_url
            )));
        }
        Ok(Self {
            client,
            base_url,
            auth_headers: build_auth_headers(auth)?,
        })
    }

    /// `base_url` with `segments` appended as percent-encoded path segments.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn list_tasks_request(&self, query: &ListTasksRequest) -> RequestBuilder {
        self.get(&["quotation-tasks"]).query(query)
    }

    pub fn task_detail_request(&self, task_id: &str) -> RequestBuilder {
        self.get(&["quotation-tasks", task_id])
    }

    pub fn retry_request(&self, task_id: &str) -> RequestBuilder {
        self.post(&["quotation-tasks", task_id, "retry"])
    }

    pub fn cancel_request(&self, task_id: &str) -> RequestBuilder {
        self.post(&["quotation-tasks", task_id, "cancel"])
    }

    pub fn list_logs_request(&self, query: &ListLogsRequest) -> RequestBuilder {
        self.get(&["system-logs"]).query(query)
    }

    pub fn settings_request(&self) -> RequestBuilder {
        self.get(&["agent-settings"])
    }

    pub fn update_settings_request(&self, values: &SettingsUpdate) -> RequestBuilder {
        self.client
            .put(self.endpoint(&["agent-settings"]))
            .headers(self.auth_headers.clone())
            .json(values)
    }

    fn get(&self, segments: &[&str]) -> RequestBuilder {
        self.client
            .get(self.endpoint(segments))
            .headers(self.auth_headers.clone())
    }

    fn post(&self, segments: &[&str]) -> RequestBuilder {
        self.client
            .post(self.endpoint(segments))
            .headers(self.auth_headers.clone())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            RequestFailed::new(Some(status), format!("Failed to read response: {}", e))
        })?;
        debug!(status, bytes = body.len(), "response received");
        parse_body(status, &body)
    }

    async fn send_mutation(&self, request: RequestBuilder) -> ApiResult<()> {
        let reply: MutationResponse = self.send_json(request).await?;
        mutation_result(reply)
    }
}

#[async_trait]
impl DashboardApi for RestClient {
    async fn list_tasks(&self, query: &ListTasksRequest) -> ApiResult<Page<QuotationTaskSummary>> {
        self.send_json(self.list_tasks_request(query)).await
    }

    async fn get_task_detail(&self, task_id: &str) -> ApiResult<QuotationTask> {
        self.send_json(self.task_detail_request(task_id)).await
    }

    async fn retry_contact(&self, task_id: &str) -> ApiResult<()> {
        self.send_mutation(self.retry_request(task_id)).await
    }

    async fn cancel_task(&self, task_id: &str) -> ApiResult<()> {
        self.send_mutation(self.cancel_request(task_id)).await
    }

    async fn list_logs(&self, query: &ListLogsRequest) -> ApiResult<Page<SystemLog>> {
        self.send_json(self.list_logs_request(query)).await
    }

    async fn get_settings(&self) -> ApiResult<Vec<AgentSetting>> {
        self.send_json(self.settings_request()).await
    }

    async fn update_settings(&self, values: &SettingsUpdate) -> ApiResult<()> {
        self.send_mutation(self.update_settings_request(values)).await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Decode a response body, mapping non-2xx statuses to their error message.
pub fn parse_body<T: DeserializeOwned>(status: u16, body: &str) -> ApiResult<T> {
    if !(200..300).contains(&status) {
        return Err(error_from_body(status, body));
    }
    serde_json::from_str(body)
        .map_err(|e| RequestFailed::new(Some(status), format!("Unexpected response: {}", e)))
}

/// The body's `message` when present, otherwise `Server error (HTTP <code>)`.
pub fn error_from_body(status: u16, body: &str) -> RequestFailed {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Server error (HTTP {})", status));
    RequestFailed::new(Some(status), message)
}

pub fn mutation_result(reply: MutationResponse) -> ApiResult<()> {
    if reply.success {
        return Ok(());
    }
    let message = reply
        .message
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "The server did not complete the operation".to_string());
    Err(RequestFailed::new(None, message))
}

fn transport_error(err: reqwest::Error) -> RequestFailed {
    if err.is_timeout() {
        RequestFailed::transport("Request timed out")
    } else if err.is_connect() {
        RequestFailed::transport(format!("Could not connect to server: {}", err))
    } else {
        RequestFailed::transport(format!("Request failed: {}", err))
    }
}

fn build_auth_headers(auth: &AuthConfig) -> Result<HeaderMap, ApiClientError> {
    let mut headers = HeaderMap::new();
    if let Some(api_key) = &auth.api_key {
        headers.insert(
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_str(api_key).map_err(|e| ApiClientError::Config(e.to_string()))?,
        );
    }
    if let Some(token) = &auth.bearer_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ApiClientError::Config(e.to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}
