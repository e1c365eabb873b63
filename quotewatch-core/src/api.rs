//! Data-access boundary of the dashboard.
//!
//! Every view talks to the backend through [`DashboardApi`]. The HTTP client
//! in `quotewatch-tui` is the production implementation; test suites use the
//! in-memory one from `quotewatch-test-utils`. Call signatures are the same
//! for both.

use crate::log::SystemLog;
use crate::query::{ListLogsRequest, ListTasksRequest, Page};
use crate::settings::{AgentSetting, SettingsUpdate};
use crate::task::{QuotationTask, QuotationTaskSummary};

/// The single failure condition of the data-access layer.
///
/// Transport errors, non-2xx responses, undecodable bodies and
/// `{"success": false}` replies all end up here, carrying a message that is
/// shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestFailed {
    /// HTTP status, when a response was received at all.
    pub status: Option<u16>,
    pub message: String,
}

impl RequestFailed {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Failure without an HTTP response (connect, timeout, DNS...).
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }
}

pub type ApiResult<T> = Result<T, RequestFailed>;

#[async_trait::async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /quotation-tasks`
    async fn list_tasks(&self, query: &ListTasksRequest) -> ApiResult<Page<QuotationTaskSummary>>;

    /// `GET /quotation-tasks/{id}`
    async fn get_task_detail(&self, task_id: &str) -> ApiResult<QuotationTask>;

    /// `POST /quotation-tasks/{id}/retry`
    async fn retry_contact(&self, task_id: &str) -> ApiResult<()>;

    /// `POST /quotation-tasks/{id}/cancel`
    async fn cancel_task(&self, task_id: &str) -> ApiResult<()>;

    /// `GET /system-logs`
    async fn list_logs(&self, query: &ListLogsRequest) -> ApiResult<Page<SystemLog>>;

    /// `GET /agent-settings`
    async fn get_settings(&self) -> ApiResult<Vec<AgentSetting>>;

    /// `PUT /agent-settings`
    async fn update_settings(&self, values: &SettingsUpdate) -> ApiResult<()>;
}
