//! List query parameters and paged responses

use crate::enums::{LogLevel, QuotationTaskStatus, SortOrder};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Query for `GET /quotation-tasks`. Unset filters are omitted from the URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTasksRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    /// `None` means every status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<QuotationTaskStatus>,
    /// Inclusive calendar-day bounds, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// 1-based.
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    #[serde(rename = "order")]
    pub sort_order: SortOrder,
}

impl ListTasksRequest {
    pub const DEFAULT_SORT_BY: &'static str = "updated_at";

    /// Unfiltered first page, newest update first.
    pub fn new(limit: u32) -> Self {
        Self {
            search_term: None,
            status: None,
            start_date: None,
            end_date: None,
            page: 1,
            limit,
            sort_by: Self::DEFAULT_SORT_BY.to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

/// Query for `GET /system-logs`. The free-text search travels as `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListLogsRequest {
    #[serde(rename = "message", skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    #[serde(rename = "order")]
    pub sort_order: SortOrder,
}

impl ListLogsRequest {
    pub const DEFAULT_SORT_BY: &'static str = "timestamp";

    pub fn new(limit: u32) -> Self {
        Self {
            search_term: None,
            level: None,
            event_type: None,
            related_task_id: None,
            start_date: None,
            end_date: None,
            page: 1,
            limit,
            sort_by: Self::DEFAULT_SORT_BY.to_string(),
            sort_order: SortOrder::Desc,
        }
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Total count before pagination.
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Body returned by the mutation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    /// Reason given by the backend, usually only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
