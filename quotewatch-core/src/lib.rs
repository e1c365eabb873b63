//! QuoteWatch Core - Entity Types
//!
//! Pure data structures shared by the dashboard client and its test doubles.
//! Wire names follow the outreach backend's JSON; Rust names describe what the
//! field holds.

use chrono::{DateTime, Utc};

pub mod api;
pub mod enums;
pub mod log;
pub mod query;
pub mod settings;
pub mod task;

pub use api::{ApiResult, DashboardApi, RequestFailed};
pub use enums::{
    ContentType, DeliveryStatus, LogLevel, MessageDirection, ParseEnumError, QuotationTaskStatus,
    SettingCategory, SettingType, SortOrder,
};
pub use log::SystemLog;
pub use query::{ListLogsRequest, ListTasksRequest, MutationResponse, Page};
pub use settings::{coerce_number, AgentSetting, SettingValue, SettingsUpdate};
pub use task::{QuotationMessage, QuotationPart, QuotationTask, QuotationTaskSummary};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Identifier of a quotation task in the agent's system (e.g. `sim_task_1`).
pub type TaskId = String;
