//! System log entries emitted by the outreach agent

use crate::enums::LogLevel;
use crate::{TaskId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemLog {
    pub id: String,
    pub timestamp: Timestamp,
    pub level: LogLevel,
    /// Free-form tag such as `webhook_received_message`.
    pub event_type: String,
    pub message: String,
    pub related_task_id: Option<TaskId>,
    #[serde(default)]
    pub details: serde_json::Value,
}

impl SystemLog {
    /// Details rendered for display; `None` when the entry carries no details.
    pub fn details_pretty(&self) -> Option<String> {
        if self.details.is_null() {
            return None;
        }
        serde_json::to_string_pretty(&self.details).ok()
    }
}
