//! Enum types for QuoteWatch entities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error when parsing an invalid enum string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Implements `Display` and `FromStr` from an `as_str` method and an `all()` list.
macro_rules! impl_wire_str {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                <$ty>::all()
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

// ============================================================================
// TASK STATUS
// ============================================================================

/// Stage of a task's outreach workflow. Transitions are driven by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationTaskStatus {
    New,
    QueuedForContact,
    ContactFailedRetryScheduled,
    InitialContactSent,
    AwaitingSupplierResponse,
    SupplierResponseReceivedPositive,
    SupplierResponseReceivedNegative,
    SupplierResponseUnclear,
    PartsListSent,
    AwaitingSystemQuoteUpdate,
    QuoteFinalizedBySystem,
    TimeoutReminderSent,
    TimeoutFinalNoResponse,
    ErrorProcessing,
    ClosedSupplierDeclined,
}

impl QuotationTaskStatus {
    pub fn all() -> &'static [QuotationTaskStatus] {
        use QuotationTaskStatus::*;
        &[
            New,
            QueuedForContact,
            ContactFailedRetryScheduled,
            InitialContactSent,
            AwaitingSupplierResponse,
            SupplierResponseReceivedPositive,
            SupplierResponseReceivedNegative,
            SupplierResponseUnclear,
            PartsListSent,
            AwaitingSystemQuoteUpdate,
            QuoteFinalizedBySystem,
            TimeoutReminderSent,
            TimeoutFinalNoResponse,
            ErrorProcessing,
            ClosedSupplierDeclined,
        ]
    }

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        use QuotationTaskStatus::*;
        match self {
            New => "new",
            QueuedForContact => "queued_for_contact",
            ContactFailedRetryScheduled => "contact_failed_retry_scheduled",
            InitialContactSent => "initial_contact_sent",
            AwaitingSupplierResponse => "awaiting_supplier_response",
            SupplierResponseReceivedPositive => "supplier_response_received_positive",
            SupplierResponseReceivedNegative => "supplier_response_received_negative",
            SupplierResponseUnclear => "supplier_response_unclear",
            PartsListSent => "parts_list_sent",
            AwaitingSystemQuoteUpdate => "awaiting_system_quote_update",
            QuoteFinalizedBySystem => "quote_finalized_by_system",
            TimeoutReminderSent => "timeout_reminder_sent",
            TimeoutFinalNoResponse => "timeout_final_no_response",
            ErrorProcessing => "error_processing",
            ClosedSupplierDeclined => "closed_supplier_declined",
        }
    }

    /// Human-readable label for tables and badges.
    pub fn label(&self) -> &'static str {
        use QuotationTaskStatus::*;
        match self {
            New => "New",
            QueuedForContact => "Queued for Contact",
            ContactFailedRetryScheduled => "Contact Failed - Retry Scheduled",
            InitialContactSent => "Initial Contact Sent",
            AwaitingSupplierResponse => "Awaiting Supplier Response",
            SupplierResponseReceivedPositive => "Positive Response Received",
            SupplierResponseReceivedNegative => "Negative Response Received",
            SupplierResponseUnclear => "Supplier Response Unclear",
            PartsListSent => "Parts List Sent",
            AwaitingSystemQuoteUpdate => "Awaiting System Update",
            QuoteFinalizedBySystem => "Quote Finalized by System",
            TimeoutReminderSent => "Timeout Reminder Sent",
            TimeoutFinalNoResponse => "Final Timeout - No Response",
            ErrorProcessing => "Processing Error",
            ClosedSupplierDeclined => "Closed - Supplier Declined",
        }
    }

    /// Whether the dashboard offers cancellation for a task in this status.
    ///
    /// Client-side policy only; the backend may still reject a cancel.
    pub fn is_cancellable(&self) -> bool {
        !matches!(
            self,
            QuotationTaskStatus::TimeoutFinalNoResponse
                | QuotationTaskStatus::ErrorProcessing
                | QuotationTaskStatus::ClosedSupplierDeclined
                | QuotationTaskStatus::QuoteFinalizedBySystem
        )
    }

    /// Whether the dashboard offers a manual contact retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuotationTaskStatus::ContactFailedRetryScheduled)
    }
}

impl_wire_str!(QuotationTaskStatus, "task status");

// ============================================================================
// LOGS
// ============================================================================

/// Severity of a system log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
    Critical,
}

impl LogLevel {
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Debug,
            LogLevel::Critical,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl_wire_str!(LogLevel, "log level");

// ============================================================================
// MESSAGES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    AgentToSupplier,
    SupplierToAgent,
}

impl MessageDirection {
    pub fn all() -> &'static [MessageDirection] {
        &[MessageDirection::AgentToSupplier, MessageDirection::SupplierToAgent]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageDirection::AgentToSupplier => "agent_to_supplier",
            MessageDirection::SupplierToAgent => "supplier_to_agent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MessageDirection::AgentToSupplier => "Agent → Supplier",
            MessageDirection::SupplierToAgent => "Supplier → Agent",
        }
    }
}

impl_wire_str!(MessageDirection, "message direction");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Image,
    Audio,
    Video,
    Document,
}

impl ContentType {
    pub fn all() -> &'static [ContentType] {
        &[
            ContentType::Text,
            ContentType::Image,
            ContentType::Audio,
            ContentType::Video,
            ContentType::Document,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Audio => "audio",
            ContentType::Video => "video",
            ContentType::Document => "document",
        }
    }
}

impl_wire_str!(ContentType, "content type");

/// Delivery state reported by the messaging gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Read,
}

impl DeliveryStatus {
    pub fn all() -> &'static [DeliveryStatus] {
        &[DeliveryStatus::Sent, DeliveryStatus::Delivered, DeliveryStatus::Read]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Read => "read",
        }
    }
}

impl_wire_str!(DeliveryStatus, "delivery status");

// ============================================================================
// SETTINGS
// ============================================================================

/// Input widget used to edit a setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    Text,
    Number,
    Textarea,
    Password,
}

impl SettingType {
    pub fn all() -> &'static [SettingType] {
        &[
            SettingType::Text,
            SettingType::Number,
            SettingType::Textarea,
            SettingType::Password,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Text => "text",
            SettingType::Number => "number",
            SettingType::Textarea => "textarea",
            SettingType::Password => "password",
        }
    }
}

impl_wire_str!(SettingType, "setting type");

/// Section a setting is grouped under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingCategory {
    General,
    Prompts,
    Api,
}

impl SettingCategory {
    /// Fixed section order of the settings form.
    pub fn all() -> &'static [SettingCategory] {
        &[SettingCategory::General, SettingCategory::Prompts, SettingCategory::Api]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingCategory::General => "general",
            SettingCategory::Prompts => "prompts",
            SettingCategory::Api => "api",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SettingCategory::General => "General",
            SettingCategory::Prompts => "Prompts",
            SettingCategory::Api => "API",
        }
    }
}

impl_wire_str!(SettingCategory, "setting category");

// ============================================================================
// QUERY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn all() -> &'static [SortOrder] {
        &[SortOrder::Asc, SortOrder::Desc]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl_wire_str!(SortOrder, "sort order");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_wire_string() {
        for status in QuotationTaskStatus::all() {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<QuotationTaskStatus>().unwrap(), *status);
        }
        assert_eq!(QuotationTaskStatus::all().len(), 15);
    }

    #[test]
    fn terminal_statuses_are_not_cancellable() {
        let blocked: Vec<_> = QuotationTaskStatus::all()
            .iter()
            .filter(|s| !s.is_cancellable())
            .map(|s| s.as_str())
            .collect();
        assert_eq!(
            blocked,
            vec![
                "quote_finalized_by_system",
                "timeout_final_no_response",
                "error_processing",
                "closed_supplier_declined",
            ]
        );
    }

    #[test]
    fn only_failed_contact_is_retryable() {
        let retryable: Vec<_> = QuotationTaskStatus::all()
            .iter()
            .filter(|s| s.is_retryable())
            .collect();
        assert_eq!(retryable, vec![&QuotationTaskStatus::ContactFailedRetryScheduled]);
    }

    #[test]
    fn log_level_uses_upper_case_on_the_wire() {
        let level: LogLevel = serde_json::from_str("\"CRITICAL\"").unwrap();
        assert_eq!(level, LogLevel::Critical);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
    }

    #[test]
    fn unknown_value_reports_kind() {
        let err = "bogus".parse::<SettingType>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid setting type: bogus");
    }
}
