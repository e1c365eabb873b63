//! QuoteWatch Test Utilities
//!
//! Centralized test infrastructure for the QuoteWatch workspace:
//! - An in-memory [`DashboardApi`] backend with failure injection
//! - Deterministic fixtures for tasks, logs and settings
//! - Proptest generators for enum values

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use quotewatch_core::{
    AgentSetting, ApiResult, ContentType, DashboardApi, DeliveryStatus, ListLogsRequest,
    ListTasksRequest, LogLevel, MessageDirection, Page, QuotationMessage, QuotationPart,
    QuotationTask, QuotationTaskStatus, QuotationTaskSummary, RequestFailed, SettingCategory,
    SettingType, SettingValue, SettingsUpdate, SortOrder, SystemLog, Timestamp,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

// ============================================================================
// IN-MEMORY BACKEND
// ============================================================================

/// Endpoint selector for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    ListTasks,
    TaskDetail,
    RetryContact,
    CancelTask,
    ListLogs,
    GetSettings,
    UpdateSettings,
}

/// A call received by [`InMemoryApi`], in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    ListTasks(ListTasksRequest),
    TaskDetail(String),
    RetryContact(String),
    CancelTask(String),
    ListLogs(ListLogsRequest),
    GetSettings,
    UpdateSettings(SettingsUpdate),
}

#[derive(Default)]
struct Store {
    tasks: Vec<QuotationTask>,
    logs: Vec<SystemLog>,
    settings: Vec<AgentSetting>,
    failures: HashMap<Endpoint, VecDeque<RequestFailed>>,
    calls: Vec<RecordedCall>,
}

impl Store {
    fn take_failure(&mut self, endpoint: Endpoint) -> ApiResult<()> {
        match self.failures.get_mut(&endpoint).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn task_mut(&mut self, task_id: &str) -> ApiResult<&mut QuotationTask> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| RequestFailed::new(Some(404), format!("Task {} not found", task_id)))
    }
}

/// Backend double that filters, sorts and pages like the real service.
///
/// Mutations change the stored records, so a re-fetch after retry/cancel
/// observes the new state.
#[derive(Default)]
pub struct InMemoryApi {
    store: Mutex<Store>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(self, tasks: Vec<QuotationTask>) -> Self {
        self.store().tasks = tasks;
        self
    }

    pub fn with_logs(self, logs: Vec<SystemLog>) -> Self {
        self.store().logs = logs;
        self
    }

    pub fn with_settings(self, settings: Vec<AgentSetting>) -> Self {
        self.store().settings = settings;
        self
    }

    /// Make the next call to `endpoint` fail with `message`.
    pub fn fail_next(&self, endpoint: Endpoint, message: impl Into<String>) {
        self.store()
            .failures
            .entry(endpoint)
            .or_default()
            .push_back(RequestFailed::new(Some(500), message));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.store().calls.clone()
    }

    pub fn task(&self, task_id: &str) -> Option<QuotationTask> {
        self.store().tasks.iter().find(|t| t.id == task_id).cloned()
    }

    pub fn settings(&self) -> Vec<AgentSetting> {
        self.store().settings.clone()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DashboardApi for InMemoryApi {
    async fn list_tasks(&self, query: &ListTasksRequest) -> ApiResult<Page<QuotationTaskSummary>> {
        let mut store = self.store();
        store.calls.push(RecordedCall::ListTasks(query.clone()));
        store.take_failure(Endpoint::ListTasks)?;

        let needle = query.search_term.as_deref().map(str::to_lowercase);
        let mut rows: Vec<&QuotationTask> = store
            .tasks
            .iter()
            .filter(|t| query.status.map_or(true, |s| t.status == s))
            .filter(|t| {
                let day = t.created_at.date_naive();
                query.start_date.map_or(true, |d| day >= d) && query.end_date.map_or(true, |d| day <= d)
            })
            .filter(|t| match &needle {
                Some(n) => [
                    &t.id,
                    &t.original_request_id,
                    &t.supplier_name,
                    &t.supplier_phone,
                    &t.vehicle_make,
                    &t.vehicle_model,
                    &t.vehicle_chassis,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(n)),
                None => true,
            })
            .collect();

        rows.sort_by_key(|t| match query.sort_by.as_str() {
            "created_at" => t.created_at,
            _ => t.updated_at,
        });
        if query.sort_order == SortOrder::Desc {
            rows.reverse();
        }

        let total = rows.len() as u64;
        let data = paginate(&rows, query.page, query.limit)
            .iter()
            .map(|t| t.summary())
            .collect();
        Ok(Page {
            data,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn get_task_detail(&self, task_id: &str) -> ApiResult<QuotationTask> {
        let mut store = self.store();
        store.calls.push(RecordedCall::TaskDetail(task_id.to_string()));
        store.take_failure(Endpoint::TaskDetail)?;
        let task = store.task_mut(task_id)?;
        Ok(task.clone())
    }

    async fn retry_contact(&self, task_id: &str) -> ApiResult<()> {
        let mut store = self.store();
        store.calls.push(RecordedCall::RetryContact(task_id.to_string()));
        store.take_failure(Endpoint::RetryContact)?;
        let task = store.task_mut(task_id)?;
        let now = Utc::now();
        task.status = QuotationTaskStatus::QueuedForContact;
        task.retry_attempts += 1;
        task.next_action_at = Some(now);
        task.updated_at = now;
        Ok(())
    }

    async fn cancel_task(&self, task_id: &str) -> ApiResult<()> {
        let mut store = self.store();
        store.calls.push(RecordedCall::CancelTask(task_id.to_string()));
        store.take_failure(Endpoint::CancelTask)?;
        let task = store.task_mut(task_id)?;
        if !task.status.is_cancellable() {
            return Err(RequestFailed::new(
                Some(409),
                format!("Task cannot be cancelled in status {}", task.status),
            ));
        }
        task.status = QuotationTaskStatus::ClosedSupplierDeclined;
        task.next_action_at = None;
        task.updated_at = Utc::now();
        Ok(())
    }

    async fn list_logs(&self, query: &ListLogsRequest) -> ApiResult<Page<SystemLog>> {
        let mut store = self.store();
        store.calls.push(RecordedCall::ListLogs(query.clone()));
        store.take_failure(Endpoint::ListLogs)?;

        let needle = query.search_term.as_deref().map(str::to_lowercase);
        let mut rows: Vec<&SystemLog> = store
            .logs
            .iter()
            .filter(|l| query.level.map_or(true, |lvl| l.level == lvl))
            .filter(|l| query.event_type.as_deref().map_or(true, |e| l.event_type == e))
            .filter(|l| {
                query
                    .related_task_id
                    .as_deref()
                    .map_or(true, |id| l.related_task_id.as_deref() == Some(id))
            })
            .filter(|l| {
                let day = l.timestamp.date_naive();
                query.start_date.map_or(true, |d| day >= d) && query.end_date.map_or(true, |d| day <= d)
            })
            .filter(|l| {
                needle
                    .as_ref()
                    .map_or(true, |n| l.message.to_lowercase().contains(n))
            })
            .collect();

        rows.sort_by_key(|l| l.timestamp);
        if query.sort_order == SortOrder::Desc {
            rows.reverse();
        }

        let total = rows.len() as u64;
        let data = paginate(&rows, query.page, query.limit)
            .iter()
            .map(|l| (*l).clone())
            .collect();
        Ok(Page {
            data,
            total,
            page: query.page,
            limit: query.limit,
        })
    }

    async fn get_settings(&self) -> ApiResult<Vec<AgentSetting>> {
        let mut store = self.store();
        store.calls.push(RecordedCall::GetSettings);
        store.take_failure(Endpoint::GetSettings)?;
        Ok(store.settings.clone())
    }

    async fn update_settings(&self, values: &SettingsUpdate) -> ApiResult<()> {
        let mut store = self.store();
        store.calls.push(RecordedCall::UpdateSettings(values.clone()));
        store.take_failure(Endpoint::UpdateSettings)?;
        if let Some(unknown) = values
            .keys()
            .find(|key| !store.settings.iter().any(|s| &s.key == *key))
        {
            return Err(RequestFailed::new(Some(400), format!("Unknown setting: {}", unknown)));
        }
        for setting in store.settings.iter_mut() {
            if let Some(value) = values.get(&setting.key) {
                setting.value = value.normalized(setting.setting_type);
            }
        }
        Ok(())
    }
}

fn paginate<'a, T>(rows: &'a [T], page: u32, limit: u32) -> &'a [T] {
    let start = (page.max(1) as usize - 1).saturating_mul(limit as usize);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(limit as usize).min(rows.len());
    &rows[start..end]
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    use super::*;

    pub const EVENT_TYPES: &[&str] = &[
        "new_task_created",
        "gemini_api_call_sent",
        "evolution_api_send_text",
        "webhook_received_message",
        "task_status_updated",
    ];

    /// Fixed reference instant so fixtures are reproducible.
    pub fn base_time() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }

    /// Task `n` (1-based id `sim_task_<n>`); one hour older per index.
    pub fn task(n: usize) -> QuotationTask {
        const MAKES: [(&str, &str); 5] = [
            ("Volkswagen", "Virtus"),
            ("Toyota", "Corolla"),
            ("Fiat", "Argo"),
            ("Chevrolet", "Onix"),
            ("Honda", "Civic"),
        ];
        let statuses = QuotationTaskStatus::all();
        let (make, model) = MAKES[n % MAKES.len()];
        let created_at = base_time() - Duration::hours(n as i64 + 24);
        let updated_at = base_time() - Duration::hours(n as i64);
        let id = format!("sim_task_{}", n);
        QuotationTask {
            id: id.clone(),
            original_request_id: format!("COTACAO_{}_XYZ", 12344 + n),
            supplier_name: format!("Supplier {}", n),
            supplier_phone: format!("+55 11 9{}-{}", 9000 + n, 8000 + n),
            supplier_url: format!("https://example.com/cotacao/{}", n),
            vehicle_make: make.to_string(),
            vehicle_model: model.to_string(),
            vehicle_year: 2020 + (n % 4) as i32,
            vehicle_chassis: format!("9BW{}L21U8P{}63682", n % 10, n % 10),
            status: statuses[n % statuses.len()],
            retry_attempts: (n % 3) as u32,
            last_contact_attempt_at: Some(updated_at - Duration::minutes(30)),
            next_action_at: (n % 3 == 0).then(|| updated_at + Duration::hours(1)),
            supplier_response_content: None,
            response_interpretation: None,
            created_at,
            updated_at,
            request_payload: serde_json::json!({ "id_cotacao": format!("COTACAO_{}_XYZ", 12344 + n) }),
            parts: vec![QuotationPart {
                code: "5U0807221".to_string(),
                description: "Front bumper".to_string(),
                quantity: 1,
            }],
            messages: vec![QuotationMessage {
                timestamp: created_at + Duration::minutes(5),
                direction: MessageDirection::AgentToSupplier,
                content: format!("Hello! Requesting a quote for a {} {}.", make, model),
                content_type: ContentType::Text,
                external_message_id: format!("evo_msg_{}", n),
                delivery_status: DeliveryStatus::Delivered,
            }],
            logs: vec![log_for_task(n, &id)],
        }
    }

    /// Tasks `sim_task_1 ..= sim_task_<count>`.
    pub fn tasks(count: usize) -> Vec<QuotationTask> {
        (1..=count).map(task).collect()
    }

    pub fn task_with_status(n: usize, status: QuotationTaskStatus) -> QuotationTask {
        QuotationTask { status, ..task(n) }
    }

    fn log_for_task(n: usize, task_id: &str) -> SystemLog {
        SystemLog {
            related_task_id: Some(task_id.to_string()),
            ..log(n)
        }
    }

    /// Log `n`; one minute older per index.
    pub fn log(n: usize) -> SystemLog {
        let levels = LogLevel::all();
        SystemLog {
            id: format!("log_{}", n),
            timestamp: base_time() - Duration::minutes(n as i64),
            level: levels[n % levels.len()],
            event_type: EVENT_TYPES[n % EVENT_TYPES.len()].to_string(),
            message: format!("Log message {}", n),
            related_task_id: (n % 3 == 0).then(|| format!("sim_task_{}", n % 10 + 1)),
            details: serde_json::json!({ "some_key": format!("some_value_{}", n), "another_key": n }),
        }
    }

    pub fn logs(count: usize) -> Vec<SystemLog> {
        (1..=count).map(log).collect()
    }

    fn setting(
        key: &str,
        value: SettingValue,
        setting_type: SettingType,
        category: SettingCategory,
    ) -> AgentSetting {
        AgentSetting {
            key: key.to_string(),
            value,
            description: format!("Description of {}", key),
            setting_type,
            category,
        }
    }

    /// A settings set covering every widget type and category.
    pub fn settings() -> Vec<AgentSetting> {
        use SettingCategory::*;
        use SettingType::*;
        vec![
            setting("max_retry_attempts_initial_contact", 3i64.into(), Number, General),
            setting("delay_initial_contact_min_seconds", 60i64.into(), Number, General),
            setting("timeout_supplier_response_hours", 4i64.into(), Number, General),
            setting(
                "prompt_initial_greeting",
                "Hello! I would like a quote for a {marca_veiculo} {modelo_veiculo}.".into(),
                Textarea,
                Prompts,
            ),
            setting(
                "prompt_timeout_reminder",
                "Hello again! Are you still interested in quoting these parts?".into(),
                Textarea,
                Prompts,
            ),
            setting("gemini_api_key", "**************".into(), Password, Api),
            setting("webhook_base_url_agent", "https://api.example.com/webhook/".into(), Text, Api),
        ]
    }
}

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_status() -> impl Strategy<Value = QuotationTaskStatus> {
        prop::sample::select(QuotationTaskStatus::all().to_vec())
    }

    pub fn arb_log_level() -> impl Strategy<Value = LogLevel> {
        prop::sample::select(LogLevel::all().to_vec())
    }

    /// `(total, limit, page)` with `page` inside `[1, ceil(total / limit)]`.
    pub fn arb_page_window(sizes: &'static [u32]) -> impl Strategy<Value = (u64, u32, u32)> {
        (1u64..500, prop::sample::select(sizes.to_vec())).prop_flat_map(|(total, limit)| {
            let pages = total.div_ceil(limit as u64) as u32;
            (Just(total), Just(limit), 1..=pages)
        })
    }
}
