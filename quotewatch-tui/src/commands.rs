//! Side effects requested by the view states.
//!
//! State transitions never call the API directly. They return [`Command`]s;
//! the event loop runs each one on its own task and feeds the resulting
//! [`Outcome`] back into the app.

use crate::events::TuiEvent;
use quotewatch_core::{
    AgentSetting, ApiResult, DashboardApi, ListLogsRequest, ListTasksRequest, Page, QuotationTask,
    QuotationTaskSummary, SettingsUpdate, SystemLog, TaskId,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchTasks { seq: u64, query: ListTasksRequest },
    FetchTaskDetail { seq: u64, task_id: TaskId },
    RetryContact { task_id: TaskId },
    CancelTask { task_id: TaskId },
    FetchLogs { seq: u64, query: ListLogsRequest },
    FetchSettings { seq: u64 },
    SaveSettings { values: SettingsUpdate },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::FetchTasks { .. } => "fetch_tasks",
            Command::FetchTaskDetail { .. } => "fetch_task_detail",
            Command::RetryContact { .. } => "retry_contact",
            Command::CancelTask { .. } => "cancel_task",
            Command::FetchLogs { .. } => "fetch_logs",
            Command::FetchSettings { .. } => "fetch_settings",
            Command::SaveSettings { .. } => "save_settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskMutation {
    Retry,
    Cancel,
}

impl TaskMutation {
    pub fn success_message(&self) -> &'static str {
        match self {
            TaskMutation::Retry => "Contact retry scheduled",
            TaskMutation::Cancel => "Task cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Tasks {
        seq: u64,
        result: ApiResult<Page<QuotationTaskSummary>>,
    },
    TaskDetail {
        seq: u64,
        task_id: TaskId,
        result: ApiResult<QuotationTask>,
    },
    TaskMutated {
        mutation: TaskMutation,
        task_id: TaskId,
        result: ApiResult<()>,
    },
    Logs {
        seq: u64,
        result: ApiResult<Page<SystemLog>>,
    },
    Settings {
        seq: u64,
        result: ApiResult<Vec<AgentSetting>>,
    },
    SettingsSaved {
        result: ApiResult<()>,
    },
}

/// Run one command against the API.
pub async fn execute(api: &dyn DashboardApi, command: Command) -> Outcome {
    let name = command.name();
    debug!(command = name, "dispatching");
    let outcome = match command {
        Command::FetchTasks { seq, query } => Outcome::Tasks {
            seq,
            result: api.list_tasks(&query).await,
        },
        Command::FetchTaskDetail { seq, task_id } => {
            let result = api.get_task_detail(&task_id).await;
            Outcome::TaskDetail {
                seq,
                task_id,
                result,
            }
        }
        Command::RetryContact { task_id } => {
            let result = api.retry_contact(&task_id).await;
            Outcome::TaskMutated {
                mutation: TaskMutation::Retry,
                task_id,
                result,
            }
        }
        Command::CancelTask { task_id } => {
            let result = api.cancel_task(&task_id).await;
            Outcome::TaskMutated {
                mutation: TaskMutation::Cancel,
                task_id,
                result,
            }
        }
        Command::FetchLogs { seq, query } => Outcome::Logs {
            seq,
            result: api.list_logs(&query).await,
        },
        Command::FetchSettings { seq } => Outcome::Settings {
            seq,
            result: api.get_settings().await,
        },
        Command::SaveSettings { values } => Outcome::SettingsSaved {
            result: api.update_settings(&values).await,
        },
    };
    if let Some(err) = outcome.error() {
        warn!(command = name, status = ?err.status, error = %err.message, "request failed");
    } else if outcome.is_mutation() {
        info!(command = name, "mutation succeeded");
    }
    outcome
}

impl Outcome {
    pub fn error(&self) -> Option<&quotewatch_core::RequestFailed> {
        match self {
            Outcome::Tasks { result, .. } => result.as_ref().err(),
            Outcome::TaskDetail { result, .. } => result.as_ref().err(),
            Outcome::TaskMutated { result, .. } => result.as_ref().err(),
            Outcome::Logs { result, .. } => result.as_ref().err(),
            Outcome::Settings { result, .. } => result.as_ref().err(),
            Outcome::SettingsSaved { result } => result.as_ref().err(),
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Outcome::TaskMutated { .. } | Outcome::SettingsSaved { .. }
        )
    }
}

/// Spawn every command on the runtime; outcomes arrive as
/// [`TuiEvent::Completed`].
pub fn spawn_all(
    api: &Arc<dyn DashboardApi>,
    sender: &mpsc::Sender<TuiEvent>,
    commands: Vec<Command>,
) {
    for command in commands {
        let api = Arc::clone(api);
        let sender = sender.clone();
        tokio::spawn(async move {
            let outcome = execute(api.as_ref(), command).await;
            if sender.send(TuiEvent::Completed(outcome)).await.is_err() {
                debug!("event loop closed, outcome dropped");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotewatch_core::QuotationTaskStatus;
    use quotewatch_test_utils::{fixtures, Endpoint, InMemoryApi, RecordedCall};

    #[tokio::test]
    async fn fetch_carries_sequence_back() {
        let api = InMemoryApi::new().with_tasks(fixtures::tasks(3));
        let outcome = execute(
            &api,
            Command::FetchTasks {
                seq: 7,
                query: ListTasksRequest::new(10),
            },
        )
        .await;
        match outcome {
            Outcome::Tasks { seq, result } => {
                assert_eq!(seq, 7);
                assert_eq!(result.unwrap().total, 3);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn failures_are_reported_in_the_outcome() {
        let api = InMemoryApi::new().with_tasks(fixtures::tasks(1));
        api.fail_next(Endpoint::RetryContact, "gateway down");
        let outcome = execute(
            &api,
            Command::RetryContact {
                task_id: "sim_task_1".into(),
            },
        )
        .await;
        assert_eq!(outcome.error().map(|e| e.message.as_str()), Some("gateway down"));
        assert!(outcome.is_mutation());
    }

    #[tokio::test]
    async fn cancel_reaches_the_backend() {
        let api = InMemoryApi::new().with_tasks(vec![fixtures::task_with_status(
            2,
            QuotationTaskStatus::AwaitingSupplierResponse,
        )]);
        let outcome = execute(
            &api,
            Command::CancelTask {
                task_id: "sim_task_2".into(),
            },
        )
        .await;
        assert!(outcome.error().is_none());
        assert_eq!(api.calls(), vec![RecordedCall::CancelTask("sim_task_2".into())]);
    }

    #[tokio::test]
    async fn spawned_commands_report_through_the_channel() {
        let api: Arc<dyn DashboardApi> =
            Arc::new(InMemoryApi::new().with_settings(fixtures::settings()));
        let (tx, mut rx) = mpsc::channel(4);
        spawn_all(&api, &tx, vec![Command::FetchSettings { seq: 1 }]);
        match rx.recv().await {
            Some(TuiEvent::Completed(Outcome::Settings { seq, result })) => {
                assert_eq!(seq, 1);
                assert_eq!(result.unwrap().len(), fixtures::settings().len());
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
