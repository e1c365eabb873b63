//! Application state and view state definitions.
//!
//! State transitions are synchronous. Anything that needs the API is
//! returned as a [`Command`]; the results come back through
//! [`App::handle_outcome`].

use crate::commands::{Command, Outcome, TaskMutation};
use crate::config::PaginationConfig;
use crate::events::TuiEvent;
use crate::filters::{EditorKey, FilterForm, FilterPanel, LogFilter, TaskFilter};
use crate::keys::{map_key, HintContext, KeyAction};
use crate::nav::View;
use crate::notifications::{NotificationCenter, Notifier, NOTIFICATION_TTL_SECS};
use crate::pagination::{
    PageNav, Pagination, DEFAULT_LOG_PAGE_SIZE, DEFAULT_TASK_PAGE_SIZE, LOG_PAGE_SIZES,
    TASK_PAGE_SIZES,
};
use crate::sequence::RequestSequence;
use crate::theme::SynthBruteTheme;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use quotewatch_core::{
    AgentSetting, ApiResult, Page, QuotationTask, QuotationTaskSummary, SettingType, SettingValue,
    SettingsUpdate, SystemLog, TaskId,
};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;
use tui_textarea::{CursorMove, TextArea};

// ============================================================================
// PAGED LIST
// ============================================================================

/// Rows, page window and filters of one paged list view.
#[derive(Debug, Clone)]
pub struct PagedList<F: FilterForm, R> {
    pub filters: FilterPanel<F>,
    pub pagination: Pagination,
    pub rows: Vec<R>,
    pub selected: usize,
    pub loading: bool,
    pub mounted: bool,
    requests: RequestSequence,
    /// Page window and filter of the rows on screen.
    settled: (Pagination, F),
}

impl<F: FilterForm, R> PagedList<F, R> {
    pub fn new(sizes: &'static [u32], page_size: u32) -> Self {
        let pagination = Pagination::new(sizes, page_size);
        Self {
            filters: FilterPanel::new(),
            pagination: pagination.clone(),
            rows: Vec::new(),
            selected: 0,
            loading: false,
            mounted: false,
            requests: RequestSequence::new(),
            settled: (pagination, F::default()),
        }
    }

    /// Token for a fetch of the current page with the applied filter.
    pub fn begin_fetch(&mut self) -> u64 {
        self.loading = true;
        self.mounted = true;
        self.requests.issue()
    }

    pub fn apply_filters(&mut self) -> u64 {
        self.filters.apply();
        self.pagination.reset();
        self.begin_fetch()
    }

    pub fn clear_filters(&mut self) -> u64 {
        self.filters.clear();
        self.pagination.reset();
        self.begin_fetch()
    }

    /// `None` when the navigation control is disabled.
    pub fn navigate(&mut self, nav: PageNav) -> Option<u64> {
        self.pagination
            .navigate(nav)
            .then(|| self.begin_fetch())
    }

    pub fn cycle_page_size(&mut self) -> u64 {
        self.pagination.cycle_page_size();
        self.begin_fetch()
    }

    /// Apply a list response. `None` when the response is stale.
    pub fn receive(&mut self, seq: u64, result: ApiResult<Page<R>>) -> Option<ApiResult<()>> {
        if !self.requests.is_current(seq) {
            debug!(seq, latest = self.requests.latest(), "stale list response dropped");
            return None;
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.pagination.record(page.total, page.data.len());
                self.rows = page.data;
                self.selected = self.selected.min(self.rows.len().saturating_sub(1));
                self.settled = (self.pagination.clone(), self.filters.applied.clone());
                Some(Ok(()))
            }
            Err(err) => {
                let (pagination, applied) = self.settled.clone();
                self.pagination = pagination;
                self.filters.applied = applied;
                Some(Err(err))
            }
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_row(&self) -> Option<&R> {
        self.rows.get(self.selected)
    }
}

/// Shared key handling of an open filter bar. Returns whether the action
/// was consumed.
fn filter_bar_action<F: FilterForm>(panel: &mut FilterPanel<F>, action: KeyAction) -> bool {
    match action {
        KeyAction::MoveDown => panel.focus_next(),
        KeyAction::MoveUp => panel.focus_previous(),
        KeyAction::MoveLeft => panel.cycle_focused(false),
        KeyAction::MoveRight => panel.cycle_focused(true),
        KeyAction::Confirm => panel.activate_focused(),
        KeyAction::Cancel | KeyAction::EditFilters => panel.close(),
        _ => return false,
    }
    true
}

fn filter_editor_key<F: FilterForm>(
    panel: &mut FilterPanel<F>,
    key: KeyEvent,
    notifier: &dyn Notifier,
) {
    if let EditorKey::Rejected(err) = panel.handle_editor_key(key) {
        notifier.warning(&err.to_string());
    }
}

// ============================================================================
// TASK LIST + DETAIL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Info,
    Parts,
    Messages,
    Logs,
}

impl DetailTab {
    pub fn all() -> &'static [DetailTab] {
        &[DetailTab::Info, DetailTab::Parts, DetailTab::Messages, DetailTab::Logs]
    }

    pub fn title(&self) -> &'static str {
        match self {
            DetailTab::Info => "Information",
            DetailTab::Parts => "Parts",
            DetailTab::Messages => "Messages",
            DetailTab::Logs => "Logs",
        }
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> DetailTab {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> DetailTab {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

/// The task detail dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDetailState {
    pub task_id: TaskId,
    /// Last fetched record; `None` until the first fetch lands.
    pub task: Option<QuotationTask>,
    pub loading: bool,
    /// Mutation in flight, if any.
    pub processing: Option<TaskMutation>,
    pub tab: DetailTab,
    pub confirm_cancel: bool,
    pub scroll: u16,
}

impl TaskDetailState {
    fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            task: None,
            loading: true,
            processing: None,
            tab: DetailTab::Info,
            confirm_cancel: false,
            scroll: 0,
        }
    }

    pub fn can_retry(&self) -> bool {
        self.processing.is_none()
            && self
                .task
                .as_ref()
                .is_some_and(|t| t.status.is_retryable())
    }

    pub fn can_cancel(&self) -> bool {
        self.processing.is_none()
            && self
                .task
                .as_ref()
                .is_some_and(|t| t.status.is_cancellable())
    }
}

pub struct TaskListViewState {
    pub list: PagedList<TaskFilter, QuotationTaskSummary>,
    pub detail: Option<TaskDetailState>,
    detail_requests: RequestSequence,
    notifier: Arc<dyn Notifier>,
}

impl TaskListViewState {
    pub fn new(page_size: u32, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            list: PagedList::new(TASK_PAGE_SIZES, page_size),
            detail: None,
            detail_requests: RequestSequence::new(),
            notifier,
        }
    }

    pub fn mount(&mut self) -> Vec<Command> {
        if self.list.mounted {
            return Vec::new();
        }
        vec![self.fetch()]
    }

    /// Fetch the current page with the applied filter.
    pub fn fetch(&mut self) -> Command {
        let seq = self.list.begin_fetch();
        self.fetch_command(seq)
    }

    fn fetch_command(&self, seq: u64) -> Command {
        Command::FetchTasks {
            seq,
            query: self
                .list
                .filters
                .applied
                .to_request(self.list.pagination.page, self.list.pagination.page_size),
        }
    }

    pub fn apply_filters(&mut self) -> Vec<Command> {
        let seq = self.list.apply_filters();
        vec![self.fetch_command(seq)]
    }

    pub fn clear_filters(&mut self) -> Vec<Command> {
        let seq = self.list.clear_filters();
        vec![self.fetch_command(seq)]
    }

    pub fn navigate(&mut self, nav: PageNav) -> Vec<Command> {
        match self.list.navigate(nav) {
            Some(seq) => vec![self.fetch_command(seq)],
            None => Vec::new(),
        }
    }

    pub fn cycle_page_size(&mut self) -> Vec<Command> {
        let seq = self.list.cycle_page_size();
        vec![self.fetch_command(seq)]
    }

    pub fn receive_tasks(
        &mut self,
        seq: u64,
        result: ApiResult<Page<QuotationTaskSummary>>,
    ) -> Vec<Command> {
        if let Some(Err(err)) = self.list.receive(seq, result) {
            self.notifier.error(&err.message);
        }
        Vec::new()
    }

    pub fn open_detail(&mut self, task_id: TaskId) -> Vec<Command> {
        let seq = self.detail_requests.issue();
        self.detail = Some(TaskDetailState::new(task_id.clone()));
        vec![Command::FetchTaskDetail { seq, task_id }]
    }

    pub fn open_selected(&mut self) -> Vec<Command> {
        match self.list.selected_row().map(|t| t.id.clone()) {
            Some(task_id) => self.open_detail(task_id),
            None => Vec::new(),
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn reload_detail(&mut self) -> Vec<Command> {
        let Some(detail) = self.detail.as_mut() else {
            return Vec::new();
        };
        detail.loading = true;
        let seq = self.detail_requests.issue();
        vec![Command::FetchTaskDetail {
            seq,
            task_id: detail.task_id.clone(),
        }]
    }

    pub fn receive_detail(
        &mut self,
        seq: u64,
        task_id: &str,
        result: ApiResult<QuotationTask>,
    ) -> Vec<Command> {
        let current = self.detail_requests.is_current(seq);
        let Some(detail) = self.detail.as_mut().filter(|d| d.task_id == task_id && current) else {
            debug!(seq, task_id, "stale detail response dropped");
            return Vec::new();
        };
        detail.loading = false;
        match result {
            Ok(task) => detail.task = Some(task),
            Err(err) => {
                self.notifier.error(&err.message);
                self.detail = None;
            }
        }
        Vec::new()
    }

    pub fn request_retry(&mut self) -> Vec<Command> {
        match self.detail.as_mut() {
            Some(detail) if detail.can_retry() => {
                detail.processing = Some(TaskMutation::Retry);
                vec![Command::RetryContact {
                    task_id: detail.task_id.clone(),
                }]
            }
            _ => Vec::new(),
        }
    }

    /// First step of cancellation: ask for confirmation.
    pub fn request_cancel(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            if detail.can_cancel() {
                detail.confirm_cancel = true;
            }
        }
    }

    pub fn confirm_cancel(&mut self) -> Vec<Command> {
        match self.detail.as_mut() {
            Some(detail) if detail.confirm_cancel && detail.can_cancel() => {
                detail.confirm_cancel = false;
                detail.processing = Some(TaskMutation::Cancel);
                vec![Command::CancelTask {
                    task_id: detail.task_id.clone(),
                }]
            }
            _ => Vec::new(),
        }
    }

    pub fn dismiss_cancel(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.confirm_cancel = false;
        }
    }

    /// On success: re-fetch the open detail and refresh the list. Nothing is
    /// changed locally either way.
    pub fn receive_mutation(
        &mut self,
        mutation: TaskMutation,
        task_id: &str,
        result: ApiResult<()>,
    ) -> Vec<Command> {
        let open = self.detail.as_mut().filter(|d| d.task_id == task_id);
        let detail_open = open.is_some();
        if let Some(detail) = open {
            detail.processing = None;
        }
        if let Err(err) = result {
            self.notifier.error(&err.message);
            return Vec::new();
        }
        self.notifier.success(mutation.success_message());
        let mut commands = Vec::new();
        if detail_open {
            commands.extend(self.reload_detail());
        }
        commands.push(self.fetch());
        commands
    }

    pub fn has_overlay(&self) -> bool {
        self.detail.is_some() || self.list.filters.open
    }

    pub fn handle_filter_editor_key(&mut self, key: KeyEvent) {
        filter_editor_key(&mut self.list.filters, key, self.notifier.as_ref());
    }

    pub fn handle_action(&mut self, action: KeyAction) -> Vec<Command> {
        if self.detail.is_some() {
            return self.handle_detail_action(action);
        }
        if self.list.filters.open && filter_bar_action(&mut self.list.filters, action) {
            return Vec::new();
        }
        match action {
            KeyAction::MoveDown => self.list.select_next(),
            KeyAction::MoveUp => self.list.select_previous(),
            KeyAction::Confirm => return self.open_selected(),
            KeyAction::NextPage => return self.navigate(PageNav::Next),
            KeyAction::PrevPage => return self.navigate(PageNav::Previous),
            KeyAction::FirstPage => return self.navigate(PageNav::First),
            KeyAction::LastPage => return self.navigate(PageNav::Last),
            KeyAction::CyclePageSize => return self.cycle_page_size(),
            KeyAction::EditFilters => self.list.filters.toggle(),
            KeyAction::ApplyFilters => return self.apply_filters(),
            KeyAction::ClearFilters => return self.clear_filters(),
            KeyAction::Refresh => return vec![self.fetch()],
            _ => {}
        }
        Vec::new()
    }

    fn handle_detail_action(&mut self, action: KeyAction) -> Vec<Command> {
        let Some(detail) = self.detail.as_mut() else {
            return Vec::new();
        };
        if detail.confirm_cancel {
            return match action {
                KeyAction::Confirm => self.confirm_cancel(),
                KeyAction::Cancel => {
                    self.dismiss_cancel();
                    Vec::new()
                }
                _ => Vec::new(),
            };
        }
        match action {
            KeyAction::MoveLeft => {
                detail.tab = detail.tab.previous();
                detail.scroll = 0;
            }
            KeyAction::MoveRight => {
                detail.tab = detail.tab.next();
                detail.scroll = 0;
            }
            KeyAction::MoveDown => detail.scroll = detail.scroll.saturating_add(1),
            KeyAction::MoveUp => detail.scroll = detail.scroll.saturating_sub(1),
            KeyAction::RetryContact => return self.request_retry(),
            KeyAction::CancelTask => self.request_cancel(),
            KeyAction::Refresh => return self.reload_detail(),
            KeyAction::Cancel => self.close_detail(),
            _ => {}
        }
        Vec::new()
    }
}

// ============================================================================
// SYSTEM LOGS
// ============================================================================

pub struct LogViewState {
    pub list: PagedList<LogFilter, SystemLog>,
    /// Ids of entries whose details are shown.
    pub expanded: HashSet<String>,
    notifier: Arc<dyn Notifier>,
}

impl LogViewState {
    pub fn new(page_size: u32, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            list: PagedList::new(LOG_PAGE_SIZES, page_size),
            expanded: HashSet::new(),
            notifier,
        }
    }

    pub fn mount(&mut self) -> Vec<Command> {
        if self.list.mounted {
            return Vec::new();
        }
        vec![self.fetch()]
    }

    pub fn fetch(&mut self) -> Command {
        let seq = self.list.begin_fetch();
        self.fetch_command(seq)
    }

    fn fetch_command(&self, seq: u64) -> Command {
        Command::FetchLogs {
            seq,
            query: self
                .list
                .filters
                .applied
                .to_request(self.list.pagination.page, self.list.pagination.page_size),
        }
    }

    pub fn receive(&mut self, seq: u64, result: ApiResult<Page<SystemLog>>) -> Vec<Command> {
        if let Some(Err(err)) = self.list.receive(seq, result) {
            self.notifier.error(&err.message);
        }
        Vec::new()
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.list.selected_row().map(|l| l.id.clone()) {
            if !self.expanded.remove(&id) {
                self.expanded.insert(id);
            }
        }
    }

    pub fn is_expanded(&self, log: &SystemLog) -> bool {
        self.expanded.contains(&log.id)
    }

    pub fn has_overlay(&self) -> bool {
        self.list.filters.open
    }

    pub fn handle_filter_editor_key(&mut self, key: KeyEvent) {
        filter_editor_key(&mut self.list.filters, key, self.notifier.as_ref());
    }

    pub fn handle_action(&mut self, action: KeyAction) -> Vec<Command> {
        if self.list.filters.open && filter_bar_action(&mut self.list.filters, action) {
            return Vec::new();
        }
        let seq = match action {
            KeyAction::MoveDown => {
                self.list.select_next();
                None
            }
            KeyAction::MoveUp => {
                self.list.select_previous();
                None
            }
            KeyAction::Confirm => {
                self.toggle_selected();
                None
            }
            KeyAction::NextPage => self.list.navigate(PageNav::Next),
            KeyAction::PrevPage => self.list.navigate(PageNav::Previous),
            KeyAction::FirstPage => self.list.navigate(PageNav::First),
            KeyAction::LastPage => self.list.navigate(PageNav::Last),
            KeyAction::CyclePageSize => Some(self.list.cycle_page_size()),
            KeyAction::EditFilters => {
                self.list.filters.toggle();
                None
            }
            KeyAction::ApplyFilters => Some(self.list.apply_filters()),
            KeyAction::ClearFilters => Some(self.list.clear_filters()),
            KeyAction::Refresh => Some(self.list.begin_fetch()),
            _ => None,
        };
        seq.map(|seq| vec![self.fetch_command(seq)])
            .unwrap_or_default()
    }
}

// ============================================================================
// SETTINGS
// ============================================================================

/// Open editor for one setting.
#[derive(Debug, Clone)]
pub struct SettingEditor {
    pub key: String,
    pub setting_type: SettingType,
    pub textarea: TextArea<'static>,
}

impl SettingEditor {
    fn new(setting: &AgentSetting, current: &str) -> Self {
        let lines: Vec<String> = current.split('\n').map(str::to_string).collect();
        let mut textarea = TextArea::new(lines);
        if setting.setting_type == SettingType::Password {
            textarea.set_mask_char('\u{2022}');
        }
        textarea.move_cursor(CursorMove::Bottom);
        textarea.move_cursor(CursorMove::End);
        Self {
            key: setting.key.clone(),
            setting_type: setting.setting_type,
            textarea,
        }
    }

    pub fn is_multiline(&self) -> bool {
        self.setting_type == SettingType::Textarea
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }
}

pub struct SettingsViewState {
    /// Last fetched settings in section order.
    pub settings: Vec<AgentSetting>,
    /// Working form values keyed by setting key.
    pub values: BTreeMap<String, SettingValue>,
    pub selected: usize,
    pub loading: bool,
    pub saving: bool,
    pub mounted: bool,
    pub editor: Option<SettingEditor>,
    requests: RequestSequence,
    notifier: Arc<dyn Notifier>,
}

impl SettingsViewState {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            settings: Vec::new(),
            values: BTreeMap::new(),
            selected: 0,
            loading: false,
            saving: false,
            mounted: false,
            editor: None,
            requests: RequestSequence::new(),
            notifier,
        }
    }

    pub fn mount(&mut self) -> Vec<Command> {
        if self.mounted {
            return Vec::new();
        }
        vec![self.fetch()]
    }

    pub fn fetch(&mut self) -> Command {
        self.mounted = true;
        self.loading = true;
        Command::FetchSettings {
            seq: self.requests.issue(),
        }
    }

    pub fn receive_settings(
        &mut self,
        seq: u64,
        result: ApiResult<Vec<AgentSetting>>,
    ) -> Vec<Command> {
        if !self.requests.is_current(seq) {
            debug!(seq, latest = self.requests.latest(), "stale settings response dropped");
            return Vec::new();
        }
        self.loading = false;
        match result {
            Ok(mut settings) => {
                settings.sort_by_key(|s| s.category);
                self.values = settings
                    .iter()
                    .map(|s| (s.key.clone(), s.value.clone()))
                    .collect();
                self.settings = settings;
                self.selected = self.selected.min(self.settings.len().saturating_sub(1));
            }
            Err(err) => self.notifier.error(&err.message),
        }
        Vec::new()
    }

    /// Working value of `key` as displayed.
    pub fn value_text(&self, key: &str) -> String {
        self.values
            .get(key)
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Whether any working value differs from its fetched value, compared
    /// as strings.
    pub fn has_changes(&self) -> bool {
        self.settings
            .iter()
            .any(|s| self.value_text(&s.key) != s.value.to_string())
    }

    pub fn can_save(&self) -> bool {
        self.has_changes() && !self.saving && !self.loading
    }

    /// Store raw input for a setting, coerced by its type.
    pub fn set_value(&mut self, key: &str, input: &str) {
        if let Some(setting) = self.settings.iter().find(|s| s.key == key) {
            let value = SettingValue::from_input(setting.setting_type, input);
            self.values.insert(setting.key.clone(), value);
        }
    }

    pub fn save(&mut self) -> Vec<Command> {
        if !self.can_save() {
            return Vec::new();
        }
        let values: SettingsUpdate = self
            .settings
            .iter()
            .filter_map(|s| {
                self.values
                    .get(&s.key)
                    .map(|v| (s.key.clone(), v.normalized(s.setting_type)))
            })
            .collect();
        self.saving = true;
        vec![Command::SaveSettings { values }]
    }

    /// On success the submitted values become the baseline right away, then
    /// the settings are fetched again.
    pub fn receive_saved(&mut self, result: ApiResult<()>) -> Vec<Command> {
        self.saving = false;
        if let Err(err) = result {
            self.notifier.error(&err.message);
            return Vec::new();
        }
        for setting in self.settings.iter_mut() {
            if let Some(value) = self.values.get_mut(&setting.key) {
                *value = value.normalized(setting.setting_type);
                setting.value = value.clone();
            }
        }
        self.notifier.success("Settings saved");
        vec![self.fetch()]
    }

    pub fn selected_setting(&self) -> Option<&AgentSetting> {
        self.settings.get(self.selected)
    }

    pub fn open_editor(&mut self) {
        if self.saving {
            return;
        }
        if let Some(setting) = self.settings.get(self.selected) {
            let current = self.value_text(&setting.key);
            self.editor = Some(SettingEditor::new(setting, &current));
        }
    }

    pub fn commit_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            self.set_value(&editor.key, &editor.text());
        }
    }

    pub fn handle_editor_key(&mut self, key: KeyEvent) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.editor = None,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.commit_editor()
            }
            KeyCode::Enter if !editor.is_multiline() => self.commit_editor(),
            _ => {
                editor.textarea.input(key);
            }
        }
    }

    pub fn handle_action(&mut self, action: KeyAction) -> Vec<Command> {
        match action {
            KeyAction::MoveDown => {
                if self.selected + 1 < self.settings.len() {
                    self.selected += 1;
                }
            }
            KeyAction::MoveUp => self.selected = self.selected.saturating_sub(1),
            KeyAction::EditItem | KeyAction::Confirm => self.open_editor(),
            KeyAction::Save => return self.save(),
            KeyAction::Refresh => return vec![self.fetch()],
            _ => {}
        }
        Vec::new()
    }
}

// ============================================================================
// APP
// ============================================================================

pub struct App {
    pub theme: SynthBruteTheme,
    pub active_view: View,
    pub tasks: TaskListViewState,
    pub logs: LogViewState,
    pub settings: SettingsViewState,
    pub notifications: Arc<NotificationCenter>,
    pub show_help: bool,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(PaginationConfig {
            task_page_size: DEFAULT_TASK_PAGE_SIZE,
            log_page_size: DEFAULT_LOG_PAGE_SIZE,
        })
    }
}

impl App {
    pub fn new(pagination: PaginationConfig) -> Self {
        let notifications = Arc::new(NotificationCenter::new());
        let notifier: Arc<dyn Notifier> = notifications.clone();
        Self {
            theme: SynthBruteTheme::synthbrute(),
            active_view: View::Tasks,
            tasks: TaskListViewState::new(pagination.task_page_size, Arc::clone(&notifier)),
            logs: LogViewState::new(pagination.log_page_size, Arc::clone(&notifier)),
            settings: SettingsViewState::new(notifier),
            notifications,
            show_help: false,
            should_quit: false,
        }
    }

    /// Initial fetch of the active view.
    pub fn start(&mut self) -> Vec<Command> {
        self.activate(self.active_view)
    }

    /// Switch views; a view fetches the first time it is shown.
    pub fn activate(&mut self, view: View) -> Vec<Command> {
        self.active_view = view;
        match view {
            View::Tasks => self.tasks.mount(),
            View::Logs => self.logs.mount(),
            View::Settings => self.settings.mount(),
        }
    }

    pub fn handle_event(&mut self, event: TuiEvent) -> Vec<Command> {
        match event {
            TuiEvent::Input(key) => self.handle_key(key),
            TuiEvent::Completed(outcome) => self.handle_outcome(outcome),
            TuiEvent::Resize { .. } => Vec::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }
        match self.active_view {
            View::Settings if self.settings.editor.is_some() => {
                self.settings.handle_editor_key(key);
                return Vec::new();
            }
            View::Tasks if self.tasks.list.filters.is_editing() => {
                self.tasks.handle_filter_editor_key(key);
                return Vec::new();
            }
            View::Logs if self.logs.list.filters.is_editing() => {
                self.logs.handle_filter_editor_key(key);
                return Vec::new();
            }
            _ => {}
        }

        let Some(action) = map_key(key) else {
            return Vec::new();
        };
        if self.show_help {
            match action {
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Help | KeyAction::Cancel => self.show_help = false,
                _ => {}
            }
            return Vec::new();
        }

        match action {
            KeyAction::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            KeyAction::Help => {
                self.show_help = true;
                Vec::new()
            }
            KeyAction::NextView => self.activate(self.active_view.next()),
            KeyAction::PrevView => self.activate(self.active_view.previous()),
            KeyAction::SwitchView(index) => match View::from_index(index) {
                Some(view) => self.activate(view),
                None => Vec::new(),
            },
            KeyAction::Cancel if !self.has_overlay() => {
                self.notifications.dismiss_latest();
                Vec::new()
            }
            _ => match self.active_view {
                View::Tasks => self.tasks.handle_action(action),
                View::Logs => self.logs.handle_action(action),
                View::Settings => self.settings.handle_action(action),
            },
        }
    }

    pub fn handle_outcome(&mut self, outcome: Outcome) -> Vec<Command> {
        match outcome {
            Outcome::Tasks { seq, result } => self.tasks.receive_tasks(seq, result),
            Outcome::TaskDetail {
                seq,
                task_id,
                result,
            } => self.tasks.receive_detail(seq, &task_id, result),
            Outcome::TaskMutated {
                mutation,
                task_id,
                result,
            } => self.tasks.receive_mutation(mutation, &task_id, result),
            Outcome::Logs { seq, result } => self.logs.receive(seq, result),
            Outcome::Settings { seq, result } => self.settings.receive_settings(seq, result),
            Outcome::SettingsSaved { result } => self.settings.receive_saved(result),
        }
    }

    pub fn on_tick(&mut self) {
        self.notifications.expire(
            chrono::Utc::now(),
            chrono::Duration::seconds(NOTIFICATION_TTL_SECS),
        );
    }

    pub fn has_overlay(&self) -> bool {
        match self.active_view {
            View::Tasks => self.tasks.has_overlay(),
            View::Logs => self.logs.has_overlay(),
            View::Settings => self.settings.editor.is_some(),
        }
    }

    /// Which key hints the footer should show.
    pub fn hint_context(&self) -> HintContext {
        match self.active_view {
            View::Tasks => match &self.tasks.detail {
                Some(detail) if detail.confirm_cancel => HintContext::ConfirmCancel,
                Some(_) => HintContext::TaskDetail,
                None if self.tasks.list.filters.is_editing() => HintContext::FieldEditor,
                None if self.tasks.list.filters.open => HintContext::Filters,
                None => HintContext::TaskList,
            },
            View::Logs if self.logs.list.filters.is_editing() => HintContext::FieldEditor,
            View::Logs if self.logs.list.filters.open => HintContext::Filters,
            View::Logs => HintContext::LogList,
            View::Settings => match &self.settings.editor {
                Some(editor) if editor.is_multiline() => HintContext::MultilineEditor,
                Some(_) => HintContext::SettingEditor,
                None => HintContext::Settings,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationLevel;
    use quotewatch_core::{QuotationTaskStatus, RequestFailed, SettingCategory};
    use quotewatch_test_utils::fixtures;

    // ========================================================================
    // Test Fixtures
    // ========================================================================

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn page_of(tasks: &[QuotationTask], total: u64, page: u32, limit: u32) -> Page<QuotationTaskSummary> {
        Page {
            data: tasks.iter().map(QuotationTask::summary).collect(),
            total,
            page,
            limit,
        }
    }

    fn tasks_seq(command: &Command) -> u64 {
        match command {
            Command::FetchTasks { seq, .. } => *seq,
            other => panic!("expected task fetch, got {:?}", other),
        }
    }

    fn detail_seq(command: &Command) -> u64 {
        match command {
            Command::FetchTaskDetail { seq, .. } => *seq,
            other => panic!("expected detail fetch, got {:?}", other),
        }
    }

    fn task_query(command: &Command) -> &quotewatch_core::ListTasksRequest {
        match command {
            Command::FetchTasks { query, .. } => query,
            other => panic!("expected task fetch, got {:?}", other),
        }
    }

    /// App with the task list loaded with `count` tasks out of `total`.
    fn app_with_tasks(count: usize, total: u64) -> App {
        let mut app = App::default();
        let commands = app.start();
        let seq = tasks_seq(&commands[0]);
        app.handle_outcome(Outcome::Tasks {
            seq,
            result: Ok(page_of(&fixtures::tasks(count), total, 1, 10)),
        });
        app
    }

    fn open_detail_with(app: &mut App, task: QuotationTask) {
        let commands = app.tasks.open_detail(task.id.clone());
        let seq = detail_seq(&commands[0]);
        app.handle_outcome(Outcome::TaskDetail {
            seq,
            task_id: task.id.clone(),
            result: Ok(task),
        });
    }

    fn loaded_settings() -> App {
        let mut app = App::default();
        let commands = app.activate(View::Settings);
        let seq = match &commands[0] {
            Command::FetchSettings { seq } => *seq,
            other => panic!("unexpected: {:?}", other),
        };
        app.handle_outcome(Outcome::Settings {
            seq,
            result: Ok(fixtures::settings()),
        });
        app
    }

    // ========================================================================
    // Mount & pagination
    // ========================================================================

    #[test]
    fn views_fetch_only_on_first_activation() {
        let mut app = App::default();
        assert_eq!(app.start().len(), 1);
        assert_eq!(app.activate(View::Logs).len(), 1);
        assert!(app.activate(View::Tasks).is_empty());
        assert!(app.activate(View::Logs).is_empty());
    }

    #[test]
    fn first_page_of_hundred_rows() {
        let app = app_with_tasks(10, 100);
        let p = &app.tasks.list.pagination;
        assert_eq!(app.tasks.list.rows.len(), 10);
        assert_eq!(p.total_pages(), 10);
        assert!(p.can_last());
        assert!(!p.can_first());
        assert!(!p.can_previous());
    }

    #[test]
    fn page_change_uses_applied_filter_not_draft() {
        let mut app = app_with_tasks(10, 100);
        app.tasks.list.filters.draft.search = "toyota".into();
        let commands = app.handle_key(key(KeyCode::Char('n')));
        let query = task_query(&commands[0]);
        assert_eq!(query.page, 2);
        assert_eq!(query.search_term, None);
    }

    #[test]
    fn disabled_navigation_dispatches_nothing() {
        let mut app = app_with_tasks(10, 100);
        assert!(app.handle_key(key(KeyCode::Char('p'))).is_empty());
        assert!(app.handle_key(key(KeyCode::Char('g'))).is_empty());
    }

    #[test]
    fn page_size_change_refetches_first_page() {
        let mut app = app_with_tasks(10, 100);
        app.handle_key(key(KeyCode::Char('n')));
        let commands = app.handle_key(key(KeyCode::Char('s')));
        let query = task_query(&commands[0]);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 20);
    }

    // ========================================================================
    // Filters
    // ========================================================================

    #[test]
    fn apply_resets_to_first_page() {
        let mut app = app_with_tasks(10, 100);
        app.handle_key(key(KeyCode::Char('G')));
        assert_eq!(app.tasks.list.pagination.page, 10);
        app.tasks.list.filters.draft.status = crate::filters::Choice::Only(QuotationTaskStatus::New);
        let commands = app.handle_key(key(KeyCode::Char('a')));
        let query = task_query(&commands[0]);
        assert_eq!(query.page, 1);
        assert_eq!(query.status, Some(QuotationTaskStatus::New));
    }

    #[test]
    fn clear_restores_defaults_and_fetches_first_page() {
        let mut app = app_with_tasks(10, 100);
        app.tasks.list.filters.draft.search = "fiat".into();
        app.handle_key(key(KeyCode::Char('a')));
        app.tasks.list.pagination.page = 4;
        let commands = app.handle_key(key(KeyCode::Char('c')));
        let query = task_query(&commands[0]);
        assert_eq!(query, &quotewatch_core::ListTasksRequest::new(10));
        assert_eq!(app.tasks.list.filters.draft, TaskFilter::default());
    }

    #[test]
    fn filter_bar_captures_navigation_keys() {
        let mut app = app_with_tasks(10, 100);
        app.handle_key(key(KeyCode::Char('/')));
        assert!(app.tasks.list.filters.open);
        app.handle_key(key(KeyCode::Char('j')));
        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(
            app.tasks.list.filters.draft.status,
            crate::filters::Choice::Only(QuotationTaskStatus::New)
        );
        assert_eq!(app.tasks.list.selected, 0);
        assert_eq!(app.tasks.list.filters.applied, TaskFilter::default());
    }

    #[test]
    fn bad_date_input_warns() {
        let mut app = app_with_tasks(10, 100);
        app.handle_key(key(KeyCode::Char('/')));
        app.tasks.list.filters.focus = 2;
        app.handle_key(key(KeyCode::Enter));
        for ch in "yesterday".chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
        app.handle_key(key(KeyCode::Enter));
        let latest = app.notifications.latest().unwrap();
        assert_eq!(latest.level, NotificationLevel::Warning);
        assert!(app.tasks.list.filters.is_editing());
    }

    // ========================================================================
    // Sequencing
    // ========================================================================

    #[test]
    fn stale_list_response_is_ignored() {
        let mut app = app_with_tasks(10, 100);
        let older = tasks_seq(&app.handle_key(key(KeyCode::Char('n')))[0]);
        let newer = tasks_seq(&app.handle_key(key(KeyCode::Char('n')))[0]);
        app.handle_outcome(Outcome::Tasks {
            seq: newer,
            result: Ok(page_of(&fixtures::tasks(3), 100, 3, 10)),
        });
        app.handle_outcome(Outcome::Tasks {
            seq: older,
            result: Ok(page_of(&fixtures::tasks(10), 100, 2, 10)),
        });
        assert_eq!(app.tasks.list.rows.len(), 3);
        assert!(!app.tasks.list.loading);
    }

    #[test]
    fn failed_list_fetch_keeps_rows() {
        let mut app = app_with_tasks(10, 100);
        let seq = tasks_seq(&app.handle_key(key(KeyCode::Char('n')))[0]);
        app.handle_outcome(Outcome::Tasks {
            seq,
            result: Err(RequestFailed::transport("Request timed out")),
        });
        assert_eq!(app.tasks.list.rows.len(), 10);
        assert_eq!(app.notifications.latest().unwrap().message, "Request timed out");
    }

    #[test]
    fn failed_page_change_restores_previous_window() {
        let mut app = app_with_tasks(10, 100);
        let seq = tasks_seq(&app.handle_key(key(KeyCode::Char('n')))[0]);
        assert_eq!(app.tasks.list.pagination.page, 2);
        app.handle_outcome(Outcome::Tasks {
            seq,
            result: Err(RequestFailed::transport("down")),
        });
        assert_eq!(app.tasks.list.pagination.page, 1);
        assert_eq!(app.tasks.list.pagination.summary(), "Showing 1-10 of 100");
        assert_eq!(app.tasks.list.rows[0].id, "sim_task_1");

        let retry = app.handle_key(key(KeyCode::Char('n')));
        assert_eq!(task_query(&retry[0]).page, 2);
    }

    #[test]
    fn failed_page_size_change_restores_previous_size() {
        let mut app = app_with_tasks(10, 100);
        let seq = tasks_seq(&app.handle_key(key(KeyCode::Char('s')))[0]);
        assert_eq!(app.tasks.list.pagination.page_size, 20);
        app.handle_outcome(Outcome::Tasks {
            seq,
            result: Err(RequestFailed::transport("down")),
        });
        assert_eq!(app.tasks.list.pagination.page_size, 10);
        assert_eq!(app.tasks.list.pagination.summary(), "Showing 1-10 of 100");
    }

    #[test]
    fn failed_filter_fetch_keeps_previous_filter_applied() {
        let mut app = app_with_tasks(10, 100);
        app.tasks.list.filters.draft.search = "toyota".into();
        let seq = tasks_seq(&app.tasks.apply_filters()[0]);
        app.handle_outcome(Outcome::Tasks {
            seq,
            result: Err(RequestFailed::transport("down")),
        });
        assert!(app.tasks.list.filters.applied.search.is_empty());
        assert_eq!(app.tasks.list.filters.draft.search, "toyota");
        assert!(app.tasks.list.filters.has_pending_changes());
    }

    // ========================================================================
    // Detail & mutations
    // ========================================================================

    #[test]
    fn enter_opens_selected_task() {
        let mut app = app_with_tasks(5, 5);
        app.handle_key(key(KeyCode::Char('j')));
        let commands = app.handle_key(key(KeyCode::Enter));
        match &commands[0] {
            Command::FetchTaskDetail { task_id, .. } => assert_eq!(task_id, "sim_task_2"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(app.tasks.detail.as_ref().unwrap().loading);
    }

    #[test]
    fn older_detail_response_is_ignored_after_reload() {
        let mut app = app_with_tasks(5, 5);
        let older = detail_seq(&app.tasks.open_detail("sim_task_1".into())[0]);
        let newer = detail_seq(&app.tasks.reload_detail()[0]);

        let mut fresh = fixtures::task(1);
        fresh.status = QuotationTaskStatus::QueuedForContact;
        app.handle_outcome(Outcome::TaskDetail {
            seq: newer,
            task_id: "sim_task_1".into(),
            result: Ok(fresh),
        });
        let mut outdated = fixtures::task(1);
        outdated.status = QuotationTaskStatus::ContactFailedRetryScheduled;
        app.handle_outcome(Outcome::TaskDetail {
            seq: older,
            task_id: "sim_task_1".into(),
            result: Ok(outdated),
        });

        let detail = app.tasks.detail.as_ref().unwrap();
        assert_eq!(
            detail.task.as_ref().unwrap().status,
            QuotationTaskStatus::QueuedForContact
        );
        assert!(!detail.loading);
    }

    #[test]
    fn failed_detail_fetch_closes_dialog() {
        let mut app = app_with_tasks(5, 5);
        let commands = app.tasks.open_detail("sim_task_1".into());
        app.handle_outcome(Outcome::TaskDetail {
            seq: detail_seq(&commands[0]),
            task_id: "sim_task_1".into(),
            result: Err(RequestFailed::new(Some(404), "Task not found")),
        });
        assert!(app.tasks.detail.is_none());
        let latest = app.notifications.latest().unwrap();
        assert_eq!(latest.level, NotificationLevel::Error);
        assert_eq!(latest.message, "Task not found");
    }

    #[test]
    fn terminal_status_never_reaches_cancel_confirmation() {
        for status in QuotationTaskStatus::all() {
            let mut app = app_with_tasks(1, 1);
            open_detail_with(&mut app, fixtures::task_with_status(1, *status));
            app.handle_key(key(KeyCode::Char('x')));
            let confirming = app.tasks.detail.as_ref().unwrap().confirm_cancel;
            assert_eq!(confirming, status.is_cancellable(), "status {}", status);
        }
    }

    #[test]
    fn cancel_needs_confirmation() {
        let mut app = app_with_tasks(1, 1);
        open_detail_with(
            &mut app,
            fixtures::task_with_status(1, QuotationTaskStatus::AwaitingSupplierResponse),
        );
        assert!(app.handle_key(key(KeyCode::Char('x'))).is_empty());
        assert_eq!(app.hint_context(), HintContext::ConfirmCancel);
        app.handle_key(key(KeyCode::Esc));
        assert!(app.tasks.detail.is_some());
        app.handle_key(key(KeyCode::Char('x')));
        let commands = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            commands,
            vec![Command::CancelTask {
                task_id: "sim_task_1".into()
            }]
        );
    }

    #[test]
    fn retry_only_for_failed_contact() {
        let mut app = app_with_tasks(1, 1);
        open_detail_with(&mut app, fixtures::task_with_status(1, QuotationTaskStatus::New));
        assert!(app.handle_key(key(KeyCode::Char('r'))).is_empty());

        open_detail_with(
            &mut app,
            fixtures::task_with_status(1, QuotationTaskStatus::ContactFailedRetryScheduled),
        );
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))).len(), 1);
    }

    #[test]
    fn second_trigger_while_in_flight_dispatches_nothing() {
        let mut app = app_with_tasks(1, 1);
        open_detail_with(
            &mut app,
            fixtures::task_with_status(1, QuotationTaskStatus::ContactFailedRetryScheduled),
        );
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))).len(), 1);
        assert!(app.handle_key(key(KeyCode::Char('r'))).is_empty());
        assert!(app.handle_key(key(KeyCode::Char('x'))).is_empty());
        assert!(!app.tasks.detail.as_ref().unwrap().confirm_cancel);
    }

    #[test]
    fn successful_mutation_refetches_detail_and_list() {
        let mut app = app_with_tasks(1, 1);
        open_detail_with(
            &mut app,
            fixtures::task_with_status(1, QuotationTaskStatus::ContactFailedRetryScheduled),
        );
        app.handle_key(key(KeyCode::Char('r')));
        let commands = app.handle_outcome(Outcome::TaskMutated {
            mutation: TaskMutation::Retry,
            task_id: "sim_task_1".into(),
            result: Ok(()),
        });
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], Command::FetchTaskDetail { .. }));
        assert!(matches!(commands[1], Command::FetchTasks { .. }));
        let detail = app.tasks.detail.as_ref().unwrap();
        assert!(detail.processing.is_none());
        assert_eq!(
            detail.task.as_ref().unwrap().status,
            QuotationTaskStatus::ContactFailedRetryScheduled
        );
    }

    #[test]
    fn failed_mutation_leaves_state_untouched() {
        let mut app = app_with_tasks(1, 1);
        let task = fixtures::task_with_status(1, QuotationTaskStatus::ContactFailedRetryScheduled);
        open_detail_with(&mut app, task.clone());
        app.handle_key(key(KeyCode::Char('r')));
        let commands = app.handle_outcome(Outcome::TaskMutated {
            mutation: TaskMutation::Retry,
            task_id: "sim_task_1".into(),
            result: Err(RequestFailed::new(Some(409), "Retry not allowed")),
        });
        assert!(commands.is_empty());
        let detail = app.tasks.detail.as_ref().unwrap();
        assert_eq!(detail.task.as_ref(), Some(&task));
        assert!(detail.can_retry());
        assert_eq!(app.notifications.latest().unwrap().message, "Retry not allowed");
    }

    #[test]
    fn detail_tabs_wrap() {
        let mut app = app_with_tasks(1, 1);
        open_detail_with(&mut app, fixtures::task(1));
        app.handle_key(key(KeyCode::Char('h')));
        assert_eq!(app.tasks.detail.as_ref().unwrap().tab, DetailTab::Logs);
        app.handle_key(key(KeyCode::Char('l')));
        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.tasks.detail.as_ref().unwrap().tab, DetailTab::Parts);
    }

    // ========================================================================
    // Logs
    // ========================================================================

    #[test]
    fn log_details_toggle_on_enter() {
        let mut app = App::default();
        let commands = app.activate(View::Logs);
        let seq = match &commands[0] {
            Command::FetchLogs { seq, query } => {
                assert_eq!(query.limit, DEFAULT_LOG_PAGE_SIZE);
                *seq
            }
            other => panic!("unexpected: {:?}", other),
        };
        app.handle_outcome(Outcome::Logs {
            seq,
            result: Ok(Page {
                data: fixtures::logs(3),
                total: 3,
                page: 1,
                limit: 50,
            }),
        });
        app.handle_key(key(KeyCode::Enter));
        assert!(app.logs.expanded.contains("log_1"));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.logs.expanded.is_empty());
    }

    // ========================================================================
    // Settings
    // ========================================================================

    #[test]
    fn settings_are_grouped_by_section() {
        let app = loaded_settings();
        let categories: Vec<_> = app.settings.settings.iter().map(|s| s.category).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);
        assert_eq!(categories[0], SettingCategory::General);
    }

    #[test]
    fn save_disabled_until_a_value_differs() {
        let mut app = loaded_settings();
        assert!(!app.settings.has_changes());
        assert!(app.handle_key(key(KeyCode::Char('w'))).is_empty());

        app.settings.set_value("max_retry_attempts_initial_contact", "3");
        assert!(!app.settings.has_changes());

        app.settings.set_value("max_retry_attempts_initial_contact", "5");
        assert!(app.settings.can_save());
    }

    #[test]
    fn non_numeric_input_submits_zero() {
        let mut app = loaded_settings();
        app.settings.selected = 0;
        app.handle_key(key(KeyCode::Char('e')));
        let editor = app.settings.editor.as_mut().unwrap();
        editor.textarea.select_all();
        editor.textarea.cut();
        for ch in "abc".chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(app.settings.editor.is_none());
        let commands = app.handle_key(key(KeyCode::Char('w')));
        match &commands[0] {
            Command::SaveSettings { values } => {
                assert_eq!(
                    values.get("max_retry_attempts_initial_contact"),
                    Some(&SettingValue::from(0i64))
                );
                assert_eq!(values.len(), fixtures::settings().len());
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(app.settings.saving);
    }

    #[test]
    fn multiline_editor_keeps_newlines() {
        let mut app = loaded_settings();
        app.settings.selected = 3;
        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.hint_context(), HintContext::MultilineEditor);
        app.handle_key(key(KeyCode::Enter));
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        let key_name = &app.settings.settings[3].key;
        assert!(app.settings.value_text(key_name).ends_with("\nx"));
    }

    #[test]
    fn older_settings_response_is_ignored() {
        let mut app = loaded_settings();
        let seq_of = |command: &Command| match command {
            Command::FetchSettings { seq } => *seq,
            other => panic!("unexpected: {:?}", other),
        };
        let older = seq_of(&app.settings.fetch());
        let newer = seq_of(&app.settings.fetch());

        let mut fresh = fixtures::settings();
        fresh[0].value = SettingValue::from_input(SettingType::Number, "5");
        app.handle_outcome(Outcome::Settings {
            seq: newer,
            result: Ok(fresh),
        });
        let before = app.settings.values.clone();
        app.handle_outcome(Outcome::Settings {
            seq: older,
            result: Ok(fixtures::settings()),
        });

        assert_eq!(app.settings.values, before);
        assert_eq!(app.settings.value_text("max_retry_attempts_initial_contact"), "5");
        assert!(!app.settings.loading);
    }

    #[test]
    fn unchanged_multiline_value_with_trailing_newline_is_not_a_change() {
        let mut app = App::default();
        let commands = app.activate(View::Settings);
        let seq = match &commands[0] {
            Command::FetchSettings { seq } => *seq,
            other => panic!("unexpected: {:?}", other),
        };
        let mut settings = fixtures::settings();
        settings[3].value = SettingValue::Text("First line\nSecond line\n".into());
        app.handle_outcome(Outcome::Settings {
            seq,
            result: Ok(settings),
        });

        app.settings.selected = 3;
        app.handle_key(key(KeyCode::Char('e')));
        app.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert!(app.settings.editor.is_none());
        assert_eq!(
            app.settings.value_text("prompt_initial_greeting"),
            "First line\nSecond line\n"
        );
        assert!(!app.settings.has_changes());
    }

    #[test]
    fn successful_save_clears_changes_and_refetches() {
        let mut app = loaded_settings();
        app.settings.set_value("timeout_supplier_response_hours", "12");
        app.handle_key(key(KeyCode::Char('w')));
        let commands = app.handle_outcome(Outcome::SettingsSaved { result: Ok(()) });
        assert!(matches!(commands[0], Command::FetchSettings { .. }));
        assert!(!app.settings.has_changes());
        assert!(!app.settings.saving);
    }

    #[test]
    fn failed_save_keeps_edits() {
        let mut app = loaded_settings();
        app.settings.set_value("timeout_supplier_response_hours", "12");
        app.handle_key(key(KeyCode::Char('w')));
        app.handle_outcome(Outcome::SettingsSaved {
            result: Err(RequestFailed::new(Some(400), "Unknown setting: x")),
        });
        assert!(app.settings.has_changes());
        assert!(app.settings.can_save());
    }

    // ========================================================================
    // Global keys
    // ========================================================================

    #[test]
    fn escape_dismisses_notification_when_nothing_is_open() {
        let mut app = App::default();
        app.notifications.info("hello");
        app.handle_key(key(KeyCode::Esc));
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn help_overlay_swallows_keys() {
        let mut app = app_with_tasks(10, 100);
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);
        assert!(app.handle_key(key(KeyCode::Char('n'))).is_empty());
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
    }
}
