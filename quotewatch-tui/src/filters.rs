//! Draft/applied filter forms for the paged lists.
//!
//! Edits go to the draft. Nothing is fetched until the draft is applied;
//! page changes always use the applied filter.

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use quotewatch_core::{ListLogsRequest, ListTasksRequest, LogLevel, QuotationTaskStatus};
use std::fmt;
use tui_textarea::TextArea;

/// Event types the agent is known to emit.
pub const LOG_EVENT_TYPES: &[&str] = &[
    "new_task_created",
    "gemini_api_call_sent",
    "evolution_api_send_text",
    "webhook_received_message",
    "task_status_updated",
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterInputError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Select-style filter value; `All` means the parameter is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: Copy + PartialEq> Choice<T> {
    pub fn selected(&self) -> Option<T> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(*value),
        }
    }

    /// Step through `All` followed by `options`, wrapping at both ends.
    pub fn cycle(&self, options: &[T], forward: bool) -> Choice<T> {
        let len = options.len() + 1;
        let current = match self {
            Choice::All => 0,
            Choice::Only(value) => options.iter().position(|o| o == value).map_or(0, |i| i + 1),
        };
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        match next {
            0 => Choice::All,
            i => Choice::Only(options[i - 1]),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("all"),
            Choice::Only(value) => value.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Date,
    Choice,
}

/// A filter form with a fixed list of fields addressed by index.
pub trait FilterForm: Default + Clone + PartialEq {
    fn labels() -> &'static [&'static str];

    fn kind(index: usize) -> FieldKind;

    /// Display value of a field.
    fn value(&self, index: usize) -> String;

    /// Set a text or date field from raw input.
    fn set_value(&mut self, index: usize, input: &str) -> Result<(), FilterInputError>;

    /// Step a choice field.
    fn cycle(&mut self, index: usize, forward: bool);
}

fn parse_date(input: &str) -> Result<Option<NaiveDate>, FilterInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FilterInputError::InvalidDate(trimmed.to_string()))
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ============================================================================
// TASK FILTER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub search: String,
    pub status: Choice<QuotationTaskStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TaskFilter {
    pub fn to_request(&self, page: u32, limit: u32) -> ListTasksRequest {
        ListTasksRequest {
            search_term: non_empty(&self.search),
            status: self.status.selected(),
            start_date: self.start_date,
            end_date: self.end_date,
            page,
            ..ListTasksRequest::new(limit)
        }
    }
}

impl FilterForm for TaskFilter {
    fn labels() -> &'static [&'static str] {
        &["Search", "Status", "From", "To"]
    }

    fn kind(index: usize) -> FieldKind {
        match index {
            1 => FieldKind::Choice,
            2 | 3 => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.search.clone(),
            1 => match self.status {
                Choice::All => "all".to_string(),
                Choice::Only(status) => status.label().to_string(),
            },
            2 => date_text(self.start_date),
            3 => date_text(self.end_date),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, input: &str) -> Result<(), FilterInputError> {
        match index {
            0 => self.search = input.to_string(),
            2 => self.start_date = parse_date(input)?,
            3 => self.end_date = parse_date(input)?,
            _ => {}
        }
        Ok(())
    }

    fn cycle(&mut self, index: usize, forward: bool) {
        if index == 1 {
            self.status = self.status.cycle(QuotationTaskStatus::all(), forward);
        }
    }
}

// ============================================================================
// LOG FILTER
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub search: String,
    pub level: Choice<LogLevel>,
    pub event_type: Choice<&'static str>,
    pub related_task_id: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl LogFilter {
    pub fn to_request(&self, page: u32, limit: u32) -> ListLogsRequest {
        ListLogsRequest {
            search_term: non_empty(&self.search),
            level: self.level.selected(),
            event_type: self.event_type.selected().map(str::to_string),
            related_task_id: non_empty(&self.related_task_id),
            start_date: self.start_date,
            end_date: self.end_date,
            page,
            ..ListLogsRequest::new(limit)
        }
    }
}

impl FilterForm for LogFilter {
    fn labels() -> &'static [&'static str] {
        &["Message", "Level", "Event", "Task ID", "From", "To"]
    }

    fn kind(index: usize) -> FieldKind {
        match index {
            1 | 2 => FieldKind::Choice,
            4 | 5 => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    fn value(&self, index: usize) -> String {
        match index {
            0 => self.search.clone(),
            1 => self.level.to_string(),
            2 => self.event_type.to_string(),
            3 => self.related_task_id.clone(),
            4 => date_text(self.start_date),
            5 => date_text(self.end_date),
            _ => String::new(),
        }
    }

    fn set_value(&mut self, index: usize, input: &str) -> Result<(), FilterInputError> {
        match index {
            0 => self.search = input.to_string(),
            3 => self.related_task_id = input.trim().to_string(),
            4 => self.start_date = parse_date(input)?,
            5 => self.end_date = parse_date(input)?,
            _ => {}
        }
        Ok(())
    }

    fn cycle(&mut self, index: usize, forward: bool) {
        match index {
            1 => self.level = self.level.cycle(LogLevel::all(), forward),
            2 => self.event_type = self.event_type.cycle(LOG_EVENT_TYPES, forward),
            _ => {}
        }
    }
}

// ============================================================================
// FILTER PANEL
// ============================================================================

/// Result of feeding a key to an open field editor.
#[derive(Debug, PartialEq, Eq)]
pub enum EditorKey {
    Consumed,
    Committed,
    Cancelled,
    Rejected(FilterInputError),
}

/// Draft and applied copies of a filter plus the focus/edit state of the
/// filter bar.
#[derive(Debug, Clone)]
pub struct FilterPanel<F: FilterForm> {
    pub draft: F,
    pub applied: F,
    pub open: bool,
    pub focus: usize,
    pub editor: Option<TextArea<'static>>,
}

impl<F: FilterForm> FilterPanel<F> {
    pub fn new() -> Self {
        Self {
            draft: F::default(),
            applied: F::default(),
            open: false,
            focus: 0,
            editor: None,
        }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.editor = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.editor = None;
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % F::labels().len();
    }

    pub fn focus_previous(&mut self) {
        let len = F::labels().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn focused_kind(&self) -> FieldKind {
        F::kind(self.focus)
    }

    pub fn cycle_focused(&mut self, forward: bool) {
        if self.focused_kind() == FieldKind::Choice {
            self.draft.cycle(self.focus, forward);
        }
    }

    /// Enter on a field: choice fields step forward, text and date fields
    /// open a single-line editor seeded with the draft value.
    pub fn activate_focused(&mut self) {
        match self.focused_kind() {
            FieldKind::Choice => self.draft.cycle(self.focus, true),
            FieldKind::Text | FieldKind::Date => {
                let mut editor = TextArea::new(vec![self.draft.value(self.focus)]);
                editor.move_cursor(tui_textarea::CursorMove::End);
                self.editor = Some(editor);
            }
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn handle_editor_key(&mut self, key: KeyEvent) -> EditorKey {
        let Some(editor) = self.editor.as_mut() else {
            return EditorKey::Cancelled;
        };
        match key.code {
            KeyCode::Esc => {
                self.editor = None;
                EditorKey::Cancelled
            }
            KeyCode::Enter => {
                let input = editor.lines().join("");
                match self.draft.set_value(self.focus, &input) {
                    Ok(()) => {
                        self.editor = None;
                        EditorKey::Committed
                    }
                    Err(err) => EditorKey::Rejected(err),
                }
            }
            _ => {
                editor.input(key);
                EditorKey::Consumed
            }
        }
    }

    /// Commit the draft. The caller resets to page 1 and fetches.
    pub fn apply(&mut self) {
        self.applied = self.draft.clone();
        self.close();
    }

    /// Restore both copies to defaults. The caller resets to page 1 and
    /// fetches.
    pub fn clear(&mut self) {
        self.draft = F::default();
        self.applied = F::default();
        self.editor = None;
    }

    pub fn has_pending_changes(&self) -> bool {
        self.draft != self.applied
    }

    pub fn is_filtered(&self) -> bool {
        self.applied != F::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(panel: &mut FilterPanel<TaskFilter>, text: &str) {
        for ch in text.chars() {
            assert_eq!(panel.handle_editor_key(key(KeyCode::Char(ch))), EditorKey::Consumed);
        }
    }

    #[test]
    fn all_status_omits_parameter() {
        let filter = TaskFilter::default();
        let request = filter.to_request(1, 10);
        assert_eq!(request.status, None);
        assert_eq!(request.search_term, None);
    }

    #[test]
    fn choice_cycles_through_all_and_back() {
        let options = [LogLevel::Info, LogLevel::Warn];
        let mut choice = Choice::All;
        choice = choice.cycle(&options, true);
        assert_eq!(choice, Choice::Only(LogLevel::Info));
        choice = choice.cycle(&options, true);
        choice = choice.cycle(&options, true);
        assert_eq!(choice, Choice::All);
        assert_eq!(choice.cycle(&options, false), Choice::Only(LogLevel::Warn));
    }

    #[test]
    fn editing_search_updates_draft_only() {
        let mut panel: FilterPanel<TaskFilter> = FilterPanel::new();
        panel.activate_focused();
        type_text(&mut panel, "virtus");
        assert_eq!(panel.handle_editor_key(key(KeyCode::Enter)), EditorKey::Committed);
        assert_eq!(panel.draft.search, "virtus");
        assert_eq!(panel.applied.search, "");
        assert!(panel.has_pending_changes());
        panel.apply();
        assert_eq!(panel.applied.search, "virtus");
    }

    #[test]
    fn invalid_date_is_rejected_and_editor_stays_open() {
        let mut panel: FilterPanel<TaskFilter> = FilterPanel::new();
        panel.focus = 2;
        panel.activate_focused();
        type_text(&mut panel, "2024-13-01");
        assert_eq!(
            panel.handle_editor_key(key(KeyCode::Enter)),
            EditorKey::Rejected(FilterInputError::InvalidDate("2024-13-01".into()))
        );
        assert!(panel.is_editing());
        assert_eq!(panel.draft.start_date, None);
    }

    #[test]
    fn dates_are_inclusive_day_strings() {
        let mut filter = LogFilter::default();
        filter.set_value(4, "2024-05-01").unwrap();
        filter.set_value(5, " 2024-05-02 ").unwrap();
        let request = filter.to_request(2, 50);
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(request.end_date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(request.page, 2);
        assert_eq!(request.sort_by, "timestamp");
    }

    #[test]
    fn clear_restores_defaults() {
        let mut panel: FilterPanel<LogFilter> = FilterPanel::new();
        panel.focus = 1;
        panel.cycle_focused(true);
        panel.apply();
        assert!(panel.is_filtered());
        panel.clear();
        assert_eq!(panel.draft, LogFilter::default());
        assert_eq!(panel.applied, LogFilter::default());
    }

    #[test]
    fn event_type_filter_is_sent_verbatim() {
        let mut filter = LogFilter::default();
        filter.cycle(2, false);
        let request = filter.to_request(1, 50);
        assert_eq!(request.event_type.as_deref(), Some("task_status_updated"));
    }
}
