//! Keybinding definitions for the TUI.
//!
//! Keys map to context-free actions; the focused view decides what an
//! action means (e.g. `h`/`l` switch detail tabs or cycle filter choices).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    NextView,
    PrevView,
    SwitchView(usize),
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Confirm,
    Cancel,
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    CyclePageSize,
    EditFilters,
    ApplyFilters,
    ClearFilters,
    Refresh,
    RetryContact,
    CancelTask,
    EditItem,
    Save,
    Help,
}

pub fn map_key(event: KeyEvent) -> Option<KeyAction> {
    let KeyEvent { code, modifiers, .. } = event;

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => Some(KeyAction::Quit),
            KeyCode::Char('r') => Some(KeyAction::Refresh),
            _ => None,
        };
    }

    match code {
        KeyCode::Char('q') => Some(KeyAction::Quit),
        KeyCode::Char('?') => Some(KeyAction::Help),
        KeyCode::Tab => Some(KeyAction::NextView),
        KeyCode::BackTab => Some(KeyAction::PrevView),
        KeyCode::Char(c @ '1'..='3') => Some(KeyAction::SwitchView(c as usize - '1' as usize)),
        KeyCode::Up | KeyCode::Char('k') => Some(KeyAction::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(KeyAction::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(KeyAction::MoveLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(KeyAction::MoveRight),
        KeyCode::Enter => Some(KeyAction::Confirm),
        KeyCode::Esc => Some(KeyAction::Cancel),
        KeyCode::Char('n') | KeyCode::PageDown => Some(KeyAction::NextPage),
        KeyCode::Char('p') | KeyCode::PageUp => Some(KeyAction::PrevPage),
        KeyCode::Char('g') | KeyCode::Home => Some(KeyAction::FirstPage),
        KeyCode::Char('G') | KeyCode::End => Some(KeyAction::LastPage),
        KeyCode::Char('s') => Some(KeyAction::CyclePageSize),
        KeyCode::Char('/') => Some(KeyAction::EditFilters),
        KeyCode::Char('a') => Some(KeyAction::ApplyFilters),
        KeyCode::Char('c') => Some(KeyAction::ClearFilters),
        KeyCode::Char('r') => Some(KeyAction::RetryContact),
        KeyCode::Char('x') => Some(KeyAction::CancelTask),
        KeyCode::Char('e') => Some(KeyAction::EditItem),
        KeyCode::Char('w') => Some(KeyAction::Save),
        _ => None,
    }
}

/// Footer hint line for the current context.
pub fn hint(context: HintContext) -> &'static str {
    match context {
        HintContext::TaskList => {
            "j/k move • Enter details • / filters • a apply • c clear • n/p page • s size • Tab view • ? help • q quit"
        }
        HintContext::TaskDetail => {
            "h/l tab • j/k scroll • r retry • x cancel task • Ctrl-r reload • Esc close"
        }
        HintContext::ConfirmCancel => "Enter confirm cancellation • Esc keep task",
        HintContext::Filters => {
            "j/k field • h/l choice • Enter edit • a apply • c clear • Esc close filters"
        }
        HintContext::FieldEditor => "Enter commit • Esc discard",
        HintContext::LogList => {
            "j/k move • Enter details • / filters • a apply • c clear • n/p page • s size • Tab view • q quit"
        }
        HintContext::Settings => "j/k move • e edit • w save • Ctrl-r reload • Tab view • q quit",
        HintContext::SettingEditor => "Enter commit • Esc discard",
        HintContext::MultilineEditor => "Ctrl-s commit • Esc discard",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HintContext {
    TaskList,
    TaskDetail,
    ConfirmCancel,
    Filters,
    FieldEditor,
    LogList,
    Settings,
    SettingEditor,
    MultilineEditor,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Option<KeyAction> {
        map_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn shifted_g_jumps_to_last_page() {
        let event = KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(map_key(event), Some(KeyAction::LastPage));
        assert_eq!(press(KeyCode::Char('g')), Some(KeyAction::FirstPage));
    }

    #[test]
    fn control_r_refreshes_and_plain_r_retries() {
        let event = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(map_key(event), Some(KeyAction::Refresh));
        assert_eq!(press(KeyCode::Char('r')), Some(KeyAction::RetryContact));
    }

    #[test]
    fn only_three_views_are_addressable() {
        assert_eq!(press(KeyCode::Char('3')), Some(KeyAction::SwitchView(2)));
        assert_eq!(press(KeyCode::Char('4')), None);
    }
}
