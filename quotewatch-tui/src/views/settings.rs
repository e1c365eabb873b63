//! Agent settings view.

use crate::state::{App, SettingsViewState};
use crate::views::helpers::{centered_rect, preview};
use quotewatch_core::{SettingCategory, SettingType};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

const MASK: &str = "\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}";

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = &app.settings;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    render_list(f, app, chunks[0]);
    render_status(f, app, chunks[1]);

    if view.editor.is_some() {
        render_editor(f, app, area);
    }
}

/// Displayed value; passwords are never shown.
fn display_value(view: &SettingsViewState, key: &str, setting_type: SettingType) -> String {
    let value = view.value_text(key);
    match setting_type {
        SettingType::Password if value.is_empty() => String::new(),
        SettingType::Password => MASK.to_string(),
        _ => preview(&value, 60),
    }
}

fn render_list(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = &app.settings;
    let mut items = Vec::new();
    let mut selected_item = None;

    for category in SettingCategory::all() {
        items.push(ListItem::new(Line::from(Span::styled(
            category.title(),
            Style::default()
                .fg(app.theme.secondary)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ))));
        let mut in_section = view
            .settings
            .iter()
            .enumerate()
            .filter(|(_, s)| s.category == *category)
            .peekable();
        if in_section.peek().is_none() {
            items.push(ListItem::new(Line::from(Span::styled(
                "  (no settings)",
                Style::default().fg(app.theme.text_muted),
            ))));
        }
        for (idx, setting) in in_section {
            let changed = view.value_text(&setting.key) != setting.value.to_string();
            let marker = if changed { "* " } else { "  " };
            if idx == view.selected {
                selected_item = Some(items.len());
            }
            items.push(ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(app.theme.warning)),
                    Span::styled(
                        setting.key.clone(),
                        Style::default()
                            .fg(app.theme.text)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" = "),
                    Span::styled(
                        display_value(view, &setting.key, setting.setting_type),
                        Style::default().fg(app.theme.tertiary),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("    {}", setting.description),
                    Style::default().fg(app.theme.text_dim),
                )),
            ]));
        }
    }

    let title = if view.loading {
        "Agent Settings (loading...)"
    } else {
        "Agent Settings"
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(view.editor.is_none()));

    if view.settings.is_empty() {
        let message = if view.loading {
            "Loading settings..."
        } else {
            "No settings available"
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(app.theme.text_dim))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(app.theme.selected_style());
    let mut state = ListState::default();
    state.select(selected_item);
    f.render_stateful_widget(list, area, &mut state);
}

fn render_status(f: &mut Frame<'_>, app: &App, area: Rect) {
    let view = &app.settings;
    let (text, style) = if view.saving {
        ("Saving...", Style::default().fg(app.theme.warning))
    } else if view.has_changes() {
        ("Unsaved changes  [w] save", Style::default().fg(app.theme.primary))
    } else {
        ("No changes", app.theme.disabled_style())
    };
    let paragraph = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn render_editor(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(editor) = app.settings.editor.as_ref() else {
        return;
    };
    let popup = if editor.is_multiline() {
        centered_rect(80, 70, area)
    } else {
        centered_rect(60, 20, area)
    };
    f.render_widget(Clear, popup);

    let hint = if editor.is_multiline() {
        "Ctrl-s done, Esc cancel"
    } else {
        "Enter done, Esc cancel"
    };
    let mut textarea = editor.textarea.clone();
    textarea.set_block(
        Block::default()
            .title(format!("{} ({})", editor.key, hint))
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(true)),
    );
    f.render_widget(&textarea, popup);
}
