//! View rendering dispatch.

pub mod helpers;
pub mod logs;
pub mod settings;
pub mod task_detail;
pub mod tasks;

use crate::keys::hint;
use crate::nav::View;
use crate::state::App;
use crate::theme::notification_color;
use helpers::centered_rect;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

const HELP_LINES: &[(&str, &str)] = &[
    ("Tab / 1-3", "switch view"),
    ("j/k, arrows", "move selection"),
    ("Enter", "open task / expand log / edit setting"),
    ("n p g G", "next, previous, first, last page"),
    ("s", "cycle page size"),
    ("/", "open filters (h/l change choice, Enter edit field)"),
    ("a / c", "apply / clear filters"),
    ("r / x", "retry contact / cancel task (detail dialog)"),
    ("e / w", "edit setting / save settings"),
    ("Ctrl-r", "refresh"),
    ("Esc", "close dialog or dismiss notification"),
    ("q / Ctrl-c", "quit"),
];

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);

    match app.active_view {
        View::Tasks => tasks::render(f, app, layout[1]),
        View::Logs => logs::render(f, app, layout[1]),
        View::Settings => settings::render(f, app, layout[1]),
    }

    render_footer(f, app, layout[2]);

    if app.show_help {
        render_help(f, app, layout[1]);
    }
}

fn render_header(f: &mut Frame<'_>, app: &App, area: Rect) {
    let titles: Vec<String> = View::all()
        .iter()
        .enumerate()
        .map(|(idx, view)| format!("{} {}", idx + 1, view.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_view.index())
        .block(Block::default().borders(Borders::ALL).title(Span::styled(
            "QUOTEWATCH",
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )))
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(app.theme.selected_style());
    f.render_widget(tabs, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: Rect) {
    let (text, style) = if let Some(note) = app.notifications.latest() {
        (
            format!("{}: {}", note.level.label(), note.message),
            Style::default().fg(notification_color(note.level, &app.theme)),
        )
    } else {
        (
            hint(app.hint_context()).to_string(),
            Style::default().fg(app.theme.text_dim),
        )
    };
    let footer = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(style);
    f.render_widget(footer, area);
}

fn render_help(f: &mut Frame<'_>, app: &App, area: Rect) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{:<14}", keys), Style::default().fg(app.theme.primary)),
                Span::raw(*action),
            ])
        })
        .collect();
    let help = Paragraph::new(lines).block(
        Block::default()
            .title("Keys (? or Esc to close)")
            .borders(Borders::ALL)
            .border_style(app.theme.border_style(true)),
    );
    f.render_widget(help, popup);
}
