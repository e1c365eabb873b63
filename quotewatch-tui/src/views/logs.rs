//! System log view.

use crate::state::App;
use crate::views::helpers::{format_timestamp, list_title, preview};
use crate::widgets::{FilterBar, Pager, StatusBadge};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let list = &app.logs.list;
    let filter_bar = FilterBar {
        title: "Filters",
        panel: &list.filters,
        theme: &app.theme,
    };
    let expanded = list
        .selected_row()
        .filter(|log| app.logs.is_expanded(log))
        .and_then(|log| log.details_pretty());

    let mut constraints = vec![Constraint::Length(filter_bar.height()), Constraint::Min(0)];
    if expanded.is_some() {
        constraints.push(Constraint::Percentage(40));
    }
    constraints.push(Constraint::Length(3));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    filter_bar.render(f, chunks[0]);
    render_table(f, app, chunks[1]);
    if let Some(details) = expanded {
        let panel = Paragraph::new(details)
            .block(Block::default().title("Details").borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        f.render_widget(panel, chunks[2]);
    }
    Pager {
        pagination: &list.pagination,
        loading: list.loading,
        theme: &app.theme,
    }
    .render(f, chunks[chunks.len() - 1]);
}

fn render_table(f: &mut Frame<'_>, app: &App, area: Rect) {
    let list = &app.logs.list;
    let block = Block::default()
        .title(list_title("System Logs", list.loading))
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(!list.filters.open));

    if list.rows.is_empty() {
        let message = if list.loading {
            "Loading logs..."
        } else {
            "No logs found"
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(app.theme.text_dim))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["", "Time", "Level", "Event", "Message", "Task"]).style(
        Style::default()
            .fg(app.theme.secondary)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = list
        .rows
        .iter()
        .map(|log| {
            let marker = match (log.details.is_null(), app.logs.is_expanded(log)) {
                (true, _) => " ",
                (false, true) => "-",
                (false, false) => "+",
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(format_timestamp(&log.timestamp)),
                StatusBadge::log(log.level).cell(&app.theme),
                Cell::from(log.event_type.clone()),
                Cell::from(preview(&log.message, 80)),
                Cell::from(log.related_task_id.clone().unwrap_or_else(|| "-".to_string())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(1),
        Constraint::Length(16),
        Constraint::Length(8),
        Constraint::Percentage(20),
        Constraint::Percentage(50),
        Constraint::Percentage(15),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(app.theme.selected_style());

    let mut state = TableState::default();
    state.select(Some(list.selected));
    f.render_stateful_widget(table, area, &mut state);
}
