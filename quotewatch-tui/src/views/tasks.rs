//! Quotation task list view.

use crate::state::App;
use crate::views::helpers::{format_timestamp, list_title};
use crate::views::task_detail;
use crate::widgets::{FilterBar, Pager, StatusBadge};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let list = &app.tasks.list;
    let filter_bar = FilterBar {
        title: "Filters",
        panel: &list.filters,
        theme: &app.theme,
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(filter_bar.height()),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    filter_bar.render(f, chunks[0]);
    render_table(f, app, chunks[1]);
    Pager {
        pagination: &list.pagination,
        loading: list.loading,
        theme: &app.theme,
    }
    .render(f, chunks[2]);

    if app.tasks.detail.is_some() {
        task_detail::render(f, app, area);
    }
}

fn render_table(f: &mut Frame<'_>, app: &App, area: Rect) {
    let list = &app.tasks.list;
    let block = Block::default()
        .title(list_title("Quotation Tasks", list.loading))
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(!list.filters.open));

    if list.rows.is_empty() {
        let message = if list.loading {
            "Loading tasks..."
        } else {
            "No tasks found"
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(app.theme.text_dim))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["Request", "Supplier", "Vehicle", "Status", "Next action", "Updated"])
        .style(
            Style::default()
                .fg(app.theme.secondary)
                .add_modifier(Modifier::BOLD),
        );

    let rows: Vec<Row> = list
        .rows
        .iter()
        .map(|task| {
            Row::new(vec![
                Cell::from(task.original_request_id.clone()),
                Cell::from(task.supplier_name.clone()),
                Cell::from(task.vehicle_label()),
                StatusBadge::task(task.status).cell(&app.theme),
                Cell::from(
                    task.next_action_at
                        .as_ref()
                        .map(format_timestamp)
                        .unwrap_or_else(|| "-".to_string()),
                ),
                Cell::from(format_timestamp(&task.updated_at)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(18),
        Constraint::Percentage(18),
        Constraint::Percentage(20),
        Constraint::Percentage(16),
        Constraint::Percentage(14),
        Constraint::Percentage(14),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(app.theme.selected_style())
        .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(list.selected));
    f.render_stateful_widget(table, area, &mut state);
}
