//! Task detail dialog.

use crate::state::{App, DetailTab, TaskDetailState};
use crate::views::helpers::{centered_box, centered_rect, format_optional, format_timestamp};
use crate::widgets::{DetailPanel, StatusBadge};
use quotewatch_core::QuotationTask;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(detail) = app.tasks.detail.as_ref() else {
        return;
    };
    let popup = centered_rect(85, 85, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(format!("Task {}", detail.task_id))
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let titles: Vec<&str> = DetailTab::all().iter().map(DetailTab::title).collect();
    let tabs = Tabs::new(titles)
        .select(detail.tab.index())
        .style(Style::default().fg(app.theme.text_dim))
        .highlight_style(app.theme.selected_style());
    f.render_widget(tabs, chunks[0]);

    match detail.task.as_ref() {
        Some(task) => match detail.tab {
            DetailTab::Info => render_info(f, app, task, detail.scroll, chunks[1]),
            DetailTab::Parts => render_parts(f, app, task, chunks[1]),
            DetailTab::Messages => render_messages(f, app, task, detail.scroll, chunks[1]),
            DetailTab::Logs => render_logs(f, app, task, detail.scroll, chunks[1]),
        },
        None => {
            let loading = Paragraph::new("Loading task...")
                .style(Style::default().fg(app.theme.text_dim));
            f.render_widget(loading, chunks[1]);
        }
    }

    f.render_widget(Paragraph::new(action_line(app, detail)), chunks[2]);

    if detail.confirm_cancel {
        render_confirm(f, app, area);
    }
}

fn action_line(app: &App, detail: &TaskDetailState) -> Line<'static> {
    let enabled = Style::default().fg(app.theme.primary);
    let style = |on: bool| if on { enabled } else { app.theme.disabled_style() };
    let mut spans = vec![
        Span::styled("[r] Retry contact", style(detail.can_retry())),
        Span::raw("   "),
        Span::styled("[x] Cancel task", style(detail.can_cancel())),
    ];
    if let Some(mutation) = detail.processing {
        let label = match mutation {
            crate::commands::TaskMutation::Retry => "   Scheduling retry...",
            crate::commands::TaskMutation::Cancel => "   Cancelling...",
        };
        spans.push(Span::styled(label, Style::default().fg(app.theme.warning)));
    } else if detail.loading && detail.task.is_some() {
        spans.push(Span::styled("   Refreshing...", Style::default().fg(app.theme.text_dim)));
    }
    Line::from(spans)
}

fn render_info(f: &mut Frame<'_>, app: &App, task: &QuotationTask, scroll: u16, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let status = Line::from(vec![
        Span::styled("Status: ", Style::default().fg(app.theme.secondary)),
        StatusBadge::task(task.status).span(&app.theme),
    ]);
    f.render_widget(Paragraph::new(status), chunks[0]);

    let payload = serde_json::to_string_pretty(&task.request_payload).unwrap_or_default();
    let mut panel = DetailPanel::new("Information", Style::default().fg(app.theme.secondary))
        .field("Task ID", task.id.clone())
        .field("Original request", task.original_request_id.clone())
        .field("Supplier", task.supplier_name.clone())
        .field("Phone", task.supplier_phone.clone())
        .field("Supplier URL", task.supplier_url.clone())
        .field("Vehicle", task.vehicle_label())
        .field("Chassis", task.vehicle_chassis.clone())
        .field("Retry attempts", task.retry_attempts.to_string())
        .field("Last contact", format_optional(task.last_contact_attempt_at.as_ref()))
        .field("Next action", format_optional(task.next_action_at.as_ref()))
        .field("Created", format_timestamp(&task.created_at))
        .field("Updated", format_timestamp(&task.updated_at))
        .optional("Supplier response", task.supplier_response_content.clone())
        .optional("Interpretation", task.response_interpretation.clone())
        .field("Request payload", payload);
    panel.scroll = scroll;
    panel.render(f, chunks[1]);
}

fn render_parts(f: &mut Frame<'_>, app: &App, task: &QuotationTask, area: Rect) {
    let header = Row::new(["Code", "Description", "Qty"]).style(
        Style::default()
            .fg(app.theme.secondary)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = task
        .parts
        .iter()
        .map(|part| {
            Row::new(vec![
                Cell::from(part.code.clone()),
                Cell::from(part.description.clone()),
                Cell::from(part.quantity.to_string()),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(25),
            Constraint::Percentage(60),
            Constraint::Percentage(15),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!("Parts ({})", task.parts.len()))
            .borders(Borders::ALL),
    );
    f.render_widget(table, area);
}

fn render_messages(f: &mut Frame<'_>, app: &App, task: &QuotationTask, scroll: u16, area: Rect) {
    let mut lines = Vec::new();
    for message in &task.messages {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", format_timestamp(&message.timestamp)),
                Style::default().fg(app.theme.text_dim),
            ),
            Span::styled(
                message.direction.label(),
                Style::default()
                    .fg(app.theme.secondary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  [{} / {}]", message.content_type, message.delivery_status),
                Style::default().fg(app.theme.text_dim),
            ),
        ]));
        lines.extend(message.content.lines().map(|l| Line::from(format!("  {}", l))));
        lines.push(Line::default());
    }
    if lines.is_empty() {
        lines.push(Line::from("No messages exchanged yet"));
    }
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!("Messages ({})", task.messages.len()))
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_logs(f: &mut Frame<'_>, app: &App, task: &QuotationTask, scroll: u16, area: Rect) {
    let mut lines = Vec::new();
    for log in &task.logs {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", format_timestamp(&log.timestamp)),
                Style::default().fg(app.theme.text_dim),
            ),
            StatusBadge::log(log.level).span(&app.theme),
            Span::styled(
                format!(" {} ", log.event_type),
                Style::default().fg(app.theme.tertiary),
            ),
            Span::raw(log.message.clone()),
        ]));
        if let Some(details) = log.details_pretty() {
            lines.extend(details.lines().map(|l| {
                Line::from(Span::styled(
                    format!("    {}", l),
                    Style::default().fg(app.theme.text_dim),
                ))
            }));
        }
    }
    if lines.is_empty() {
        lines.push(Line::from("No logs for this task"));
    }
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!("Logs ({})", task.logs.len()))
                .borders(Borders::ALL),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_confirm(f: &mut Frame<'_>, app: &App, area: Rect) {
    let popup = centered_box(50, 5, area);
    f.render_widget(Clear, popup);
    let prompt = Paragraph::new(vec![
        Line::from("Cancel this quotation task?"),
        Line::from(Span::styled(
            "Enter confirm  Esc keep task",
            Style::default().fg(app.theme.text_dim),
        )),
    ])
    .block(
        Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.warning)),
    );
    f.render_widget(prompt, popup);
}
