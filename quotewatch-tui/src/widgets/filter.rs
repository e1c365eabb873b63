//! Filter bar widget.

use crate::filters::{FilterForm, FilterPanel};
use crate::theme::SynthBruteTheme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct FilterBar<'a, F: FilterForm> {
    pub title: &'a str,
    pub panel: &'a FilterPanel<F>,
    pub theme: &'a SynthBruteTheme,
}

impl<'a, F: FilterForm> FilterBar<'a, F> {
    /// Rows needed, editor included.
    pub fn height(&self) -> u16 {
        if self.panel.is_editing() {
            6
        } else {
            3
        }
    }

    /// Applied fields that differ from their defaults.
    fn applied_summary(&self) -> Line<'static> {
        let defaults = F::default();
        let active: Vec<String> = F::labels()
            .iter()
            .enumerate()
            .filter(|(idx, _)| self.panel.applied.value(*idx) != defaults.value(*idx))
            .map(|(idx, label)| format!("{}: {}", label, self.panel.applied.value(idx)))
            .collect();
        if active.is_empty() {
            Line::from(Span::styled(
                "No filters  [/] edit",
                Style::default().fg(self.theme.text_dim),
            ))
        } else {
            Line::from(vec![
                Span::styled(active.join("  "), Style::default().fg(self.theme.tertiary)),
                Span::styled("  [c] clear", Style::default().fg(self.theme.text_dim)),
            ])
        }
    }

    fn draft_fields(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (idx, label) in F::labels().iter().enumerate() {
            let value = self.panel.draft.value(idx);
            let value = if value.is_empty() { "-".to_string() } else { value };
            let style = if idx == self.panel.focus {
                self.theme.selected_style()
            } else {
                Style::default().fg(self.theme.text)
            };
            spans.push(Span::styled(format!(" {}: {} ", label, value), style));
            spans.push(Span::raw(" "));
        }
        if self.panel.has_pending_changes() {
            spans.push(Span::styled(
                "* unapplied",
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
        Line::from(spans)
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let (bar_area, editor_area) = if self.panel.is_editing() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Length(3)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        let line = if self.panel.open {
            self.draft_fields()
        } else {
            self.applied_summary()
        };
        let paragraph = Paragraph::new(line).block(
            Block::default()
                .title(self.title)
                .borders(Borders::ALL)
                .border_style(self.theme.border_style(self.panel.open)),
        );
        f.render_widget(paragraph, bar_area);

        if let (Some(area), Some(editor)) = (editor_area, self.panel.editor.as_ref()) {
            let label = F::labels().get(self.panel.focus).copied().unwrap_or("");
            let mut editor = editor.clone();
            editor.set_block(
                Block::default()
                    .title(format!("{} (Enter apply field, Esc cancel)", label))
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style(true)),
            );
            f.render_widget(&editor, area);
        }
    }
}
