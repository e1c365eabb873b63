//! Pagination footer for list views.

use crate::pagination::{PageNav, Pagination};
use crate::theme::SynthBruteTheme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct Pager<'a> {
    pub pagination: &'a Pagination,
    pub loading: bool,
    pub theme: &'a SynthBruteTheme,
}

impl<'a> Pager<'a> {
    fn control(&self, label: &'static str, nav: PageNav) -> Span<'static> {
        let style = if !self.loading && self.pagination.target(nav).is_some() {
            Style::default().fg(self.theme.primary)
        } else {
            self.theme.disabled_style()
        };
        Span::styled(label, style)
    }

    pub fn line(&self) -> Line<'static> {
        let p = self.pagination;
        let sizes = p
            .sizes()
            .iter()
            .map(|size| {
                if *size == p.page_size {
                    format!("[{}]", size)
                } else {
                    size.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        let dim = Style::default().fg(self.theme.text_dim);
        Line::from(vec![
            self.control(" \u{ab} ", PageNav::First),
            self.control(" \u{2039} ", PageNav::Previous),
            Span::raw(format!(" Page {} of {} ", p.page, p.total_pages())),
            self.control(" \u{203a} ", PageNav::Next),
            self.control(" \u{bb} ", PageNav::Last),
            Span::styled(format!(" | {} | per page: {}", p.summary(), sizes), dim),
        ])
    }

    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let widget = Paragraph::new(self.line()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border_style(false)),
        );
        f.render_widget(widget, area);
    }
}
