//! Colored status and level badges.

use crate::theme::{log_level_tone, status_tone, SynthBruteTheme, Tone};
use quotewatch_core::{LogLevel, QuotationTaskStatus};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::Cell,
};

pub struct StatusBadge {
    pub label: String,
    pub tone: Tone,
}

impl StatusBadge {
    pub fn task(status: QuotationTaskStatus) -> Self {
        Self {
            label: status.label().to_string(),
            tone: status_tone(status),
        }
    }

    pub fn log(level: LogLevel) -> Self {
        Self {
            label: level.as_str().to_uppercase(),
            tone: log_level_tone(level),
        }
    }

    pub fn style(&self, theme: &SynthBruteTheme) -> Style {
        let style = Style::default().fg(theme.tone_color(self.tone));
        if self.tone == Tone::Error {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }

    pub fn span(&self, theme: &SynthBruteTheme) -> Span<'static> {
        Span::styled(self.label.clone(), self.style(theme))
    }

    pub fn cell(&self, theme: &SynthBruteTheme) -> Cell<'static> {
        Cell::from(self.span(theme))
    }
}
