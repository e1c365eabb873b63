//! SynthBrute theme and color utilities.

use crate::notifications::NotificationLevel;
use quotewatch_core::{LogLevel, QuotationTaskStatus};
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct SynthBruteTheme {
    pub bg: Color,
    pub bg_highlight: Color,
    pub primary: Color,
    pub primary_dim: Color,
    pub secondary: Color,
    pub tertiary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Default for SynthBruteTheme {
    fn default() -> Self {
        Self::synthbrute()
    }
}

impl SynthBruteTheme {
    pub fn synthbrute() -> Self {
        Self {
            bg: Color::Rgb(10, 10, 10),
            bg_highlight: Color::Rgb(42, 42, 42),
            primary: Color::Rgb(0, 255, 255),
            primary_dim: Color::Rgb(0, 136, 136),
            secondary: Color::Rgb(255, 0, 255),
            tertiary: Color::Rgb(255, 255, 0),
            success: Color::Rgb(0, 255, 0),
            warning: Color::Rgb(255, 170, 0),
            error: Color::Rgb(255, 0, 0),
            info: Color::Rgb(0, 170, 255),
            text: Color::Rgb(255, 255, 255),
            text_dim: Color::Rgb(136, 136, 136),
            text_muted: Color::Rgb(68, 68, 68),
            border: Color::Rgb(68, 68, 68),
            border_focus: Color::Rgb(0, 255, 255),
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused { self.border_focus } else { self.border })
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .bg(self.bg_highlight)
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn disabled_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }

    pub fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Info => self.info,
            Tone::Warning => self.warning,
            Tone::Success => self.success,
            Tone::Error => self.error,
            Tone::Muted => self.text_dim,
        }
    }
}

/// Severity used to color badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Warning,
    Success,
    Error,
    Muted,
}

pub fn status_tone(status: QuotationTaskStatus) -> Tone {
    use QuotationTaskStatus::*;
    match status {
        New | QueuedForContact | InitialContactSent | AwaitingSupplierResponse
        | AwaitingSystemQuoteUpdate => Tone::Info,
        ContactFailedRetryScheduled | SupplierResponseUnclear | TimeoutReminderSent => {
            Tone::Warning
        }
        SupplierResponseReceivedPositive | PartsListSent | QuoteFinalizedBySystem => Tone::Success,
        SupplierResponseReceivedNegative
        | TimeoutFinalNoResponse
        | ErrorProcessing
        | ClosedSupplierDeclined => Tone::Error,
    }
}

pub fn log_level_tone(level: LogLevel) -> Tone {
    match level {
        LogLevel::Info => Tone::Info,
        LogLevel::Warn => Tone::Warning,
        LogLevel::Error | LogLevel::Critical => Tone::Error,
        LogLevel::Debug => Tone::Muted,
    }
}

pub fn task_status_color(status: QuotationTaskStatus, theme: &SynthBruteTheme) -> Color {
    theme.tone_color(status_tone(status))
}

pub fn log_level_color(level: LogLevel, theme: &SynthBruteTheme) -> Color {
    theme.tone_color(log_level_tone(level))
}

pub fn notification_color(level: NotificationLevel, theme: &SynthBruteTheme) -> Color {
    match level {
        NotificationLevel::Info => theme.info,
        NotificationLevel::Warning => theme.warning,
        NotificationLevel::Error => theme.error,
        NotificationLevel::Success => theme.success,
    }
}
