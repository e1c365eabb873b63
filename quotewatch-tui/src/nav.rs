//! Navigation and view switching utilities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Tasks,
    Logs,
    Settings,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Tasks => "Quotation Tasks",
            View::Logs => "System Logs",
            View::Settings => "Agent Settings",
        }
    }

    pub fn all() -> &'static [View] {
        &[View::Tasks, View::Logs, View::Settings]
    }

    pub fn index(&self) -> usize {
        Self::all().iter().position(|v| v == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}
