//! QuoteWatch TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quotewatch_core::DashboardApi;
use quotewatch_tui::api_client::RestClient;
use quotewatch_tui::commands::spawn_all;
use quotewatch_tui::config::TuiConfig;
use quotewatch_tui::error::TuiError;
use quotewatch_tui::events::TuiEvent;
use quotewatch_tui::logging;
use quotewatch_tui::persistence::{self, PersistedState};
use quotewatch_tui::state::App;
use quotewatch_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    run().await?;
    Ok(())
}

async fn run() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    logging::init(&config)?;

    let api: Arc<dyn DashboardApi> = Arc::new(RestClient::new(&config)?);
    let mut app = App::new(config.pagination);
    match persistence::load(&config.persistence_path) {
        Ok(Some(state)) => app.active_view = state.active_view,
        Ok(None) => {}
        Err(err) => warn!(error = %err, "Ignoring unreadable UI state"),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());
    spawn_all(&api, &event_tx, app.start());
    info!(view = app.active_view.title(), "TUI started");

    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_interval_ms));

    while !app.should_quit {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => app.on_tick(),
            Some(event) = event_rx.recv() => {
                let commands = app.handle_event(event);
                spawn_all(&api, &event_tx, commands);
            }
        }
    }

    let persisted = PersistedState {
        active_view: app.active_view,
    };
    if let Err(err) = persistence::save(&config.persistence_path, &persisted) {
        warn!(error = %err, "Failed to save UI state");
    }
    info!("TUI stopped");
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            let forwarded = match event::read() {
                Ok(CrosstermEvent::Key(key)) => sender.blocking_send(TuiEvent::Input(key)),
                Ok(CrosstermEvent::Resize(width, height)) => {
                    sender.blocking_send(TuiEvent::Resize { width, height })
                }
                _ => Ok(()),
            };
            if forwarded.is_err() {
                break;
            }
        }
    });
}
