use anyhow::Result;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use hh_auth::{Background, ExternalBrowser, LocalStore, Settings, SystemApi};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;

use crate::background::{
    worker::{read_flags, AuthWorker},
    BackgroundTaskManager,
};
use crate::commands::{executor, handlers};
use crate::input::KeyEvent;
use crate::logging::init_logging;
use crate::state::{AppState, StoredFlags};

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn run(&self) -> Result<()> {
        let log_path = init_logging()?;
        tracing::info!(log = %log_path.display(), "hhat starting");

        let store = Arc::new(LocalStore::open(&self.settings)?);
        let host = Arc::new(ExternalBrowser::new());
        let background = Arc::new(Background::new(host, &self.settings, store.clone())?);
        let system_api = Arc::new(SystemApi::new(&self.settings)?);

        let (data_tx, mut data_rx) = tokio::sync::mpsc::unbounded_channel();
        let worker = AuthWorker::new(background, store.clone(), system_api, data_tx);
        let tab_watch = worker.watch_tabs();

        let mut ui_state = match read_flags(&store) {
            Ok(flags) => AppState::from_flags(flags),
            Err(e) => {
                tracing::error!("Failed to read storage: {}", e);
                let mut state = AppState::from_flags(StoredFlags::default());
                state.storage_error = Some(e.to_string());
                state
            }
        };
        let mut task_manager = BackgroundTaskManager::new();

        if let Some(window_id) = worker.open_window().await {
            tracing::debug!(window_id, "Popup window registered");
        }

        let mut terminal = self.init()?;
        let mut event_stream = EventStream::new();

        tracing::info!("Entering main event loop");

        let mut interval = tokio::time::interval(std::time::Duration::from_millis(100));
        loop {
            terminal.draw(|f| {
                crate::ui::render_app(f, &ui_state);
            })?;

            tokio::select! {
                _ = interval.tick() => {
                    if let Some(throbber_state) = ui_state.loading_state() {
                        throbber_state.calc_next();
                    }
                }
                Some(Ok(event)) = event_stream.next() => {
                    let command = match event {
                        Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => {
                            handlers::handle_key_input(KeyEvent::from(key), &ui_state)
                        }
                        Event::Paste(text) => handlers::handle_paste(text, &ui_state),
                        _ => None,
                    };
                    if let Some(command) = command {
                        // Input commands carry tokens and pasted URLs
                        if !matches!(command, crate::events::AppCommand::AppendInput(_)) {
                            tracing::info!("Executing command: {:?}", command);
                        }
                        executor::execute_command(command, &mut ui_state, &mut task_manager, &worker);
                    }
                }
                Some(data_event) = data_rx.recv() => {
                    tracing::debug!("Received data event: {}", describe(&data_event));
                    crate::state::reducer::reduce_data_event(&mut ui_state, data_event);
                }
            }

            if ui_state.should_quit {
                tracing::info!("Quit requested, exiting event loop");
                break;
            }
        }

        tracing::info!("Cleaning up application");

        task_manager.cancel_all();
        worker.unwatch_tabs(tab_watch);
        worker.close_window().await;

        self.exit(terminal)?;

        Ok(())
    }

    fn init(&self) -> Result<Terminal<CrosstermBackend<std::io::Stdout>>, std::io::Error> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
    }

    fn exit(
        &self,
        mut terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<(), std::io::Error> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableBracketedPaste
        )?;
        terminal.show_cursor()?;
        Ok(())
    }
}

/// Event name for the log, without token material
fn describe(event: &crate::events::DataEvent) -> &'static str {
    use crate::events::DataEvent;
    match event {
        DataEvent::FlagsLoaded(_) => "FlagsLoaded",
        DataEvent::StorageError { .. } => "StorageError",
        DataEvent::SystemLoginSucceeded => "SystemLoginSucceeded",
        DataEvent::SystemLoginFailed { .. } => "SystemLoginFailed",
        DataEvent::AuthorizationTabOpened { .. } => "AuthorizationTabOpened",
        DataEvent::AuthorizationTabClosed { .. } => "AuthorizationTabClosed",
        DataEvent::OauthResponded(_) => "OauthResponded",
        DataEvent::TokensDelivered { .. } => "TokensDelivered",
        DataEvent::DeliveryFailed { .. } => "DeliveryFailed",
    }
}
