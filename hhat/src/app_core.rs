use crate::commands::handlers;
use crate::events::{AppCommand, DataEvent};
use crate::input::KeyEvent;
use crate::state::{reducer, AppState, StoredFlags};

/// Trait for handling command execution (production = real worker + tasks, test = mock)
///
/// Tests inject an implementation that neither spawns tasks nor touches the
/// browser, storage or network.
pub trait DataEventHandler {
    /// Execute a command with access to mutable state
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState);
}

/// Testable application core without terminal dependencies
pub struct AppCore<H: DataEventHandler> {
    ui_state: AppState,
    handler: H,
}

impl<H: DataEventHandler> AppCore<H> {
    pub fn new(handler: H) -> Self {
        Self::with_flags(handler, StoredFlags::default())
    }

    /// Start on the screen the persisted flags select
    pub fn with_flags(handler: H, flags: StoredFlags) -> Self {
        Self {
            ui_state: AppState::from_flags(flags),
            handler,
        }
    }

    /// Translate a key press to a command and execute it
    pub fn handle_key(&mut self, event: KeyEvent) {
        if let Some(command) = handlers::handle_key_input(event, &self.ui_state) {
            self.handler.execute_with_context(command, &mut self.ui_state);
        }
    }

    /// Route pasted text to the active input field
    pub fn handle_paste(&mut self, text: String) {
        if let Some(command) = handlers::handle_paste(text, &self.ui_state) {
            self.handler.execute_with_context(command, &mut self.ui_state);
        }
    }

    /// Handle a data event (for test injection or async results)
    pub fn handle_data_event(&mut self, event: DataEvent) {
        reducer::reduce_data_event(&mut self.ui_state, event);
    }

    pub fn state(&self) -> &AppState {
        &self.ui_state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn should_quit(&self) -> bool {
        self.ui_state.should_quit
    }
}
