use crate::app_core::{AppCore, DataEventHandler};
use crate::commands::executor;
use crate::events::{AppCommand, DataEvent};
use crate::input::{Key, KeyEvent};
use crate::state::{AppState, ScreenKind, StoredFlags};

/// Mock data event handler for tests (no real async tasks)
///
/// Commands update state synchronously through `execute_command_sync`.
/// Every command is recorded so tests can check what would have run.
#[derive(Default)]
pub struct MockDataHandler {
    pub executed: Vec<AppCommand>,
}

impl MockDataHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataEventHandler for MockDataHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        self.executed.push(command.clone());
        executor::execute_command_sync(command, state);
    }
}

pub struct TestApp {
    core: AppCore<MockDataHandler>,
}

impl TestApp {
    /// Create a test app on the system login screen
    pub fn new() -> Self {
        Self {
            core: AppCore::new(MockDataHandler::new()),
        }
    }

    /// Create a test app on the screen selected by `flags`
    pub fn with_flags(flags: StoredFlags) -> Self {
        Self {
            core: AppCore::with_flags(MockDataHandler::new(), flags),
        }
    }

    pub fn send_key(&mut self, key: Key) {
        self.core.handle_key(KeyEvent::new(key));
    }

    pub fn send_key_event(&mut self, event: KeyEvent) {
        self.core.handle_key(event);
    }

    pub fn send_keys(&mut self, keys: &[Key]) {
        for key in keys {
            self.send_key(*key);
        }
    }

    /// Type text one character at a time
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send_key(Key::Char(c));
        }
    }

    pub fn paste(&mut self, text: &str) {
        self.core.handle_paste(text.to_string());
    }

    /// Inject a data event (simulate a background task result)
    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    pub fn state(&self) -> &AppState {
        self.core.state()
    }

    /// Commands the mock handler has received, in order
    pub fn executed(&self) -> &[AppCommand] {
        &self.core_handler().executed
    }

    pub fn assert_screen(&self, expected: ScreenKind) {
        let current = self.state().current_screen();
        assert_eq!(
            current.kind(),
            expected,
            "Expected different screen. Current: {:?}",
            current
        );
    }

    pub fn assert_should_quit(&self) {
        assert!(
            self.core.should_quit(),
            "App should be marked for quit but is not"
        );
    }

    pub fn assert_not_quit(&self) {
        assert!(
            !self.core.should_quit(),
            "App should NOT be marked for quit but is"
        );
    }

    fn core_handler(&self) -> &MockDataHandler {
        self.core.handler()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
