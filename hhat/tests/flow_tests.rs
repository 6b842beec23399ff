use axum::{http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use hh_auth::{Background, ExternalBrowser, LocalStore, Settings, SystemApi};
use hhat::app_core::{AppCore, DataEventHandler};
use hhat::background::worker::{read_flags, AuthWorker};
use hhat::background::BackgroundTaskManager;
use hhat::commands::executor;
use hhat::events::{AppCommand, DataEvent};
use hhat::input::{Key, KeyEvent};
use hhat::state::{AppState, OAuthView, ScreenKind};
use hhat::ui::screens::Screen;

/// Runs commands for real: spawns tasks and drives the browser host
struct LiveHandler {
    task_manager: BackgroundTaskManager,
    worker: AuthWorker,
}

impl DataEventHandler for LiveHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        executor::execute_command(command, state, &mut self.task_manager, &self.worker);
    }
}

struct Harness {
    core: AppCore<LiveHandler>,
    rx: mpsc::UnboundedReceiver<DataEvent>,
    store: Arc<LocalStore>,
}

impl Harness {
    fn new(settings: &Settings, system_token: Option<&str>) -> Self {
        let store = Arc::new(LocalStore::open(settings).unwrap());
        if let Some(system_token) = system_token {
            store.set_system_auth(system_token).unwrap();
        }

        let host = Arc::new(ExternalBrowser::with_opener(|_| Ok(())));
        let background = Arc::new(Background::new(host, settings, store.clone()).unwrap());
        let system_api = Arc::new(SystemApi::new(settings).unwrap());
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = AuthWorker::new(background, store.clone(), system_api, tx);
        worker.watch_tabs();

        let flags = read_flags(&store).unwrap();
        let handler = LiveHandler {
            task_manager: BackgroundTaskManager::new(),
            worker,
        };

        Self {
            core: AppCore::with_flags(handler, flags),
            rx,
            store,
        }
    }

    fn key(&mut self, key: Key) {
        self.core.handle_key(KeyEvent::new(key));
    }

    /// Feed background events into the UI until one matches
    async fn pump_until(&mut self, done: impl Fn(&DataEvent) -> bool) {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
                .await
                .expect("timed out waiting for a data event")
                .expect("channel closed");
            let finished = done(&event);
            self.core.handle_data_event(event);
            if finished {
                return;
            }
        }
    }

    fn oauth_view(&self) -> &OAuthView {
        let Screen::OAuth(oauth) = self.core.state().current_screen() else {
            panic!("Expected OAuth screen");
        };
        &oauth.view
    }
}

async fn spawn_token_server(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
        "/oauth/token",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/oauth/token", addr)
}

fn settings(token_url: String) -> Settings {
    Settings {
        token_url,
        storage_dir: Some(std::env::temp_dir().join(format!("hhat-it-{}", uuid::Uuid::new_v4()))),
        ..Settings::default()
    }
}

#[tokio::test]
async fn test_system_login_without_verify_endpoint() {
    let mut harness = Harness::new(&settings("http://127.0.0.1:9/oauth/token".to_string()), None);

    for c in "sys-token".chars() {
        harness.key(Key::Char(c));
    }
    harness.key(Key::Enter);
    harness
        .pump_until(|e| matches!(e, DataEvent::FlagsLoaded(_)))
        .await;

    assert_eq!(harness.core.state().current_screen().kind(), ScreenKind::OAuth);
    assert_eq!(harness.store.system_token().unwrap().as_deref(), Some("sys-token"));
}

#[tokio::test]
async fn test_rejected_exchange_shows_error_and_keeps_storage() {
    let token_url = spawn_token_server(StatusCode::BAD_REQUEST, json!({"error": "invalid_grant"})).await;
    let mut harness = Harness::new(&settings(token_url), Some("sys-token"));

    harness.key(Key::Enter);
    harness
        .pump_until(|e| matches!(e, DataEvent::AuthorizationTabOpened { .. }))
        .await;

    harness
        .core
        .handle_paste("hhandroid://oauthresponse?code=abc123".to_string());
    harness.key(Key::Enter);
    harness
        .pump_until(|e| matches!(e, DataEvent::OauthResponded(_)))
        .await;

    match harness.oauth_view() {
        OAuthView::Error(msg) => assert_eq!(msg, "Token exchange failed: HTTP 400"),
        other => panic!("Expected Error view, got {:?}", other),
    }
    assert_eq!(harness.store.get("hhToken").unwrap(), None);
    assert!(!harness.store.show_token_display().unwrap());
}

#[tokio::test]
async fn test_successful_flow_reaches_token_display_and_back() {
    let token_url = spawn_token_server(
        StatusCode::OK,
        json!({
            "access_token": "AT1",
            "refresh_token": "RT1",
            "expires_in": 3600,
            "token_type": "bearer"
        }),
    )
    .await;
    let mut harness = Harness::new(&settings(token_url), Some("sys-token"));

    harness.key(Key::Enter);
    harness
        .pump_until(|e| matches!(e, DataEvent::AuthorizationTabOpened { .. }))
        .await;

    // An intermediate hop keeps the attempt waiting
    harness
        .core
        .handle_paste("https://hh.ru/account/login".to_string());
    harness.key(Key::Enter);
    assert!(matches!(harness.oauth_view(), OAuthView::Loading(_)));

    harness
        .core
        .handle_paste("hhandroid://oauthresponse?code=abc123".to_string());
    harness.key(Key::Enter);
    harness
        .pump_until(|e| matches!(e, DataEvent::TokensDelivered { .. }))
        .await;
    assert!(matches!(harness.oauth_view(), OAuthView::Done(_)));

    harness
        .pump_until(|e| matches!(e, DataEvent::FlagsLoaded(_)))
        .await;
    let Screen::TokenDisplay(display) = harness.core.state().current_screen() else {
        panic!("Expected TokenDisplay screen");
    };
    assert_eq!(display.token.access_token, "AT1");
    assert_eq!(harness.store.token().unwrap().map(|t| t.refresh_token), Some("RT1".to_string()));

    harness.key(Key::Enter);
    harness
        .pump_until(|e| matches!(e, DataEvent::FlagsLoaded(_)))
        .await;

    assert_eq!(harness.core.state().current_screen().kind(), ScreenKind::OAuth);
    assert_eq!(harness.store.token().unwrap(), None);
    assert!(!harness.store.show_token_display().unwrap());
}

#[tokio::test]
async fn test_escape_closes_tab_and_reports_cancellation() {
    let mut harness = Harness::new(&settings("http://127.0.0.1:9/oauth/token".to_string()), Some("sys-token"));

    harness.key(Key::Enter);
    harness
        .pump_until(|e| matches!(e, DataEvent::AuthorizationTabOpened { .. }))
        .await;

    harness.key(Key::Esc);
    harness
        .pump_until(|e| matches!(e, DataEvent::OauthResponded(_)))
        .await;

    let Screen::OAuth(oauth) = harness.core.state().current_screen() else {
        panic!("Expected OAuth screen");
    };
    assert!(oauth.prompt.is_none());
    assert!(matches!(&oauth.view, OAuthView::Error(msg) if msg == "Auth window closed"));
    assert!(!harness.core.should_quit(), "Esc in the prompt must not quit");
}

#[tokio::test]
async fn test_retrigger_during_token_display_delay_is_ignored() {
    let token_url = spawn_token_server(
        StatusCode::OK,
        json!({
            "access_token": "AT1",
            "refresh_token": "RT1",
            "expires_in": 3600,
            "token_type": "bearer"
        }),
    )
    .await;
    let mut harness = Harness::new(&settings(token_url), Some("sys-token"));

    harness.key(Key::Enter);
    harness
        .pump_until(|e| matches!(e, DataEvent::AuthorizationTabOpened { .. }))
        .await;
    harness
        .core
        .handle_paste("hhandroid://oauthresponse?code=abc123".to_string());
    harness.key(Key::Enter);
    harness
        .pump_until(|e| matches!(e, DataEvent::TokensDelivered { .. }))
        .await;

    // Still inside the delay before the token display
    harness.key(Key::Char('g'));
    assert!(matches!(harness.oauth_view(), OAuthView::Done(_)));

    harness
        .pump_until(|e| matches!(e, DataEvent::FlagsLoaded(_)))
        .await;
    assert_eq!(harness.core.state().current_screen().kind(), ScreenKind::TokenDisplay);
}
