//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, and rendering.

use crate::api::{ApiClientBuilder, DashboardApi, OfflineCache};
use crate::config::{self, Config};
use crate::controller::Controller;
use crate::error::Result;
use crate::events::EventHandler;
use crate::poller;
use crate::signal::{RandomEntry, SignalDetector};
use crate::state::{Action, Store};
use crate::storage::{LocalStorage, SnapshotStore};
use crate::ui::Ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Store plus side effects.
    controller: Controller,
    /// Event handler.
    event_handler: EventHandler,
    /// Action receiver.
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Renderer.
    ui: Ui,
    /// Poll timer task.
    poll_timer: Option<JoinHandle<()>>,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;

        // Create action channel
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let store = Store::new(action_tx, &config);

        let mut builder = ApiClientBuilder::new().config(config.api.clone());
        if config.cache.enabled {
            builder = builder.cache(OfflineCache::new(config.cache.clone()));
        }
        let client = builder.build()?;

        // Precaching is best-effort and must not delay the first frame
        let precache = client.clone();
        tokio::spawn(async move {
            if let Err(e) = precache.prepare_offline_cache().await {
                tracing::debug!("Offline cache not installed: {}", e);
            }
        });
        let api: Arc<dyn DashboardApi> = Arc::new(client);

        let snapshots = config.storage.enabled.then(|| {
            let storage = LocalStorage::open(config.storage.resolved_path());
            SnapshotStore::new(storage, config.storage.state_key.clone())
        });

        let detector = SignalDetector::new(RandomEntry::new(config.signal.buy_probability));
        let export_dir = config::data_dir()?;
        let controller = Controller::new(
            store,
            api,
            snapshots,
            detector,
            config.clone(),
            export_dir,
        );

        let event_handler = EventHandler::new(
            config.keybindings.clone(),
            Duration::from_millis(config.ui.tick_rate_ms),
        );
        let ui = Ui::new(&config);

        // Set up terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if config.ui.mouse_support {
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        } else {
            execute!(stdout, EnterAlternateScreen)?;
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            controller,
            event_handler,
            action_rx,
            ui,
            poll_timer: None,
            config,
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        self.controller.boot();

        let period = Duration::from_secs(self.config.poll.interval_secs);
        self.poll_timer = Some(poller::spawn_timer(
            period,
            self.controller.store().sender(),
        ));
        tracing::info!(
            "Polling {} every {:?}",
            self.config.api.base_url,
            period
        );

        // Main event loop
        loop {
            let store = self.controller.store_mut();
            store.expire_toast(Instant::now());
            if store.notifications.take_bell() {
                ring_bell();
            }

            self.event_handler
                .update_store_snapshot(self.controller.store());

            // Render UI
            let ui = &self.ui;
            let store = self.controller.store();
            self.terminal.draw(|frame| ui.render(frame, store))?;

            // Handle events and actions
            tokio::select! {
                // Handle terminal events
                result = self.event_handler.next() => {
                    if let Some(action) = result? {
                        self.controller.handle_action(action)?;
                    }
                }

                // Handle actions from the channel
                Some(action) = self.action_rx.recv() => {
                    self.controller.handle_action(action)?;
                }
            }

            // Check if we should quit
            if self.controller.store().app.should_quit {
                break;
            }
        }

        Ok(())
    }
}

fn ring_bell() {
    let mut stdout = io::stdout();
    if stdout.write_all(b"\x07").and_then(|_| stdout.flush()).is_err() {
        tracing::debug!("Failed to ring terminal bell");
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(timer) = self.poll_timer.take() {
            timer.abort();
        }

        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
