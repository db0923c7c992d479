//! Live push channel with automatic reconnection.
//!
//! A [`LiveChannel`] owns one background session task at a time. The task
//! opens the socket, sends heartbeat pings while connected, dispatches inbound
//! frames to the registered handlers, and on an unexpected close schedules a
//! reconnect with capped linear backoff until the attempt budget is spent.
//!
//! ```text
//! disconnected ──connect()──► connecting ──open──► connected
//!      ▲                          │                    │
//!      │                        error               close/error
//!      │                          ▼                    ▼
//!      └──────backoff timer── disconnected ◄───────────┘
//!                                 │
//!                          budget exhausted
//!                                 ▼
//!                               failed
//! ```

mod config;
mod error;
mod message;
mod state;
mod transport;

pub use config::*;
pub use error::*;
pub use message::*;
pub use state::*;
pub use transport::*;

use crate::logging::frame_preview;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

type StateHandler = Arc<dyn Fn(ConnectionState) + Send + Sync>;
type MessageHandler = Arc<dyn Fn(&InboundMessage) + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(&ChannelError) + Send + Sync>;

/// State shared between the channel handle and its session task.
#[derive(Default)]
struct ChannelShared {
    state: RwLock<ConnectionState>,
    attempts: AtomicU32,
    state_handlers: RwLock<Vec<StateHandler>>,
    message_handlers: RwLock<Vec<MessageHandler>>,
    error_handlers: RwLock<Vec<ErrorHandler>>,
}

impl ChannelShared {
    fn state(&self) -> ConnectionState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, next: ConnectionState) {
        let previous = {
            let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
            let previous = *state;
            *state = next;
            previous
        };
        if previous == next {
            return;
        }

        tracing::info!(from = %previous, to = %next, "Channel state changed");

        let handlers = self
            .state_handlers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for handler in handlers {
            handler(next);
        }
    }

    fn emit_message(&self, message: &InboundMessage) {
        let handlers = self
            .message_handlers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for handler in handlers {
            handler(message);
        }
    }

    fn emit_error(&self, error: &ChannelError) {
        let handlers = self
            .error_handlers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        for handler in handlers {
            handler(error);
        }
    }

    /// Parse one text frame and hand it to the subscribers.
    fn dispatch(&self, text: &str) {
        let message = match InboundMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                metrics::counter!("finkube_channel_frames_dropped_total").increment(1);
                tracing::warn!(
                    error = %e,
                    frame = %frame_preview(text),
                    "Dropping malformed frame"
                );
                return;
            }
        };

        tracing::debug!(kind = message.kind(), "Frame received");
        metrics::counter!("finkube_channel_frames_total", "type" => message.kind().to_string())
            .increment(1);

        self.emit_message(&message);

        if let InboundMessage::Error(ref remote) = message {
            tracing::warn!(message = %remote.message, "Remote source reported an error");
            self.emit_error(&ChannelError::Remote(remote.message.clone()));
        }
    }
}

struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// How an open session ended
enum SessionEnd {
    Cancelled,
    Closed,
}

/// Reconnecting push channel.
///
/// Handlers run on the session task, one frame at a time, in registration
/// order. They must not block.
pub struct LiveChannel {
    config: ChannelConfig,
    policy: ReconnectPolicy,
    connector: Arc<dyn Connector>,
    shared: Arc<ChannelShared>,
    session: Mutex<Option<Session>>,
}

impl LiveChannel {
    /// Create a channel that connects over WebSocket.
    pub fn new(config: ChannelConfig) -> Self {
        Self::with_connector(config, Arc::new(WsConnector))
    }

    /// Create a channel over a custom transport (for testing).
    pub fn with_connector(config: ChannelConfig, connector: Arc<dyn Connector>) -> Self {
        let policy = ReconnectPolicy::from(&config);
        Self {
            config,
            policy,
            connector,
            shared: Arc::new(ChannelShared::default()),
            session: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    /// Reconnects scheduled since the last successful open
    pub fn reconnect_attempts(&self) -> u32 {
        self.shared.attempts.load(Ordering::SeqCst)
    }

    pub fn on_state_change<F>(&self, handler: F)
    where
        F: Fn(ConnectionState) + Send + Sync + 'static,
    {
        self.shared
            .state_handlers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(handler));
    }

    pub fn on_message<F>(&self, handler: F)
    where
        F: Fn(&InboundMessage) + Send + Sync + 'static,
    {
        self.shared
            .message_handlers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(handler));
    }

    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&ChannelError) + Send + Sync + 'static,
    {
        self.shared
            .error_handlers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(Arc::new(handler));
    }

    /// Start a session unless one is already running.
    ///
    /// Must be called from within a Tokio runtime. Starting from `failed`
    /// resets the reconnect budget.
    pub fn connect(&self) {
        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(ref running) = *session {
            if !running.handle.is_finished() {
                tracing::debug!(state = %self.state(), "Connect ignored, session already running");
                return;
            }
        }

        self.shared.attempts.store(0, Ordering::SeqCst);
        self.shared.set_state(ConnectionState::Connecting);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_session(
            self.config.url.clone(),
            self.policy,
            self.config.heartbeat_interval(),
            Arc::clone(&self.connector),
            Arc::clone(&self.shared),
            cancel.clone(),
        ));
        *session = Some(Session { cancel, handle });
    }

    /// Close the channel without scheduling a reconnect.
    ///
    /// Any pending backoff timer is cancelled before this returns.
    pub async fn disconnect(&self) {
        let session = self
            .session
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        if let Some(session) = session {
            session.cancel.cancel();
            if let Err(e) = session.handle.await {
                tracing::warn!(error = %e, "Channel session task ended abnormally");
            }
        }

        self.shared.set_state(ConnectionState::Disconnected);
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        if let Some(session) = self
            .session
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            session.cancel.cancel();
        }
    }
}

async fn run_session(
    url: String,
    policy: ReconnectPolicy,
    heartbeat: Duration,
    connector: Arc<dyn Connector>,
    shared: Arc<ChannelShared>,
    cancel: CancellationToken,
) {
    loop {
        tracing::debug!(url = %url, attempt = shared.attempts.load(Ordering::SeqCst), "Opening channel");

        let connected = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            result = connector.connect(&url) => result,
        };

        match connected {
            Ok(socket) => {
                shared.attempts.store(0, Ordering::SeqCst);
                shared.set_state(ConnectionState::Connected);
                if let SessionEnd::Cancelled = pump(socket, heartbeat, &shared, &cancel).await {
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Channel connect failed");
                shared.set_state(ConnectionState::Error);
                shared.emit_error(&e);
            }
        }

        shared.set_state(ConnectionState::Disconnected);

        let attempts = shared.attempts.load(Ordering::SeqCst);
        let Some(attempt) = policy.next_attempt(attempts) else {
            tracing::error!(
                attempts,
                "Reconnect budget exhausted, channel failed"
            );
            shared.set_state(ConnectionState::Failed);
            return;
        };
        shared.attempts.store(attempt, Ordering::SeqCst);

        let delay = policy.delay_for_attempt(attempt);
        metrics::counter!("finkube_channel_reconnects_total").increment(1);
        tracing::info!(
            attempt,
            max_attempts = policy.max_attempts,
            delay_ms = delay.as_millis() as u64,
            "Scheduling reconnect"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }

        shared.set_state(ConnectionState::Connecting);
    }
}

/// Drive one open socket until it closes or the session is cancelled.
async fn pump(
    mut socket: Box<dyn Socket>,
    heartbeat: Duration,
    shared: &ChannelShared,
    cancel: &CancellationToken,
) -> SessionEnd {
    let first_tick = Instant::now()
        .checked_add(heartbeat)
        .unwrap_or_else(|| Instant::now() + Duration::from_secs(MAX_HEARTBEAT_INTERVAL_SECONDS));
    let mut ticker = tokio::time::interval_at(first_tick, heartbeat);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                if let Err(e) = socket.close(NORMAL_CLOSURE, "client disconnect").await {
                    tracing::debug!(error = %e, "Close frame not delivered");
                }
                return SessionEnd::Cancelled;
            }
            _ = ticker.tick() => {
                if let Err(e) = socket.send_text(OutboundMessage::ping().to_json()).await {
                    tracing::warn!(error = %e, "Heartbeat ping failed");
                }
            }
            event = socket.recv() => match event {
                Some(SocketEvent::Text(text)) => shared.dispatch(&text),
                Some(SocketEvent::Closed { code, reason }) => {
                    tracing::info!(code = ?code, reason = %reason, "Channel closed by peer");
                    return SessionEnd::Closed;
                }
                Some(SocketEvent::Error(message)) => {
                    tracing::warn!(error = %message, "Channel transport error");
                    shared.set_state(ConnectionState::Error);
                    shared.emit_error(&ChannelError::Transport(message));
                    return SessionEnd::Closed;
                }
                None => {
                    tracing::info!("Channel stream ended");
                    return SessionEnd::Closed;
                }
            },
        }
    }
}
