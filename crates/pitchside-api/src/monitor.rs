//! Monitor link with auto-reconnect.
//!
//! Owns a single TCP connection to the match server and runs it on a
//! background tokio task. Commands are handed over through an unbounded
//! channel (fire-and-forget); the link state is published through a
//! [`tokio::sync::watch`] channel so consumers observe every transition in
//! order. A second watch channel carries the [`GameState`] decoded from
//! inbound frames, reset to `None` whenever the connection drops.
//!
//! # Example
//!
//! ```rust,ignore
//! use pitchside_api::{MonitorCommand, MonitorConfig, MonitorHandle};
//! use tokio_util::sync::CancellationToken;
//!
//! let handle = MonitorHandle::spawn(MonitorConfig::default(), CancellationToken::new());
//! let mut state = handle.subscribe();
//! state.wait_for(|s| s.is_connected()).await?;
//! handle.send(MonitorCommand::RequestFullState);
//! let game = handle.game_state().borrow().clone();
//! ```

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_util::codec::{FramedRead, FramedWrite};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::error::Error;
use crate::protocol::{MonitorCommand, monitor_codec};
use crate::state::GameState;

// ── LinkState ────────────────────────────────────────────────────────

/// Connection state of the monitor link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl LinkState {
    pub fn is_connected(self) -> bool {
        self == Self::Connected
    }
}

// ── Configuration ────────────────────────────────────────────────────

/// Exponential backoff configuration for automatic reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 30s.
    pub max_delay: Duration,

    /// Maximum consecutive failed attempts before falling back to manual
    /// connect. `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

/// Where and how to connect.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub host: String,
    pub port: u16,
    /// Connect on startup and after every disconnect without being asked.
    pub auto_connect: bool,
    pub connect_timeout: Duration,
    pub reconnect: ReconnectConfig,
}

impl MonitorConfig {
    /// `host:port` as passed to the socket layer.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 3200,
            auto_connect: true,
            connect_timeout: Duration::from_secs(2),
            reconnect: ReconnectConfig::default(),
        }
    }
}

// ── MonitorHandle ────────────────────────────────────────────────────

enum Request {
    Connect,
    Send(MonitorCommand),
}

/// Handle to a running monitor link.
///
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) tears down
/// the background task and closes the socket.
pub struct MonitorHandle {
    request_tx: mpsc::UnboundedSender<Request>,
    state_rx: watch::Receiver<LinkState>,
    game_rx: watch::Receiver<Option<GameState>>,
    cancel: CancellationToken,
}

impl MonitorHandle {
    /// Spawn the link task. Must be called from within a tokio runtime.
    ///
    /// With `auto_connect` the first attempt starts immediately; otherwise
    /// the link stays disconnected until [`connect`](Self::connect).
    pub fn spawn(config: MonitorConfig, cancel: CancellationToken) -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(LinkState::Disconnected);
        let (game_tx, game_rx) = watch::channel(None);
        let publish = Publish { state_tx, game_tx };

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            link_loop(config, request_rx, publish, task_cancel).await;
        });

        Self {
            request_tx,
            state_rx,
            game_rx,
            cancel,
        }
    }

    /// Current link state.
    pub fn state(&self) -> LinkState {
        *self.state_rx.borrow()
    }

    /// New receiver observing every state transition.
    pub fn subscribe(&self) -> watch::Receiver<LinkState> {
        self.state_rx.clone()
    }

    /// New receiver for the game state of the current connection.
    pub fn game_state(&self) -> watch::Receiver<Option<GameState>> {
        self.game_rx.clone()
    }

    /// Ask the link to connect. No-op while already connected or connecting.
    pub fn connect(&self) {
        let _ = self.request_tx.send(Request::Connect);
    }

    /// Queue a command. Dropped if the link is not connected when it is
    /// dequeued.
    pub fn send(&self, command: MonitorCommand) {
        if self.request_tx.send(Request::Send(command)).is_err() {
            debug!("monitor link task has stopped, command discarded");
        }
    }

    /// Signal the background task to shut down.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

// ── Background loop ──────────────────────────────────────────────────

struct Publish {
    state_tx: watch::Sender<LinkState>,
    game_tx: watch::Sender<Option<GameState>>,
}

enum Wake {
    Cancelled,
    ConnectRequested,
    Elapsed,
}

/// Main loop: (wait for connect) → connect → run → backoff → repeat.
async fn link_loop(
    config: MonitorConfig,
    mut requests: mpsc::UnboundedReceiver<Request>,
    publish: Publish,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;
    let mut wants_connection = config.auto_connect;

    loop {
        if !wants_connection {
            match idle(&mut requests, &cancel, None).await {
                Wake::Cancelled => break,
                Wake::ConnectRequested | Wake::Elapsed => wants_connection = true,
            }
        }

        publish.state_tx.send_replace(LinkState::Connecting);
        let result = connect_and_run(&config, &mut requests, &publish, &cancel).await;
        publish.game_tx.send_replace(None);
        publish.state_tx.send_replace(LinkState::Disconnected);

        if cancel.is_cancelled() {
            break;
        }

        match result {
            Ok(()) => {
                info!("match server connection closed");
                attempt = 0;
            }
            Err(e) => {
                if e.is_connect() {
                    debug!(error = %e, attempt, "connect attempt failed");
                } else {
                    warn!(error = %e, "monitor link error");
                }
            }
        }

        if !config.auto_connect {
            wants_connection = false;
            continue;
        }

        if let Some(max) = config.reconnect.max_retries {
            if attempt >= max {
                warn!(max_retries = max, "reconnection limit reached, waiting for connect request");
                attempt = 0;
                wants_connection = false;
                continue;
            }
        }

        let delay = calculate_backoff(attempt, &config.reconnect);
        trace!(delay_ms = delay.as_millis(), attempt, "waiting before reconnect");
        attempt = attempt.saturating_add(1);

        if let Wake::Cancelled = idle(&mut requests, &cancel, Some(delay)).await {
            break;
        }
    }

    debug!("monitor link loop exiting");
}

/// Wait while disconnected. Commands arriving now are dropped: replaying
/// them after a reconnect would act on a stale view of the match.
async fn idle(
    requests: &mut mpsc::UnboundedReceiver<Request>,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> Wake {
    let sleep = async {
        match timeout {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Wake::Cancelled,
            request = requests.recv() => match request {
                Some(Request::Connect) => return Wake::ConnectRequested,
                Some(Request::Send(command)) => {
                    debug!(%command, "link not connected, command dropped");
                }
                None => return Wake::Cancelled,
            },
            () = &mut sleep => return Wake::Elapsed,
        }
    }
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Establish one connection and pump frames until either side closes it.
async fn connect_and_run(
    config: &MonitorConfig,
    requests: &mut mpsc::UnboundedReceiver<Request>,
    publish: &Publish,
    cancel: &CancellationToken,
) -> Result<(), Error> {
    let addr = config.address();
    debug!(%addr, "connecting to match server");

    let stream = tokio::select! {
        biased;
        () = cancel.cancelled() => return Ok(()),
        result = tokio::time::timeout(
            config.connect_timeout,
            TcpStream::connect(addr.as_str()),
        ) => {
            match result {
                Ok(Ok(stream)) => stream,
                Ok(Err(source)) => return Err(Error::Connect { addr, source }),
                Err(_) => {
                    return Err(Error::Timeout {
                        addr,
                        timeout_ms: u64::try_from(config.connect_timeout.as_millis())
                            .unwrap_or(u64::MAX),
                    });
                }
            }
        }
    };
    stream.set_nodelay(true)?;

    publish.state_tx.send_replace(LinkState::Connected);
    info!(%addr, "connected to match server");

    let mut game = GameState::default();

    let (read_half, write_half) = stream.into_split();
    let mut inbound = FramedRead::new(read_half, monitor_codec());
    let mut outbound = FramedWrite::new(write_half, monitor_codec());

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Ok(()),
            request = requests.recv() => match request {
                Some(Request::Send(command)) => {
                    outbound.send(command.to_payload()).await?;
                    trace!(%command, "command sent");
                }
                Some(Request::Connect) => trace!("connect requested while connected"),
                None => return Ok(()),
            },
            frame = inbound.next() => match frame {
                Some(Ok(frame)) => {
                    if game.apply_frame(&frame) {
                        trace!(time = game.time, play_mode = %game.play_mode, "game state updated");
                        publish.game_tx.send_replace(Some(game.clone()));
                    }
                }
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }
    }
}

// ── Backoff calculation ──────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) * (1 ± 0.25)`, where the jitter is
/// derived from the attempt number so retries stay reproducible.
fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let exponent = i32::try_from(attempt.min(16)).unwrap_or(16);
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(exponent);
    let capped = base.min(config.max_delay.as_secs_f64());

    let jitter_factor = 1.0 + 0.25 * (f64::from(attempt) * 7.3).sin();
    Duration::from_secs_f64((capped * jitter_factor).max(0.0))
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_local_server() {
        let config = MonitorConfig::default();
        assert_eq!(config.address(), "localhost:3200");
        assert!(config.auto_connect);
        assert_eq!(config.reconnect.initial_delay, Duration::from_secs(1));
    }

    #[test]
    fn backoff_grows_then_caps() {
        let config = ReconnectConfig {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            max_retries: None,
        };

        let d0 = calculate_backoff(0, &config);
        let d2 = calculate_backoff(2, &config);
        assert!(d2 > d0, "d2 ({d2:?}) should exceed d0 ({d0:?})");

        let d20 = calculate_backoff(20, &config);
        assert!(d20 <= Duration::from_millis(12_500), "{d20:?} should be capped");
    }

    #[test]
    fn first_backoff_is_the_initial_delay() {
        let config = ReconnectConfig::default();
        assert_eq!(calculate_backoff(0, &config), Duration::from_secs(1));
    }
}
