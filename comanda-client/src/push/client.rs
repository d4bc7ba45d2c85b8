//! Push client: one background task per connection
//!
//! The task connects, performs the Engine.IO / Socket.IO handshake, answers
//! pings, decodes events and fans them out on a broadcast channel. When the
//! connection drops it reconnects with exponential backoff until the attempt
//! budget runs out or [`PushClient::disconnect`] is called.

use futures::{SinkExt, StreamExt};
use serde::Serialize;
use shared::message::{EventDecodeError, PushEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::codec::{self, DEFAULT_NAMESPACE, EnginePacket, SocketPacket};
use crate::config::PushConfig;
use crate::{ClientConfig, ClientError, ClientResult};

/// Outgoing frames waiting for a connection
const OUTGOING_CAPACITY: usize = 64;

/// What subscribers receive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Handshake completed; after a reconnect views should refetch
    Connected,
    /// Connection lost (a reconnect may follow)
    Disconnected { reason: String },
    Event(PushEvent),
}

/// Receiving end handed to a view; dropping it unsubscribes
#[derive(Debug)]
pub struct PushSubscription {
    rx: broadcast::Receiver<Notification>,
}

impl PushSubscription {
    /// Next notification. `Err(Lagged)` means events were missed and the view
    /// should refetch; `Err(Closed)` means the client is gone.
    pub async fn recv(&mut self) -> Result<Notification, broadcast::error::RecvError> {
        self.rx.recv().await
    }
}

struct Running {
    outgoing: mpsc::Sender<String>,
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct PushClient {
    url: String,
    config: PushConfig,
    events: broadcast::Sender<Notification>,
    connected: Arc<AtomicBool>,
    running: Option<Running>,
}

impl PushClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::with_url(config.push_url()?, config.push.clone()))
    }

    /// Client for an explicit `ws://…/socket.io/?EIO=4&transport=websocket` URL
    pub fn with_url(url: impl Into<String>, config: PushConfig) -> Self {
        let (events, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            url: url.into(),
            config,
            events,
            connected: Arc::new(AtomicBool::new(false)),
            running: None,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Handshake done and connection alive
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Start the background task. Calling it while running is a no-op.
    pub fn connect(&mut self) {
        if self
            .running
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
        {
            return;
        }
        let (outgoing, outgoing_rx) = mpsc::channel(OUTGOING_CAPACITY);
        let shutdown = CancellationToken::new();
        let worker = Worker {
            url: self.url.clone(),
            config: self.config.clone(),
            events: self.events.clone(),
            connected: self.connected.clone(),
            outgoing: outgoing_rx,
            shutdown: shutdown.clone(),
        };
        let handle = tokio::spawn(worker.run());
        self.running = Some(Running {
            outgoing,
            shutdown,
            handle,
        });
    }

    pub fn subscribe(&self) -> PushSubscription {
        PushSubscription {
            rx: self.events.subscribe(),
        }
    }

    /// Send a client event. Queued while reconnecting.
    pub async fn emit<T: Serialize>(&self, event: &str, payload: &T) -> ClientResult<()> {
        let running = self
            .running
            .as_ref()
            .ok_or_else(|| ClientError::Push("push client is not connected".into()))?;
        let value = serde_json::to_value(payload)?;
        let frame = codec::encode_event(DEFAULT_NAMESPACE, event, &value)
            .map_err(|e| ClientError::Push(e.to_string()))?;
        running
            .outgoing
            .send(frame)
            .await
            .map_err(|_| ClientError::Push("push client stopped".into()))?;
        tracing::debug!(event, "Push event queued");
        Ok(())
    }

    /// Stop the background task and wait for it
    pub async fn disconnect(&mut self) {
        if let Some(running) = self.running.take() {
            running.shutdown.cancel();
            if let Err(e) = running.handle.await {
                tracing::warn!("Push task ended abnormally: {e}");
            }
        }
        self.connected.store(false, Ordering::Release);
    }
}

impl Drop for PushClient {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.shutdown.cancel();
        }
    }
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

struct Worker {
    url: String,
    config: PushConfig,
    events: broadcast::Sender<Notification>,
    connected: Arc<AtomicBool>,
    outgoing: mpsc::Receiver<String>,
    shutdown: CancellationToken,
}

impl Worker {
    async fn run(mut self) {
        tracing::info!(url = %self.url, "Push client started");
        let mut attempt: u32 = 0;

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            let connect = tokio::time::timeout(
                self.config.connect_timeout,
                tokio_tungstenite::connect_async(self.url.as_str()),
            );
            let result = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                result = connect => result,
            };

            match result {
                Ok(Ok((ws, _))) => {
                    let reason = self.run_session(ws, &mut attempt).await;
                    if self.connected.swap(false, Ordering::AcqRel) {
                        let _ = self.events.send(Notification::Disconnected {
                            reason: reason.clone(),
                        });
                    }
                    if self.shutdown.is_cancelled() {
                        break;
                    }
                    tracing::warn!(%reason, "Push connection lost");
                }
                Ok(Err(e)) => tracing::warn!(attempt, "Push connection failed: {e}"),
                Err(_) => tracing::warn!(attempt, "Push connection timed out"),
            }

            attempt += 1;
            if !self.config.may_retry(attempt) {
                tracing::error!(attempt, "Push client giving up");
                let _ = self.events.send(Notification::Disconnected {
                    reason: "reconnect attempts exhausted".into(),
                });
                break;
            }

            let delay = self.config.backoff(attempt);
            tracing::debug!(delay_ms = delay.as_millis() as u64, attempt, "Reconnecting");
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tokio::time::sleep(delay) => {},
            }
        }

        tracing::info!("Push client stopped");
    }

    /// Run one connection until it drops, returning the reason
    async fn run_session(&mut self, ws: WsStream, attempt: &mut u32) -> String {
        let (mut sink, mut stream) = ws.split();
        // Until the open packet arrives, use the connect timeout as the liveness window
        let mut liveness = self.config.connect_timeout;
        let mut deadline = Instant::now() + liveness;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    // Frames emitted just before disconnect still go out
                    if self.connected.load(Ordering::Acquire) {
                        while let Ok(frame) = self.outgoing.try_recv() {
                            if sink.send(Message::text(frame)).await.is_err() {
                                break;
                            }
                        }
                    }
                    let _ = sink.send(Message::text(codec::encode_disconnect(DEFAULT_NAMESPACE))).await;
                    let _ = sink.close().await;
                    return "client disconnect".into();
                }

                _ = tokio::time::sleep_until(deadline) => {
                    return "ping timeout".into();
                }

                frame = self.outgoing.recv(), if self.connected.load(Ordering::Acquire) => {
                    let Some(frame) = frame else {
                        return "outgoing channel closed".into();
                    };
                    if let Err(e) = sink.send(Message::text(frame)).await {
                        return format!("send failed: {e}");
                    }
                }

                msg = stream.next() => {
                    let text = match msg {
                        Some(Ok(Message::Text(text))) => text,
                        Some(Ok(Message::Ping(data))) => {
                            let _ = sink.send(Message::Pong(data)).await;
                            continue;
                        }
                        Some(Ok(Message::Close(_))) => return "closed by server".into(),
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return format!("websocket error: {e}"),
                        None => return "stream ended".into(),
                    };

                    let packet = match codec::decode(text.as_str()) {
                        Ok(packet) => packet,
                        Err(e) => {
                            tracing::warn!(frame = %text.as_str(), "Ignoring undecodable frame: {e}");
                            continue;
                        }
                    };

                    match packet {
                        EnginePacket::Open(open) => {
                            liveness = Duration::from_millis(open.ping_interval + open.ping_timeout);
                            deadline = Instant::now() + liveness;
                            tracing::debug!(sid = %open.sid, "Engine.IO open");
                            if let Err(e) = sink.send(Message::text(codec::encode_connect(DEFAULT_NAMESPACE))).await {
                                return format!("send failed: {e}");
                            }
                        }
                        EnginePacket::Ping(payload) => {
                            deadline = Instant::now() + liveness;
                            if let Err(e) = sink.send(Message::text(codec::encode_pong(&payload))).await {
                                return format!("send failed: {e}");
                            }
                        }
                        EnginePacket::Close => return "engine close".into(),
                        EnginePacket::Message(SocketPacket::Connect { .. }) => {
                            *attempt = 0;
                            self.connected.store(true, Ordering::Release);
                            tracing::info!("Push channel connected");
                            let _ = self.events.send(Notification::Connected);
                        }
                        EnginePacket::Message(SocketPacket::ConnectError { data, .. }) => {
                            return format!("connect error: {}", data.unwrap_or_default());
                        }
                        EnginePacket::Message(SocketPacket::Disconnect { .. }) => {
                            return "disconnected by server".into();
                        }
                        EnginePacket::Message(SocketPacket::Event { name, args, .. }) => {
                            self.dispatch(&name, args.first());
                        }
                        EnginePacket::Message(SocketPacket::Ack { .. })
                        | EnginePacket::Pong(_)
                        | EnginePacket::Upgrade
                        | EnginePacket::Noop => {}
                    }
                }
            }
        }
    }

    fn dispatch(&self, name: &str, payload: Option<&serde_json::Value>) {
        match PushEvent::decode(name, payload) {
            Ok(event) => {
                tracing::debug!(event = %event.event_type(), "Push event");
                // No subscribers is fine
                let _ = self.events.send(Notification::Event(event));
            }
            Err(EventDecodeError::UnknownEvent(name)) => {
                tracing::debug!(%name, "Ignoring unknown push event");
            }
            Err(e) => tracing::warn!("Ignoring push event: {e}"),
        }
    }
}
