//! Chat Transport
//!
//! A websocket channel with an append-only message log. The socket lives in
//! a spawned task; it reports [`TransportEvent`]s over a channel and the
//! owner applies them with [`ChatTransport::poll_events`] or
//! [`ChatTransport::next_event`], so the status and the log only change on
//! the owner's side.
//!
//! Status machine: `Closed → Connecting → Open → Closed`. Explicit close,
//! remote close and transport errors all lead back to `Closed`. There is no
//! automatic reconnect.
//!
//! Every connection gets a generation number; events from an earlier
//! generation are dropped, so at most one socket feeds the log.

use crate::shared::chat::ChatMessage;
use crate::shared::error::{ClientError, ClientResult};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

/// Connection status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStatus {
    Closed,
    Connecting,
    Open,
}

/// Reported by the socket task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake finished
    Opened,
    /// Text frame from the remote side
    Received(String),
    /// Remote side closed the socket
    Closed { reason: Option<String> },
    /// Handshake or transport failure
    Failed(String),
}

/// Commands for the socket task
#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

#[derive(Debug)]
struct Connection {
    outbound: UnboundedSender<Outbound>,
    task: JoinHandle<()>,
}

/// Chat transport plus its message log
#[derive(Debug)]
pub struct ChatTransport {
    url: String,
    status: ChatStatus,
    log: Vec<ChatMessage>,
    generation: u64,
    connection: Option<Connection>,
    events_tx: UnboundedSender<(u64, TransportEvent)>,
    events_rx: UnboundedReceiver<(u64, TransportEvent)>,
}

impl ChatTransport {
    pub fn new(url: impl Into<String>) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            url: url.into(),
            status: ChatStatus::Closed,
            log: Vec::new(),
            generation: 0,
            connection: None,
            events_tx,
            events_rx,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> ChatStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == ChatStatus::Open
    }

    /// Messages in arrival order. Kept across close/reopen.
    pub fn log(&self) -> &[ChatMessage] {
        &self.log
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Start connecting. Any existing connection is closed first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(&mut self) {
        if self.connection.is_some() {
            self.close();
        }

        self.generation += 1;
        let (outbound_tx, outbound_rx) = unbounded_channel();
        let task = tokio::spawn(run_connection(
            self.url.clone(),
            self.generation,
            outbound_rx,
            self.events_tx.clone(),
        ));

        tracing::info!(url = %self.url, generation = self.generation, "Opening chat socket");
        self.connection = Some(Connection {
            outbound: outbound_tx,
            task,
        });
        self.status = ChatStatus::Connecting;
    }

    /// Append a local message and transmit it.
    ///
    /// Blank text is ignored (`Ok(None)`); the message is logged before the
    /// socket acknowledges anything.
    pub fn send(&mut self, text: &str) -> ClientResult<Option<ChatMessage>> {
        if self.status != ChatStatus::Open {
            return Err(ClientError::ChatNotOpen);
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        let Some(connection) = self.connection.as_ref() else {
            return Err(ClientError::ChatNotOpen);
        };

        let message = ChatMessage::local(text);
        self.log.push(message.clone());

        if connection.outbound.send(Outbound::Text(text.to_string())).is_err() {
            tracing::warn!("Chat socket task is gone, marking transport closed");
            self.drop_connection();
        }
        Ok(Some(message))
    }

    /// Close the socket. Does nothing when already closed.
    pub fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            if self.status == ChatStatus::Connecting {
                connection.task.abort();
            } else if connection.outbound.send(Outbound::Close).is_err() {
                tracing::debug!("Chat socket task already finished");
            }
        }
        if self.status != ChatStatus::Closed {
            tracing::info!("Chat socket closed");
        }
        // Late events from the old socket must not reach the log
        self.generation += 1;
        self.status = ChatStatus::Closed;
    }

    /// Apply every pending event without waiting
    pub fn poll_events(&mut self) -> Vec<TransportEvent> {
        let mut applied = Vec::new();
        while let Ok((generation, event)) = self.events_rx.try_recv() {
            if let Some(event) = self.apply(generation, event) {
                applied.push(event);
            }
        }
        applied
    }

    /// Wait for and apply the next current-generation event.
    ///
    /// Never resolves while no socket is active; wrap in a timeout.
    pub async fn next_event(&mut self) -> Option<TransportEvent> {
        loop {
            let (generation, event) = self.events_rx.recv().await?;
            if let Some(event) = self.apply(generation, event) {
                return Some(event);
            }
        }
    }

    fn apply(&mut self, generation: u64, event: TransportEvent) -> Option<TransportEvent> {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "Dropping stale chat event");
            return None;
        }

        match &event {
            TransportEvent::Opened => {
                if self.status == ChatStatus::Connecting {
                    tracing::info!("Chat socket open");
                    self.status = ChatStatus::Open;
                }
            }
            TransportEvent::Received(text) => {
                self.log.push(ChatMessage::remote(text.clone()));
            }
            TransportEvent::Closed { reason } => {
                tracing::info!(reason = reason.as_deref().unwrap_or(""), "Chat socket closed by remote");
                self.drop_connection();
            }
            TransportEvent::Failed(error) => {
                tracing::error!("Chat socket error: {}", error);
                self.drop_connection();
            }
        }
        Some(event)
    }

    fn drop_connection(&mut self) {
        self.connection = None;
        self.generation += 1;
        self.status = ChatStatus::Closed;
    }
}

async fn run_connection(
    url: String,
    generation: u64,
    mut outbound: UnboundedReceiver<Outbound>,
    events: UnboundedSender<(u64, TransportEvent)>,
) {
    let emit = |event: TransportEvent| {
        // The receiver only goes away with the transport itself
        let _ = events.send((generation, event));
    };

    let socket = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((socket, _response)) => socket,
        Err(e) => {
            emit(TransportEvent::Failed(format!("connect: {}", e)));
            return;
        }
    };
    emit(TransportEvent::Opened);

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            command = outbound.recv() => match command {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        emit(TransportEvent::Failed(format!("send: {}", e)));
                        return;
                    }
                }
                Some(Outbound::Close) | None => {
                    if let Err(e) = sink.close().await {
                        tracing::debug!("Chat socket close handshake failed: {}", e);
                    }
                    emit(TransportEvent::Closed { reason: None });
                    return;
                }
            },
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => emit(TransportEvent::Received(text)),
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => emit(TransportEvent::Received(text)),
                    Err(e) => tracing::warn!("Ignoring non-UTF-8 chat frame: {}", e),
                },
                Some(Ok(Message::Close(frame))) => {
                    emit(TransportEvent::Closed {
                        reason: frame.map(|f| f.reason.to_string()).filter(|r| !r.is_empty()),
                    });
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    emit(TransportEvent::Failed(format!("receive: {}", e)));
                    return;
                }
                None => {
                    emit(TransportEvent::Closed { reason: None });
                    return;
                }
            },
        }
    }
}
