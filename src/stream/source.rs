//! Event sources feeding a [`StreamSession`].
//!
//! A live websocket and a recorded playback produce the same events, so the
//! driving loop and everything downstream behaves identically for both.

use super::event::{OptimizationRequest, SocketEvent};
use super::recording::{EventRecorder, RecordedEvent};
use super::session::{DisplayUpdate, StreamSession, StreamState};
use crate::ui::DisplaySink;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),
    #[error("Invalid socket URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported socket scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("No frame received within {0:?}")]
    Timeout(Duration),
    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Source of decoded socket events (live connection or recorded playback)
#[async_trait]
pub trait EventSource: Send {
    /// Next event, or `None` once the stream has ended
    async fn next_event(&mut self) -> Result<Option<SocketEvent>, SourceError>;
}

/// Replays recorded frames, honoring their original timing unless `fast_mode` is set
pub struct PlaybackEventSource {
    events: Vec<RecordedEvent>,
    current_index: usize,
    start_time: Instant,
    fast_mode: bool,
}

impl PlaybackEventSource {
    pub fn new(events: Vec<RecordedEvent>, fast_mode: bool) -> Self {
        Self {
            events,
            current_index: 0,
            start_time: Instant::now(),
            fast_mode,
        }
    }
}

#[async_trait]
impl EventSource for PlaybackEventSource {
    async fn next_event(&mut self) -> Result<Option<SocketEvent>, SourceError> {
        while let Some(event) = self.events.get(self.current_index) {
            self.current_index += 1;

            if self.fast_mode {
                // Roughly one frame per display refresh
                tokio::time::sleep(Duration::from_millis(17)).await;
            } else {
                let expected_time = Duration::from_millis(event.timestamp_ms);
                let elapsed = self.start_time.elapsed();
                if elapsed < expected_time {
                    tokio::time::sleep(expected_time - elapsed).await;
                }
            }

            match SocketEvent::from_json(&event.data) {
                Ok(decoded) => return Ok(Some(decoded)),
                Err(e) => warn!("Skipping recorded frame {}: {}", self.current_index - 1, e),
            }
        }
        Ok(None)
    }
}

/// Live optimization socket
pub struct WebSocketEventSource {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    idle_timeout: Duration,
    recorder: Option<EventRecorder>,
}

impl WebSocketEventSource {
    /// Connect and send the request frame
    pub async fn connect(
        url: &str,
        request: &OptimizationRequest,
        idle_timeout: Duration,
    ) -> Result<Self, SourceError> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(SourceError::UnsupportedScheme(url.scheme().to_string()));
        }

        info!("Connecting to {}", url);
        let (mut stream, _response) = connect_async(url.as_str()).await?;

        let payload = serde_json::to_string(request)?;
        debug!("Sending optimization request (level: {})", request.level);
        stream.send(Message::Text(payload)).await?;

        Ok(Self {
            stream,
            idle_timeout,
            recorder: None,
        })
    }

    /// Record every received text frame
    pub fn with_recorder(mut self, recorder: EventRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }
}

#[async_trait]
impl EventSource for WebSocketEventSource {
    async fn next_event(&mut self) -> Result<Option<SocketEvent>, SourceError> {
        loop {
            let frame = tokio::time::timeout(self.idle_timeout, self.stream.next())
                .await
                .map_err(|_| SourceError::Timeout(self.idle_timeout))?;

            let message = match frame {
                None => return Ok(None),
                Some(Err(tungstenite::Error::ConnectionClosed))
                | Some(Err(tungstenite::Error::AlreadyClosed)) => return Ok(None),
                Some(message) => message?,
            };

            match message {
                Message::Text(text) => {
                    if let Some(recorder) = &self.recorder {
                        if let Err(e) = recorder.record_event(&text) {
                            warn!("Failed to record frame: {}", e);
                        }
                    }
                    match SocketEvent::from_json(&text) {
                        Ok(event) => return Ok(Some(event)),
                        Err(e) => warn!("Skipping socket frame: {}", e),
                    }
                }
                Message::Close(frame) => {
                    debug!("Socket closed by server: {:?}", frame);
                    return Ok(None);
                }
                other => trace!("Ignoring non-text frame: {:?}", other),
            }
        }
    }
}

/// How a driven session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Finished,
    Failed(String),
    Cancelled,
    /// The source ran dry before a terminal event arrived
    Disconnected,
}

/// Pull events into `session` until it ends, showing every visible update on `sink`
pub async fn drive_session<S>(
    source: &mut S,
    session: &mut StreamSession,
    sink: &mut dyn DisplaySink,
) -> anyhow::Result<SessionOutcome>
where
    S: EventSource + ?Sized,
{
    while let Some(event) = source.next_event().await? {
        trace!("Socket event '{}'", event.name());
        let update = session.apply(event);

        let failure = match &update {
            DisplayUpdate::Ignored | DisplayUpdate::Unchanged => continue,
            DisplayUpdate::Failed { message, .. } => Some(message.clone()),
            _ => None,
        };
        sink.show(&update)?;

        match session.state() {
            StreamState::Streaming => {}
            StreamState::Finished => return Ok(SessionOutcome::Finished),
            StreamState::Cancelled => return Ok(SessionOutcome::Cancelled),
            StreamState::Failed => {
                return Ok(SessionOutcome::Failed(failure.unwrap_or_default()));
            }
        }
    }

    debug!("Event source ended while session was {:?}", session.state());
    Ok(SessionOutcome::Disconnected)
}
