//! Per-request display state.
//!
//! A session owns the cumulative buffer of one optimization request and turns
//! socket events into full-replacement display updates. The formatter stays
//! stateless; everything that has to survive between frames lives here.

use super::event::SocketEvent;
use crate::formatter;
use crate::types::OptimizationLevel;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Streaming,
    Finished,
    Cancelled,
    Failed,
}

impl StreamState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamState::Streaming)
    }
}

/// What the display has to do after an event
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayUpdate {
    /// Replace the shown text
    Render(String),
    /// Output is identical to what is shown already
    Unchanged,
    /// Replace the shown text for the last time
    Final(String),
    Failed {
        message: String,
        last_render: Option<String>,
    },
    Cancelled {
        last_render: Option<String>,
    },
    /// Event arrived after the stream ended
    Ignored,
}

#[derive(Debug)]
pub struct StreamSession {
    level: OptimizationLevel,
    buffer: String,
    last_render: Option<String>,
    state: StreamState,
}

impl StreamSession {
    pub fn new(level: OptimizationLevel) -> Self {
        Self {
            level,
            buffer: String::new(),
            last_render: None,
            state: StreamState::Streaming,
        }
    }

    pub fn level(&self) -> OptimizationLevel {
        self.level
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn last_render(&self) -> Option<&str> {
        self.last_render.as_deref()
    }

    /// Discard everything for a new request
    pub fn reset(&mut self, level: OptimizationLevel) {
        debug!("Resetting stream session (level: {})", level);
        self.level = level;
        self.buffer.clear();
        self.last_render = None;
        self.state = StreamState::Streaming;
    }

    pub fn apply(&mut self, event: SocketEvent) -> DisplayUpdate {
        if self.state.is_terminal() {
            trace!(
                "Ignoring '{}' event, session already {:?}",
                event.name(),
                self.state
            );
            return DisplayUpdate::Ignored;
        }

        match event {
            SocketEvent::Token { partial_text } => {
                if partial_text.len() < self.buffer.len() {
                    debug!(
                        "Token snapshot shrank from {} to {} bytes",
                        self.buffer.len(),
                        partial_text.len()
                    );
                }
                self.buffer = partial_text;
                self.render()
            }
            SocketEvent::ModelEnd { final_text } => {
                self.buffer = final_text;
                self.finish()
            }
            SocketEvent::Completed { final_text } => {
                if let Some(text) = final_text {
                    self.buffer = text;
                }
                self.finish()
            }
            SocketEvent::Error { message } => {
                warn!("Optimization failed: {}", message);
                self.state = StreamState::Failed;
                DisplayUpdate::Failed {
                    message,
                    last_render: self.last_render.clone(),
                }
            }
            SocketEvent::Cancelled => {
                debug!("Optimization cancelled");
                self.state = StreamState::Cancelled;
                DisplayUpdate::Cancelled {
                    last_render: self.last_render.clone(),
                }
            }
        }
    }

    /// Append a delta for hosts that do not send cumulative snapshots
    pub fn push_delta(&mut self, delta: &str) -> DisplayUpdate {
        if self.state.is_terminal() {
            return DisplayUpdate::Ignored;
        }
        self.buffer.push_str(delta);
        self.render()
    }

    fn render(&mut self) -> DisplayUpdate {
        let output = formatter::format(&self.buffer, Some(self.level));
        if self.last_render.as_deref() == Some(output.as_str()) {
            return DisplayUpdate::Unchanged;
        }
        self.last_render = Some(output.clone());
        DisplayUpdate::Render(output)
    }

    fn finish(&mut self) -> DisplayUpdate {
        if formatter::classify(&self.buffer) == formatter::BufferKind::IncompleteJson {
            warn!(
                "Final text is cut off after {} bytes, showing what was received",
                self.buffer.len()
            );
        }
        let output = formatter::format_final(&self.buffer, Some(self.level));
        self.state = StreamState::Finished;
        self.last_render = Some(output.clone());
        DisplayUpdate::Final(output)
    }
}
