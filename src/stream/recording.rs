use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::debug;

/// One recorded request with every socket frame it produced
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecordingSession {
    /// The request frame that was sent
    pub request: serde_json::Value,
    /// When the recording was started
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Raw text frames as received from the socket
    pub events: Vec<RecordedEvent>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecordedEvent {
    /// Raw text of the frame
    pub data: String,
    /// Milliseconds since recording start
    pub timestamp_ms: u64,
}

struct ActiveRecording {
    session: RecordingSession,
    started: Instant,
}

/// Records socket frames and appends finished sessions to a JSON array file
#[derive(Clone)]
pub struct EventRecorder {
    path: PathBuf,
    active: Arc<Mutex<Option<ActiveRecording>>>,
}

impl EventRecorder {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            active: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn start_recording(&self, request: serde_json::Value) -> Result<()> {
        let mut active = self.lock()?;
        *active = Some(ActiveRecording {
            session: RecordingSession {
                request,
                timestamp: chrono::Utc::now(),
                events: Vec::new(),
            },
            started: Instant::now(),
        });
        Ok(())
    }

    /// Record a frame; a no-op when no recording was started
    pub fn record_event(&self, data: &str) -> Result<()> {
        let mut active = self.lock()?;
        if let Some(recording) = active.as_mut() {
            let timestamp_ms = recording.started.elapsed().as_millis() as u64;
            recording.session.events.push(RecordedEvent {
                data: data.to_string(),
                timestamp_ms,
            });
        }
        Ok(())
    }

    /// Append the current session to the recording file
    pub fn end_recording(&self) -> Result<()> {
        let Some(recording) = self.lock()?.take() else {
            return Ok(());
        };

        let mut sessions = if self.path.exists() {
            load_recordings(&self.path)?
        } else {
            Vec::new()
        };
        debug!(
            "Saving recording with {} events to {}",
            recording.session.events.len(),
            self.path.display()
        );
        sessions.push(recording.session);

        let json = serde_json::to_string_pretty(&sessions)?;
        std::fs::write(&self.path, format!("{json}\n"))
            .with_context(|| format!("Failed to write recording file {}", self.path.display()))?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<ActiveRecording>>> {
        self.active
            .lock()
            .map_err(|_| anyhow!("Recording state lock poisoned"))
    }
}

/// Load all sessions from a recording file. An empty file holds no sessions.
pub fn load_recordings<P: AsRef<Path>>(path: P) -> Result<Vec<RecordingSession>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read recording file {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse recording file {}", path.display()))
}
