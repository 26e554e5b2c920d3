//! Socket event handling around the stateless formatter.

pub mod event;
pub mod recording;
pub mod session;
pub mod source;


pub use event::{EventError, OptimizationRequest, SocketEvent};
pub use recording::{load_recordings, EventRecorder, RecordedEvent, RecordingSession};
pub use session::{DisplayUpdate, StreamSession, StreamState};
pub use source::{
    drive_session, EventSource, PlaybackEventSource, SessionOutcome, SourceError,
    WebSocketEventSource,
};
