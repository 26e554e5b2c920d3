//! Display formatting for streamed prompt-optimization responses.
//!
//! The optimization backend streams a JSON document over a websocket, one
//! cumulative snapshot per frame. [`format`] turns any snapshot (complete,
//! truncated, Python-literal or plain text) into the chat view's display
//! text, and [`stream`] wraps it with socket event decoding, per-request
//! session state, recording and playback.

pub mod config;
pub mod formatter;
pub mod logging;
pub mod stream;
pub mod types;
pub mod ui;

pub use formatter::{format, format_final, format_structured, format_value};
pub use types::OptimizationLevel;
