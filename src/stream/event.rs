use crate::types::OptimizationLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One decoded frame of the optimization socket
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    /// Cumulative text produced so far
    Token { partial_text: String },
    /// The model finished; `final_text` is the whole answer
    ModelEnd { final_text: String },
    /// Backend finished the request, optionally with the final answer
    Completed { final_text: Option<String> },
    Error { message: String },
    Cancelled,
}

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Malformed socket frame: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Unknown socket event '{0}'")]
    UnknownEvent(String),
    #[error("Event '{event}' is missing field '{field}'")]
    MissingField { event: String, field: &'static str },
}

/// Wire shape of every frame
#[derive(Debug, Deserialize)]
struct RawEvent {
    event: String,
    #[serde(default)]
    data: Value,
}

impl SocketEvent {
    pub fn from_json(text: &str) -> Result<Self, EventError> {
        let raw: RawEvent = serde_json::from_str(text)?;

        match raw.event.as_str() {
            "token" => Ok(SocketEvent::Token {
                partial_text: required_str(&raw, "partial_text")?,
            }),
            "model_end" => Ok(SocketEvent::ModelEnd {
                final_text: required_str(&raw, "final_text")?,
            }),
            "completed" => Ok(SocketEvent::Completed {
                final_text: data_str(&raw.data, "final_text")
                    .or_else(|| data_str(&raw.data, "result")),
            }),
            "error" => {
                let message = match &raw.data {
                    Value::String(message) => Some(message.clone()),
                    data => data_str(data, "message").or_else(|| data_str(data, "error")),
                };
                Ok(SocketEvent::Error {
                    message: message.unwrap_or_else(|| "Unknown error".to_string()),
                })
            }
            "cancelled" => Ok(SocketEvent::Cancelled),
            other => Err(EventError::UnknownEvent(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SocketEvent::Token { .. } => "token",
            SocketEvent::ModelEnd { .. } => "model_end",
            SocketEvent::Completed { .. } => "completed",
            SocketEvent::Error { .. } => "error",
            SocketEvent::Cancelled => "cancelled",
        }
    }
}

fn data_str(data: &Value, field: &str) -> Option<String> {
    data.get(field).and_then(Value::as_str).map(str::to_string)
}

fn required_str(raw: &RawEvent, field: &'static str) -> Result<String, EventError> {
    data_str(&raw.data, field).ok_or_else(|| EventError::MissingField {
        event: raw.event.clone(),
        field,
    })
}

/// The single text frame a client sends to start an optimization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationRequest {
    pub prompt: String,
    pub level: OptimizationLevel,
}
