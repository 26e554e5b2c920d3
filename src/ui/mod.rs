pub mod terminal;

use crate::stream::DisplayUpdate;
use thiserror::Error;

#[cfg(test)]
mod terminal_tests;

pub use terminal::TerminalDisplay;

#[derive(Error, Debug)]
pub enum UIError {
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

/// Target for session updates. Every update replaces what was shown before.
pub trait DisplaySink: Send {
    fn show(&mut self, update: &DisplayUpdate) -> Result<(), UIError>;
}
