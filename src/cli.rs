use clap::{Parser, Subcommand};
use prompt_stream::types::OptimizationLevel;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Format a response buffer read from a file or stdin
    Format {
        /// Optimization level the buffer was produced for
        #[arg(short, long)]
        level: Option<OptimizationLevel>,

        /// Input file (defaults to stdin)
        file: Option<PathBuf>,
    },

    /// Re-wrap a labeled plain-text reply into display sections
    Structure {
        /// Input file (defaults to stdin)
        file: Option<PathBuf>,
    },

    /// Play back a recorded socket session in the terminal
    Replay {
        /// Recording file
        file: PathBuf,

        /// Index of the session within the recording file
        #[arg(long, default_value_t = 0)]
        session: usize,

        /// Ignore recorded timing
        #[arg(long)]
        fast: bool,

        /// Override the level stored with the recorded request
        #[arg(short, long)]
        level: Option<OptimizationLevel>,
    },

    /// Send a prompt to the optimization socket and stream the result
    Connect {
        /// Prompt to optimize
        #[arg(short, long)]
        prompt: String,

        /// Socket URL (defaults to websocket_url from settings)
        #[arg(long)]
        url: Option<String>,

        #[arg(short, long)]
        level: Option<OptimizationLevel>,

        /// Record socket frames to a file
        #[arg(long)]
        record: Option<PathBuf>,
    },
}

/// Define the application arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub mode: Mode,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_connect() {
        let args = Args::parse_from([
            "prompt-stream",
            "-vv",
            "connect",
            "--prompt",
            "write a haiku",
            "--level",
            "structured",
        ]);

        assert_eq!(args.verbose, 2);
        match args.mode {
            Mode::Connect {
                prompt,
                url,
                level,
                record,
            } => {
                assert_eq!(prompt, "write a haiku");
                assert_eq!(url, None);
                assert_eq!(level, Some(OptimizationLevel::Structured));
                assert_eq!(record, None);
            }
            other => panic!("unexpected mode: {other:?}"),
        }
    }

    #[test]
    fn test_parse_replay_defaults() {
        let args = Args::parse_from(["prompt-stream", "replay", "session.json"]);
        match args.mode {
            Mode::Replay {
                file,
                session,
                fast,
                level,
            } => {
                assert_eq!(file, PathBuf::from("session.json"));
                assert_eq!(session, 0);
                assert!(!fast);
                assert_eq!(level, None);
            }
            other => panic!("unexpected mode: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_level_is_rejected() {
        assert!(Args::try_parse_from(["prompt-stream", "format", "--level", "extreme"]).is_err());
    }
}
