mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Mode};
use prompt_stream::config::get_settings;
use prompt_stream::logging::{setup_logging, setup_logging_for_terminal};
use prompt_stream::stream::{
    drive_session, load_recordings, EventRecorder, OptimizationRequest, PlaybackEventSource,
    SessionOutcome, StreamSession, WebSocketEventSource,
};
use prompt_stream::types::OptimizationLevel;
use prompt_stream::ui::TerminalDisplay;
use prompt_stream::{format, format_structured};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}

async fn run_replay(
    file: PathBuf,
    index: usize,
    fast: bool,
    level: Option<OptimizationLevel>,
) -> Result<SessionOutcome> {
    let mut sessions = load_recordings(&file)?;
    let count = sessions.len();
    if index >= count {
        anyhow::bail!(
            "Session {} does not exist, {} holds {} session(s)",
            index,
            file.display(),
            count
        );
    }
    let recording = sessions.swap_remove(index);

    let recorded_level = recording
        .request
        .get("level")
        .and_then(|level| serde_json::from_value::<OptimizationLevel>(level.clone()).ok());
    let level = level
        .or(recorded_level)
        .unwrap_or(get_settings().default_level);
    info!(
        "Replaying session {} with {} events (level: {})",
        index,
        recording.events.len(),
        level
    );

    let mut source = PlaybackEventSource::new(recording.events, fast);
    let mut session = StreamSession::new(level);
    let mut display = TerminalDisplay::new();
    drive_session(&mut source, &mut session, &mut display).await
}

async fn run_connect(
    prompt: String,
    url: Option<String>,
    level: Option<OptimizationLevel>,
    record: Option<PathBuf>,
) -> Result<SessionOutcome> {
    let settings = get_settings();
    let url = url
        .or_else(|| settings.websocket_url.clone())
        .context("No socket URL configured, pass --url or set websocket_url in settings.json")?;
    let request = OptimizationRequest {
        prompt,
        level: level.unwrap_or(settings.default_level),
    };

    let recorder = record.map(EventRecorder::new);
    if let Some(recorder) = &recorder {
        recorder.start_recording(serde_json::to_value(&request)?)?;
    }

    let mut source = WebSocketEventSource::connect(&url, &request, settings.request_timeout())
        .await
        .with_context(|| format!("Failed to connect to {url}"))?;
    if let Some(recorder) = &recorder {
        source = source.with_recorder(recorder.clone());
    }

    let mut session = StreamSession::new(request.level);
    let mut display = TerminalDisplay::new();
    let outcome = drive_session(&mut source, &mut session, &mut display).await;

    if let Some(recorder) = &recorder {
        recorder.end_recording()?;
        debug!("Recording saved to {}", recorder.path().display());
    }
    outcome
}

fn report(outcome: SessionOutcome) -> Result<()> {
    match outcome {
        SessionOutcome::Finished | SessionOutcome::Cancelled => Ok(()),
        SessionOutcome::Failed(message) => anyhow::bail!("Optimization failed: {message}"),
        SessionOutcome::Disconnected => {
            warn!("Stream ended before the optimization finished");
            eprintln!("Connection closed before the optimization finished");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    match args.mode {
        Mode::Format { level, file } => {
            setup_logging(args.verbose);
            let buffer = read_input(file.as_deref())?;
            println!("{}", format(&buffer, level));
            Ok(())
        }
        Mode::Structure { file } => {
            setup_logging(args.verbose);
            let text = read_input(file.as_deref())?;
            println!("{}", format_structured(&text));
            Ok(())
        }
        Mode::Replay {
            file,
            session,
            fast,
            level,
        } => {
            setup_logging_for_terminal(args.verbose);
            report(run_replay(file, session, fast, level).await?)
        }
        Mode::Connect {
            prompt,
            url,
            level,
            record,
        } => {
            setup_logging_for_terminal(args.verbose);
            report(run_connect(prompt, url, level, record).await?)
        }
    }
}
