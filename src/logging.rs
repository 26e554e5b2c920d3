use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

/// Log to stderr, keeping stdout for formatted output
pub fn setup_logging(verbose_level: u8) {
    setup_logging_with_file(verbose_level, None);
}

/// The terminal display redraws stdout in place, so logs go to a file instead
pub fn setup_logging_for_terminal(verbose_level: u8) {
    let log_file_path = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("prompt-stream")
        .join("terminal.log");

    if let Some(parent) = log_file_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    setup_logging_with_file(verbose_level, Some(log_file_path));
}

fn env_filter(verbose_level: u8) -> tracing_subscriber::EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        return tracing_subscriber::EnvFilter::from_default_env();
    }

    let filter_str = match verbose_level {
        0 => "warn,prompt_stream=info",
        1 => "info,prompt_stream=debug",
        _ => "debug,prompt_stream=trace",
    };
    tracing_subscriber::EnvFilter::new(filter_str)
}

fn setup_logging_with_file(verbose_level: u8, log_file: Option<PathBuf>) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose_level))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .with_level(true);

    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(file),
            Err(err) => {
                eprintln!(
                    "Warning: Could not open log file {}: {err}, logging to stderr",
                    path.display()
                );
                None
            }
        }
    });

    match file {
        Some(file) => subscriber
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        None => subscriber.with_writer(std::io::stderr).init(),
    }
}
