use crate::types::OptimizationLevel;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// User settings loaded from ~/.config/prompt-stream/settings.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Optimization socket, e.g. `wss://${PROMPT_HOST}/ws/optimize`
    pub websocket_url: Option<String>,
    pub default_level: OptimizationLevel,
    /// Longest pause allowed between two socket frames
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            websocket_url: None,
            default_level: OptimizationLevel::default(),
            request_timeout_secs: 120,
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Loaded settings, read from disk on first use
pub fn get_settings() -> &'static Settings {
    SETTINGS.get_or_init(|| match settings_path().and_then(|path| load_settings(&path)) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("Failed to load settings: {err:#}");
            Settings::default()
        }
    })
}

pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
    Ok(home.join(".config").join("prompt-stream"))
}

fn settings_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("settings.json"))
}

/// Read settings from `path`. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let mut settings: Settings = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

    if let Some(url) = &mut settings.websocket_url {
        match substitute_env_vars(url) {
            Ok(resolved) => *url = resolved,
            Err(missing) => tracing::warn!(
                "Environment variable '{missing}' in websocket_url is not set, keeping it literal"
            ),
        }
    }

    Ok(settings)
}

/// Replace every `${VAR}`; `Err` names the first variable that is not set
fn substitute_env_vars(input: &str) -> std::result::Result<String, String> {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        let name = &rest[start + 2..start + 2 + len];
        let value = std::env::var(name).map_err(|_| name.to_string())?;

        result.push_str(&rest[..start]);
        result.push_str(&value);
        rest = &rest[start + 2 + len + 1..];
    }
    result.push_str(rest);

    Ok(result)
}
