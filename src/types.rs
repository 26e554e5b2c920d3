use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder shown while a leveled optimization is streaming but nothing is renderable yet
pub const GENERATING_OPTIMIZED: &str = "*Generating optimized prompt…*";

/// Placeholder shown for JSON-looking content when no level is known
pub const GENERATING: &str = "*Generating…*";

/// Status line appended to partial renders while the JSON object is still open
pub const GENERATING_INDICATOR: &str = "*Generating…*";

/// Shown when a complete response carried no renderable content at all
pub const EMPTY_RESULT: &str = "*No optimization details were returned.*";

/// Promotional share block appended to structured results that carry no share message
pub const DEFAULT_SHARE_MESSAGE: &str =
    "Found this optimized prompt useful? Share it with your team and help them get better answers too!";

/// Processing depth the backend applied to the user's prompt.
///
/// Each level returns a differently shaped JSON document, so the level decides
/// which fields are meaningful and in which order they render.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationLevel {
    #[default]
    Basic,
    Structured,
    Mastery,
    System,
}

impl OptimizationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationLevel::Basic => "basic",
            OptimizationLevel::Structured => "structured",
            OptimizationLevel::Mastery => "mastery",
            OptimizationLevel::System => "system",
        }
    }

    /// Top-level keys that carry content for this level, in render order
    pub fn known_fields(&self) -> &'static [&'static str] {
        match self {
            OptimizationLevel::Basic => &["optimized_prompt", "changes_made", "share_message"],
            OptimizationLevel::Structured => &[
                "optimized_prompt",
                "changes_made",
                "techniques_applied",
                "pro_tip",
                "share_message",
            ],
            OptimizationLevel::Mastery => {
                &["overview", "deconstruct", "diagnose", "develop", "deliver"]
            }
            OptimizationLevel::System => &[
                "system_prompt",
                "key_enhancements",
                "role",
                "objective",
                "audience",
                "context",
            ],
        }
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown optimization level: {0}")]
pub struct UnknownLevel(pub String);

impl FromStr for OptimizationLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(OptimizationLevel::Basic),
            "structured" => Ok(OptimizationLevel::Structured),
            "mastery" => Ok(OptimizationLevel::Mastery),
            "system" => Ok(OptimizationLevel::System),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}
