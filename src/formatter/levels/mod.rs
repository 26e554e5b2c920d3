//! Level-specific schemas mapping known fields to display sections.
//!
//! Each level renders its fields in a fixed order regardless of key order in
//! the source. Unknown keys and values of an unexpected shape are skipped
//! without affecting the rest of the document.

use super::document::DisplayDocument;
use super::fields::FieldSource;
use crate::types::OptimizationLevel;

mod basic;
pub mod generic;
mod mastery;
mod structured;
mod system;

/// Whether the source holds a finished response or a streaming snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Complete,
    Partial,
}

/// Render the level's known fields. The document is empty when no field had content.
pub fn render_level(
    source: &dyn FieldSource,
    level: OptimizationLevel,
    mode: RenderMode,
) -> DisplayDocument {
    match level {
        OptimizationLevel::Basic => basic::render(source),
        OptimizationLevel::Structured => structured::render(source, mode),
        OptimizationLevel::Mastery => mastery::render(source),
        OptimizationLevel::System => system::render(source),
    }
}
