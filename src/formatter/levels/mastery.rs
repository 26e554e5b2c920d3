use super::generic;
use crate::formatter::document::{DisplayDocument, Section};
use crate::formatter::fields::FieldSource;

/// The four-phase method sections, preceded by the overview
const PHASES: [(&str, &str); 5] = [
    ("overview", "Overview"),
    ("deconstruct", "Deconstruct"),
    ("diagnose", "Diagnose"),
    ("develop", "Develop"),
    ("deliver", "Deliver"),
];

/// Phase contents are open-ended, so each one goes through the generic value renderer
pub fn render(source: &dyn FieldSource) -> DisplayDocument {
    let mut doc = DisplayDocument::new();

    for (key, heading) in PHASES {
        if let Some(value) = source.value(key) {
            doc.push(Section::titled(heading).with_blocks(generic::value_blocks(&value)));
        }
    }

    doc
}
