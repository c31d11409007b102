//! Practitioner persona definitions.
//!
//! A practitioner is static configuration data: a display name, an opaque
//! style identifier, and the principle/focus-area labels that parameterize
//! remote tool calls made on its behalf. The roster is built once from the
//! builtin table and never mutated.

use serde::{Deserialize, Serialize};

/// A named practitioner persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practitioner {
    /// Display name (e.g. "Uncle Bob").
    pub name: String,
    /// Opaque style identifier used on the wire (e.g. "uncle-bob").
    pub style_id: String,
    /// Principle labels, in declaration order.
    pub principles: Vec<String>,
    /// Focus-area labels, in declaration order.
    pub focus_areas: Vec<String>,
}

impl Practitioner {
    /// Create a practitioner from label slices.
    pub fn new(
        name: impl Into<String>,
        style_id: impl Into<String>,
        principles: &[&str],
        focus_areas: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            style_id: style_id.into(),
            principles: principles.iter().map(|s| s.to_string()).collect(),
            focus_areas: focus_areas.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The builtin practitioner roster.
    pub fn builtins() -> Vec<Practitioner> {
        vec![
            Practitioner::new(
                "Uncle Bob",
                "uncle-bob",
                &["Clean Code", "SOLID", "TDD"],
                &["clean-code", "naming", "functions"],
            ),
            Practitioner::new(
                "Martin Fowler",
                "martin-fowler",
                &["Refactoring", "Patterns", "Architecture"],
                &["refactoring", "patterns", "architecture"],
            ),
            Practitioner::new(
                "Kent Beck",
                "kent-beck",
                &["Test-First", "Simple Design", "XP"],
                &["testing", "simplicity", "incremental"],
            ),
            Practitioner::new(
                "Jessica Kerr",
                "jessica-kerr",
                &["Systems Thinking", "Functional", "Observability"],
                &["systems", "functional", "monitoring"],
            ),
            Practitioner::new(
                "Kelsey Hightower",
                "kelsey-hightower",
                &["Cloud-Native", "Operations", "Automation"],
                &["cloud", "operations", "reliability"],
            ),
        ]
    }
}

/// Find a practitioner by its wire style identifier.
pub fn find_by_style_id<'a>(roster: &'a [Practitioner], style_id: &str) -> Option<&'a Practitioner> {
    roster.iter().find(|p| p.style_id == style_id)
}

/// Find a practitioner by display name.
pub fn find_by_name<'a>(roster: &'a [Practitioner], name: &str) -> Option<&'a Practitioner> {
    roster.iter().find(|p| p.name == name)
}
