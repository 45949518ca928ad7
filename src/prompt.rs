//! The canonical structured prompt and its deterministic renderer.

use std::collections::BTreeMap;

use thiserror::Error;

/// A Prompt failed validation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PromptError(pub String);

/// A canonical, structured prompt.
///
/// Every field but `task` and `schema` is optional. [`Prompt::render`] is
/// pure and produces a deterministic string: equal prompts render to equal
/// strings, which is load-bearing for provider-side prompt-cache keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    /// One-line imperative task description, e.g. "Determine if X".
    pub task: String,
    /// The subject text to be processed. Required unless `items` is non-empty.
    pub input: String,
    /// Free-form background.
    pub context: String,
    /// Ordered classification labels.
    pub categories: Vec<String>,
    /// Ordered ranking candidates.
    pub items: Vec<String>,
    /// Ordered sentiment facets to score.
    pub aspects: Vec<String>,
    /// Label -> ordered example strings. A `BTreeMap` so that iteration
    /// order (and therefore rendered output) never depends on insertion
    /// order, satisfying the render-determinism invariant.
    pub examples: BTreeMap<String, Vec<String>>,
    /// JSON Schema string describing the expected response shape.
    pub schema: String,
    /// Ordered rules the model must obey.
    pub constraints: Vec<String>,
}

impl Prompt {
    /// A Prompt is valid iff `task` and `schema` are non-empty and at least
    /// one of `input` or `items` is non-empty.
    pub fn validate(&self) -> Result<(), PromptError> {
        if self.task.is_empty() {
            return Err(PromptError("task must not be empty".into()));
        }
        if self.schema.is_empty() {
            return Err(PromptError("schema must not be empty".into()));
        }
        if self.input.is_empty() && self.items.is_empty() {
            return Err(PromptError(
                "either input or items must be non-empty".into(),
            ));
        }
        Ok(())
    }

    /// Render the prompt to its canonical wire string.
    ///
    /// Sections appear in the fixed order `Task`, `Input`, `Context`,
    /// `Categories`, `Items`, `Aspects`, `Examples`, `Return JSON`,
    /// `Constraints`, separated by a single blank line. Empty sections are
    /// omitted entirely -- no placeholder headings are ever emitted.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();

        if !self.task.is_empty() {
            sections.push(format!("Task: {}", self.task));
        }
        if !self.input.is_empty() {
            sections.push(format!("Input: {}", self.input));
        }
        if !self.context.is_empty() {
            sections.push(format!("Context: {}", self.context));
        }
        if !self.categories.is_empty() {
            sections.push(render_numbered_list("Categories", &self.categories));
        }
        if !self.items.is_empty() {
            sections.push(render_numbered_list("Items", &self.items));
        }
        if !self.aspects.is_empty() {
            sections.push(render_numbered_list("Aspects", &self.aspects));
        }
        if !self.examples.is_empty() {
            sections.push(render_examples(&self.examples));
        }
        if !self.schema.is_empty() {
            sections.push(format!("Return JSON:\n{}", self.schema));
        }
        if !self.constraints.is_empty() {
            sections.push(render_constraints(&self.constraints));
        }

        sections.join("\n\n")
    }
}

fn render_numbered_list(header: &str, items: &[String]) -> String {
    let mut out = format!("{header}:");
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, item));
    }
    out
}

fn render_examples(examples: &BTreeMap<String, Vec<String>>) -> String {
    let mut out = String::from("Examples:");
    for (label, values) in examples {
        out.push_str(&format!("\n  {label}:"));
        for value in values {
            out.push_str(&format!("\n    - {value}"));
        }
    }
    out
}

fn render_constraints(constraints: &[String]) -> String {
    let mut out = String::from("Constraints:");
    for c in constraints {
        out.push_str(&format!("\n  - {c}"));
    }
    out
}
