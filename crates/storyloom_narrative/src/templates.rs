//! Named prompt templates with `{{name}}` placeholders.
//!
//! Placeholders are `{{name}}` where `name` is an identifier, optionally
//! padded with spaces. `\{{` renders a literal `{{`. Single braces are
//! always literal, so JSON examples embedded in a template need no escaping.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use storyloom_error::{TemplateError, TemplateErrorKind};
use strum::IntoEnumIterator;

const PLACEHOLDER_PATTERN: &str = r"\\\{\{|\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}";

/// Identifier of a bundled prompt template.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use storyloom_narrative::TemplateId;
///
/// assert_eq!(TemplateId::WriteAct.to_string(), "write_act");
/// assert_eq!(TemplateId::from_str("acts_json").unwrap(), TemplateId::ActsJson);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum TemplateId {
    /// Pick a story structure for the idea
    ChooseStructure,
    /// Condense the structure analysis
    SummarizeStructure,
    /// Write the story blueprint
    Blueprint,
    /// Reformat the blueprint's chapter list as JSON
    ChaptersJson,
    /// Outline a chapter's three acts
    ActOutline,
    /// Reformat an act outline as JSON
    ActsJson,
    /// Write one act
    WriteAct,
    /// Continuation context appended for acts after the first
    ContinueAct,
}

impl TemplateId {
    fn bundled_text(&self) -> &'static str {
        match self {
            TemplateId::ChooseStructure => include_str!("../templates/choose_structure.txt"),
            TemplateId::SummarizeStructure => include_str!("../templates/summarize_structure.txt"),
            TemplateId::Blueprint => include_str!("../templates/blueprint.txt"),
            TemplateId::ChaptersJson => include_str!("../templates/chapters_json.txt"),
            TemplateId::ActOutline => include_str!("../templates/act_outline.txt"),
            TemplateId::ActsJson => include_str!("../templates/acts_json.txt"),
            TemplateId::WriteAct => include_str!("../templates/write_act.txt"),
            TemplateId::ContinueAct => include_str!("../templates/continue_act.txt"),
        }
    }
}

/// Values for the placeholders of one render.
///
/// # Examples
///
/// ```
/// use storyloom_narrative::TemplateVars;
///
/// let vars = TemplateVars::new()
///     .with("chapter_number", 2)
///     .with("chapter_title", "Low Tide");
/// assert_eq!(vars.get("chapter_number"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars {
    values: BTreeMap<String, String>,
}

impl TemplateVars {
    /// No variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, rendering the value with `Display`.
    pub fn with(mut self, name: impl Into<String>, value: impl std::fmt::Display) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl std::fmt::Display) {
        self.values.insert(name.into(), value.to_string());
    }

    /// Value of a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Renders named prompt templates.
///
/// Starts with the bundled templates; any of them can be replaced.
///
/// # Examples
///
/// ```
/// use storyloom_narrative::{TemplateEngine, TemplateId, TemplateVars};
///
/// let engine = TemplateEngine::new()
///     .with_template(TemplateId::SummarizeStructure, r#"Shape: {"act": 1}. Analysis: {{ structure_analysis }}"#);
/// let text = engine
///     .render(
///         TemplateId::SummarizeStructure,
///         &TemplateVars::new().with("structure_analysis", "three acts"),
///     )
///     .unwrap();
/// assert_eq!(text, r#"Shape: {"act": 1}. Analysis: three acts"#);
/// ```
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    templates: HashMap<TemplateId, String>,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    /// Engine holding the bundled templates.
    pub fn new() -> Self {
        let templates = TemplateId::iter()
            .map(|id| (id, id.bundled_text().to_string()))
            .collect();
        Self { templates }
    }

    /// Replace one template.
    pub fn with_template(mut self, id: TemplateId, text: impl Into<String>) -> Self {
        self.templates.insert(id, text.into());
        self
    }

    /// Replace a template by its snake_case name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateErrorKind::UnknownTemplate`] if no template has that name.
    #[track_caller]
    pub fn with_named_template(
        self,
        name: &str,
        text: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        let id = TemplateId::from_str(name).map_err(|_| {
            TemplateError::new(TemplateErrorKind::UnknownTemplate(name.to_string()))
        })?;
        Ok(self.with_template(id, text))
    }

    /// Raw text of a template.
    pub fn template(&self, id: TemplateId) -> &str {
        self.templates
            .get(&id)
            .map(String::as_str)
            .unwrap_or_else(|| id.bundled_text())
    }

    /// Names of the placeholders a template requires, in order of first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the placeholder pattern cannot be compiled.
    pub fn placeholders(&self, id: TemplateId) -> Result<Vec<String>, TemplateError> {
        let re = placeholder_regex()?;
        let mut names: Vec<String> = Vec::new();
        for caps in re.captures_iter(self.template(id)) {
            if let Some(name) = caps.get(1) {
                if !names.iter().any(|n| n == name.as_str()) {
                    names.push(name.as_str().to_string());
                }
            }
        }
        Ok(names)
    }

    /// Render a template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateErrorKind::MissingVariable`] naming the first
    /// placeholder that has no value in `vars`.
    #[tracing::instrument(skip(self, vars), fields(template = %id))]
    pub fn render(&self, id: TemplateId, vars: &TemplateVars) -> Result<String, TemplateError> {
        let rendered = render_text(self.template(id), vars)?;
        tracing::debug!(rendered_len = rendered.len(), "Template rendered");
        Ok(rendered)
    }

    /// Render a template given by name.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateErrorKind::UnknownTemplate`] for an unknown name, or
    /// [`TemplateErrorKind::MissingVariable`] as [`render`](Self::render) does.
    #[track_caller]
    pub fn render_named(&self, name: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
        let id = TemplateId::from_str(name).map_err(|_| {
            TemplateError::new(TemplateErrorKind::UnknownTemplate(name.to_string()))
        })?;
        self.render(id, vars)
    }
}

fn placeholder_regex() -> Result<regex::Regex, TemplateError> {
    regex::Regex::new(PLACEHOLDER_PATTERN)
        .map_err(|e| TemplateError::new(TemplateErrorKind::Pattern(e.to_string())))
}

fn render_text(template: &str, vars: &TemplateVars) -> Result<String, TemplateError> {
    let re = placeholder_regex()?;
    let mut result = String::with_capacity(template.len());
    let mut last = 0;

    for caps in re.captures_iter(template) {
        let Some(whole) = caps.get(0) else { continue };
        result.push_str(&template[last..whole.start()]);
        match caps.get(1) {
            Some(name) => {
                let value = vars.get(name.as_str()).ok_or_else(|| {
                    TemplateError::new(TemplateErrorKind::MissingVariable(
                        name.as_str().to_string(),
                    ))
                })?;
                result.push_str(value);
            }
            // Escaped opening delimiter
            None => result.push_str("{{"),
        }
        last = whole.end();
    }

    result.push_str(&template[last..]);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(text: &str) -> TemplateEngine {
        TemplateEngine::new().with_template(TemplateId::Blueprint, text)
    }

    #[test]
    fn test_missing_variable_names_placeholder() {
        let engine = engine_with("Idea: {{story_prompt}} / {{structure_summary}}");
        let vars = TemplateVars::new().with("story_prompt", "a lighthouse");

        let err = engine.render(TemplateId::Blueprint, &vars).unwrap_err();
        assert_eq!(
            err.kind,
            TemplateErrorKind::MissingVariable("structure_summary".to_string())
        );
    }

    #[test]
    fn test_json_braces_are_literal() {
        let engine = engine_with(r#"{"chapters": {"The Awakening": "..."}} for {{story_prompt}}"#);
        let vars = TemplateVars::new().with("story_prompt", "x");

        let text = engine.render(TemplateId::Blueprint, &vars).unwrap();
        assert_eq!(text, r#"{"chapters": {"The Awakening": "..."}} for x"#);
    }

    #[test]
    fn test_escaped_delimiter_renders_literally() {
        let engine = engine_with(r"Write \{{story_prompt}} literally, then {{story_prompt}}");
        let vars = TemplateVars::new().with("story_prompt", "the sea");

        let text = engine.render(TemplateId::Blueprint, &vars).unwrap();
        assert_eq!(text, "Write {{story_prompt}} literally, then the sea");
        assert_eq!(
            engine.placeholders(TemplateId::Blueprint).unwrap(),
            vec!["story_prompt".to_string()]
        );
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let engine = engine_with("{{story_prompt}}");
        let vars = TemplateVars::new().with("story_prompt", "{{structure_summary}}");

        let text = engine.render(TemplateId::Blueprint, &vars).unwrap();
        assert_eq!(text, "{{structure_summary}}");
    }

    #[test]
    fn test_bundled_placeholders() {
        let engine = TemplateEngine::new();
        let expected: &[(TemplateId, &[&str])] = &[
            (TemplateId::ChooseStructure, &["story_prompt"]),
            (TemplateId::SummarizeStructure, &["structure_analysis"]),
            (TemplateId::Blueprint, &["structure_summary", "story_prompt"]),
            (TemplateId::ChaptersJson, &["schema", "blueprint"]),
            (
                TemplateId::ActOutline,
                &["blueprint", "chapter_number", "chapter_title", "chapter_description"],
            ),
            (TemplateId::ActsJson, &["acts", "schema"]),
            (
                TemplateId::WriteAct,
                &[
                    "blueprint",
                    "story_prompt",
                    "chapter_description",
                    "act_description",
                    "writing_advice",
                    "act_number",
                    "chapter_number",
                ],
            ),
            (
                TemplateId::ContinueAct,
                &["previous_text", "act_number", "chapter_number"],
            ),
        ];

        for (id, names) in expected {
            let found = engine.placeholders(*id).unwrap();
            assert_eq!(found, names.to_vec(), "placeholders of {}", id);
        }
    }

    #[test]
    fn test_unknown_named_template() {
        let engine = TemplateEngine::new();
        let err = engine
            .render_named("epilogue", &TemplateVars::new())
            .unwrap_err();
        assert_eq!(
            err.kind,
            TemplateErrorKind::UnknownTemplate("epilogue".to_string())
        );

        let replaced = engine
            .with_named_template("continue_act", "More: {{previous_text}}")
            .unwrap();
        assert_eq!(replaced.template(TemplateId::ContinueAct), "More: {{previous_text}}");
    }
}
