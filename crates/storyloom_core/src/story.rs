//! Free-text artifacts produced by the planning stages of a run.

use serde::{Deserialize, Serialize};

/// The story idea that starts a run.
///
/// # Examples
///
/// ```
/// use storyloom_core::StoryPrompt;
///
/// let prompt = StoryPrompt::new("A lonely lighthouse keeper discovers a message in a bottle");
/// assert!(prompt.as_str().starts_with("A lonely"));
/// assert!(StoryPrompt::new("   ").is_blank());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct StoryPrompt(String);

impl StoryPrompt {
    /// Accept a story idea.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The prompt text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the prompt has no visible characters.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// Reasoning about which story structure fits the prompt.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
pub struct StructureChoice(String);

impl StructureChoice {
    /// The analysis text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The chosen structure and how to apply it, condensed.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
pub struct StructureSummary(String);

impl StructureSummary {
    /// The summary text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The full planning document for a story.
///
/// Holds synopsis, setting, world rules, characters, timeline, title and
/// a prose chapter list. Every later stage reads it.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
pub struct Blueprint(String);

impl Blueprint {
    /// The blueprint text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The story title named in the blueprint, if any.
    ///
    /// Looks for a `Title:` or `Story Title:` line, tolerating markdown
    /// heading and emphasis marks and surrounding quotes.
    ///
    /// # Examples
    ///
    /// ```
    /// use storyloom_core::Blueprint;
    ///
    /// let blueprint = Blueprint::from("## Synopsis\n...\n**Title:** \"The Salt Letter\"\n".to_string());
    /// assert_eq!(blueprint.title().as_deref(), Some("The Salt Letter"));
    ///
    /// let untitled = Blueprint::from("No heading here".to_string());
    /// assert_eq!(untitled.title(), None);
    /// ```
    pub fn title(&self) -> Option<String> {
        let re = regex::Regex::new(r"(?mi)^[\s>#*_-]*(?:story\s+)?title[\s*_]*:[\s*_]*(.+?)[\s*_]*$")
            .ok()?;
        re.captures_iter(&self.0)
            .filter_map(|caps| caps.get(1))
            .map(|m| {
                m.as_str()
                    .trim()
                    .trim_matches(|c| c == '"' || c == '\'' || c == '“' || c == '”')
                    .trim()
                    .to_string()
            })
            .find(|title| !title.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_variants() {
        for (text, expected) in [
            ("Title: Tidewater", "Tidewater"),
            ("# Story Title: Tidewater", "Tidewater"),
            ("**Story Title**: Tidewater", "Tidewater"),
            ("- *Title:* _Tidewater_", "Tidewater"),
            ("title:   'Tidewater'  ", "Tidewater"),
        ] {
            let blueprint = Blueprint::from(format!("Synopsis: a keeper.\n{}\nSetting: rock", text));
            assert_eq!(blueprint.title().as_deref(), Some(expected), "input: {}", text);
        }
    }

    #[test]
    fn test_chapter_title_lines_are_not_story_titles() {
        let blueprint = Blueprint::from("Chapter Title: Arrival\nTitle and pacing notes".to_string());
        assert_eq!(blueprint.title(), None);
    }

    #[test]
    fn test_blank_title_is_skipped() {
        let blueprint = Blueprint::from("Title: \"\"\nStory Title: Driftwood".to_string());
        assert_eq!(blueprint.title().as_deref(), Some("Driftwood"));
    }
}
