//! Joining act prose into chapters and chapters into the story.

use crate::ActText;
use serde::{Deserialize, Serialize};

/// Boundary between acts within a chapter.
const ACT_SEPARATOR: &str = "\n";
/// Boundary between chapters in the full story.
const CHAPTER_SEPARATOR: &str = "\n\n";

/// The assembled prose of one chapter.
///
/// # Examples
///
/// ```
/// use storyloom_core::{ActText, ChapterText};
///
/// let chapter = ChapterText::assemble(
///     "Low Tide",
///     &[ActText::new("t1"), ActText::new("t2"), ActText::new("t3")],
/// );
/// assert_eq!(chapter.text(), "t1\nt2\nt3");
/// assert_eq!(chapter.title(), "Low Tide");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ChapterText {
    /// Chapter title
    title: String,
    /// The three acts joined by single line breaks
    text: String,
}

impl ChapterText {
    /// Join a chapter's three acts, act-1 first.
    pub fn assemble(title: impl Into<String>, acts: &[ActText; 3]) -> Self {
        Self {
            title: title.into(),
            text: join_acts(acts),
        }
    }
}

/// Join act prose with the act boundary.
///
/// Used both for finished chapters and for the running continuity context.
pub fn join_acts(acts: &[ActText]) -> String {
    acts.iter()
        .map(ActText::as_str)
        .collect::<Vec<_>>()
        .join(ACT_SEPARATOR)
}

/// The finished story, every chapter in narrative order.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::Display,
)]
#[serde(transparent)]
pub struct FullStory(String);

impl FullStory {
    /// Join chapters with the chapter boundary.
    pub fn assemble(chapters: &[ChapterText]) -> Self {
        Self(
            chapters
                .iter()
                .map(|c| c.text.as_str())
                .collect::<Vec<_>>()
                .join(CHAPTER_SEPARATOR),
        )
    }

    /// The story text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acts(a: &str, b: &str, c: &str) -> [ActText; 3] {
        [ActText::new(a), ActText::new(b), ActText::new(c)]
    }

    #[test]
    fn test_full_story_assembly_is_exact() {
        let chapters = vec![
            ChapterText::assemble("A", &acts("t1", "t2", "t3")),
            ChapterText::assemble("B", &acts("u1", "u2", "u3")),
        ];
        let story = FullStory::assemble(&chapters);
        assert_eq!(
            story.as_str(),
            ("t1".to_string() + "\n" + "t2" + "\n" + "t3")
                + "\n\n"
                + &("u1".to_string() + "\n" + "u2" + "\n" + "u3")
        );
    }

    #[test]
    fn test_acts_with_trailing_newlines_are_kept_verbatim() {
        let chapter = ChapterText::assemble("C", &acts("one\n", "two", "three"));
        assert_eq!(chapter.text(), "one\n\ntwo\nthree");
    }

    #[test]
    fn test_empty_story() {
        assert_eq!(FullStory::assemble(&[]).as_str(), "");
    }
}
