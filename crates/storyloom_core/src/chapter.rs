//! Chapter list types.

use crate::OrderedEntries;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::{Deserialize, Deserializer};
use storyloom_error::{ExtractionError, ExtractionErrorKind};

/// One chapter of the story plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_getters::Getters)]
pub struct Chapter {
    /// Chapter title, free of numbering
    title: String,
    /// What happens in the chapter
    description: String,
}

impl Chapter {
    /// Create a chapter.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Chapters of a story in narrative order, keyed by unique title.
///
/// Iteration order is insertion order, and a title can appear only once.
///
/// # Examples
///
/// ```
/// use storyloom_core::ChapterMap;
///
/// let mut chapters = ChapterMap::new();
/// chapters.insert("The Keeper", "A quiet life on the rock.").unwrap();
/// chapters.insert("The Bottle", "A message washes ashore.").unwrap();
/// assert!(chapters.insert("The Keeper", "again").is_err());
///
/// let titles: Vec<&str> = chapters.titles().collect();
/// assert_eq!(titles, vec!["The Keeper", "The Bottle"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterMap {
    chapters: Vec<Chapter>,
}

impl ChapterMap {
    /// An empty chapter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chapter, rejecting a title that is already present.
    #[track_caller]
    pub fn insert(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), ExtractionError> {
        let title = title.into();
        if self.contains(&title) {
            return Err(ExtractionError::new(ExtractionErrorKind::DuplicateTitle(
                title,
            )));
        }
        self.chapters.push(Chapter::new(title, description));
        Ok(())
    }

    /// True when a chapter with this title exists.
    pub fn contains(&self, title: &str) -> bool {
        self.chapters.iter().any(|c| c.title == title)
    }

    /// Description of the chapter with this title.
    pub fn get(&self, title: &str) -> Option<&str> {
        self.chapters
            .iter()
            .find(|c| c.title == title)
            .map(|c| c.description.as_str())
    }

    /// Number of chapters.
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    /// True when there are no chapters.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Chapters in narrative order.
    pub fn iter(&self) -> std::slice::Iter<'_, Chapter> {
        self.chapters.iter()
    }

    /// Titles in narrative order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.chapters.iter().map(|c| c.title.as_str())
    }
}

impl<'a> IntoIterator for &'a ChapterMap {
    type Item = &'a Chapter;
    type IntoIter = std::slice::Iter<'a, Chapter>;

    fn into_iter(self) -> Self::IntoIter {
        self.chapters.iter()
    }
}

impl TryFrom<OrderedEntries<String>> for ChapterMap {
    type Error = ExtractionError;

    fn try_from(entries: OrderedEntries<String>) -> Result<Self, Self::Error> {
        let mut map = ChapterMap::new();
        for (title, description) in entries.into_inner() {
            map.insert(title, description)?;
        }
        Ok(map)
    }
}

impl Serialize for ChapterMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.chapters.len()))?;
        for chapter in &self.chapters {
            map.serialize_entry(&chapter.title, &chapter.description)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChapterMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = OrderedEntries::<String>::deserialize(deserializer)?;
        ChapterMap::try_from(entries).map_err(serde::de::Error::custom)
    }
}
