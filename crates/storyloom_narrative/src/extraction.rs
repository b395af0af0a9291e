//! Structured data extraction from free-form generation output.
//!
//! Creative text is reformatted by a second generation call whose only job is
//! emitting JSON. Responses often wrap that JSON in markdown fences or surround
//! it with chatter, so it is located first, then parsed and validated against
//! the chapter or act shape.

use crate::{TemplateEngine, TemplateId, TemplateVars};
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use storyloom_core::{ActKey, ActOutline, ActSet, Blueprint, ChapterMap, OrderedEntries};
use storyloom_error::{ExtractionError, ExtractionErrorKind, StoryloomError, StoryloomResult};
use storyloom_interface::StoryDriver;
use storyloom_rate_limit::{RetryPolicy, execute_with_retry};
use tracing::{debug, info, instrument, warn};

/// Shape of the chapter list embedded in the `chapters_json` prompt.
pub const CHAPTERS_SCHEMA: &str = r#"{
  "chapters": {
    "<chapter title>": "<chapter description>",
    "<chapter title>": "<chapter description>"
  }
}"#;

/// Shape of the act set embedded in the `acts_json` prompt.
pub const ACTS_SCHEMA: &str = r#"{
  "act-1": {"description": "<what happens>", "writingAdvice": "<how to write it>"},
  "act-2": {"description": "<what happens>", "writingAdvice": "<how to write it>"},
  "act-3": {"description": "<what happens>", "writingAdvice": "<how to write it>"}
}"#;

const NUMBER_WORDS: &str = "one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|\
thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty";

const ORDINAL_WORDS: &str =
    "first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth|eleventh|twelfth|last|final";

// I through XXXIX
const ROMAN_NUMERAL: &str = "x{1,3}(?:ix|iv|v?i{0,3})|ix|iv|v?i{1,3}|v";

/// Locate the JSON object in a generation response.
///
/// Tries, in order:
/// 1. A fenced ```json block
/// 2. Any fenced block containing `{`
/// 3. The first balanced `{ ... }` that is valid JSON, skipping braces inside strings
///
/// # Errors
///
/// Returns [`ExtractionErrorKind::NoStructuredData`] if no object is found.
///
/// # Examples
///
/// ```
/// use storyloom_narrative::extract_json;
///
/// let response = "Here you go:\n```json\n{\"chapters\": {\"Landfall\": \"They arrive.\"}}\n```\nEnjoy!";
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// assert!(json.contains("Landfall"));
/// ```
#[track_caller]
pub fn extract_json(response: &str) -> Result<String, ExtractionError> {
    if let Some(block) = fenced_block(response, |lang, _| lang.eq_ignore_ascii_case("json")) {
        return Ok(object_within(block).unwrap_or(block).to_string());
    }

    if let Some(block) = fenced_block(response, |_, body| body.contains('{')) {
        return Ok(object_within(block).unwrap_or(block).to_string());
    }

    if let Some(object) = object_within(response) {
        return Ok(object.to_string());
    }

    warn!(response_length = response.len(), "No JSON found in response");
    Err(ExtractionError::new(ExtractionErrorKind::NoStructuredData(
        response.len(),
    )))
}

/// First fenced block whose language tag and body satisfy `accept`.
///
/// An unclosed fence runs to the end of the response.
fn fenced_block(response: &str, accept: impl Fn(&str, &str) -> bool) -> Option<&str> {
    let mut rest = response;
    while let Some(open) = rest.find("```") {
        let after_fence = &rest[open + 3..];
        let (lang, body_start) = match after_fence.find('\n') {
            Some(n) => (after_fence[..n].trim(), n + 1),
            None => (after_fence.trim(), after_fence.len()),
        };
        let body_and_rest = &after_fence[body_start..];
        let (body, next) = match body_and_rest.find("```") {
            Some(close) => (&body_and_rest[..close], &body_and_rest[close + 3..]),
            None => (body_and_rest, ""),
        };
        let body = body.trim();
        if accept(lang, body) {
            return Some(body);
        }
        rest = next;
    }
    None
}

/// First balanced top-level object in `text` that parses as JSON.
///
/// Falls back to the first balanced object so the parse error names real input.
fn object_within(text: &str) -> Option<&str> {
    let mut first: Option<&str> = None;
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        let Some(end) = balanced_end(&text[start..]) else {
            break;
        };
        let candidate = &text[start..start + end];
        if serde_json::from_str::<serde::de::IgnoredAny>(candidate).is_ok() {
            return Some(candidate);
        }
        first.get_or_insert(candidate);
        search_from = start + end;
    }

    first
}

/// Byte length of the balanced object starting at `text[0] == '{'`.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse JSON into `T`.
///
/// # Errors
///
/// Returns [`ExtractionErrorKind::Parse`] with the parser message.
///
/// # Examples
///
/// ```
/// use storyloom_core::ActOutline;
/// use storyloom_narrative::parse_json;
///
/// let outline: ActOutline = parse_json(r#"{"description": "The lamp fails"}"#).unwrap();
/// assert_eq!(outline.description(), "The lamp fails");
/// ```
#[track_caller]
pub fn parse_json<T>(json: &str) -> Result<T, ExtractionError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json).map_err(|e| {
        let preview: String = json.chars().take(100).collect();
        warn!(error = %e, json_preview = %preview, "JSON parsing failed");
        ExtractionError::new(ExtractionErrorKind::Parse(e.to_string()))
    })
}

#[derive(Deserialize)]
struct ChapterListEnvelope {
    chapters: OrderedEntries<String>,
}

/// Parse and validate a chapter list from a reformatting response.
///
/// Accepts `{"chapters": {title: description}}` or a bare `{title: description}`
/// map. Order follows the JSON document.
///
/// # Errors
///
/// Any failure from [`extract_json`], [`parse_json`] or [`validate_chapters`].
///
/// # Examples
///
/// ```
/// use storyloom_narrative::parse_chapters;
///
/// let chapters = parse_chapters(r#"{"chapters": {"Storm": "It begins", "Calm": "It ends"}}"#).unwrap();
/// let titles: Vec<&str> = chapters.titles().collect();
/// assert_eq!(titles, vec!["Storm", "Calm"]);
///
/// assert!(parse_chapters(r#"{"Chapter 1: Storm": "It begins"}"#).is_err());
/// ```
pub fn parse_chapters(response: &str) -> Result<ChapterMap, ExtractionError> {
    let json = extract_json(response)?;
    let entries = match serde_json::from_str::<ChapterListEnvelope>(&json) {
        Ok(envelope) => envelope.chapters,
        Err(_) => parse_json::<OrderedEntries<String>>(&json)?,
    };
    validate_chapters(entries)
}

/// Validate chapter entries and build a [`ChapterMap`].
///
/// Titles are trimmed. The list must be non-empty and every title non-empty,
/// free of ordinal prefixes, and unique.
///
/// # Errors
///
/// [`ExtractionErrorKind::NoChapters`], [`ExtractionErrorKind::EmptyTitle`],
/// [`ExtractionErrorKind::OrdinalTitle`] or [`ExtractionErrorKind::DuplicateTitle`].
pub fn validate_chapters(entries: OrderedEntries<String>) -> Result<ChapterMap, ExtractionError> {
    if entries.is_empty() {
        return Err(ExtractionError::new(ExtractionErrorKind::NoChapters));
    }

    let mut chapters = ChapterMap::new();
    for (title, description) in entries.into_inner() {
        let title = title.trim();
        validate_chapter_title(title)?;
        chapters.insert(title, description.trim())?;
    }

    debug!(count = chapters.len(), "Chapter list validated");
    Ok(chapters)
}

static ORDINAL_TITLE: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:chapter|chap\.|ch\.|part)\s*(?:\d+|(?:{words})\b|(?:{roman})\b)|^\d{{1,3}}\s*[.:)\-–—]|^(?:{ordinals})\s+chapter\b|\bchapter\s*(?:\d+|(?:{words})\b)",
        words = NUMBER_WORDS,
        roman = ROMAN_NUMERAL,
        ordinals = ORDINAL_WORDS,
    ))
});

/// Reject empty titles and titles carrying a chapter number.
///
/// Rejected forms include `Chapter 1`, `Ch. 2`, `Part III`, `Chapter Two`,
/// `1. Title`, `2 - Title`, `First Chapter: Title`, and `chapter 3` anywhere.
///
/// # Errors
///
/// [`ExtractionErrorKind::EmptyTitle`] or [`ExtractionErrorKind::OrdinalTitle`].
///
/// # Examples
///
/// ```
/// use storyloom_narrative::validate_chapter_title;
///
/// assert!(validate_chapter_title("The Awakening").is_ok());
/// assert!(validate_chapter_title("Chapter 1: The Awakening").is_err());
/// assert!(validate_chapter_title("First Chapter: Awakening").is_err());
/// assert!(validate_chapter_title("1 - Awakening").is_err());
/// ```
#[track_caller]
pub fn validate_chapter_title(title: &str) -> Result<(), ExtractionError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ExtractionError::new(ExtractionErrorKind::EmptyTitle));
    }

    let re = ORDINAL_TITLE.as_ref().map_err(|e| {
        ExtractionError::new(ExtractionErrorKind::Parse(format!(
            "invalid title pattern: {}",
            e
        )))
    })?;

    if re.is_match(title) {
        return Err(ExtractionError::new(ExtractionErrorKind::OrdinalTitle(
            title.to_string(),
        )));
    }
    Ok(())
}

/// Parse and validate an act set from a reformatting response.
///
/// # Errors
///
/// Any failure from [`extract_json`], [`parse_json`] or [`validate_acts`].
///
/// # Examples
///
/// ```
/// use storyloom_core::ActKey;
/// use storyloom_narrative::parse_acts;
///
/// let acts = parse_acts(r#"{
///     "act-1": {"description": "Arrival", "writingAdvice": "Quiet"},
///     "act-2": {"description": "Discovery"},
///     "act-3": {"description": "Departure", "writing_advice": "Linger"}
/// }"#).unwrap();
/// assert_eq!(acts.get(ActKey::Act2).writing_advice(), "");
/// assert_eq!(acts.get(ActKey::Act3).writing_advice(), "Linger");
/// ```
pub fn parse_acts(response: &str) -> Result<ActSet, ExtractionError> {
    let json = extract_json(response)?;
    let entries = parse_json::<OrderedEntries<serde_json::Value>>(&json)?;
    validate_acts(entries)
}

/// Validate that exactly `act-1`, `act-2` and `act-3` are present, each with
/// a non-empty description.
///
/// # Errors
///
/// [`ExtractionErrorKind::UnexpectedAct`] for an unknown or repeated key,
/// [`ExtractionErrorKind::MissingAct`] for an absent one,
/// [`ExtractionErrorKind::Parse`] for a malformed act and
/// [`ExtractionErrorKind::EmptyActDescription`] for a blank description.
pub fn validate_acts(
    entries: OrderedEntries<serde_json::Value>,
) -> Result<ActSet, ExtractionError> {
    let mut slots: [Option<ActOutline>; 3] = [None, None, None];

    for (key, value) in entries.into_inner() {
        let act: ActKey = key.trim().parse().map_err(|_| {
            ExtractionError::new(ExtractionErrorKind::UnexpectedAct(key.clone()))
        })?;
        let slot = &mut slots[act.number() - 1];
        if slot.is_some() {
            return Err(ExtractionError::new(ExtractionErrorKind::UnexpectedAct(key)));
        }

        let outline: ActOutline = serde_json::from_value(value).map_err(|e| {
            ExtractionError::new(ExtractionErrorKind::Parse(format!("{}: {}", act, e)))
        })?;
        let outline = ActOutline::new(outline.description().trim(), outline.writing_advice().trim());
        if outline.description().is_empty() {
            return Err(ExtractionError::new(
                ExtractionErrorKind::EmptyActDescription(act.to_string()),
            ));
        }
        *slot = Some(outline);
    }

    let [act1, act2, act3] = slots;
    let take = |slot: Option<ActOutline>, key: ActKey| {
        slot.ok_or_else(|| ExtractionError::new(ExtractionErrorKind::MissingAct(key.to_string())))
    };
    Ok(ActSet::new(
        take(act1, ActKey::Act1)?,
        take(act2, ActKey::Act2)?,
        take(act3, ActKey::Act3)?,
    ))
}

/// Turns creative text into validated structure with a reformatting call.
///
/// One attempt is one reformatting call plus parse and validation. By default
/// a single attempt is made; a [`RetryPolicy`] set with
/// [`with_policy`](Self::with_policy) allows more.
#[derive(Debug)]
pub struct StructuredExtractor<D> {
    driver: Arc<D>,
    templates: TemplateEngine,
    policy: RetryPolicy,
}

impl<D> Clone for StructuredExtractor<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            templates: self.templates.clone(),
            policy: self.policy,
        }
    }
}

impl<D: StoryDriver> StructuredExtractor<D> {
    /// Create a single-attempt extractor with the bundled templates.
    pub fn new(driver: Arc<D>) -> Self {
        Self {
            driver,
            templates: TemplateEngine::new(),
            policy: RetryPolicy::none(),
        }
    }

    /// Use these templates for the reformatting prompts.
    pub fn with_templates(mut self, templates: TemplateEngine) -> Self {
        self.templates = templates;
        self
    }

    /// Use this retry policy for each extraction.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Retry policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Extract the ordered chapter list from a blueprint.
    ///
    /// # Errors
    ///
    /// Template errors fail at once. Service and extraction errors are retried
    /// under the policy; the last one is returned.
    #[instrument(skip(self, blueprint), fields(blueprint_len = blueprint.as_str().len()))]
    pub async fn extract_chapters(&self, blueprint: &Blueprint) -> StoryloomResult<ChapterMap> {
        let prompt = self.templates.render(
            TemplateId::ChaptersJson,
            &TemplateVars::new()
                .with("blueprint", blueprint)
                .with("schema", CHAPTERS_SCHEMA),
        )?;

        let chapters = self
            .attempt("extract chapters", &prompt, |text| {
                parse_chapters(text).map_err(StoryloomError::from)
            })
            .await?;

        info!(count = chapters.len(), "Chapters extracted");
        Ok(chapters)
    }

    /// Extract the three acts from a prose act outline.
    ///
    /// # Errors
    ///
    /// As for [`extract_chapters`](Self::extract_chapters).
    #[instrument(skip(self, acts), fields(acts_len = acts.len()))]
    pub async fn extract_acts(&self, acts: &str) -> StoryloomResult<ActSet> {
        let prompt = self.templates.render(
            TemplateId::ActsJson,
            &TemplateVars::new()
                .with("acts", acts)
                .with("schema", ACTS_SCHEMA),
        )?;

        let set = self
            .attempt("extract acts", &prompt, |text| {
                parse_acts(text).map_err(StoryloomError::from)
            })
            .await?;

        debug!("Acts extracted");
        Ok(set)
    }

    async fn attempt<T>(
        &self,
        label: &str,
        prompt: &str,
        parse: impl Fn(&str) -> StoryloomResult<T>,
    ) -> StoryloomResult<T> {
        let driver = &self.driver;
        let parse = &parse;
        execute_with_retry(&self.policy, label, move || async move {
            let response = driver.complete(prompt).await?;
            parse(&response)
        })
        .await
    }
}
