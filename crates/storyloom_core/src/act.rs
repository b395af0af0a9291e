//! Three-act chapter decomposition types.

use serde::{Deserialize, Deserializer, Serialize};
use strum::IntoEnumIterator;

/// Key of one act within a chapter.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use storyloom_core::ActKey;
///
/// assert_eq!(ActKey::Act2.to_string(), "act-2");
/// assert_eq!(ActKey::from_str("act-3").unwrap(), ActKey::Act3);
/// assert_eq!(ActKey::Act1.number(), 1);
/// assert!(ActKey::from_str("act-4").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
pub enum ActKey {
    /// Opening act
    #[strum(serialize = "act-1")]
    Act1,
    /// Middle act
    #[strum(serialize = "act-2")]
    Act2,
    /// Closing act
    #[strum(serialize = "act-3")]
    Act3,
}

impl ActKey {
    /// All acts in writing order.
    pub fn all() -> impl Iterator<Item = ActKey> {
        ActKey::iter()
    }

    /// 1-based position of the act.
    pub fn number(&self) -> usize {
        match self {
            ActKey::Act1 => 1,
            ActKey::Act2 => 2,
            ActKey::Act3 => 3,
        }
    }

    fn index(&self) -> usize {
        self.number() - 1
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// What happens in one act and how to write it.
///
/// # Examples
///
/// ```
/// use storyloom_core::ActOutline;
///
/// let outline: ActOutline =
///     serde_json::from_str(r#"{"description": "Storm rolls in", "writingAdvice": null}"#).unwrap();
/// assert_eq!(outline.description(), "Storm rolls in");
/// assert_eq!(outline.writing_advice(), "");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_getters::Getters,
)]
pub struct ActOutline {
    /// Events of the act
    #[serde(default, deserialize_with = "null_as_empty")]
    description: String,
    /// Style guidance for the act, possibly empty
    #[serde(
        default,
        rename = "writingAdvice",
        alias = "writing_advice",
        deserialize_with = "null_as_empty"
    )]
    writing_advice: String,
}

impl ActOutline {
    /// Create an act outline.
    pub fn new(description: impl Into<String>, writing_advice: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            writing_advice: writing_advice.into(),
        }
    }
}

/// The three acts of one chapter.
///
/// Always holds exactly `act-1`, `act-2` and `act-3`.
///
/// # Examples
///
/// ```
/// use storyloom_core::{ActKey, ActOutline, ActSet};
///
/// let acts = ActSet::new(
///     ActOutline::new("arrival", ""),
///     ActOutline::new("discovery", "slow down"),
///     ActOutline::new("departure", ""),
/// );
/// assert_eq!(acts.get(ActKey::Act2).description(), "discovery");
/// assert_eq!(acts.iter().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActSet {
    acts: [ActOutline; 3],
}

impl ActSet {
    /// Create an act set from the three acts in order.
    pub fn new(act1: ActOutline, act2: ActOutline, act3: ActOutline) -> Self {
        Self {
            acts: [act1, act2, act3],
        }
    }

    /// Outline of one act.
    pub fn get(&self, key: ActKey) -> &ActOutline {
        &self.acts[key.index()]
    }

    /// Acts in writing order.
    pub fn iter(&self) -> impl Iterator<Item = (ActKey, &ActOutline)> {
        ActKey::all().zip(self.acts.iter())
    }
}

impl Serialize for ActSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(3))?;
        for (key, outline) in self.iter() {
            map.serialize_entry(key.as_ref(), outline)?;
        }
        map.end()
    }
}

/// Generated prose for one act.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
pub struct ActText(String);

impl ActText {
    /// Wrap generated prose.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The prose.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_act_keys_in_order() {
        let keys: Vec<String> = ActKey::all().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["act-1", "act-2", "act-3"]);
    }

    #[test]
    fn test_outline_accepts_snake_case_advice() {
        let outline: ActOutline = serde_json::from_str(
            r#"{"description": "The keeper climbs", "writing_advice": "linger on the stairs"}"#,
        )
        .unwrap();
        assert_eq!(outline.writing_advice(), "linger on the stairs");
    }

    #[test]
    fn test_outline_missing_advice_is_empty() {
        let outline: ActOutline =
            serde_json::from_str(r#"{"description": "Dawn"}"#).unwrap();
        assert_eq!(outline.writing_advice(), "");
    }

    #[test]
    fn test_act_set_serializes_with_act_keys() {
        let acts = ActSet::new(
            ActOutline::new("a", ""),
            ActOutline::new("b", "x"),
            ActOutline::new("c", ""),
        );
        let value = serde_json::to_value(&acts).unwrap();
        assert_eq!(value["act-2"]["description"], "b");
        assert_eq!(value["act-2"]["writingAdvice"], "x");
    }
}
