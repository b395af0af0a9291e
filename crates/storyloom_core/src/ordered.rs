//! Order-preserving map deserialization.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// The entries of a JSON object in document order, duplicates kept.
///
/// `serde_json::Value` maps are sorted by key, which loses the narrative order
/// of a chapter list. Deserializing into this type keeps every key exactly as
/// it appeared so callers can validate order and uniqueness themselves.
///
/// # Examples
///
/// ```
/// use storyloom_core::OrderedEntries;
///
/// let entries: OrderedEntries<String> =
///     serde_json::from_str(r#"{"Zeta": "last letter", "Alpha": "first letter"}"#).unwrap();
/// let keys: Vec<&str> = entries.keys().collect();
/// assert_eq!(keys, vec!["Zeta", "Alpha"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedEntries<V>(pub Vec<(String, V)>);

impl<V> OrderedEntries<V> {
    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the object had no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the entry list.
    pub fn into_inner(self) -> Vec<(String, V)> {
        self.0
    }
}

struct OrderedEntriesVisitor<V> {
    marker: PhantomData<fn() -> V>,
}

impl<'de, V> Visitor<'de> for OrderedEntriesVisitor<V>
where
    V: Deserialize<'de>,
{
    type Value = OrderedEntries<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            entries.push((key, value));
        }
        Ok(OrderedEntries(entries))
    }
}

impl<'de, V> Deserialize<'de> for OrderedEntries<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(OrderedEntriesVisitor {
            marker: PhantomData,
        })
    }
}
