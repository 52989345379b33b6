use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::{parse_amount, Amount};

/// Maximum number of name/amount pairs accepted in one submission.
pub const MAX_ENTRIES: usize = 5;

/// A raw name/amount pair as typed by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInput {
    pub name: String,
    pub amount: String,
}

impl EntryInput {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }

    /// Split a `name=amount` pair on its last `=`.
    /// Without a separator the whole text is the name and the amount is empty.
    pub fn parse_pair(pair: &str) -> Self {
        match pair.rsplit_once('=') {
            Some((name, amount)) => Self::new(name, amount),
            None => Self::new(pair, ""),
        }
    }
}

/// Why a raw entry was left out of a detail mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyName,
    BadAmount(String),
}

/// Category (or income source) name to amount, in entry order.
///
/// Serialized as a JSON object, e.g. `{"food": 12.5, "transport": 3.0}`.
/// Inserting an existing name replaces its amount and keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailMap {
    entries: Vec<(String, Amount)>,
}

impl DetailMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, amount: Amount) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = amount,
            None => self.entries.push((name, amount)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Amount> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, amount)| *amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.entries.iter().map(|(name, amount)| (name.as_str(), *amount))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all amounts, in entry order.
    pub fn total(&self) -> Amount {
        self.entries.iter().map(|(_, amount)| amount).sum()
    }

    /// Build a mapping from raw user input, keeping only entries with a
    /// non-empty (trimmed) name and a parseable amount.
    /// Returns the mapping together with the entries that were skipped.
    pub fn from_inputs(inputs: &[EntryInput]) -> (Self, Vec<(usize, SkipReason)>) {
        let mut map = Self::new();
        let mut skipped = Vec::new();

        for (index, input) in inputs.iter().enumerate() {
            let name = input.name.trim();
            let amount = match parse_amount(&input.amount) {
                Ok(amount) => amount,
                Err(e) => {
                    skipped.push((index, SkipReason::BadAmount(e.to_string())));
                    continue;
                }
            };
            if name.is_empty() {
                skipped.push((index, SkipReason::EmptyName));
                continue;
            }
            map.insert(name, amount);
        }

        (map, skipped)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl<S: Into<String>> FromIterator<(S, Amount)> for DetailMap {
    fn from_iter<I: IntoIterator<Item = (S, Amount)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, amount) in iter {
            map.insert(name, amount);
        }
        map
    }
}

impl Serialize for DetailMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, amount) in &self.entries {
            map.serialize_entry(name, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DetailMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DetailMapVisitor;

        impl<'de> Visitor<'de> for DetailMapVisitor {
            type Value = DetailMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of names to numeric amounts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = DetailMap::new();
                while let Some((name, amount)) = access.next_entry::<String, Amount>()? {
                    map.insert(name, amount);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(DetailMapVisitor)
    }
}
