use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Schema-less value attached to a rule identifier.
///
/// Serialized untagged so policies read naturally as JSON:
/// `{"min_fico": 680, "max_amount": 75000.5, "excluded_states": ["CA"]}`.
/// Shapes no standard rule reads are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Integer(i64),
    Float(f64),
    Flag(bool),
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

/// Raised when a rule value carries a different variant than its predicate consumes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected}, found {found}")]
pub struct RuleValueError {
    pub expected: &'static str,
    pub found: &'static str,
}

impl RuleValue {
    pub const fn kind(&self) -> &'static str {
        match self {
            RuleValue::Integer(_) => "integer",
            RuleValue::Float(_) => "float",
            RuleValue::Flag(_) => "flag",
            RuleValue::Text(_) => "text",
            RuleValue::List(_) => "list of strings",
            RuleValue::Other(_) => "json",
        }
    }

    /// Numeric thresholds accept both integer and float encodings.
    pub fn as_number(&self) -> Result<f64, RuleValueError> {
        match self {
            RuleValue::Integer(value) => Ok(*value as f64),
            RuleValue::Float(value) => Ok(*value),
            other => Err(other.mismatch("number")),
        }
    }

    pub fn as_list(&self) -> Result<&[String], RuleValueError> {
        match self {
            RuleValue::List(values) => Ok(values),
            other => Err(other.mismatch("list of strings")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> RuleValueError {
        RuleValueError {
            expected,
            found: self.kind(),
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Integer(value) => write!(f, "{value}"),
            RuleValue::Float(value) => write!(f, "{value}"),
            RuleValue::Flag(value) => write!(f, "{value}"),
            RuleValue::Text(value) => f.write_str(value),
            RuleValue::List(values) => write!(f, "[{}]", values.join(", ")),
            RuleValue::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for RuleValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RuleValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for RuleValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for RuleValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for RuleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for RuleValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for RuleValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for RuleValue {
    fn from(values: [&str; N]) -> Self {
        Self::List(values.iter().map(|value| value.to_string()).collect())
    }
}

/// Rule identifiers mapped to their values, in the order the policy author wrote them.
///
/// Evaluation walks the entries in this order, so reasons come back in a stable sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<(String, RuleValue)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RuleValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts or replaces a rule. A replaced rule keeps its position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RuleValue>,
    ) -> Option<RuleValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&RuleValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RuleSet
where
    K: Into<String>,
    V: Into<RuleValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut rules = RuleSet::new();
        for (key, value) in iter {
            rules.insert(key, value);
        }
        rules
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RuleSetVisitor)
    }
}

struct RuleSetVisitor;

impl<'de> Visitor<'de> for RuleSetVisitor {
    type Value = RuleSet;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of rule identifiers to rule values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, RuleValue)> =
            Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, RuleValue>()? {
            if entries.iter().any(|(existing, _)| *existing == key) {
                return Err(serde::de::Error::custom(format!(
                    "duplicate rule identifier '{key}'"
                )));
            }
            entries.push((key, value));
        }
        Ok(RuleSet { entries })
    }
}
