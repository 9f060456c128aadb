//! Criteria: the field→value filter shared by every talent source.
//!
//! A criteria map is lowered into one `Predicate` per entry and the predicates
//! are AND-ed. The Supabase store renders the same predicates as PostgREST
//! filters, the in-process sources evaluate them directly, so both paths agree
//! on which rows match.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Talent;

/// Field name that targets `aesthetic.keywords` instead of a column.
pub const KEYWORDS_FIELD: &str = "keywords";
/// Field compared by exact equality rather than substring.
pub const TYPE_FIELD: &str = "type";

/// A field→value filter. Ordered so rendered filters are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Criteria(BTreeMap<String, Value>);

/// One lowered criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `aesthetic.keywords` contains the keyword as an element.
    KeywordContains(String),
    /// The field's text form equals the value's text form.
    Equals { field: String, value: String },
    /// Case-insensitive substring of the field's text form.
    ILike { field: String, needle: String },
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn predicates(&self) -> Vec<Predicate> {
        self.0
            .iter()
            .map(|(field, value)| Predicate::from_entry(field, value))
            .collect()
    }

    /// True when every predicate holds. Empty criteria match everything.
    pub fn matches(&self, talent: &Talent) -> bool {
        self.predicates().iter().all(|p| p.matches(talent))
    }

    /// Clones the matching talents, preserving input order.
    pub fn filter<'a, I>(&self, talents: I) -> Vec<Talent>
    where
        I: IntoIterator<Item = &'a Talent>,
    {
        let predicates = self.predicates();
        talents
            .into_iter()
            .filter(|t| predicates.iter().all(|p| p.matches(t)))
            .cloned()
            .collect()
    }
}

impl FromIterator<(String, Value)> for Criteria {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Criteria(iter.into_iter().collect())
    }
}

impl From<serde_json::Map<String, Value>> for Criteria {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

impl Predicate {
    pub fn from_entry(field: &str, value: &Value) -> Self {
        match field {
            KEYWORDS_FIELD => Predicate::KeywordContains(value_text(value)),
            TYPE_FIELD => Predicate::Equals {
                field: field.to_string(),
                value: value_text(value),
            },
            _ => Predicate::ILike {
                field: field.to_string(),
                needle: value_text(value),
            },
        }
    }

    pub fn matches(&self, talent: &Talent) -> bool {
        match self {
            Predicate::KeywordContains(keyword) => {
                talent.aesthetic.keywords.iter().any(|k| k == keyword)
            }
            Predicate::Equals { field, value } => match talent.field(field) {
                Some(actual) if !actual.is_null() => value_text(&actual) == *value,
                _ => false,
            },
            Predicate::ILike { field, needle } => match talent.field(field) {
                Some(actual) if !actual.is_null() => {
                    let text = value_text(&actual);
                    text == *needle || text.to_lowercase().contains(&needle.to_lowercase())
                }
                _ => false,
            },
        }
    }
}

/// Text form of a JSON value: strings verbatim, everything else as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
