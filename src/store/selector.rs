//! Mango-style selectors for `find`
//!
//! A selector is a conjunction of per-field conditions. Missing fields and
//! type mismatches never match; there is no coercion.

use regex::{Regex, RegexBuilder};
use serde_json::{json, Value};

use super::document::Document;

/// Condition applied to one field
#[derive(Debug, Clone)]
pub enum Condition {
    /// Exact JSON equality
    Eq(Value),
    /// Regular expression over string fields
    Regex(Regex),
}

impl Condition {
    fn matches(&self, value: &Value) -> bool {
        match self {
            Condition::Eq(expected) => value == expected,
            Condition::Regex(re) => value.as_str().is_some_and(|s| re.is_match(s)),
        }
    }
}

/// Field conditions, all of which must hold
#[derive(Debug, Clone, Default)]
pub struct Selector {
    clauses: Vec<(String, Condition)>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality clause
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), Condition::Eq(value.into())));
        self
    }

    /// Add a regular expression clause.
    ///
    /// Fails when `pattern` is not a valid expression.
    pub fn regex(
        mut self,
        field: impl Into<String>,
        pattern: &str,
        case_insensitive: bool,
    ) -> Result<Self, regex::Error> {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()?;
        self.clauses.push((field.into(), Condition::Regex(re)));
        Ok(self)
    }

    /// Checks if a document satisfies every clause
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses.iter().all(|(field, cond)| match doc.field(field) {
            Some(value) if !value.is_null() => cond.matches(&value),
            _ => false,
        })
    }

    /// Whether any clause targets `field`
    pub fn constrains(&self, field: &str) -> bool {
        self.clauses.iter().any(|(f, _)| f == field)
    }

    /// Render as a Mango selector object, for logging
    pub fn to_json(&self) -> Value {
        let mut obj = serde_json::Map::new();
        for (field, cond) in &self.clauses {
            let rendered = match cond {
                Condition::Eq(v) => v.clone(),
                Condition::Regex(re) => json!({ "$regex": re.as_str() }),
            };
            obj.insert(field.clone(), rendered);
        }
        Value::Object(obj)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> Document {
        Document::new(id)
            .with_field("kind", "record")
            .with_field("name", name)
    }

    #[test]
    fn test_eq_match() {
        let selector = Selector::new().eq("kind", "record");
        assert!(selector.matches(&record("1", "Spark")));
        assert!(!selector.matches(&Document::new("seq").with_field("value", 3)));
    }

    #[test]
    fn test_regex_case_insensitive() {
        let selector = Selector::new().regex("name", "spark", true).unwrap();
        assert!(selector.matches(&record("1", "Spark")));
        assert!(selector.matches(&record("2", "SPARKLE")));
        assert!(!selector.matches(&record("3", "Glow")));
    }

    #[test]
    fn test_regex_case_sensitive() {
        let selector = Selector::new().regex("name", "spark", false).unwrap();
        assert!(!selector.matches(&record("1", "Spark")));
    }

    #[test]
    fn test_regex_ignores_non_strings() {
        let selector = Selector::new().regex("value", "1", true).unwrap();
        assert!(!selector.matches(&Document::new("seq").with_field("value", 1)));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(Selector::new().regex("name", "(", true).is_err());
    }

    #[test]
    fn test_conjunction() {
        let selector = Selector::new()
            .eq("kind", "record")
            .regex("name", "^g", true)
            .unwrap();
        assert!(selector.matches(&record("2", "Glow")));
        assert!(!selector.matches(&Document::new("x").with_field("name", "Glow")));
    }

    #[test]
    fn test_null_never_matches() {
        let selector = Selector::new().eq("name", Value::Null);
        assert!(!selector.matches(&Document::new("1").with_field("name", Value::Null)));
    }

    #[test]
    fn test_constrains() {
        let selector = Selector::new().eq("kind", "record");
        assert!(selector.constrains("kind"));
        assert!(!selector.constrains("name"));
    }

    #[test]
    fn test_to_json() {
        let selector = Selector::new()
            .eq("kind", "record")
            .regex("name", "sp", true)
            .unwrap();
        assert_eq!(
            selector.to_json(),
            json!({ "kind": "record", "name": { "$regex": "sp" } })
        );
    }
}
