use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Lookup condition handed to [`Model::find_one`](super::Model::find_one):
/// field name to expected value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Map<String, Value>);

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-field filter, e.g. `{ "id": "abc123" }`.
    pub fn by(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().with(field, value)
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Equality match against a document. A `null` expectation also
    /// matches a missing field, as document stores do.
    pub fn matches(&self, document: &Value) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| document.get(field).unwrap_or(&Value::Null) == expected)
    }
}

impl From<Map<String, Value>> for Filter {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Filter> for Value {
    fn from(filter: Filter) -> Self {
        Value::Object(filter.0)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn displays_as_json() {
        let filter = Filter::by("id", "abc123");
        assert_eq!(filter.to_string(), r#"{"id":"abc123"}"#);
    }

    #[test]
    fn matches_every_field() {
        let doc = json!({ "id": "a", "slug": "intro" });

        assert!(Filter::by("id", "a").matches(&doc));
        assert!(Filter::by("id", "a").with("slug", "intro").matches(&doc));
        assert!(!Filter::by("id", "a").with("slug", "outro").matches(&doc));
        assert!(Filter::new().matches(&doc));
    }

    #[test]
    fn null_matches_missing_fields() {
        let doc = json!({ "slug": "intro" });
        assert!(Filter::by("id", Value::Null).matches(&doc));
    }
}
