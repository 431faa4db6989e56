use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Open-ended named parameters passed alongside every provider operation.
///
/// Providers read the keys they understand and ignore the rest, so callers can
/// pass the same `Params` to different implementations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(HashMap<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(Value::as_u64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
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
}

impl From<HashMap<String, Value>> for Params {
    fn from(map: HashMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for Params {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_getters() {
        let params = Params::new()
            .with("index", 2)
            .with("topic", "food")
            .with("reveal_answer", true);

        assert_eq!(params.len(), 3);
        assert_eq!(params.get_u64("index"), Some(2));
        assert_eq!(params.get_str("topic"), Some("food"));
        assert_eq!(params.get_bool("reveal_answer"), Some(true));
    }

    #[test]
    fn test_getter_type_mismatch_returns_none() {
        let params = Params::new().with("index", "two").with("reveal_answer", 1);

        assert_eq!(params.get_u64("index"), None);
        assert_eq!(params.get_bool("reveal_answer"), None);
        assert_eq!(params.get_str("missing"), None);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let params = Params::new().with("temperature", 0.2);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({"temperature": 0.2}));

        let parsed: Params = serde_json::from_value(json!({"seed": 7})).unwrap();
        assert_eq!(parsed.get_u64("seed"), Some(7));
    }

    #[test]
    fn test_insert_replaces_existing_value() {
        let mut params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.insert("level_hint", "a1"), None);
        assert_eq!(params.insert("level_hint", "a2"), Some(json!("a1")));
        assert_eq!(params.get_str("level_hint"), Some("a2"));
    }
}
