use crate::Stash;
use serde_json::Value;

/// Ordered `(field, value)` pairs for a partial update.
///
/// The position of each field decides which `$n` placeholder its value binds to, so the order
/// is kept explicitly instead of relying on map iteration. Inserting a field that is already
/// present replaces its value without moving it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: Vec<(String, Value)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        match self.fields.iter_mut().find(|(k, _)| *k == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.insert(field, value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == field).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, Value)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Request bodies are parsed with key order preserved, so the resulting map follows the order
/// the client sent.
impl From<Stash> for FieldMap {
    fn from(stash: Stash) -> Self {
        stash.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_insertion_order() {
        let map = FieldMap::new()
            .with("title", json!("Engineer"))
            .with("salary", json!(100))
            .with("equity", json!(0.1));
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["title", "salary", "equity"]);
    }

    #[test]
    fn reinserting_replaces_in_place() {
        let map = FieldMap::new()
            .with("a", json!(1))
            .with("b", json!(2))
            .with("a", json!(3));
        assert_eq!(map.len(), 2);
        let pairs: Vec<(&str, &Value)> = map.iter().collect();
        assert_eq!(pairs, vec![("a", &json!(3)), ("b", &json!(2))]);
        assert_eq!(map.get("a"), Some(&json!(3)));
        assert_eq!(map.get("c"), None);
    }

    #[test]
    fn from_stash_follows_body_order() {
        let body: Stash = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        let map = FieldMap::from(body);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }
}
