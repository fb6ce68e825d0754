use indexmap::IndexMap;
use serde::Serialize;

/// One CSV data row keyed by header column name.
///
/// Keys keep header order and are unique: a repeated header column
/// overwrites the earlier value but keeps the earlier position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RawRecord {
    fields: IndexMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Remove a field, returning its value. Later fields keep their order.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.fields.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_key_keeps_first_position() {
        let mut rec = RawRecord::new();
        rec.insert("x", "1");
        rec.insert("y", "2");
        rec.insert("x", "3");
        assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["x", "y"]);
        assert_eq!(rec.get("x"), Some("3"));
    }

    #[test]
    fn serializes_in_header_order() {
        let rec: RawRecord = [("name", "Egypt"), ("value", "2.3"), ("x", "1")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&rec).unwrap_or_default();
        assert_eq!(json, r#"{"name":"Egypt","value":"2.3","x":"1"}"#);
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut rec: RawRecord = [("x", "1"), ("name", "Egypt"), ("y", "0"), ("iso-a3", "EGY")]
            .into_iter()
            .collect();
        assert_eq!(rec.remove("x").as_deref(), Some("1"));
        assert_eq!(rec.remove("missing"), None);
        assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["name", "y", "iso-a3"]);
    }
}
