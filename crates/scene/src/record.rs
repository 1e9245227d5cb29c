use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of imported data: a flat, ordered mapping from field name
/// to scalar value. Order is load-bearing: it fixes sequence numbers
/// and output page order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: serde_json::Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Look up a field coerced to a string. Numbers and booleans are
    /// formatted with their JSON rendition; `null` and missing fields
    /// yield `None`.
    pub fn get_str(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            // Nested structures are not valid record values; render
            // them as JSON so the problem is visible in output.
            other => Some(other.to_string()),
        }
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self { fields: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_scalars_to_strings() {
        let record: Record = serde_json::from_str(
            r#"{"Name":"Acme","Qty":41,"Active":true,"Gone":null}"#,
        )
        .unwrap();
        assert_eq!(record.get_str("Name").as_deref(), Some("Acme"));
        assert_eq!(record.get_str("Qty").as_deref(), Some("41"));
        assert_eq!(record.get_str("Active").as_deref(), Some("true"));
        assert_eq!(record.get_str("Gone"), None);
        assert_eq!(record.get_str("Missing"), None);
    }

    #[test]
    fn preserves_field_order() {
        let record: Record =
            serde_json::from_str(r#"{"b":1,"a":2,"c":3}"#).unwrap();
        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, ["b", "a", "c"]);
    }
}
