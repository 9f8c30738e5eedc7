//! JSON conversions (feature = `"json"`).

use crate::Value;

impl Value {
    /// Parse JSON text into a value.
    ///
    /// # Errors
    ///
    /// Returns the parser's error for malformed JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use destructure::Value;
    ///
    /// let v = Value::from_json(r#"{"id": 1, "tags": ["a"]}"#)?;
    /// assert_eq!(v.get("id"), Some(&Value::from(1)));
    /// # Ok::<(), serde_json::Error>(())
    /// ```
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(x)) => Self::Float(x),
                (None, None) => Self::Null,
            },
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}
