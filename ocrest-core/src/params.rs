//! Caller-supplied values bound to link parameters
use serde_json::{Map, Value};

/// Named values bound to a link's parameters, in insertion order
///
/// ```
/// use ocrest_core::params::Parameters;
/// let params = Parameters::new().with("replicas", 3).with("force", true);
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    /// No bound values
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value, replacing any earlier binding of the same name
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Bind a value in place
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    /// The value bound to `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Unbind `name`
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    /// Bindings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overlay `other` on top of these bindings
    #[must_use]
    pub fn merged(mut self, other: &Parameters) -> Self {
        for (name, value) in other.iter() {
            self.0.insert(name.clone(), value.clone());
        }
        self
    }

    /// Consume into a JSON object
    pub fn into_json(self) -> Value {
        Value::Object(self.0)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The text form of a bound value, as used in urls
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{value_text, Parameters};
    use serde_json::json;

    #[test]
    fn later_bindings_win() {
        let base = Parameters::new().with("name", "db").with("replicas", 1);
        let merged = base.merged(&Parameters::new().with("replicas", 4));
        assert_eq!(merged.get("replicas"), Some(&json!(4)));
        assert_eq!(merged.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(), ["name", "replicas"]);
    }

    #[test]
    fn values_render_without_quotes() {
        assert_eq!(value_text(&json!("db")), "db");
        assert_eq!(value_text(&json!(5)), "5");
        assert_eq!(value_text(&json!(true)), "true");
    }
}
