//! Server-advertised operations (links) and their parameter contracts
use crate::{document::Document, Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Well-known link names
pub mod names {
    /// Fetch the current state of a resource
    pub const GET: &str = "GET";
    /// Canonical url of a resource, used for refreshes when `GET` is not advertised
    pub const SELF: &str = "SELF";
    /// Replace a resource
    pub const UPDATE: &str = "UPDATE";
    /// Delete a resource
    pub const DELETE: &str = "DELETE";
}

/// Type of a [`LinkParameter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Free text
    String,
    /// One of the declared valid options
    Enumerated,
    /// `true` or `false`
    Boolean,
    /// A whole number
    Integer,
}

impl ParameterType {
    fn from_wire(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => ParameterType::Boolean,
            "enum" | "enumerated" | "enumeration" => ParameterType::Enumerated,
            "integer" | "int" | "number" => ParameterType::Integer,
            _ => ParameterType::String,
        }
    }
}

/// One parameter a [`Link`] accepts
#[derive(Debug, Clone, PartialEq)]
pub struct LinkParameter {
    name: String,
    kind: ParameterType,
    default: Option<Value>,
    valid_options: Vec<String>,
    invalid_options: Vec<String>,
    description: Option<String>,
}

impl LinkParameter {
    /// A parameter with no default and no option constraints
    pub fn new(name: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
            valid_options: vec![],
            invalid_options: vec![],
            description: None,
        }
    }

    /// Restrict accepted values
    #[must_use]
    pub fn with_valid_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Reject specific values
    #[must_use]
    pub fn with_invalid_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.invalid_options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default the server applies when the parameter is omitted
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn kind(&self) -> ParameterType {
        self.kind
    }

    /// Default applied by the server
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Accepted values, empty when unconstrained
    pub fn valid_options(&self) -> &[String] {
        &self.valid_options
    }

    /// Human readable description
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Check a supplied value against the declared type and options
    ///
    /// Returns the reason for rejection.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        let text = match (self.kind, value) {
            (ParameterType::Boolean, Value::Bool(_)) => return Ok(()),
            (ParameterType::Boolean, Value::String(s)) if s == "true" || s == "false" => return Ok(()),
            (ParameterType::Boolean, other) => return Err(format!("expected a boolean, got {other}")),
            (ParameterType::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
            (ParameterType::Integer, Value::String(s)) if s.parse::<i64>().is_ok() => s.clone(),
            (ParameterType::Integer, other) => return Err(format!("expected an integer, got {other}")),
            (_, Value::String(s)) => s.clone(),
            (_, Value::Number(n)) => n.to_string(),
            (_, other) => return Err(format!("expected a scalar, got {other}")),
        };
        if self.kind == ParameterType::String && text.is_empty() {
            return Err("must not be empty".into());
        }
        if !self.valid_options.is_empty() && !self.valid_options.contains(&text) {
            return Err(format!(
                "{text:?} is not one of [{}]",
                self.valid_options.join(", ")
            ));
        }
        if self.invalid_options.contains(&text) {
            return Err(format!("{text:?} is not allowed"));
        }
        Ok(())
    }
}

/// A named operation the server advertised for a resource
///
/// Immutable once parsed; refreshing a resource replaces its links wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    name: String,
    href: String,
    method: http::Method,
    rel: Option<String>,
    required: Vec<LinkParameter>,
    optional: Vec<LinkParameter>,
}

impl Link {
    /// A link without parameters
    pub fn new(name: impl Into<String>, href: impl Into<String>, method: http::Method) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            method,
            rel: None,
            required: vec![],
            optional: vec![],
        }
    }

    /// Declare a required parameter
    #[must_use]
    pub fn with_required(mut self, param: LinkParameter) -> Self {
        self.required.push(param);
        self
    }

    /// Declare an optional parameter
    #[must_use]
    pub fn with_optional(mut self, param: LinkParameter) -> Self {
        self.optional.push(param);
        self
    }

    /// Link name as advertised
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Url template, possibly containing `:variable` tokens
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Http method used to invoke the link
    pub fn method(&self) -> &http::Method {
        &self.method
    }

    /// Human readable relation
    pub fn rel(&self) -> Option<&str> {
        self.rel.as_deref()
    }

    /// Parameters that must be bound
    pub fn required_parameters(&self) -> &[LinkParameter] {
        &self.required
    }

    /// Parameters that may be bound
    pub fn optional_parameters(&self) -> &[LinkParameter] {
        &self.optional
    }

    /// Find a declared parameter by name
    pub fn parameter(&self, name: &str) -> Option<&LinkParameter> {
        self.required
            .iter()
            .chain(self.optional.iter())
            .find(|p| p.name == name)
    }

    fn from_wire(name: &str, raw: RawLink) -> Result<Self, String> {
        let method = http::Method::from_bytes(raw.method.to_ascii_uppercase().as_bytes())
            .map_err(|e| format!("bad method {:?}: {e}", raw.method))?;
        let mut required: Vec<LinkParameter> = vec![];
        let mut optional: Vec<LinkParameter> = vec![];
        for param in raw.parameters {
            if param.required {
                required.push(param.into());
            } else {
                optional.push(param.into());
            }
        }
        required.extend(raw.required_params.into_iter().map(LinkParameter::from));
        optional.extend(raw.optional_params.into_iter().map(LinkParameter::from));
        Ok(Self {
            name: name.to_string(),
            href: raw.href,
            method,
            rel: raw.rel,
            required,
            optional,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLink {
    href: String,
    #[serde(default = "default_method")]
    method: String,
    #[serde(default)]
    rel: Option<String>,
    #[serde(default)]
    parameters: Vec<RawParameter>,
    #[serde(default, rename = "required_params")]
    required_params: Vec<RawParameter>,
    #[serde(default, rename = "optional_params")]
    optional_params: Vec<RawParameter>,
}

fn default_method() -> String {
    "GET".into()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParameter {
    name: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default, alias = "default_value")]
    default: Option<Value>,
    #[serde(default, alias = "valid_options")]
    valid_options: Option<Vec<Value>>,
    #[serde(default, alias = "invalid_options")]
    invalid_options: Option<Vec<Value>>,
    #[serde(default)]
    description: Option<String>,
}

fn option_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl From<RawParameter> for LinkParameter {
    fn from(raw: RawParameter) -> Self {
        Self {
            name: raw.name,
            kind: raw
                .kind
                .as_deref()
                .map(ParameterType::from_wire)
                .unwrap_or(ParameterType::String),
            default: raw.default.filter(|v| !v.is_null()),
            valid_options: raw.valid_options.unwrap_or_default().into_iter().map(option_text).collect(),
            invalid_options: raw
                .invalid_options
                .unwrap_or_default()
                .into_iter()
                .map(option_text)
                .collect(),
            description: raw.description,
        }
    }
}

/// The links advertised by one resource, keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkDirectory {
    links: BTreeMap<String, Link>,
}

impl LinkDirectory {
    /// Parse the operations block found at `node`
    ///
    /// Entries that cannot be understood are skipped with a warning.
    pub fn from_value(node: Option<&Value>) -> Self {
        let mut links = BTreeMap::new();
        let Some(entries) = node.and_then(Value::as_object) else {
            return Self { links };
        };
        for (name, entry) in entries {
            let parsed = serde_json::from_value::<RawLink>(entry.clone())
                .map_err(|e| e.to_string())
                .and_then(|raw| Link::from_wire(name, raw));
            match parsed {
                Ok(link) => {
                    links.insert(name.clone(), link);
                }
                Err(e) => tracing::warn!("skipping malformed link {name}: {e}"),
            }
        }
        Self { links }
    }

    /// Parse the operations block of a document found at `path`
    pub fn from_document(doc: &Document, path: Option<&crate::document::PropertyPath>) -> Self {
        Self::from_value(path.and_then(|p| doc.get(p)))
    }

    /// Look up a link by name
    pub fn get(&self, name: &str) -> Option<&Link> {
        self.links.get(name)
    }

    /// Look up a link that must exist
    pub fn require(&self, name: &str) -> Result<&Link> {
        self.get(name).ok_or_else(|| Error::LinkNotFound(name.to_string()))
    }

    /// Whether a link is advertised
    pub fn contains(&self, name: &str) -> bool {
        self.links.contains_key(name)
    }

    /// Names of all advertised links, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    /// Iterate over all advertised links
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Number of advertised links
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether nothing is advertised
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl FromIterator<Link> for LinkDirectory {
    fn from_iter<T: IntoIterator<Item = Link>>(iter: T) -> Self {
        Self {
            links: iter.into_iter().map(|l| (l.name.clone(), l)).collect(),
        }
    }
}
