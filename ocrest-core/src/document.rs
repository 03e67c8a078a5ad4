//! Path-addressed, mutable JSON documents.
//!
//! A [`Document`] is the canonical in-memory form of every payload sent to or received
//! from the platform. Values inside it are located with a [`PropertyPath`], an ordered
//! list of map keys and list positions.
//!
//! Reads never fail: a missing node is reported as `None`.
//! Writes never fail either: intermediate nodes are created as needed.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt, str::FromStr};
use thiserror::Error;

/// A single step into a [`Document`]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::From)]
#[serde(untagged)]
pub enum Segment {
    /// Position inside a list
    Index(usize),
    /// Key inside a map
    Key(String),
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Index(i) => write!(f, "[{i}]"),
            Segment::Key(key) => f.write_str(key),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("failed to parse property path: {0}")]
/// Failed to parse a dotted property path
pub struct ParsePathError(pub String);

/// An ordered sequence of [`Segment`]s locating a value inside a [`Document`]
///
/// Paths carry no behavior of their own; they are plain data so that the
/// property table can be loaded from a file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyPath(Vec<Segment>);

impl PropertyPath {
    /// Construct a path from its segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Segment>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The segments making up this path
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Whether this path addresses the document root
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A new path one segment deeper than this one
    #[must_use]
    pub fn join(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 && matches!(segment, Segment::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Parses the `spec.ports[0].port` notation
///
/// Keys containing dots cannot be expressed in this notation; build such paths with
/// [`PropertyPath::new`] instead.
impl FromStr for PropertyPath {
    type Err = ParsePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = vec![];
        if s.is_empty() {
            return Ok(Self(segments));
        }
        for part in s.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(pos) => (&part[..pos], &part[pos..]),
                None => (part, ""),
            };
            if key.is_empty() && (segments.is_empty() || rest.is_empty()) {
                return Err(ParsePathError(s.into()));
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| ParsePathError(s.into()))?;
                let index = rest[1..close]
                    .parse::<usize>()
                    .map_err(|_| ParsePathError(s.into()))?;
                segments.push(Segment::Index(index));
                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(ParsePathError(s.into()));
                }
            }
        }
        Ok(Self(segments))
    }
}

/// A mutable JSON-shaped tree addressed by [`PropertyPath`]s
///
/// Key order is preserved, so a document parsed from the wire serializes back
/// in the order it was received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty map document
    pub fn new() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Parse a document from its wire representation
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text).map(Self)
    }

    /// Parse a document from raw response bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes).map(Self)
    }

    /// The root node
    pub fn root(&self) -> &Value {
        &self.0
    }

    /// Unwrap into the root node
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Serialize to the wire representation
    pub fn to_wire_string(&self) -> String {
        self.0.to_string()
    }

    /// Look up the node at `path`, `None` when any part of it is missing
    pub fn get(&self, path: &PropertyPath) -> Option<&Value> {
        lookup(&self.0, path.segments())
    }

    /// Mutable access to the node at `path`, `None` when any part of it is missing
    pub fn get_mut(&mut self, path: &PropertyPath) -> Option<&mut Value> {
        lookup_mut(&mut self.0, path.segments())
    }

    /// Whether a node exists at `path`
    pub fn has(&self, path: &PropertyPath) -> bool {
        self.get(path).is_some()
    }

    /// The string at `path`
    pub fn get_str(&self, path: &PropertyPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// The integer at `path`, also accepting integers encoded as strings
    pub fn get_i64(&self, path: &PropertyPath) -> Option<i64> {
        match self.get(path)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// The boolean at `path`
    pub fn get_bool(&self, path: &PropertyPath) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// The list at `path`, empty when absent or not a list
    pub fn as_list(&self, path: &PropertyPath) -> &[Value] {
        self.get(path)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The string entries of the map at `path`, empty when absent
    ///
    /// Non-string entries are skipped.
    pub fn string_map(&self, path: &PropertyPath) -> BTreeMap<String, String> {
        self.get(path)
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| Some((k.clone(), v.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Store `value` at `path`, creating every missing node on the way
    ///
    /// A key segment turns its parent into a map and an index segment turns its parent
    /// into a list padded with `null` up to that index. An index more than 1024 past the
    /// end appends instead. Scalars standing in the way are replaced.
    pub fn set(&mut self, path: &PropertyPath, value: impl Into<Value>) {
        let value = value.into();
        let Some((last, parents)) = path.segments().split_last() else {
            self.0 = value;
            return;
        };
        let mut node = &mut self.0;
        for segment in parents {
            node = child_or_insert(node, segment);
        }
        *child_or_insert(node, last) = value;
    }

    /// Remove and return the node at `path`
    pub fn remove(&mut self, path: &PropertyPath) -> Option<Value> {
        let (last, parents) = path.segments().split_last()?;
        let parent = lookup_mut(&mut self.0, parents)?;
        match last {
            Segment::Key(key) => parent.as_object_mut()?.shift_remove(key),
            Segment::Index(i) => {
                let list = parent.as_array_mut()?;
                (*i < list.len()).then(|| list.remove(*i))
            }
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        doc.0
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn lookup<'a>(root: &'a Value, segments: &[Segment]) -> Option<&'a Value> {
    segments.iter().try_fold(root, |node, segment| match segment {
        Segment::Key(key) => node.as_object()?.get(key),
        Segment::Index(i) => node.as_array()?.get(*i),
    })
}

fn lookup_mut<'a>(root: &'a mut Value, segments: &[Segment]) -> Option<&'a mut Value> {
    let mut node = root;
    for segment in segments {
        node = match segment {
            Segment::Key(key) => node.as_object_mut()?.get_mut(key)?,
            Segment::Index(i) => node.as_array_mut()?.get_mut(*i)?,
        };
    }
    Some(node)
}

/// How many `null`s a write through an index segment may pad a list with
const MAX_INDEX_GAP: usize = 1024;

fn child_or_insert<'a>(node: &'a mut Value, segment: &Segment) -> &'a mut Value {
    match segment {
        Segment::Key(key) => ensure_object(node).entry(key.clone()).or_insert(Value::Null),
        Segment::Index(i) => {
            let list = ensure_array(node);
            let len = list.len();
            if *i < len {
                return &mut list[*i];
            }
            if *i - len <= MAX_INDEX_GAP {
                list.resize(*i + 1, Value::Null);
            } else {
                tracing::warn!("index {i} is far past the end of a list of {len}, appending instead");
                list.push(Value::Null);
            }
            let last = list.len() - 1;
            &mut list[last]
        }
    }
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    match node {
        Value::Object(map) => map,
        other => {
            *other = Value::Object(Map::new());
            ensure_object(other)
        }
    }
}

fn ensure_array(node: &mut Value) -> &mut Vec<Value> {
    match node {
        Value::Array(list) => list,
        other => {
            *other = Value::Array(vec![]);
            ensure_array(other)
        }
    }
}
