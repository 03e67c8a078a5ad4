//! Type information carried at the top of every document
use crate::document::Document;
use serde::{Deserialize, Serialize};

/// Type information that is flattened into every platform document
#[derive(Deserialize, Serialize, Clone, Default, Debug, Eq, PartialEq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    /// The version of the API
    #[serde(default)]
    pub api_version: String,

    /// The name of the API
    #[serde(default)]
    pub kind: String,
}

impl TypeMeta {
    /// Type information of `kind` at `api_version`
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Read the `kind` and `apiVersion` fields of a document
    ///
    /// Missing or non-string fields read as empty.
    pub fn of(doc: &Document) -> Self {
        let field = |name: &str| {
            doc.root()
                .get(name)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        Self {
            api_version: field("apiVersion"),
            kind: field("kind"),
        }
    }

    /// Whether the kind names a list of resources
    ///
    /// This includes the plain `List` kind, whose items carry their own kinds.
    pub fn is_list(&self) -> bool {
        self.kind.ends_with("List")
    }

    /// The kind of the items of a typed list kind such as `PodList`
    pub fn item_kind(&self) -> Option<&str> {
        self.kind.strip_suffix("List").filter(|kind| !kind.is_empty())
    }
}
