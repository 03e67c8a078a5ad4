//! Lists of resources, as returned by collection endpoints
use crate::{
    document::Document,
    factory::{ResourceFactory, TypedResource},
    metadata::TypeMeta,
};
use serde_json::Value;

/// A list body with each item wrapped by the factory
///
/// Recognizes `*List` kinds, kind-less bodies carrying an `items` array, and bare
/// arrays. Items that do not declare their own kind inherit the item kind of the
/// list; items without an api version inherit the list's.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceList {
    types: TypeMeta,
    resource_version: Option<String>,
    items: Vec<TypedResource>,
}

impl ResourceList {
    /// Wrap a list shaped document
    ///
    /// Anything else is handed back untouched, so the caller can wrap it as a
    /// single resource without another copy.
    pub fn from_document(doc: Document, factory: &ResourceFactory) -> Result<Self, Document> {
        let types = TypeMeta::of(&doc);
        let root = doc.root();
        let has_items = root.get("items").is_some_and(Value::is_array);
        let listy = root.is_array() || (root.is_object() && (types.is_list() || (types.kind.is_empty() && has_items)));
        if !listy {
            return Err(doc);
        }
        let (resource_version, raw_items) = match doc.into_value() {
            Value::Array(items) => (None, items),
            Value::Object(mut map) => {
                let version = map
                    .get("metadata")
                    .and_then(|m| m.get("resourceVersion"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                match map.shift_remove("items") {
                    Some(Value::Array(items)) => (version, items),
                    _ => (version, vec![]),
                }
            }
            other => return Err(Document::from(other)),
        };

        let mut items = Vec::with_capacity(raw_items.len());
        for item in raw_items {
            let Value::Object(mut fields) = item else {
                tracing::warn!("skipping non-object item in {} list", types.kind);
                continue;
            };
            if let Some(kind) = types.item_kind() {
                fields.entry("kind").or_insert_with(|| kind.into());
            }
            if !types.api_version.is_empty() {
                fields.entry("apiVersion").or_insert_with(|| types.api_version.clone().into());
            }
            items.push(factory.create(Document::from(Value::Object(fields))));
        }
        Ok(Self {
            types,
            resource_version,
            items,
        })
    }

    /// Kind and api version of the list itself
    pub fn types(&self) -> &TypeMeta {
        &self.types
    }

    /// Kind of the items, derived from a typed list kind
    pub fn item_kind(&self) -> Option<&str> {
        self.types.item_kind()
    }

    /// Resource version of the collection, when reported
    pub fn resource_version(&self) -> Option<&str> {
        self.resource_version.as_deref()
    }

    /// The wrapped items, in order
    pub fn items(&self) -> &[TypedResource] {
        &self.items
    }

    /// Iterate over the items
    pub fn iter(&self) -> std::slice::Iter<'_, TypedResource> {
        self.items.iter()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for ResourceList {
    type IntoIter = std::vec::IntoIter<TypedResource>;
    type Item = TypedResource;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResourceList {
    type IntoIter = std::slice::Iter<'a, TypedResource>;
    type Item = &'a TypedResource;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceList;
    use crate::{document::Document, factory::ResourceFactory, ResourceExt};
    use serde_json::json;

    #[test]
    fn typed_lists_wrap_items() {
        let doc = Document::from(json!({
            "kind": "ServiceList",
            "apiVersion": "v1beta3",
            "metadata": {"resourceVersion": "42"},
            "items": [
                {"metadata": {"name": "db"}, "spec": {"ports": [{"port": 5434}]}},
                {"kind": "Endpoints", "metadata": {"name": "db"}},
                "junk"
            ]
        }));
        let list = ResourceList::from_document(doc, &ResourceFactory::new()).unwrap();
        assert_eq!(list.item_kind(), Some("Service"));
        assert_eq!(list.resource_version(), Some("42"));
        assert_eq!(list.len(), 2);
        let crate::TypedResource::Service(svc) = &list.items()[0] else {
            panic!("expected a Service");
        };
        assert_eq!(svc.api_version(), "v1beta3");
        assert_eq!(svc.port().unwrap(), Some(5434));
        assert!(list.items()[1].is_generic());
        assert_eq!(list.items()[1].kind(), "Endpoints");
    }

    #[test]
    fn kindless_event_lists() {
        let doc = Document::from(json!({"items": [{"reason": "Scheduled", "metadata": {"name": "e1"}}]}));
        let list = ResourceFactory::new().list(doc).unwrap();
        assert_eq!(list.item_kind(), None);
        let names: Vec<_> = list.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["e1"]);

        let bare = ResourceFactory::new().list(Document::from(json!([{"kind": "Pod"}]))).unwrap();
        assert_eq!(bare.into_iter().next().unwrap().kind(), "Pod");
    }

    #[test]
    fn single_resources_are_not_lists() {
        let factory = ResourceFactory::new();
        let pod = Document::from(json!({"kind": "Pod", "items": []}));
        assert_eq!(factory.list(pod.clone()), Err(pod));
        assert!(factory.list(Document::from(json!("text"))).is_err());
    }

    #[test]
    fn plain_list_items_keep_their_kinds() {
        let doc = Document::from(json!({
            "kind": "List",
            "apiVersion": "v1",
            "metadata": {"resourceVersion": "7"},
            "items": [
                {"kind": "Service", "metadata": {"name": "db"}, "spec": {"port": 5434}},
                {"kind": "Route", "apiVersion": "v1", "metadata": {"name": "www"}}
            ]
        }));
        let list = ResourceFactory::new().list(doc).unwrap();
        assert_eq!(list.item_kind(), None);
        assert_eq!(list.resource_version(), Some("7"));
        let kinds: Vec<_> = list.iter().map(|r| r.kind().to_string()).collect();
        assert_eq!(kinds, ["Service", "Route"]);
        assert!(list.iter().all(|r| !r.is_generic()));
    }
}
