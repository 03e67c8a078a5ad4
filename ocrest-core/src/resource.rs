use crate::{
    document::{Document, PropertyPath},
    link::{Link, LinkDirectory},
    metadata::TypeMeta,
    registry::{props, PropertyRegistry},
    Error, Result,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// One document bound to the registry rows of its kind and api version
///
/// This is the engine every typed wrapper is composed from. It owns its
/// [`Document`] exclusively, and keeps the [`LinkDirectory`] that was advertised
/// when the document was received.
#[derive(Debug, Clone)]
pub struct ResourceCore {
    doc: Document,
    types: TypeMeta,
    links: LinkDirectory,
    registry: &'static PropertyRegistry,
}

impl PartialEq for ResourceCore {
    fn eq(&self, other: &Self) -> bool {
        self.types == other.types && self.doc == other.doc
    }
}

impl ResourceCore {
    /// Bind a document using its own `kind` and `apiVersion` fields
    pub fn new(doc: Document, registry: &'static PropertyRegistry) -> Self {
        let types = TypeMeta::of(&doc);
        Self::with_types(doc, types, registry)
    }

    /// Bind a document as `types`, regardless of what it says about itself
    pub fn with_types(doc: Document, types: TypeMeta, registry: &'static PropertyRegistry) -> Self {
        let links = LinkDirectory::from_document(
            &doc,
            registry.lookup(&types.api_version, &types.kind, props::LINKS),
        );
        Self {
            doc,
            types,
            links,
            registry,
        }
    }

    /// The kind this document was bound as
    pub fn kind(&self) -> &str {
        &self.types.kind
    }

    /// The api version this document was bound as
    pub fn api_version(&self) -> &str {
        &self.types.api_version
    }

    /// Type information of the document
    pub fn types(&self) -> &TypeMeta {
        &self.types
    }

    /// The underlying document
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Unwrap into the underlying document
    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Links advertised for this resource when it was received
    pub fn links(&self) -> &LinkDirectory {
        &self.links
    }

    /// The registry this resource resolves its properties through
    pub fn registry(&self) -> &'static PropertyRegistry {
        self.registry
    }

    /// Serialize the document to its wire representation
    pub fn to_wire_string(&self) -> String {
        self.doc.to_wire_string()
    }

    /// Resolve a property that must be registered for this kind
    pub fn path(&self, property: &str) -> Result<&'static PropertyPath> {
        self.registry.resolve(self.api_version(), self.kind(), property)
    }

    /// Resolve a property that may not exist at this api version
    pub fn optional_path(&self, property: &str) -> Option<&'static PropertyPath> {
        self.registry.lookup(self.api_version(), self.kind(), property)
    }

    /// The node behind a registered property
    pub fn get(&self, property: &str) -> Result<Option<&Value>> {
        Ok(self.doc.get(self.path(property)?))
    }

    /// The node behind an optional property
    pub fn get_optional(&self, property: &str) -> Option<&Value> {
        self.optional_path(property).and_then(|p| self.doc.get(p))
    }

    /// Write a registered property, creating intermediate nodes
    pub fn set(&mut self, property: &str, value: impl Into<Value>) -> Result<()> {
        let path = self.path(property)?;
        self.doc.set(path, value);
        Ok(())
    }

    /// Remove a registered property
    pub fn remove(&mut self, property: &str) -> Result<Option<Value>> {
        let path = self.path(property)?;
        Ok(self.doc.remove(path))
    }

    /// A registered string property
    pub fn string(&self, property: &str) -> Result<Option<String>> {
        Ok(self.doc.get_str(self.path(property)?).map(str::to_string))
    }

    /// An optional string property
    pub fn optional_string(&self, property: &str) -> Option<String> {
        self.get_optional(property).and_then(Value::as_str).map(str::to_string)
    }

    /// A registered integer property, accepting numeric strings
    pub fn int(&self, property: &str) -> Result<Option<i64>> {
        Ok(self.doc.get_i64(self.path(property)?))
    }

    /// A registered list of strings; non-string items are skipped
    pub fn strings(&self, property: &str) -> Result<Vec<String>> {
        let list = self.doc.as_list(self.path(property)?);
        Ok(list.iter().filter_map(Value::as_str).map(str::to_string).collect())
    }

    /// A registered string map
    pub fn string_map(&self, property: &str) -> Result<BTreeMap<String, String>> {
        Ok(self.doc.string_map(self.path(property)?))
    }

    /// Mutable access to the document
    ///
    /// Writing through here bypasses the registry; prefer typed setters.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }
}

/// Access to the [`ResourceCore`] behind a wrapper
///
/// Implemented by every wrapper; the helpers on [`ResourceExt`] build on it.
pub trait Resource {
    /// The bound document
    fn core(&self) -> &ResourceCore;
    /// The bound document, mutably
    fn core_mut(&mut self) -> &mut ResourceCore;
}

/// A wrapper dedicated to one kind
pub trait KindResource: Resource + Sized {
    /// The kind this wrapper is dedicated to
    const KIND: &'static str;

    /// Wrap a core without checking its kind
    fn from_core(core: ResourceCore) -> Self;

    /// Unwrap into the core
    fn into_core(self) -> ResourceCore;

    /// Wrap a core of this kind
    fn try_from_core(core: ResourceCore) -> Result<Self> {
        if core.kind() != Self::KIND {
            return Err(Error::KindMismatch {
                expected: Self::KIND.to_string(),
                actual: core.kind().to_string(),
            });
        }
        Ok(Self::from_core(core))
    }
}

impl Resource for ResourceCore {
    fn core(&self) -> &ResourceCore {
        self
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        self
    }
}

/// Identity accessors shared by every resource
///
/// Getters never fail: a property missing from the document, or from the
/// registry, reads as absent. Setters fail with [`Error::UnknownProperty`] when
/// the registry has no place for the value.
pub trait ResourceExt: Resource {
    /// The kind of the resource
    fn kind(&self) -> &str {
        self.core().kind()
    }

    /// The api version of the resource
    fn api_version(&self) -> &str {
        self.core().api_version()
    }

    /// The name of the resource, empty when unset
    fn name(&self) -> String {
        self.core().optional_string(props::NAME).unwrap_or_default()
    }

    /// Set the name of the resource
    fn set_name(&mut self, name: &str) -> Result<()> {
        self.core_mut().set(props::NAME, name)
    }

    /// The namespace the resource is in
    fn namespace(&self) -> Option<String> {
        self.core().optional_string(props::NAMESPACE)
    }

    /// Move the resource to another namespace
    fn set_namespace(&mut self, namespace: &str) -> Result<()> {
        self.core_mut().set(props::NAMESPACE, namespace)
    }

    /// Unique ID assigned by the platform
    fn uid(&self) -> Option<String> {
        self.core().optional_string(props::UID)
    }

    /// The resource version
    fn resource_version(&self) -> Option<String> {
        self.core().optional_string(props::RESOURCE_VERSION)
    }

    /// The canonical url of the resource
    fn self_link(&self) -> Option<String> {
        self.core().optional_string(props::SELF_LINK)
    }

    /// When the platform created the resource
    ///
    /// Unparsable timestamps read as absent.
    fn creation_timestamp(&self) -> Option<jiff::Timestamp> {
        let raw = self.core().optional_string(props::CREATION_TIMESTAMP)?;
        match raw.parse() {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::debug!("ignoring creation timestamp {raw:?}: {e}");
                None
            }
        }
    }

    /// Returns resource labels
    fn labels(&self) -> BTreeMap<String, String> {
        string_map(self.core(), props::LABELS)
    }

    /// Set one label
    fn set_label(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.core().path(props::LABELS)?.join(key);
        self.core_mut().document_mut().set(&path, value);
        Ok(())
    }

    /// Returns resource annotations
    fn annotations(&self) -> BTreeMap<String, String> {
        string_map(self.core(), props::ANNOTATIONS)
    }

    /// Set one annotation
    fn set_annotation(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.core().path(props::ANNOTATIONS)?.join(key);
        self.core_mut().document_mut().set(&path, value);
        Ok(())
    }

    /// Links advertised for the resource
    fn links(&self) -> &LinkDirectory {
        self.core().links()
    }

    /// A link that must be advertised
    fn link(&self, name: &str) -> Result<&Link> {
        self.core().links().require(name)
    }

    /// Serialize to the wire representation
    fn to_wire_string(&self) -> String {
        self.core().to_wire_string()
    }
}

impl<R: Resource + ?Sized> ResourceExt for R {}

fn string_map(core: &ResourceCore, property: &str) -> BTreeMap<String, String> {
    core.optional_path(property)
        .map(|p| core.document().string_map(p))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{KindResource, Resource, ResourceCore, ResourceExt};
    use crate::{
        document::Document,
        registry::{props, PropertyRegistry},
        Error,
    };
    use serde_json::json;

    fn core(value: serde_json::Value) -> ResourceCore {
        ResourceCore::new(Document::from(value), PropertyRegistry::global())
    }

    #[test]
    fn identity_through_registry() {
        let r = core(json!({
            "kind": "Pod",
            "apiVersion": "v1",
            "metadata": {
                "name": "web-1",
                "namespace": "demo",
                "uid": "0a5e",
                "creationTimestamp": "2015-03-02T17:26:03Z",
                "labels": {"app": "web"}
            }
        }));
        assert_eq!(r.kind(), "Pod");
        assert_eq!(r.name(), "web-1");
        assert_eq!(r.namespace().as_deref(), Some("demo"));
        assert_eq!(r.uid().as_deref(), Some("0a5e"));
        assert_eq!(r.labels()["app"], "web");
        assert!(r.annotations().is_empty());
        let ts = r.creation_timestamp().unwrap();
        assert_eq!(ts.as_second(), 1425317163);
    }

    #[test]
    fn legacy_identity_shape() {
        let mut r = core(json!({"kind": "Pod", "apiVersion": "v1beta1", "id": "web-1", "namespace": "demo"}));
        assert_eq!(r.name(), "web-1");
        r.set_label("tier", "front").unwrap();
        r.set_name("web-2").unwrap();
        assert_eq!(r.document().root()["labels"], json!({"tier": "front"}));
        assert_eq!(r.document().root()["id"], "web-2");
    }

    #[test]
    fn getters_tolerate_missing_fields() {
        let r = core(json!({"kind": "TotallyMadeUp", "apiVersion": "v1"}));
        assert_eq!(r.name(), "");
        assert_eq!(r.namespace(), None);
        assert_eq!(r.creation_timestamp(), None);
        assert!(r.links().is_empty());
        assert!(matches!(r.link("GET"), Err(Error::LinkNotFound(_))));
    }

    #[test]
    fn required_properties_fail_when_unregistered() {
        let mut r = core(json!({"kind": "TotallyMadeUp", "apiVersion": "v1"}));
        assert!(matches!(r.int(props::REPLICAS), Err(Error::UnknownProperty { .. })));
        assert!(r.set(props::REPLICAS, 3).is_err());
        assert_eq!(r.get_optional(props::REPLICAS), None);
    }

    #[test]
    fn links_are_read_on_construction() {
        let r = core(json!({
            "kind": "Service",
            "apiVersion": "v1",
            "links": {"GET": {"href": "/api/v1/namespaces/demo/services/db", "method": "GET"}}
        }));
        assert_eq!(r.link("GET").unwrap().href(), "/api/v1/namespaces/demo/services/db");
    }

    struct Marker(ResourceCore);

    impl Resource for Marker {
        fn core(&self) -> &ResourceCore {
            &self.0
        }

        fn core_mut(&mut self) -> &mut ResourceCore {
            &mut self.0
        }
    }

    impl KindResource for Marker {
        const KIND: &'static str = "Marker";

        fn from_core(core: ResourceCore) -> Self {
            Self(core)
        }

        fn into_core(self) -> ResourceCore {
            self.0
        }
    }

    #[test]
    fn kind_checked_wrapping() {
        assert!(Marker::try_from_core(core(json!({"kind": "Marker"}))).is_ok());
        let err = Marker::try_from_core(core(json!({"kind": "Pod"}))).err().unwrap();
        assert!(matches!(err, Error::KindMismatch { ref actual, .. } if actual == "Pod"));
    }
}
