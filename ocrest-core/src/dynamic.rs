//! Contains the wrapper used for resource kinds without a dedicated wrapper.
use crate::{
    document::{Document, PropertyPath},
    metadata::TypeMeta,
    registry::PropertyRegistry,
    resource::{Resource, ResourceCore},
};
use serde_json::Value;

/// A resource of any kind
///
/// Exposes the identity accessors of [`ResourceExt`](crate::ResourceExt) and raw
/// path access. Unknown kinds are first class: the factory never fails to
/// produce one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericResource {
    core: ResourceCore,
}

impl GenericResource {
    /// Wrap a document as whatever kind it declares
    pub fn new(doc: Document) -> Self {
        Self::from_core(ResourceCore::new(doc, PropertyRegistry::global()))
    }

    /// Create an empty resource of `kind`
    #[must_use]
    pub fn of(types: TypeMeta) -> Self {
        let mut doc = Document::new();
        doc.set(&PropertyPath::new(["apiVersion"]), types.api_version.as_str());
        doc.set(&PropertyPath::new(["kind"]), types.kind.as_str());
        Self::from_core(ResourceCore::with_types(doc, types, PropertyRegistry::global()))
    }

    /// Wrap an already bound core
    pub fn from_core(core: ResourceCore) -> Self {
        Self { core }
    }

    /// Unwrap into the core
    pub fn into_core(self) -> ResourceCore {
        self.core
    }

    /// Raw access to any node of the document
    pub fn data(&self, path: &PropertyPath) -> Option<&Value> {
        self.core.document().get(path)
    }

    /// Raw write to any node of the document
    pub fn set_data(&mut self, path: &PropertyPath, value: impl Into<Value>) {
        self.core.document_mut().set(path, value);
    }
}

impl Resource for GenericResource {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}
