//! Building typed wrappers from documents
//!
//! The kind string of a document selects a constructor from a fixed table.
//! Kinds missing from the table become a [`GenericResource`], so every document
//! produces something usable.
use crate::{
    document::Document,
    dynamic::GenericResource,
    kinds::{Build, DeploymentConfig, PersistentVolume, Pod, Project, Route, Secret, Service, User},
    list::ResourceList,
    metadata::TypeMeta,
    registry::{props, PropertyRegistry},
    resource::{KindResource, Resource, ResourceCore},
    Error, Result,
};
use std::{collections::HashMap, sync::LazyLock};

type Constructor = fn(ResourceCore) -> TypedResource;

macro_rules! typed_resource {
    ($($kind:ident),* $(,)?) => {
        /// A wrapper selected by the kind of its document
        #[derive(Debug, Clone, PartialEq)]
        pub enum TypedResource {
            $(
                #[doc = concat!("A [`", stringify!($kind), "`]")]
                $kind($kind),
            )*
            /// Any kind without a dedicated wrapper
            Generic(GenericResource),
        }

        impl TypedResource {
            /// Unwrap into the core
            pub fn into_core(self) -> ResourceCore {
                match self {
                    $(TypedResource::$kind(r) => r.into_core(),)*
                    TypedResource::Generic(r) => r.into_core(),
                }
            }

            /// Whether no dedicated wrapper exists for the kind
            pub fn is_generic(&self) -> bool {
                matches!(self, TypedResource::Generic(_))
            }
        }

        impl Resource for TypedResource {
            fn core(&self) -> &ResourceCore {
                match self {
                    $(TypedResource::$kind(r) => r.core(),)*
                    TypedResource::Generic(r) => r.core(),
                }
            }

            fn core_mut(&mut self) -> &mut ResourceCore {
                match self {
                    $(TypedResource::$kind(r) => r.core_mut(),)*
                    TypedResource::Generic(r) => r.core_mut(),
                }
            }
        }

        $(
            impl From<$kind> for TypedResource {
                fn from(r: $kind) -> Self {
                    TypedResource::$kind(r)
                }
            }

            impl TryFrom<TypedResource> for $kind {
                type Error = Error;

                fn try_from(r: TypedResource) -> Result<Self> {
                    match r {
                        TypedResource::$kind(r) => Ok(r),
                        other => Err(Error::KindMismatch {
                            expected: <$kind>::KIND.to_string(),
                            actual: other.core().kind().to_string(),
                        }),
                    }
                }
            }
        )*

        static CONSTRUCTORS: LazyLock<HashMap<&'static str, Constructor>> = LazyLock::new(|| {
            let mut table: HashMap<&'static str, Constructor> = HashMap::new();
            $(table.insert(<$kind>::KIND, |core| TypedResource::$kind(<$kind>::from_core(core)));)*
            table
        });
    };
}

typed_resource!(Build, DeploymentConfig, PersistentVolume, Pod, Project, Route, Secret, Service, User);

impl From<GenericResource> for TypedResource {
    fn from(r: GenericResource) -> Self {
        TypedResource::Generic(r)
    }
}

/// Kinds with a dedicated wrapper, sorted
pub fn known_kinds() -> Vec<&'static str> {
    let mut kinds: Vec<_> = CONSTRUCTORS.keys().copied().collect();
    kinds.sort_unstable();
    kinds
}

/// Builds wrappers from documents, for reading responses and stubbing new resources
#[derive(Debug, Clone)]
pub struct ResourceFactory {
    registry: &'static PropertyRegistry,
    default_api_version: String,
}

impl Default for ResourceFactory {
    fn default() -> Self {
        Self {
            registry: PropertyRegistry::global(),
            default_api_version: "v1".into(),
        }
    }
}

impl ResourceFactory {
    /// A factory using the bundled property table and api version `v1`
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve properties through another registry
    #[must_use]
    pub fn with_registry(mut self, registry: &'static PropertyRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Api version used for stubs and for documents that do not declare one
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.default_api_version = api_version.into();
        self
    }

    /// The api version used for stubs
    pub fn api_version(&self) -> &str {
        &self.default_api_version
    }

    /// The registry wrappers are bound to
    pub fn registry(&self) -> &'static PropertyRegistry {
        self.registry
    }

    /// Wrap a document in the wrapper for its kind
    ///
    /// Never fails: unknown or missing kinds produce [`TypedResource::Generic`].
    pub fn create(&self, doc: Document) -> TypedResource {
        let mut types = TypeMeta::of(&doc);
        if types.api_version.is_empty() {
            types.api_version.clone_from(&self.default_api_version);
        }
        self.wrap(ResourceCore::with_types(doc, types, self.registry))
    }

    /// Wrap an already bound core in the wrapper for its kind
    pub fn wrap(&self, core: ResourceCore) -> TypedResource {
        match CONSTRUCTORS.get(core.kind()) {
            Some(construct) => construct(core),
            None => {
                tracing::trace!("no wrapper for kind {:?}, using a generic one", core.kind());
                TypedResource::Generic(GenericResource::from_core(core))
            }
        }
    }

    /// Parse the wire representation of a document and wrap it
    pub fn parse(&self, text: &str) -> Result<TypedResource> {
        let doc = Document::parse(text).map_err(Error::SerdeError)?;
        Ok(self.create(doc))
    }

    /// Wrap a document that must be of kind `K`
    pub fn create_as<K: KindResource>(&self, doc: Document) -> Result<K> {
        let core = self.create(doc).into_core();
        K::try_from_core(core)
    }

    /// Wrap a list document
    ///
    /// A document that is not list shaped is handed back untouched.
    pub fn list(&self, doc: Document) -> Result<ResourceList, Document> {
        ResourceList::from_document(doc, self)
    }

    /// An empty resource ready to be sent in a creation request
    ///
    /// The document is seeded with kind, api version, name and namespace.
    pub fn stub(&self, kind: &str, name: &str, namespace: Option<&str>) -> Result<TypedResource> {
        let types = TypeMeta::new(self.default_api_version.as_str(), kind);
        let mut core = ResourceCore::with_types(Document::new(), types, self.registry);
        core.set(props::API_VERSION, self.default_api_version.as_str())?;
        core.set(props::KIND, kind)?;
        core.set(props::NAME, name)?;
        if let Some(ns) = namespace {
            core.set(props::NAMESPACE, ns)?;
        }
        Ok(self.wrap(core))
    }

    /// Like [`stub`](Self::stub), for a kind with a dedicated wrapper
    pub fn stub_as<K: KindResource>(&self, name: &str, namespace: Option<&str>) -> Result<K> {
        K::try_from_core(self.stub(K::KIND, name, namespace)?.into_core())
    }
}
