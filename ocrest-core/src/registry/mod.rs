//! The property registry: logical property names resolved to [`PropertyPath`]s
//!
//! Every accessor on a resource wrapper names a logical property (see [`props`]).
//! The registry maps `(api version, kind, property)` to the place where that
//! property lives in a document of that version and kind. Supporting a new api
//! version of the platform means adding rows to `properties.yaml`, nothing more.
//!
//! Lookup falls back in this order:
//! 1. the exact api version and kind
//! 2. any version ([`ANY`]) for the kind
//! 3. the exact api version for any kind
//! 4. any version for any kind
use crate::{document::PropertyPath, Error, Result};
use std::{collections::HashMap, sync::LazyLock};

/// Sentinel matching any api version or any kind
pub const ANY: &str = "*";

/// The bundled property table
const PROPERTIES: &str = include_str!("properties.yaml");

static REGISTRY: LazyLock<PropertyRegistry> = LazyLock::new(|| {
    PropertyRegistry::from_yaml(PROPERTIES).expect("bundled property table is valid")
});

type KindTable = HashMap<String, HashMap<String, PropertyPath>>;

/// Lookup table from `(api version, kind, property)` to [`PropertyPath`]
///
/// Built once and read-only afterwards; share it by reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRegistry {
    versions: HashMap<String, KindTable>,
}

impl PropertyRegistry {
    /// The process-wide registry built from the bundled property table
    ///
    /// Initialized on first use.
    pub fn global() -> &'static PropertyRegistry {
        &REGISTRY
    }

    /// Build a registry from a YAML table shaped `version -> kind -> property -> [segments]`
    pub fn from_yaml(table: &str) -> Result<Self> {
        let versions = serde_yaml::from_str(table).map_err(Error::InvalidSchema)?;
        Ok(Self { versions })
    }

    /// Find the path for a property, honoring the fallback order
    pub fn lookup(&self, api_version: &str, kind: &str, property: &str) -> Option<&PropertyPath> {
        let candidates = [(api_version, kind), (ANY, kind), (api_version, ANY), (ANY, ANY)];
        candidates.iter().enumerate().find_map(|(step, (version, kind_key))| {
            let path = self.versions.get(*version)?.get(*kind_key)?.get(property)?;
            if step > 0 {
                tracing::trace!(
                    "resolved {property} for {kind} ({api_version}) through {kind_key} ({version})"
                );
            }
            Some(path)
        })
    }

    /// Resolve a property that must exist
    ///
    /// Fails with [`Error::UnknownProperty`] when no entry matches.
    pub fn resolve(&self, api_version: &str, kind: &str, property: &str) -> Result<&PropertyPath> {
        self.lookup(api_version, kind, property)
            .ok_or_else(|| Error::UnknownProperty {
                api_version: api_version.to_string(),
                kind: kind.to_string(),
                property: property.to_string(),
            })
    }

    /// Iterate over every row as `(api version, kind, property, path)`
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str, &PropertyPath)> {
        self.versions.iter().flat_map(|(version, kinds)| {
            kinds.iter().flat_map(move |(kind, props)| {
                props
                    .iter()
                    .map(move |(prop, path)| (version.as_str(), kind.as_str(), prop.as_str(), path))
            })
        })
    }

    /// The api versions with at least one row, including [`ANY`]
    pub fn versions(&self) -> Vec<&str> {
        let mut versions: Vec<&str> = self.versions.keys().map(String::as_str).collect();
        versions.sort_unstable();
        versions
    }
}

/// Logical property names understood by the bundled table
pub mod props {
    /// Kind of the resource
    pub const KIND: &str = "kind";
    /// Api version of the resource
    pub const API_VERSION: &str = "apiVersion";
    /// Name of the resource
    pub const NAME: &str = "name";
    /// Namespace (project) the resource lives in
    pub const NAMESPACE: &str = "namespace";
    /// Server-assigned unique id
    pub const UID: &str = "uid";
    /// Server-assigned version used for optimistic concurrency
    pub const RESOURCE_VERSION: &str = "resourceVersion";
    /// Canonical url of the resource
    pub const SELF_LINK: &str = "selfLink";
    /// Creation time as an RFC 3339 timestamp
    pub const CREATION_TIMESTAMP: &str = "creationTimestamp";
    /// Label map
    pub const LABELS: &str = "labels";
    /// Annotation map
    pub const ANNOTATIONS: &str = "annotations";
    /// Operations block advertised by the server
    pub const LINKS: &str = "links";

    /// Lifecycle phase (builds, pods, volumes, projects)
    pub const PHASE: &str = "phase";
    /// Status message of a build
    pub const MESSAGE: &str = "message";
    /// Build duration in nanoseconds
    pub const DURATION: &str = "duration";
    /// Image a build pushes to
    pub const OUTPUT_IMAGE: &str = "outputImage";
    /// Pod a build ran in
    pub const POD_NAME: &str = "podName";
    /// Build configuration that spawned a build
    pub const BUILD_CONFIG: &str = "buildConfig";
    /// Source repository of a build
    pub const SOURCE_URI: &str = "sourceUri";
    /// Build strategy
    pub const STRATEGY_TYPE: &str = "strategyType";

    /// Desired replica count
    pub const REPLICAS: &str = "replicas";
    /// Label selector
    pub const SELECTOR: &str = "selector";
    /// Latest deployed version
    pub const LATEST_VERSION: &str = "latestVersion";
    /// Deployment triggers
    pub const TRIGGERS: &str = "triggers";
    /// Container list
    pub const CONTAINERS: &str = "containers";
    /// Labels applied to pods created from a template
    pub const TEMPLATE_LABELS: &str = "templateLabels";

    /// Pod ip address
    pub const IP: &str = "ip";
    /// Host name (node or route host)
    pub const HOST: &str = "host";
    /// Pod restart policy
    pub const RESTART_POLICY: &str = "restartPolicy";

    /// Service port
    pub const PORT: &str = "port";
    /// Port on the selected pods a service forwards to
    pub const TARGET_PORT: &str = "targetPort";
    /// Cluster-internal service ip
    pub const CLUSTER_IP: &str = "clusterIp";

    /// Route path
    pub const PATH: &str = "path";
    /// Service a route points at
    pub const SERVICE_NAME: &str = "serviceName";
    /// TLS termination type of a route
    pub const TLS_TERMINATION: &str = "tlsTermination";

    /// Secret type
    pub const TYPE: &str = "type";
    /// Secret data map
    pub const DATA: &str = "data";

    /// Storage capacity of a volume
    pub const CAPACITY: &str = "capacity";
    /// Access modes of a volume
    pub const ACCESS_MODES: &str = "accessModes";
    /// Reclaim policy of a volume
    pub const RECLAIM_POLICY: &str = "reclaimPolicy";

    /// Display name of a project
    pub const DISPLAY_NAME: &str = "displayName";
    /// Description of a project
    pub const DESCRIPTION: &str = "description";

    /// Full name of a user
    pub const FULL_NAME: &str = "fullName";
    /// Identities of a user
    pub const IDENTITIES: &str = "identities";
    /// Groups of a user
    pub const GROUPS: &str = "groups";
}
