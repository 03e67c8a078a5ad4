//! Crate with types and traits necessary for interacting with an OpenShift-style REST API
//!
//! This crate is available as a minimal alternative to `ocrest` where a client is not available.
//! The same information here is always re-exported from `ocrest` under `ocrest::core`.
//!
//! Payloads are held as [`Document`]s. Typed wrappers resolve their accessors through the
//! [`PropertyRegistry`], so one wrapper serves every wire shape the platform has used.
//! Operations are advertised by the server as [`Link`]s, and turned into `http` requests
//! by [`Request`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod document;
pub use document::{Document, PropertyPath, Segment};

pub mod registry;
pub use registry::PropertyRegistry;

pub mod metadata;
pub use metadata::TypeMeta;

mod resource;
pub use resource::{KindResource, Resource, ResourceCore, ResourceExt};

pub mod dynamic;
pub use dynamic::GenericResource;

pub mod kinds;
pub use kinds::{
    Build, BuildPhase, Container, Containers, DeploymentConfig, PersistentVolume, Pod, Project, Route,
    Secret, Service, TlsTermination, User,
};

pub mod factory;
pub use factory::{ResourceFactory, TypedResource};

pub mod list;
pub use list::ResourceList;

pub mod link;
pub use link::{Link, LinkDirectory, LinkParameter, ParameterType};

pub mod params;
pub use params::Parameters;

pub mod request;
pub use request::Request;

pub mod response;
pub use response::{Message, RestResponse, Severity, Status};

pub mod quantity;
pub use quantity::CapacityUnit;

mod error;
pub use error::Error;

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
