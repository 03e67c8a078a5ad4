//! Ocrest is an umbrella-crate for talking to OpenShift-style REST APIs in Rust.
//!
//! # Overview
//!
//! The platform describes what can be done with a resource by advertising links
//! on it. Ocrest keeps resources as loosely typed documents, reads their fields
//! through a version-aware property table, and executes links with validated
//! parameters.
//!
//! The main modules are:
//!
//! - [`client`](crate::client) with the [`Client`](crate::Client) request engine
//! - [`config`](crate::config) for connection [`Config`](crate::Config)
//! - [`core`](crate::core) with the document model, the resource wrappers and the link contracts
//!
//! # Using the Client
//! ```no_run
//! use ocrest::{Client, Config, Outcome, core::{Parameters, ResourceExt, Service}};
//! # fn transport() -> impl ocrest::client::Transport { |_: http::Request<Vec<u8>>, _: Option<std::time::Duration>| Ok::<_, ocrest::client::TransportError>(http::Response::new(Vec::<u8>::new())) }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(transport(), Config::from_env()?);
//!
//!     let mut svc: Service = client.fetch("/api/v1/namespaces/demo/services/db")?.into_kind()?;
//!     println!("{} listens on {:?}", svc.name(), svc.port()?);
//!
//!     // Pick up whatever changed on the server since
//!     client.refresh(&mut svc)?;
//!     Ok(())
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Re-exports from [`ocrest_client`]
pub mod client {
    pub use ocrest_client::{
        transport::{StatusClass, Transport, TransportError},
        Client, Outcome,
    };
}
pub use ocrest_client::{config, error};
pub use ocrest_client::{Client, Config, Error, Outcome, Result};

#[doc(inline)]
pub use ocrest_core as core;

pub use ocrest_core::{KindResource, Resource, ResourceExt, ResourceFactory, TypedResource};
