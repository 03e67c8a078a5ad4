//! Request engine for OpenShift-style REST APIs
//!
//! This crate executes [`Link`](ocrest_core::Link)s advertised by the platform,
//! maps unsuccessful responses onto a small error taxonomy, and wraps the
//! documents that come back in the resource types of [`ocrest_core`].
//!
//! # Example
//!
//! ```rust,no_run
//! use ocrest_client::{core::{Parameters, ResourceExt}, Client, Config, Outcome};
//! # fn transport() -> impl ocrest_client::transport::Transport { |_: http::Request<Vec<u8>>, _: Option<std::time::Duration>| Ok::<_, ocrest_client::transport::TransportError>(http::Response::new(Vec::<u8>::new())) }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new(transport(), Config::from_env()?);
//!
//!     // Start at a known path, then follow the links the server advertises
//!     if let Outcome::Resource(project) = client.fetch("/oapi/v1/projects/demo")? {
//!         let services = project.link("services")?;
//!         let mut params = Parameters::new();
//!         params.insert("namespace", project.name());
//!         if let Outcome::List(list) = client.execute(services, &params, &Parameters::new())? {
//!             for svc in &list {
//!                 println!("found service {}", svc.name());
//!             }
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The transport is supplied by the caller, see [`transport::Transport`].
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
pub use client::{Client, Outcome};

pub mod config;
pub use config::Config;

pub mod error;
pub use error::Error;

pub mod transport;
pub use transport::Transport;

#[doc(no_inline)]
pub use ocrest_core as core;

/// Convenient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
