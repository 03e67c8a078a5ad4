//! Typed wrappers for the resource kinds the platform serves
//!
//! Every wrapper is a [`ResourceCore`] plus domain accessors. Accessors name a
//! logical property from [`props`](crate::registry::props); where that property
//! lives depends on the api version of the document, and is looked up in the
//! registry. Accessors for properties that every version registers return
//! `Result`, failing with [`Error::UnknownProperty`](crate::Error::UnknownProperty)
//! when the table is incomplete. Accessors for properties that only some versions
//! carry return `Option`.
use crate::resource::ResourceCore;

/// Declare a wrapper struct dedicated to one kind
macro_rules! wrapper {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            core: $crate::resource::ResourceCore,
        }

        impl $crate::resource::Resource for $name {
            fn core(&self) -> &$crate::resource::ResourceCore {
                &self.core
            }

            fn core_mut(&mut self) -> &mut $crate::resource::ResourceCore {
                &mut self.core
            }
        }

        impl $crate::resource::KindResource for $name {
            const KIND: &'static str = stringify!($name);

            fn from_core(core: $crate::resource::ResourceCore) -> Self {
                Self { core }
            }

            fn into_core(self) -> $crate::resource::ResourceCore {
                self.core
            }
        }
    };
}

mod container;
pub use container::{Container, ContainerPort, Containers, EnvVar};

mod build;
pub use build::{Build, BuildPhase};

mod deployment_config;
pub use deployment_config::DeploymentConfig;

mod pod;
pub use pod::Pod;

mod service;
pub use service::Service;

mod route;
pub use route::{Route, TlsTermination};

mod secret;
pub use secret::Secret;

mod volume;
pub use volume::PersistentVolume;

mod project;
pub use project::{Project, User};

/// Read a string property into an enum that keeps unknown values
pub(crate) fn string_enum<T: From<String>>(core: &ResourceCore, property: &str) -> crate::Result<Option<T>> {
    Ok(core.string(property)?.map(T::from))
}
