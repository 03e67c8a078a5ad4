use crate::{registry::props, Result};
use std::fmt;

wrapper! {
    /// An externally reachable host name mapped to a service
    Route
}

/// How TLS is terminated for a [`Route`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TlsTermination {
    /// At the router; plain traffic to the pods
    Edge,
    /// At the pods; the router forwards encrypted traffic
    Passthrough,
    /// At the router, re-encrypted towards the pods
    Reencrypt,
    /// A termination this crate does not know about
    Other(String),
}

impl TlsTermination {
    /// The wire form
    pub fn as_str(&self) -> &str {
        match self {
            TlsTermination::Edge => "edge",
            TlsTermination::Passthrough => "passthrough",
            TlsTermination::Reencrypt => "reencrypt",
            TlsTermination::Other(s) => s,
        }
    }
}

impl From<String> for TlsTermination {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "edge" => TlsTermination::Edge,
            "passthrough" => TlsTermination::Passthrough,
            "reencrypt" => TlsTermination::Reencrypt,
            _ => TlsTermination::Other(s),
        }
    }
}

impl fmt::Display for TlsTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Route {
    /// Public host name
    pub fn host(&self) -> Result<Option<String>> {
        self.core.string(props::HOST)
    }

    /// Change the public host name
    pub fn set_host(&mut self, host: &str) -> Result<()> {
        self.core.set(props::HOST, host)
    }

    /// Path prefix routed to the service
    pub fn path(&self) -> Result<Option<String>> {
        self.core.string(props::PATH)
    }

    /// Change the path prefix
    pub fn set_path(&mut self, path: &str) -> Result<()> {
        self.core.set(props::PATH, path)
    }

    /// Name of the target service
    pub fn service_name(&self) -> Result<Option<String>> {
        self.core.string(props::SERVICE_NAME)
    }

    /// Point the route at another service
    pub fn set_service_name(&mut self, service: &str) -> Result<()> {
        self.core.set(props::SERVICE_NAME, service)
    }

    /// TLS termination, `None` for plain http routes
    pub fn tls_termination(&self) -> Result<Option<TlsTermination>> {
        super::string_enum(&self.core, props::TLS_TERMINATION)
    }

    /// Terminate TLS for this route
    pub fn set_tls_termination(&mut self, termination: TlsTermination) -> Result<()> {
        self.core.set(props::TLS_TERMINATION, termination.as_str())
    }

    /// The url the route is reachable at, `None` without a host
    pub fn url(&self) -> Result<Option<String>> {
        let Some(host) = self.host()? else {
            return Ok(None);
        };
        let scheme = if self.tls_termination()?.is_some() { "https" } else { "http" };
        let path = self.path()?.unwrap_or_default();
        let slash = if path.starts_with('/') || path.is_empty() { "" } else { "/" };
        Ok(Some(format!("{scheme}://{host}{slash}{path}")))
    }
}
