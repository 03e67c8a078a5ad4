//! Connection settings for a [`Client`](crate::Client)
//!
//! # Usage
//! Build a [`Config`] with [`Config::new`] and the `with_*` setters, or read it from
//! the environment with [`Config::from_env`].
use crate::{error::ConfigError, Error, Result};
use http::{HeaderName, HeaderValue};
use secrecy::SecretString;
use std::time::Duration;

/// Environment variable holding the cluster url
pub const SERVER_ENV: &str = "OCREST_SERVER";
/// Environment variable holding a bearer token
pub const TOKEN_ENV: &str = "OCREST_TOKEN";
/// Environment variable holding the default namespace
pub const NAMESPACE_ENV: &str = "OCREST_NAMESPACE";
/// Environment variable holding the api version used for stubs
pub const API_VERSION_ENV: &str = "OCREST_API_VERSION";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(295);

/// Configuration object detailing things like cluster URL, default namespace, credentials, and timeouts.
#[derive(Debug, Clone)]
pub struct Config {
    /// The configured cluster url
    pub cluster_url: http::Uri,
    /// The configured default namespace
    pub default_namespace: String,
    /// The api version new resources are stubbed at
    pub api_version: String,
    /// Timeout for calls to the platform, passed to the transport.
    ///
    /// A value of `None` means no timeout
    pub timeout: Option<Duration>,
    /// Media type sent in the `Accept` header
    pub accept: String,
    /// Value of the `User-Agent` header
    pub user_agent: String,
    /// Bearer token, when authenticating with one
    pub token: Option<SecretString>,
    /// Extra headers sent with every request
    pub headers: Vec<(HeaderName, HeaderValue)>,
}

impl Config {
    /// Construct a new config where only the `cluster_url` is set by the user.
    /// and everything else receives a default value.
    pub fn new(cluster_url: http::Uri) -> Self {
        Self {
            cluster_url,
            default_namespace: String::from("default"),
            api_version: String::from("v1"),
            timeout: Some(DEFAULT_TIMEOUT),
            accept: String::from("application/json"),
            user_agent: format!("ocrest/{}", env!("CARGO_PKG_VERSION")),
            token: None,
            headers: vec![],
        }
    }

    /// Create configuration from `OCREST_*` environment variables
    ///
    /// Only [`SERVER_ENV`] is required.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server = lookup(SERVER_ENV).ok_or(Error::Config(ConfigError::MissingVariable(SERVER_ENV)))?;
        let cluster_url = server.parse::<http::Uri>().map_err(Error::InvalidUri)?;
        let mut config = Self::new(cluster_url);
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        if let Some(ns) = lookup(NAMESPACE_ENV).filter(|ns| !ns.is_empty()) {
            config.default_namespace = ns;
        }
        if let Some(version) = lookup(API_VERSION_ENV).filter(|v| !v.is_empty()) {
            config.api_version = version;
        }
        tracing::debug!("loaded config for {} from environment", config.cluster_url);
        Ok(config)
    }

    /// Use another default namespace
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    /// Stub new resources at another api version
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Change the timeout, `None` to wait forever
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Authenticate with a bearer token
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Ask for another media type
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Send another `User-Agent`
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Send an extra header with every request
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let invalid = |reason: String| {
            Error::Config(ConfigError::InvalidHeader {
                name: name.to_string(),
                reason,
            })
        };
        let name = HeaderName::try_from(name).map_err(|e| invalid(e.to_string()))?;
        let value = HeaderValue::try_from(value).map_err(|e| invalid(e.to_string()))?;
        self.headers.push((name, value));
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, API_VERSION_ENV, NAMESPACE_ENV, SERVER_ENV, TOKEN_ENV};
    use crate::{error::ConfigError, Error};
    use secrecy::ExposeSecret;
    use std::{collections::HashMap, time::Duration};

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn reads_environment() {
        let config = Config::from_lookup(env(&[
            (SERVER_ENV, "https://openshift.example.com:8443"),
            (TOKEN_ENV, "sha256~abc"),
            (NAMESPACE_ENV, "demo"),
            (API_VERSION_ENV, "v1beta3"),
        ]))
        .unwrap();
        assert_eq!(config.cluster_url.host(), Some("openshift.example.com"));
        assert_eq!(config.cluster_url.port_u16(), Some(8443));
        assert_eq!(config.default_namespace, "demo");
        assert_eq!(config.api_version, "v1beta3");
        assert_eq!(config.token.as_ref().map(|t| t.expose_secret()), Some("sha256~abc"));
        assert_eq!(config.timeout, Some(Duration::from_secs(295)));
    }

    #[test]
    fn server_is_required() {
        let err = Config::from_lookup(env(&[(TOKEN_ENV, "x")])).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::MissingVariable(SERVER_ENV))));
        let err = Config::from_lookup(env(&[(SERVER_ENV, "not a uri")])).unwrap_err();
        assert!(matches!(err, Error::InvalidUri(_)));
    }

    #[test]
    fn tokens_stay_out_of_debug_output() {
        let config = Config::new(http::Uri::from_static("https://localhost:8443")).with_token("hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn rejects_bad_headers() {
        let config = Config::new(http::Uri::from_static("https://localhost:8443"));
        assert!(config.clone().with_header("X-Trace", "on").is_ok());
        assert!(config.with_header("bad header", "on").is_err());
    }
}
