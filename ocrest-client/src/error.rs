//! Error handling in [`ocrest`][crate]
use crate::transport::TransportError;
use http::StatusCode;
use ocrest_core::RestResponse;
use std::fmt;
use thiserror::Error;

/// What the platform said when it rejected a request
///
/// Always carries the url that was called, so failures can be diagnosed
/// without issuing the request again.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    /// The url that was called
    pub url: String,
    /// The response status, when one was received
    pub status: Option<StatusCode>,
    /// The parsed messages, possibly empty
    pub response: RestResponse,
    /// The raw body, when it could not be parsed into messages
    pub body: Option<String>,
}

impl Failure {
    /// The most specific message available
    pub fn message(&self) -> String {
        if let Some(failure) = self.response.failure() {
            return failure.text.clone();
        }
        if let Some(first) = self.response.messages().first() {
            return first.text.clone();
        }
        self.body.clone().unwrap_or_default()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{status} from {}", self.url)?,
            None => write!(f, "failure from {}", self.url)?,
        }
        let message = self.message();
        if !message.is_empty() {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// Possible errors when working with [`ocrest`][crate]
#[derive(Error, Debug)]
pub enum Error {
    /// A local error raised before anything was sent
    ///
    /// This covers parameter validation, unknown properties and missing links.
    #[error(transparent)]
    Core(#[from] ocrest_core::Error),

    /// The target does not exist
    #[error("NotFound: {0}")]
    NotFound(Box<Failure>),

    /// Authentication missing or insufficient
    #[error("Unauthorized: {0}")]
    Unauthorized(Box<Failure>),

    /// The platform rejected the request as malformed
    #[error("BadRequest: {0}")]
    BadRequest(Box<Failure>),

    /// The server or a gateway timed out, or no response arrived in time
    ///
    /// A transport timeout carries no status and an empty response.
    #[error("Timeout: {0}")]
    Timeout(Box<Failure>),

    /// Any other failure reported by the platform
    ///
    /// Also raised for successful responses whose messages carry a non-zero exit code.
    #[error("EndpointError: {0}")]
    Endpoint(Box<Failure>),

    /// The transport could not obtain a response for a reason other than a timeout
    #[error("failed to call {url}: {source}")]
    Transport {
        /// The url that was called
        url: String,
        /// What went wrong
        #[source]
        source: TransportError,
    },

    /// Common error case when parsing a response body
    #[error("Error deserializing response: {0}")]
    SerdeError(#[source] serde_json::Error),

    /// UTF-8 Error
    #[error("UTF-8 Error: {0}")]
    FromUtf8(#[source] std::string::FromUtf8Error),

    /// Failed to construct a URI.
    #[error("InvalidUri: {0}")]
    InvalidUri(#[source] http::uri::InvalidUri),

    /// Failed to join a request onto the cluster url
    #[error("InvalidUriParts: {0}")]
    InvalidUriParts(#[source] http::Error),

    /// Configuration error
    #[error("Error loading config: {0}")]
    Config(#[source] ConfigError),
}

impl Error {
    /// The failure reported by the platform, if that is what this is
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Error::NotFound(f)
            | Error::Unauthorized(f)
            | Error::BadRequest(f)
            | Error::Timeout(f)
            | Error::Endpoint(f) => Some(f),
            _ => None,
        }
    }

    /// The messages returned by the platform, if any
    pub fn response(&self) -> Option<&RestResponse> {
        self.failure().map(|f| &f.response)
    }
}

#[derive(Error, Debug)]
// Redundant with the error messages and machine names
#[allow(missing_docs)]
/// Possible errors when loading config
pub enum ConfigError {
    #[error("Unable to load config from environment, {0} must be defined")]
    MissingVariable(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    InvalidVariable { name: &'static str, reason: String },

    #[error("Invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
}
