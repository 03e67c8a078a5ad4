//! The contract between the request engine and whatever moves bytes over the wire
//!
//! Sockets, TLS and connection reuse are the transport's business. The engine hands it
//! a complete `http::Request` with an absolute uri and receives a complete response.
use http::StatusCode;
use std::{error::Error as StdError, time::Duration};
use thiserror::Error;

/// Alias for a type-erased error type.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// A failure to obtain any response at all
#[derive(Error, Debug)]
pub enum TransportError {
    /// No response arrived within the timeout
    #[error("request timed out")]
    Timeout,

    /// The server could not be reached
    #[error("ConnectError: {0}")]
    Connect(#[source] BoxError),

    /// Anything else the transport could not handle
    #[error("TransportError: {0}")]
    Other(#[source] BoxError),
}

/// A blocking request/response http transport
///
/// Implemented for closures, so tests can pass a spy:
///
/// ```
/// use ocrest_client::transport::{Transport, TransportError};
/// use std::time::Duration;
///
/// let transport = |req: http::Request<Vec<u8>>, _timeout: Option<Duration>| {
///     assert_eq!(req.method(), "GET");
///     Ok::<_, TransportError>(http::Response::new(b"{}".to_vec()))
/// };
/// let res = transport.send(http::Request::new(vec![]), None).unwrap();
/// assert_eq!(res.body(), b"{}");
/// ```
pub trait Transport: Send + Sync {
    /// Send one request and wait for its response
    ///
    /// `timeout` is passed through unchanged from the client configuration.
    fn send(
        &self,
        request: http::Request<Vec<u8>>,
        timeout: Option<Duration>,
    ) -> Result<http::Response<Vec<u8>>, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(http::Request<Vec<u8>>, Option<Duration>) -> Result<http::Response<Vec<u8>>, TransportError>
        + Send
        + Sync,
{
    fn send(
        &self,
        request: http::Request<Vec<u8>>,
        timeout: Option<Duration>,
    ) -> Result<http::Response<Vec<u8>>, TransportError> {
        self(request, timeout)
    }
}

/// How an unsuccessful status is reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx and 3xx
    Success,
    /// The request was malformed or rejected by validation
    BadRequest,
    /// Authentication missing or insufficient
    Unauthorized,
    /// The target does not exist
    NotFound,
    /// The server or a gateway gave up waiting
    Timeout,
    /// Any other failure reported by the endpoint
    Endpoint,
}

impl StatusClass {
    /// Classify a response status
    pub fn of(status: StatusCode) -> Self {
        match status {
            s if !(s.is_client_error() || s.is_server_error()) => StatusClass::Success,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => StatusClass::BadRequest,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StatusClass::Unauthorized,
            StatusCode::NOT_FOUND | StatusCode::GONE => StatusClass::NotFound,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => StatusClass::Timeout,
            _ => StatusClass::Endpoint,
        }
    }
}
