//! A link-driven client for the platform's REST API
//!
//! The [`Client`] never builds urls of its own: every call starts from a [`Link`]
//! advertised by the server, or from a path the caller already knows such as the
//! api root. Each call runs to completion on the caller's thread:
//! validate, substitute, dispatch, then parse.
use http::{header, HeaderValue, Request, Response, StatusCode};
use ocrest_core::{
    link::names,
    request::Request as LinkRequest,
    Document, KindResource, Link, Parameters, Resource, ResourceExt, ResourceFactory, ResourceList,
    RestResponse, TypedResource,
};
use secrecy::ExposeSecret;
use std::{fmt, sync::Arc};

use crate::{
    error::{ConfigError, Failure},
    transport::{StatusClass, Transport, TransportError},
    Config, Error, Result,
};

mod base_uri;

/// The result of a successful call, shaped by what the server sent back
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A single resource
    Resource(TypedResource),
    /// A collection of resources
    List(ResourceList),
    /// A bare message envelope, e.g. generated credentials
    Response(RestResponse),
    /// No body at all
    Empty,
}

impl Outcome {
    /// The single resource, if that is what came back
    pub fn into_resource(self) -> Option<TypedResource> {
        match self {
            Outcome::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// The single resource as `K`
    ///
    /// Fails with [`KindMismatch`](ocrest_core::Error::KindMismatch) for anything else.
    pub fn into_kind<K: KindResource>(self) -> Result<K> {
        match self {
            Outcome::Resource(r) => Ok(K::try_from_core(r.into_core())?),
            other => Err(ocrest_core::Error::KindMismatch {
                expected: K::KIND.to_string(),
                actual: other.describe().to_string(),
            }
            .into()),
        }
    }

    /// The list, if that is what came back
    pub fn into_list(self) -> Option<ResourceList> {
        match self {
            Outcome::List(l) => Some(l),
            _ => None,
        }
    }

    fn describe(&self) -> &str {
        match self {
            Outcome::Resource(r) => r.kind(),
            Outcome::List(_) => "list",
            Outcome::Response(_) => "message response",
            Outcome::Empty => "empty response",
        }
    }
}

/// Client for executing links against the platform.
///
/// Cheap to clone; the transport is shared.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: Config,
    factory: ResourceFactory,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("factory", &self.factory)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a [`Client`] sending through `transport`
    ///
    /// Resources are stubbed at the api version of the `config`.
    pub fn new<T: Transport + 'static>(transport: T, config: Config) -> Self {
        let factory = ResourceFactory::new().with_api_version(config.api_version.clone());
        Self {
            transport: Arc::new(transport),
            config,
            factory,
        }
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The factory used to wrap responses
    pub fn factory(&self) -> &ResourceFactory {
        &self.factory
    }

    /// An empty resource of `kind` in the default namespace, ready for [`create`](Self::create)
    pub fn stub(&self, kind: &str, name: &str) -> Result<TypedResource> {
        Ok(self.factory.stub(kind, name, Some(self.config.default_namespace.as_str()))?)
    }

    /// Like [`stub`](Self::stub), for a kind with a dedicated wrapper
    pub fn stub_as<K: KindResource>(&self, name: &str) -> Result<K> {
        Ok(self.factory.stub_as(name, Some(self.config.default_namespace.as_str()))?)
    }

    /// Execute a link and wrap whatever the server sends back
    ///
    /// `params` must bind every required parameter of the link. `overrides` are
    /// merged on top and win. Nothing is sent when validation fails.
    pub fn execute(&self, link: &Link, params: &Parameters, overrides: &Parameters) -> Result<Outcome> {
        let doc = self.execute_raw(link, params, overrides)?;
        Ok(self.interpret(doc))
    }

    /// Execute a link and return the parsed body as it is
    pub fn execute_raw(&self, link: &Link, params: &Parameters, overrides: &Parameters) -> Result<Option<Document>> {
        let request = LinkRequest::new(link).build(params, overrides)?;
        self.request_document(request)
    }

    /// Send a resource as the body of a link, typically one that creates it
    ///
    /// Parameters left over after substitution go to the query string.
    pub fn create<R: Resource + ?Sized>(&self, link: &Link, resource: &R, params: &Parameters) -> Result<Outcome> {
        let payload = resource.to_wire_string().into_bytes();
        let request = LinkRequest::new(link).build_with_payload(params, payload)?;
        Ok(self.interpret(self.request_document(request)?))
    }

    /// Fetch a path relative to the cluster url, such as the api root
    ///
    /// This is the entry point for obtaining a first set of links.
    pub fn fetch(&self, path: &str) -> Result<Outcome> {
        let request = Request::get(path).body(vec![]).map_err(ocrest_core::Error::HttpError)?;
        Ok(self.interpret(self.request_document(request)?))
    }

    /// Replace a resource with its current state on the server
    ///
    /// Uses the resource's `GET` or `SELF` link, falling back to its self link.
    /// The document and the advertised links are replaced wholesale.
    pub fn refresh<R: Resource + ?Sized>(&self, resource: &mut R) -> Result<()> {
        let links = resource.links();
        let request = match links.get(names::GET).or_else(|| links.get(names::SELF)) {
            Some(link) => LinkRequest::new(link).build(&Parameters::new(), &Parameters::new())?,
            None => {
                let target = resource
                    .self_link()
                    .ok_or_else(|| ocrest_core::Error::LinkNotFound(names::GET.to_string()))?;
                Request::get(target).body(vec![]).map_err(ocrest_core::Error::HttpError)?
            }
        };
        let url = request.uri().to_string();
        let doc = self.request_document(request)?.ok_or_else(|| {
            Error::Endpoint(Box::new(Failure {
                url,
                status: None,
                response: RestResponse::default(),
                body: Some("refresh returned an empty body".into()),
            }))
        })?;
        let fresh = self.factory.create(doc).into_core();
        if fresh.kind() != resource.kind() {
            return Err(ocrest_core::Error::KindMismatch {
                expected: resource.kind().to_string(),
                actual: fresh.kind().to_string(),
            }
            .into());
        }
        tracing::debug!("refreshed {} {}", fresh.kind(), fresh.name());
        *resource.core_mut() = fresh;
        Ok(())
    }

    /// Perform a raw HTTP request against the platform
    ///
    /// The target is resolved against the cluster url, and the configured headers
    /// are added. Unsuccessful statuses are not treated as errors here.
    pub fn send(&self, request: Request<Vec<u8>>) -> Result<Response<Vec<u8>>> {
        let (mut parts, body) = request.into_parts();
        parts.uri = base_uri::resolve(&self.config.cluster_url, &parts.uri).map_err(Error::InvalidUriParts)?;
        let headers = &mut parts.headers;
        if !headers.contains_key(header::ACCEPT) {
            headers.insert(header::ACCEPT, header_value(&self.config.accept)?);
        }
        headers.insert(header::USER_AGENT, header_value(&self.config.user_agent)?);
        if let Some(token) = &self.config.token {
            let mut value = header_value(&format!("Bearer {}", token.expose_secret()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        for (name, value) in &self.config.headers {
            headers.insert(name.clone(), value.clone());
        }

        let url = parts.uri.to_string();
        tracing::debug!("{} {}", parts.method, url);
        let res = self
            .transport
            .send(Request::from_parts(parts, body), self.config.timeout)
            .map_err(|source| match source {
                TransportError::Timeout => Error::Timeout(Box::new(Failure {
                    url: url.clone(),
                    status: None,
                    response: RestResponse::default(),
                    body: None,
                })),
                source => Error::Transport { url: url.clone(), source },
            })?;
        tracing::trace!("Status = {:?} for {}", res.status(), url);
        Ok(res)
    }

    fn request_document(&self, request: Request<Vec<u8>>) -> Result<Option<Document>> {
        let url = request.uri().to_string();
        let res = self.send(request)?;
        let status = res.status();
        let text = String::from_utf8(res.into_body()).map_err(Error::FromUtf8)?;
        handle_api_errors(&url, &text, status)?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        let doc = Document::parse(&text).map_err(|e| {
            tracing::warn!("{}, {:?}", text, e);
            Error::SerdeError(e)
        })?;
        if let Some(response) = RestResponse::from_document(&doc) {
            if response.failure().is_some() {
                tracing::debug!("Unsuccessful: {response} (status {status})");
                return Err(Error::Endpoint(Box::new(Failure {
                    url,
                    status: Some(status),
                    response,
                    body: None,
                })));
            }
        }
        Ok(Some(doc))
    }

    fn interpret(&self, doc: Option<Document>) -> Outcome {
        let Some(doc) = doc else {
            return Outcome::Empty;
        };
        let kind = doc.root().get("kind").and_then(|k| k.as_str()).unwrap_or_default();
        if kind.is_empty() || kind == "Status" {
            if let Some(response) = RestResponse::from_document(&doc) {
                return Outcome::Response(response);
            }
        }
        match self.factory.list(doc) {
            Ok(list) => Outcome::List(list),
            Err(doc) => Outcome::Resource(self.factory.create(doc)),
        }
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value).map_err(|e| {
        Error::Config(ConfigError::InvalidHeader {
            name: value.split(' ').next().unwrap_or_default().to_string(),
            reason: e.to_string(),
        })
    })
}

/// Map an unsuccessful status onto the error taxonomy
///
/// Either the platform returned messages we can parse, or it somehow returned
/// something we couldn't. Both cases surface as the error matching the status;
/// the latter keeps the raw body.
fn handle_api_errors(url: &str, text: &str, status: StatusCode) -> Result<()> {
    let class = StatusClass::of(status);
    if class == StatusClass::Success {
        return Ok(());
    }
    let parsed = Document::parse(text).ok().and_then(|d| RestResponse::from_document(&d));
    let (response, body) = match parsed {
        Some(response) => (response, None),
        None => {
            tracing::warn!("Unsuccessful data error parse: {}", text);
            (RestResponse::default(), Some(text.to_string()))
        }
    };
    let failure = Box::new(Failure {
        url: url.to_string(),
        status: Some(status),
        response,
        body,
    });
    tracing::debug!("Unsuccessful: {failure}");
    Err(match class {
        StatusClass::BadRequest => Error::BadRequest(failure),
        StatusClass::Unauthorized => Error::Unauthorized(failure),
        StatusClass::NotFound => Error::NotFound(failure),
        StatusClass::Timeout => Error::Timeout(failure),
        StatusClass::Success | StatusClass::Endpoint => Error::Endpoint(failure),
    })
}
