//! Turning a [`Link`] plus bound [`Parameters`] into an `http::Request`
//!
//! Building a request happens in two phases, both local:
//! 1. validation of the bound values against the link's parameter contract
//! 2. substitution of `:variable` tokens in the href, with leftover values
//!    moved to the query string (`GET`/`HEAD`) or a JSON body (everything else)
//!
//! No request is produced when validation fails.
use crate::{
    link::Link,
    params::{value_text, Parameters},
    Error, Result,
};
use http::{header, Method};

/// Media type of request bodies
pub const JSON: &str = "application/json";

/// A request builder for one [`Link`]
#[derive(Debug, Clone)]
pub struct Request<'a> {
    link: &'a Link,
}

impl<'a> Request<'a> {
    /// Builder for `link`
    pub fn new(link: &'a Link) -> Self {
        Self { link }
    }

    /// Check `bound` and `overrides` against the link's contract and merge them
    ///
    /// Every required parameter must be bound in `bound`. Every bound value that
    /// the link declares is checked against its declaration; undeclared values
    /// pass through untouched. `overrides` win over `bound` on name clashes.
    pub fn validate(&self, bound: &Parameters, overrides: &Parameters) -> Result<Parameters> {
        for param in self.link.required_parameters() {
            if !bound.contains(param.name()) {
                return Err(self.invalid(param.name(), "required parameter is missing".into()));
            }
        }
        let merged = bound.clone().merged(overrides);
        for (name, value) in merged.iter() {
            match self.link.parameter(name) {
                Some(param) => param.check(value).map_err(|reason| self.invalid(name, reason))?,
                None => tracing::trace!("passing undeclared parameter {name} to {}", self.link.name()),
            }
        }
        Ok(merged)
    }

    /// Substitute `:variable` tokens in the href, consuming the values used
    ///
    /// Tokens start with a letter or underscore. A token without a matching
    /// parameter is left verbatim, so ports and unrelated absolute urls survive.
    /// Substituted values are percent-encoded as a single path segment.
    pub fn substitute(&self, params: &mut Parameters) -> String {
        substitute(self.link.href(), params)
    }

    /// Validate, substitute and assemble the request
    pub fn build(&self, bound: &Parameters, overrides: &Parameters) -> Result<http::Request<Vec<u8>>> {
        let mut params = self.validate(bound, overrides)?;
        let target = self.substitute(&mut params);
        let method = self.link.method().clone();
        if carries_query(&method) || params.is_empty() {
            return http::Request::builder()
                .method(method)
                .uri(with_query(target, &params))
                .body(vec![])
                .map_err(Error::HttpError);
        }
        let body = serde_json::to_vec(&params.into_json()).map_err(Error::SerdeError)?;
        http::Request::builder()
            .method(method)
            .uri(target)
            .header(header::CONTENT_TYPE, JSON)
            .body(body)
            .map_err(Error::HttpError)
    }

    /// Like [`build`](Self::build), but sending `payload` as the body
    ///
    /// Used to create resources from a stub. Leftover parameters go to the query string.
    pub fn build_with_payload(&self, bound: &Parameters, payload: Vec<u8>) -> Result<http::Request<Vec<u8>>> {
        let mut params = self.validate(bound, &Parameters::new())?;
        let target = self.substitute(&mut params);
        http::Request::builder()
            .method(self.link.method().clone())
            .uri(with_query(target, &params))
            .header(header::CONTENT_TYPE, JSON)
            .body(payload)
            .map_err(Error::HttpError)
    }

    fn invalid(&self, parameter: &str, reason: String) -> Error {
        Error::ParameterValidation {
            link: self.link.name().to_string(),
            parameter: parameter.to_string(),
            reason,
        }
    }
}

fn carries_query(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

fn with_query(target: String, params: &Parameters) -> String {
    if params.is_empty() {
        return target;
    }
    let separator = if target.contains('?') { '&' } else { '?' };
    let mut qp = form_urlencoded::Serializer::new(format!("{target}{separator}"));
    for (name, value) in params.iter() {
        qp.append_pair(name, &value_text(value));
    }
    qp.finish()
}

fn is_token_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn substitute(href: &str, params: &mut Parameters) -> String {
    let mut out = String::with_capacity(href.len());
    let mut consumed = vec![];
    let mut rest = href;
    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let len = if after.starts_with(is_token_start) {
            after.find(|c: char| !is_token_char(c)).unwrap_or(after.len())
        } else {
            0
        };
        let token = &after[..len];
        match params.get(token).filter(|_| len > 0) {
            Some(value) => {
                out.push_str(&urlencoding::encode(&value_text(value)));
                consumed.push(token.to_string());
            }
            None => {
                out.push(':');
                out.push_str(token);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    for name in consumed {
        params.remove(&name);
    }
    out
}

#[cfg(test)]
mod test {
    use super::{substitute, Request};
    use crate::{
        link::{Link, LinkParameter, ParameterType},
        params::Parameters,
        Error,
    };
    use http::Method;
    use serde_json::json;

    fn scale_link() -> Link {
        Link::new(
            "SCALE",
            "/oapi/v1/namespaces/:namespace/deploymentconfigs/:name/scale",
            Method::PUT,
        )
        .with_required(LinkParameter::new("namespace", ParameterType::String))
        .with_required(LinkParameter::new("name", ParameterType::String))
        .with_required(LinkParameter::new("replicas", ParameterType::Integer))
        .with_optional(LinkParameter::new("strategy", ParameterType::Enumerated).with_valid_options(["Rolling", "Recreate"]))
    }

    #[test]
    fn repeated_tokens_substitute_every_occurrence() {
        let mut params = Parameters::new().with("x", "q");
        assert_eq!(substitute("/a/:x/b/:x", &mut params), "/a/q/b/q");
        assert!(params.is_empty());
    }

    #[test]
    fn unmatched_tokens_are_left_verbatim() {
        // An absolute url pointing elsewhere keeps its port and any token nobody bound.
        // This can under-substitute a coincidentally named token; it is kept deliberately.
        let mut params = Parameters::new().with("name", "db");
        assert_eq!(
            substitute("https://other.example.com:8443/apps/:app/:name", &mut params),
            "https://other.example.com:8443/apps/:app/db"
        );
        let mut none = Parameters::new();
        assert_eq!(substitute("/trailing:", &mut none), "/trailing:");
        assert_eq!(substitute("/:Name/:name", &mut Parameters::new().with("name", "x")), "/:Name/x");
    }

    #[test]
    fn substituted_values_are_single_path_segments() {
        let mut params = Parameters::new().with("name", "a/b?c#d e").with("ns", "demo");
        assert_eq!(substitute("/p/:ns/s/:name", &mut params), "/p/demo/s/a%2Fb%3Fc%23d%20e");

        let link = Link::new("GET", "/api/v1/namespaces/:namespace/services/:name", Method::GET);
        let bound = Parameters::new().with("namespace", "demo").with("name", "my db");
        let req = Request::new(&link).build(&bound, &Parameters::new()).unwrap();
        assert_eq!(req.uri(), "/api/v1/namespaces/demo/services/my%20db");
    }

    #[test]
    fn tokens_end_at_non_identifier_characters() {
        let mut params = Parameters::new().with("ns", "demo").with("ns_x", "wrong");
        assert_eq!(substitute("/p/:ns.json", &mut params), "/p/demo.json");
        assert!(params.contains("ns_x"));
    }

    #[test]
    fn body_carries_leftover_parameters() {
        let link = scale_link();
        let bound = Parameters::new().with("namespace", "demo").with("name", "frontend").with("replicas", 3);
        let req = Request::new(&link).build(&bound, &Parameters::new().with("strategy", "Recreate")).unwrap();
        assert_eq!(*req.method(), Method::PUT);
        assert_eq!(req.uri(), "/oapi/v1/namespaces/demo/deploymentconfigs/frontend/scale");
        assert_eq!(req.headers()["content-type"], "application/json");
        let body: serde_json::Value = serde_json::from_slice(req.body()).unwrap();
        assert_eq!(body, json!({"replicas": 3, "strategy": "Recreate"}));
    }

    #[test]
    fn get_appends_query_string() {
        let link = Link::new("LIST_PODS", "/api/v1/namespaces/:namespace/pods?watch=false", Method::GET);
        let bound = Parameters::new().with("namespace", "demo").with("labelSelector", "app=web tier");
        let req = Request::new(&link).build(&bound, &Parameters::new()).unwrap();
        assert_eq!(req.uri(), "/api/v1/namespaces/demo/pods?watch=false&labelSelector=app%3Dweb+tier");
        assert!(req.body().is_empty());
    }

    #[test]
    fn missing_required_parameter_fails_fast() {
        let link = scale_link();
        let bound = Parameters::new().with("namespace", "demo").with("name", "frontend");
        let err = Request::new(&link).build(&bound, &Parameters::new()).unwrap_err();
        assert!(matches!(err, Error::ParameterValidation { ref parameter, .. } if parameter == "replicas"));
    }

    #[test]
    fn required_parameters_cannot_come_from_overrides() {
        let link = scale_link();
        let bound = Parameters::new().with("namespace", "demo").with("name", "frontend");
        let overrides = Parameters::new().with("replicas", 2);
        assert!(Request::new(&link).validate(&bound, &overrides).is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let link = scale_link();
        let bound = Parameters::new().with("namespace", "demo").with("name", "frontend").with("replicas", "many");
        assert!(Request::new(&link).build(&bound, &Parameters::new()).is_err());

        let bound = bound.with("replicas", 1);
        let bad_strategy = Parameters::new().with("strategy", "YOLO");
        let err = Request::new(&link).build(&bound, &bad_strategy).unwrap_err();
        assert!(matches!(err, Error::ParameterValidation { ref link, .. } if link == "SCALE"));
    }

    #[test]
    fn payload_requests_keep_parameters_in_query() {
        let link = Link::new("CREATE", "/api/v1/namespaces/:namespace/services", Method::POST);
        let bound = Parameters::new().with("namespace", "demo").with("dryRun", "All");
        let req = Request::new(&link).build_with_payload(&bound, b"{}".to_vec()).unwrap();
        assert_eq!(req.uri(), "/api/v1/namespaces/demo/services?dryRun=All");
        assert_eq!(req.body(), b"{}");
    }

    #[test]
    fn bodiless_post_without_leftovers() {
        let link = Link::new("START", "/oapi/v1/namespaces/demo/builds/web-1/start", Method::POST);
        let req = Request::new(&link).build(&Parameters::new(), &Parameters::new()).unwrap();
        assert!(req.body().is_empty());
        assert!(req.headers().get("content-type").is_none());
    }
}
