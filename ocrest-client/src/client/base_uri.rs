//! Joining request paths onto the cluster url
use http::uri;

/// Resolve the target of a request against the cluster url
///
/// Absolute targets are kept as they are: links may point at another host.
pub(crate) fn resolve(base_uri: &http::Uri, target: &http::Uri) -> Result<http::Uri, http::Error> {
    if target.scheme().is_some() {
        return Ok(target.clone());
    }
    set_base_uri(base_uri, target.path_and_query())
}

fn set_base_uri(base_uri: &http::Uri, req_pandq: Option<&uri::PathAndQuery>) -> Result<http::Uri, http::Error> {
    let mut builder = uri::Builder::new();
    if let Some(scheme) = base_uri.scheme() {
        builder = builder.scheme(scheme.as_str());
    }
    if let Some(authority) = base_uri.authority() {
        builder = builder.authority(authority.as_str());
    }

    if let Some(pandq) = base_uri.path_and_query() {
        builder = if let Some(req_pandq) = req_pandq {
            // `PathAndQuery` always starts with a slash.
            let base_path = pandq.path().trim_end_matches('/');
            builder.path_and_query(format!("{base_path}{req_pandq}"))
        } else {
            builder.path_and_query(pandq.as_str())
        };
    } else if let Some(req_pandq) = req_pandq {
        builder = builder.path_and_query(req_pandq.as_str());
    }
    builder.build()
}
