//! Request descriptors shared by every hosting adapter.

use axum::http::Method;
use url::Url;

/// Host-neutral view of an inbound relay request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundRequest {
    pub method: Method,
    /// Path remainder after the mount prefix, without a leading slash.
    pub path: String,
    /// Query parameters in arrival order.
    pub query: Vec<(String, String)>,
    /// Raw body text, if any.
    pub body: Option<String>,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attach a body. Empty bodies count as absent.
    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body.filter(|b| !b.is_empty());
        self
    }
}

/// One call to the vendor API.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub credential: String,
    pub body: Option<String>,
}

/// Remove a mount prefix from a request path.
///
/// `/.netlify/functions/hubspot/crm/v3/x` under `/.netlify/functions/hubspot`
/// yields `crm/v3/x`. A path outside the mount is used whole.
pub fn strip_mount_prefix(path: &str, mount: &str) -> String {
    let mount = mount.trim_end_matches('/');
    let rest = match path.strip_prefix(mount) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    };
    rest.trim_start_matches('/').to_string()
}

/// Strip whichever configured mount matches first.
pub fn strip_any_mount<S: AsRef<str>>(path: &str, mounts: &[S]) -> String {
    mounts
        .iter()
        .map(AsRef::as_ref)
        .find(|mount| {
            let mount = mount.trim_end_matches('/');
            path == mount || path.starts_with(&format!("{}/", mount))
        })
        .map(|mount| strip_mount_prefix(path, mount))
        .unwrap_or_else(|| path.trim_start_matches('/').to_string())
}

/// Build the vendor URL for a relayed path and query.
pub fn upstream_url(
    base_url: &str,
    path: &str,
    query: &[(String, String)],
) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!("{}/{}", base_url.trim_end_matches('/'), path))?;
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    Ok(url)
}

/// Decode a raw `a=1&b=2` query string into ordered pairs.
pub fn parse_query(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect()
    })
    .unwrap_or_default()
}
