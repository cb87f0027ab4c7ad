//! Hosting adapters: translate a host's request/response types to and from
//! the relay's own descriptors.
//!
//! The forwarding logic lives once in [`Relay`]; each hosting variant only
//! supplies a [`HostAdapter`].

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, Method, Request},
    response::Response,
};

use crate::observability::metrics;
use crate::relay::error::RelayError;
use crate::relay::forwarder::Relay;
use crate::relay::request::{parse_query, strip_any_mount, InboundRequest};
use crate::relay::response::RelayResponse;

/// Request/response translation for one hosting environment.
pub trait HostAdapter {
    type Request;
    type Response;

    /// Convert a host request into the relay descriptor.
    fn inbound(&self, request: Self::Request) -> Result<InboundRequest, RelayError>;

    /// Convert a relay response into the host's response type.
    fn outbound(&self, response: RelayResponse) -> Self::Response;
}

/// Run one request through an adapter and the relay.
pub async fn serve<A: HostAdapter>(relay: &Relay, adapter: &A, request: A::Request) -> A::Response {
    let response = match adapter.inbound(request) {
        Ok(inbound) => relay.forward(inbound).await,
        Err(e) => {
            tracing::warn!(error = %e, "Inbound request could not be translated");
            metrics::record_rejection(e.kind());
            e.into_response()
        }
    };
    adapter.outbound(response)
}

/// Decode a body as UTF-8 text; preflight bodies are ignored.
pub(crate) fn body_text(method: &Method, bytes: &[u8]) -> Result<Option<String>, RelayError> {
    if method == Method::OPTIONS || bytes.is_empty() {
        return Ok(None);
    }
    String::from_utf8(bytes.to_vec())
        .map(Some)
        .map_err(|e| RelayError::InvalidBody(e.to_string()))
}

/// Adapter for the long-running axum server.
#[derive(Debug, Clone)]
pub struct AxumAdapter {
    mounts: Vec<String>,
}

impl AxumAdapter {
    pub fn new(mounts: Vec<String>) -> Self {
        Self { mounts }
    }
}

impl HostAdapter for AxumAdapter {
    type Request = Request<Bytes>;
    type Response = Response;

    fn inbound(&self, request: Request<Bytes>) -> Result<InboundRequest, RelayError> {
        let (parts, body) = request.into_parts();
        let path = strip_any_mount(parts.uri.path(), &self.mounts);
        let query = parse_query(parts.uri.query());
        let body = body_text(&parts.method, &body)?;

        Ok(InboundRequest::new(parts.method, path)
            .with_query(query)
            .with_body(body))
    }

    fn outbound(&self, response: RelayResponse) -> Response {
        let body = response.body_string();
        let mut out = Response::new(Body::from(body));
        *out.status_mut() = response.status;
        let headers = out.headers_mut();
        for (name, value) in response.headers() {
            headers.insert(name, HeaderValue::from_static(value));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use crate::relay::response::RelayBody;

    fn adapter() -> AxumAdapter {
        AxumAdapter::new(vec!["/.netlify/functions/hubspot".into(), "/hubspot-api".into()])
    }

    #[test]
    fn test_axum_inbound_translation() {
        let request = Request::builder()
            .method(Method::PATCH)
            .uri("/hubspot-api/crm/v3/objects/contacts/42?idProperty=email")
            .body(Bytes::from_static(br#"{"properties":{}}"#))
            .unwrap();

        let inbound = adapter().inbound(request).unwrap();
        assert_eq!(inbound.method, Method::PATCH);
        assert_eq!(inbound.path, "crm/v3/objects/contacts/42");
        assert_eq!(inbound.query, vec![("idProperty".to_string(), "email".to_string())]);
        assert_eq!(inbound.body.as_deref(), Some(r#"{"properties":{}}"#));
    }

    #[test]
    fn test_non_utf8_body_is_invalid() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/hubspot-api/x")
            .body(Bytes::from_static(&[0xff, 0xfe]))
            .unwrap();
        assert!(matches!(adapter().inbound(request), Err(RelayError::InvalidBody(_))));
    }

    #[test]
    fn test_axum_outbound_headers() {
        let response = adapter().outbound(RelayResponse::new(
            StatusCode::UNAUTHORIZED,
            RelayBody::Text("nope".into()),
        ));
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
    }
}
