//! Tower middleware applying [`UrlRewriter`] to outgoing `http::Request`s.
//!
//! Wrap any HTTP client service (for example a hyper-util legacy client)
//! once at bootstrap; requests to other hosts pass through untouched.

use axum::http::{header, Request, Uri};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use url::Url;

use crate::rewrite::rewriter::UrlRewriter;

/// Layer producing [`RewriteService`].
#[derive(Debug, Clone)]
pub struct RewriteLayer {
    rewriter: Arc<UrlRewriter>,
    origin: Url,
}

impl RewriteLayer {
    /// `origin` is the site serving the relay, e.g. `https://coach.example`.
    pub fn new(rewriter: UrlRewriter, origin: Url) -> Self {
        Self {
            rewriter: Arc::new(rewriter),
            origin,
        }
    }
}

impl<S> Layer<S> for RewriteLayer {
    type Service = RewriteService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RewriteService {
            inner,
            rewriter: self.rewriter.clone(),
            origin: self.origin.clone(),
        }
    }
}

/// Service redirecting vendor-bound requests to the relay.
#[derive(Debug, Clone)]
pub struct RewriteService<S> {
    inner: S,
    rewriter: Arc<UrlRewriter>,
    origin: Url,
}

impl<S> RewriteService<S> {
    fn relay_uri(&self, uri: &Uri) -> Option<Uri> {
        let rewritten = self.rewriter.rewrite(&uri.to_string())?;
        let absolute = self.origin.join(&rewritten).ok()?;
        absolute.as_str().parse().ok()
    }
}

impl<S, B> Service<Request<B>> for RewriteService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<B>) -> Self::Future {
        if let Some(uri) = self.relay_uri(request.uri()) {
            tracing::debug!(from = %request.uri(), to = %uri, "Redirecting vendor call to relay");
            // The vendor Host header would misroute the request at the relay.
            request.headers_mut().remove(header::HOST);
            *request.uri_mut() = uri;
        }
        self.inner.call(request)
    }
}
