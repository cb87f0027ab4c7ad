//! `reqwest` client wrapper that routes vendor calls through the relay.

use reqwest::{Client, Method, RequestBuilder};
use url::Url;

use crate::rewrite::rewriter::UrlRewriter;

/// HTTP client for code written against the vendor's API shape.
///
/// Absolute vendor URLs are redirected to the relay on `origin`; relative
/// URLs resolve against `origin`; anything else is requested as given.
#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    rewriter: UrlRewriter,
    origin: Url,
}

impl RelayClient {
    pub fn new(client: Client, rewriter: UrlRewriter, origin: Url) -> Self {
        Self {
            client,
            rewriter,
            origin,
        }
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Final URL a call to `url` will hit.
    pub fn resolve(&self, url: &str) -> Result<Url, url::ParseError> {
        let target = self.rewriter.apply(url);
        self.origin.join(&target)
    }

    pub fn request(&self, method: Method, url: &str) -> Result<RequestBuilder, url::ParseError> {
        Ok(self.client.request(method, self.resolve(url)?))
    }

    pub fn get(&self, url: &str) -> Result<RequestBuilder, url::ParseError> {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> Result<RequestBuilder, url::ParseError> {
        self.request(Method::POST, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RelayClient {
        RelayClient::new(
            Client::new(),
            UrlRewriter::default(),
            Url::parse("https://coach.example").unwrap(),
        )
    }

    #[test]
    fn test_resolve_vendor_url() {
        let url = client()
            .resolve("https://api.hubapi.com/crm/v3/properties/contacts")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://coach.example/.netlify/functions/hubspot/crm/v3/properties/contacts"
        );
    }

    #[test]
    fn test_resolve_relative_and_foreign() {
        let client = client();
        assert_eq!(
            client.resolve("/.netlify/functions/test").unwrap().as_str(),
            "https://coach.example/.netlify/functions/test"
        );
        assert_eq!(
            client.resolve("https://example.org/a").unwrap().as_str(),
            "https://example.org/a"
        );
    }
}
