//! Vendor URL → relay path rewriting.

use std::borrow::Cow;
use url::Url;

use crate::config::schema::FUNCTION_MOUNT_PATH;

/// Host of the vendor API that browsers cannot call directly.
pub const VENDOR_HOST: &str = "api.hubapi.com";

/// Maps calls aimed at the vendor domain onto the relay's local path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRewriter {
    vendor_host: String,
    relay_path: String,
}

impl Default for UrlRewriter {
    fn default() -> Self {
        Self::new(VENDOR_HOST, FUNCTION_MOUNT_PATH)
    }
}

impl UrlRewriter {
    pub fn new(vendor_host: impl Into<String>, relay_path: impl Into<String>) -> Self {
        Self {
            vendor_host: vendor_host.into().to_ascii_lowercase(),
            relay_path: relay_path.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn vendor_host(&self) -> &str {
        &self.vendor_host
    }

    pub fn relay_path(&self) -> &str {
        &self.relay_path
    }

    /// Relay-relative URL for a vendor URL, or `None` when the URL should be
    /// left alone (other hosts, relative URLs, calls already on the relay).
    pub fn rewrite(&self, url: &str) -> Option<String> {
        if self.targets_relay(url) {
            return None;
        }

        let parsed = Url::parse(url).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        if parsed.host_str()? != self.vendor_host || self.targets_relay(parsed.path()) {
            return None;
        }

        let mut rewritten = format!("{}{}", self.relay_path, parsed.path());
        if let Some(query) = parsed.query() {
            rewritten.push('?');
            rewritten.push_str(query);
        }
        Some(rewritten)
    }

    /// Rewrite when applicable, otherwise hand the URL back unchanged.
    pub fn apply<'a>(&self, url: &'a str) -> Cow<'a, str> {
        match self.rewrite(url) {
            Some(rewritten) => {
                tracing::debug!(from = %url, to = %rewritten, "Redirecting vendor call to relay");
                Cow::Owned(rewritten)
            }
            None => Cow::Borrowed(url),
        }
    }

    fn targets_relay(&self, path: &str) -> bool {
        path == self.relay_path || path.starts_with(&format!("{}/", self.relay_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_call_redirected() {
        let rewriter = UrlRewriter::default();
        assert_eq!(
            rewriter.rewrite("https://api.hubapi.com/crm/v3/x").as_deref(),
            Some("/.netlify/functions/hubspot/crm/v3/x")
        );
    }

    #[test]
    fn test_query_preserved() {
        let rewriter = UrlRewriter::default();
        assert_eq!(
            rewriter
                .rewrite("http://API.hubapi.com/crm/v3/objects/contacts?limit=5&after=10")
                .as_deref(),
            Some("/.netlify/functions/hubspot/crm/v3/objects/contacts?limit=5&after=10")
        );
    }

    #[test]
    fn test_relay_call_untouched() {
        let rewriter = UrlRewriter::default();
        let url = "/.netlify/functions/hubspot/crm/v3/x";
        assert!(rewriter.rewrite(url).is_none());
        assert!(matches!(rewriter.apply(url), Cow::Borrowed(u) if u == url));
    }

    #[test]
    fn test_other_hosts_untouched() {
        let rewriter = UrlRewriter::default();
        for url in [
            "https://example.com/crm/v3/x",
            "https://api.hubapi.com.evil.test/crm/v3/x",
            "https://www.wixapis.com/wix-data/v2/items/query",
            "/api/local",
        ] {
            assert_eq!(rewriter.apply(url), url);
        }
    }

    #[test]
    fn test_custom_relay_path() {
        let rewriter = UrlRewriter::new(VENDOR_HOST, "/hubspot-api/");
        assert_eq!(
            rewriter.rewrite("https://api.hubapi.com/").as_deref(),
            Some("/hubspot-api/")
        );
    }
}
