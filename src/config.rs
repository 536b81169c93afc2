//! Endpoint configuration.

use url::Url;

use crate::error::Result;

/// Default host for login, token exchange and cookie-authenticated calls.
pub const WWW_BASE_URL: &str = "https://www.reddit.com";

/// Default host for bearer-authenticated resource calls.
pub const OAUTH_BASE_URL: &str = "https://oauth.reddit.com";

/// Base URLs for the provider's two hosts.
///
/// Injected at session construction so tests can point at a mock server;
/// nothing else in the crate hardcodes a host.
#[derive(Debug, Clone)]
pub struct Endpoints {
    www: Url,
    oauth: Url,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(WWW_BASE_URL, OAUTH_BASE_URL).expect("default endpoint URLs parse")
    }
}

impl Endpoints {
    /// Parse and normalize a pair of base URLs.
    pub fn new(www: impl AsRef<str>, oauth: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            www: parse_base(www.as_ref())?,
            oauth: parse_base(oauth.as_ref())?,
        })
    }

    /// The www host base URL.
    pub fn www(&self) -> &Url {
        &self.www
    }

    /// The oauth host base URL.
    pub fn oauth(&self) -> &Url {
        &self.oauth
    }

    /// Build a URL for a path on the www host.
    pub(crate) fn www_url(&self, path: &str) -> Result<Url> {
        Ok(self.www.join(path.trim_start_matches('/'))?)
    }

    /// Build a URL for a path on the oauth host.
    pub(crate) fn oauth_url(&self, path: &str) -> Result<Url> {
        Ok(self.oauth.join(path.trim_start_matches('/'))?)
    }
}

/// Parse a base URL, ensuring a trailing slash so joins keep the base path.
fn parse_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}
