//! Single-request construction and execution.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, COOKIE, USER_AGENT};
use reqwest::StatusCode;
use url::Url;

use crate::error::{Error, Result};

/// Default per-request timeout.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP methods the provider's endpoints use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

/// Authentication credential attached to a request.
///
/// A request carries at most one credential; the enum makes carrying both
/// unrepresentable.
#[derive(Debug, Clone)]
pub enum Auth {
    /// No credential (public endpoints).
    None,
    /// Session cookie (`name=value`) obtained at login.
    Cookie(String),
    /// OAuth bearer token.
    Bearer(String),
}

/// A single outbound request. Built per call, never reused.
#[derive(Debug)]
pub(crate) struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) url: Url,
    /// Ordered key/value parameters; placement depends on the method.
    pub(crate) params: Vec<(String, String)>,
    pub(crate) auth: Auth,
    pub(crate) user_agent: String,
    pub(crate) timeout: Duration,
}

impl ApiRequest {
    /// Execute the request and return the raw response body.
    ///
    /// GET serializes `params` into the query string; POST and PATCH send
    /// them form-encoded in the body. Only HTTP 200 counts as success; any
    /// other status yields [`Error::Status`] with the status text.
    pub(crate) async fn send(self, http: &reqwest::Client) -> Result<String> {
        let mut builder = match self.method {
            Method::Get => http.get(url_with_query(self.url, &self.params)),
            Method::Post => http.post(self.url).form(&self.params),
            Method::Patch => http.patch(self.url).form(&self.params),
        };

        builder = builder
            .header(USER_AGENT, self.user_agent.as_str())
            .timeout(self.timeout);

        builder = match &self.auth {
            Auth::None => builder,
            Auth::Cookie(cookie) => builder.header(COOKIE, cookie.as_str()),
            Auth::Bearer(token) => builder.header(AUTHORIZATION, format!("bearer {token}")),
        };

        tracing::debug!(method = ?self.method, "sending request");
        let response = builder.send().await?;

        if response.status() != StatusCode::OK {
            return Err(Error::Status(response.status()));
        }

        Ok(response.text().await?)
    }
}

/// Append `params` to `url` as a query string.
fn url_with_query(mut url: Url, params: &[(String, String)]) -> Url {
    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    url
}
