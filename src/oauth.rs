//! OAuth2 password-grant session.

use std::ops::Deref;
use std::time::{Duration, Instant};

use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::request::{ApiRequest, Auth, Method, DEFAULT_TIMEOUT};
use crate::types::{Listing, ListingOptions, Redditor, Submission, Thing};

/// Token state stored after a successful password-grant exchange.
#[derive(Debug, Clone)]
struct Token {
    access_token: String,
    token_type: String,
    expires_in: Duration,
    scope: String,
    /// When the exchange completed; `expires_in` is relative to this.
    issued_at: Instant,
}

impl Token {
    /// Whether the token's lifetime has elapsed. Advisory only: the provider
    /// is the authority, and a token may also die early via revocation.
    fn expired(&self) -> bool {
        self.issued_at.elapsed() >= self.expires_in
    }
}

/// Wire shape of the token endpoint's success body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    token_type: String,
    expires_in: u64,
    #[serde(default)]
    scope: String,
}

/// A bearer-token session obtained via the OAuth2 password grant.
///
/// Revoking the token does not clear this state; calls made after
/// [`revoke_token`](OAuthSession::revoke_token) fail upstream with an
/// authorization error. Likewise the session never detects expiry on its
/// own — [`token_expired`](OAuthSession::token_expired) is a local estimate,
/// and [`reauthorize`](OAuthSession::reauthorize) re-runs the grant when the
/// caller decides to.
#[derive(Debug)]
pub struct OAuthSession {
    http: reqwest::Client,
    endpoints: Endpoints,
    username: String,
    password: String,
    client_id: String,
    client_secret: String,
    user_agent: String,
    timeout: Duration,
    token: Token,
}

impl OAuthSession {
    /// Create a new session builder.
    pub fn builder() -> OAuthSessionBuilder {
        OAuthSessionBuilder::new()
    }

    /// The username the grant was issued for.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The stored access token.
    pub fn access_token(&self) -> &str {
        &self.token.access_token
    }

    /// The token type reported by the provider (normally `bearer`).
    pub fn token_type(&self) -> &str {
        &self.token.token_type
    }

    /// The scope granted at exchange time, space-delimited.
    pub fn scope(&self) -> &str {
        &self.token.scope
    }

    /// Token lifetime as reported at exchange time.
    pub fn expires_in(&self) -> Duration {
        self.token.expires_in
    }

    /// Local estimate of whether the token has outlived `expires_in`.
    pub fn token_expired(&self) -> bool {
        self.token.expired()
    }

    /// Re-run the password grant, replacing the stored token.
    pub async fn reauthorize(&mut self) -> Result<()> {
        self.token = exchange_token(
            &self.http,
            &self.endpoints,
            &self.user_agent,
            self.timeout,
            &self.client_id,
            &self.client_secret,
            &self.username,
            &self.password,
        )
        .await?;
        Ok(())
    }

    /// Revoke the stored token.
    ///
    /// The provider answers 204 whether or not the token was still valid, so
    /// success here says nothing about its prior state; 401 means the client
    /// credentials were rejected. Local token state is left untouched.
    pub async fn revoke_token(&self) -> Result<()> {
        let url = self.endpoints.www_url("api/v1/revoke_token")?;
        let response = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[
                ("token", self.token.access_token.as_str()),
                ("token_type_hint", self.token.token_type.as_str()),
            ])
            .header(USER_AGENT, self.user_agent.as_str())
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(Error::Status(response.status()));
        }

        tracing::debug!("token revoked");
        Ok(())
    }

    /// Fetch the profile of the authenticated user.
    ///
    /// This endpoint returns the profile bare, unlike
    /// [`user`](OAuthSession::user), which gets a `{kind, data}` wrapper.
    /// The asymmetry is the provider's; the two are decoded separately on
    /// purpose.
    pub async fn me(&self) -> Result<AuthedRedditor<'_>> {
        let body = self.get("api/v1/me", Vec::new()).await?;
        let profile: Redditor = serde_json::from_str(&body)?;
        Ok(AuthedRedditor {
            session: self,
            profile,
        })
    }

    /// Fetch a user's public profile.
    pub async fn user(&self, username: &str) -> Result<AuthedRedditor<'_>> {
        let body = self
            .get(&format!("user/{username}/about"), Vec::new())
            .await?;
        let thing: Thing<Redditor> = serde_json::from_str(&body)?;
        Ok(AuthedRedditor {
            session: self,
            profile: thing.data,
        })
    }

    /// GET an oauth-host path with the bearer token attached.
    pub async fn get(&self, path: &str, params: Vec<(String, String)>) -> Result<String> {
        self.request(Method::Get, path, params).await
    }

    /// POST an oauth-host path with the bearer token attached.
    pub async fn post(&self, path: &str, params: Vec<(String, String)>) -> Result<String> {
        self.request(Method::Post, path, params).await
    }

    /// PATCH an oauth-host path with the bearer token attached.
    pub async fn patch(&self, path: &str, params: Vec<(String, String)>) -> Result<String> {
        self.request(Method::Patch, path, params).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<String> {
        ApiRequest {
            method,
            url: self.endpoints.oauth_url(path)?,
            params,
            auth: Auth::Bearer(self.token.access_token.clone()),
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        }
        .send(&self.http)
        .await
    }
}

/// A profile tied to the session that fetched it.
///
/// The session reference exists only to issue further calls on behalf of
/// this user; it owns nothing, and the caller controls the session lifetime.
#[derive(Debug)]
pub struct AuthedRedditor<'a> {
    session: &'a OAuthSession,
    profile: Redditor,
}

impl AuthedRedditor<'_> {
    /// The decoded profile record.
    pub fn profile(&self) -> &Redditor {
        &self.profile
    }

    /// Take ownership of the profile, dropping the session tie.
    pub fn into_profile(self) -> Redditor {
        self.profile
    }

    /// Fetch this user's submissions, in provider order (newest-first for
    /// the default sort).
    pub async fn submitted(&self, options: &ListingOptions) -> Result<Vec<Submission>> {
        let mut params = Vec::new();
        options.push_params(&mut params);
        // The provider's clients send the username as a query parameter as
        // well as in the path; both are expected.
        params.push(("username".to_string(), self.profile.name.clone()));

        let path = format!("user/{}/submitted", self.profile.name);
        let body = self.session.get(&path, params).await?;
        let listing: Listing<Submission> = serde_json::from_str(&body)?;
        Ok(listing.into_items())
    }
}

impl Deref for AuthedRedditor<'_> {
    type Target = Redditor;

    fn deref(&self) -> &Redditor {
        &self.profile
    }
}

/// Builder for an [`OAuthSession`].
#[derive(Debug, Default)]
pub struct OAuthSessionBuilder {
    username: Option<String>,
    password: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    user_agent: Option<String>,
    endpoints: Option<Endpoints>,
    timeout: Option<Duration>,
}

impl OAuthSessionBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the account username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set the account password.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the OAuth client id.
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Set the OAuth client secret.
    pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Set the user agent sent on every request. The provider rejects
    /// generic agents, so there is no default.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Override the provider endpoints (mock servers in tests).
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Perform the password-grant exchange and return the session.
    ///
    /// On any failure no session exists, so no token state survives a
    /// rejected exchange.
    pub async fn connect(self) -> Result<OAuthSession> {
        let username = self
            .username
            .ok_or_else(|| Error::Config("username is required".to_string()))?;
        let password = self
            .password
            .ok_or_else(|| Error::Config("password is required".to_string()))?;
        let client_id = self
            .client_id
            .ok_or_else(|| Error::Config("client_id is required".to_string()))?;
        let client_secret = self
            .client_secret
            .ok_or_else(|| Error::Config("client_secret is required".to_string()))?;
        let user_agent = self
            .user_agent
            .ok_or_else(|| Error::Config("user_agent is required".to_string()))?;
        let endpoints = self.endpoints.unwrap_or_default();
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let http = reqwest::Client::builder().build()?;

        let token = exchange_token(
            &http,
            &endpoints,
            &user_agent,
            timeout,
            &client_id,
            &client_secret,
            &username,
            &password,
        )
        .await?;

        Ok(OAuthSession {
            http,
            endpoints,
            username,
            password,
            client_id,
            client_secret,
            user_agent,
            timeout,
            token,
        })
    }
}

/// POST the password grant to the token endpoint and decode the result.
#[allow(clippy::too_many_arguments)]
async fn exchange_token(
    http: &reqwest::Client,
    endpoints: &Endpoints,
    user_agent: &str,
    timeout: Duration,
    client_id: &str,
    client_secret: &str,
    username: &str,
    password: &str,
) -> Result<Token> {
    let url = endpoints.www_url("api/v1/access_token")?;
    let response = http
        .post(url)
        .basic_auth(client_id, Some(client_secret))
        .form(&[
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
        ])
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await?;

    if response.status() != StatusCode::OK {
        return Err(Error::Status(response.status()));
    }

    let body = response.text().await?;
    let decoded: TokenResponse = serde_json::from_str(&body)?;

    tracing::debug!(scope = %decoded.scope, "token granted");

    Ok(Token {
        access_token: decoded.access_token,
        token_type: decoded.token_type,
        expires_in: Duration::from_secs(decoded.expires_in),
        scope: decoded.scope,
        issued_at: Instant::now(),
    })
}
