//! Cookie-authenticated session.

use std::time::Duration;

use reqwest::header::{SET_COOKIE, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Endpoints;
use crate::error::{Error, Result};
use crate::request::{ApiRequest, Auth, Method, DEFAULT_TIMEOUT};
use crate::types::{Listing, ListingOptions, Redditor, Submission, Subreddit, Thing};

/// Name of the session cookie the provider issues at login.
const SESSION_COOKIE: &str = "reddit_session";

/// A cookie-authenticated session.
///
/// Created by [`SessionBuilder::login`]; holds the session cookie for the
/// lifetime of the value. The provider may invalidate the cookie at any time,
/// which surfaces only as failures on subsequent calls.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    endpoints: Endpoints,
    username: String,
    user_agent: String,
    timeout: Duration,
    /// `name=value` pair issued at login.
    cookie: String,
}

impl Session {
    /// Create a new session builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// The logged-in username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Fetch the logged-in user's profile.
    pub async fn me(&self) -> Result<Redditor> {
        let body = self.get("api/me.json", Vec::new()).await?;
        let thing: Thing<Redditor> = serde_json::from_str(&body)?;
        Ok(thing.data)
    }

    /// Fetch the logged-in user's saved submissions.
    pub async fn saved(&self, options: &ListingOptions) -> Result<Vec<Submission>> {
        let mut params = Vec::new();
        options.push_params(&mut params);

        let path = format!("user/{}/saved.json", self.username);
        let body = self.get(&path, params).await?;
        let listing: Listing<Submission> = serde_json::from_str(&body)?;
        Ok(listing.into_items())
    }

    /// Fetch a subreddit's metadata.
    pub async fn about_subreddit(&self, name: &str) -> Result<Subreddit> {
        let body = self.get(&format!("r/{name}/about.json"), Vec::new()).await?;
        let thing: Thing<Subreddit> = serde_json::from_str(&body)?;
        Ok(thing.data)
    }

    /// Whether the provider will demand a captcha on the next submission.
    pub async fn needs_captcha(&self) -> Result<bool> {
        let body = self.get("api/needs_captcha.json", Vec::new()).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Request a fresh captcha identifier, for use in [`Captcha::iden`].
    pub async fn new_captcha_iden(&self) -> Result<String> {
        let params = vec![("api_type".to_string(), "json".to_string())];
        let body = self.post("api/new_captcha", params).await?;
        let response: CaptchaIdenResponse = serde_json::from_str(&body)?;
        Ok(response.json.data.iden)
    }

    /// Submit a new post.
    pub async fn submit(&self, submission: &NewSubmission) -> Result<()> {
        self.post("api/submit", submission.to_params()).await?;
        Ok(())
    }

    /// GET a www-host path with the session cookie attached.
    pub async fn get(&self, path: &str, params: Vec<(String, String)>) -> Result<String> {
        self.request(Method::Get, path, params).await
    }

    /// POST a www-host path with the session cookie attached.
    pub async fn post(&self, path: &str, params: Vec<(String, String)>) -> Result<String> {
        self.request(Method::Post, path, params).await
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<String> {
        ApiRequest {
            method,
            url: self.endpoints.www_url(path)?,
            params,
            auth: Auth::Cookie(self.cookie.clone()),
            user_agent: self.user_agent.clone(),
            timeout: self.timeout,
        }
        .send(&self.http)
        .await
    }
}

/// Builder for a cookie-authenticated [`Session`].
#[derive(Debug, Default)]
pub struct SessionBuilder {
    username: Option<String>,
    password: Option<String>,
    user_agent: Option<String>,
    endpoints: Option<Endpoints>,
    timeout: Option<Duration>,
}

impl SessionBuilder {
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

    /// Log in and return an authenticated session.
    ///
    /// On any non-success status, or a success response without the session
    /// cookie, this fails and no session exists.
    pub async fn login(self) -> Result<Session> {
        let username = self
            .username
            .ok_or_else(|| Error::Config("username is required".to_string()))?;
        let password = self
            .password
            .ok_or_else(|| Error::Config("password is required".to_string()))?;
        let user_agent = self
            .user_agent
            .ok_or_else(|| Error::Config("user_agent is required".to_string()))?;
        let endpoints = self.endpoints.unwrap_or_default();
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let http = reqwest::Client::builder().build()?;

        let url = endpoints.www_url(&format!("api/login/{username}"))?;
        let response = http
            .post(url)
            .form(&[
                ("user", username.as_str()),
                ("passwd", password.as_str()),
                ("api_type", "json"),
            ])
            .header(USER_AGENT, user_agent.as_str())
            .timeout(timeout)
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(Error::Status(response.status()));
        }

        let cookie = session_cookie(
            response
                .headers()
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok()),
        )
        .ok_or(Error::NoSessionCookie)?;

        tracing::debug!(user = %username, "login succeeded");

        Ok(Session {
            http,
            endpoints,
            username,
            user_agent,
            timeout,
            cookie,
        })
    }
}

/// Extract the session cookie pair from `Set-Cookie` header values.
fn session_cookie<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    values
        .filter_map(|value| value.split(';').next())
        .map(str::trim)
        .find(|pair| {
            pair.strip_prefix(SESSION_COOKIE)
                .is_some_and(|rest| rest.starts_with('='))
        })
        .map(str::to_string)
}

/// Wire shape of the new-captcha response: `{json: {data: {iden}}}`.
#[derive(Debug, Deserialize)]
struct CaptchaIdenResponse {
    json: CaptchaIdenBody,
}

#[derive(Debug, Deserialize)]
struct CaptchaIdenBody {
    data: CaptchaIdenData,
}

#[derive(Debug, Deserialize)]
struct CaptchaIdenData {
    iden: String,
}

/// Content for a new post.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    subreddit: String,
    title: String,
    content: SubmissionContent,
    resubmit: bool,
    send_replies: bool,
    captcha: Option<Captcha>,
}

#[derive(Debug, Clone)]
enum SubmissionContent {
    Text(String),
    Link(String),
}

/// A solved captcha, attached when the provider demands one at submit time.
#[derive(Debug, Clone)]
pub struct Captcha {
    pub iden: String,
    pub response: String,
}

impl NewSubmission {
    /// A self (text) post.
    pub fn text(
        subreddit: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            subreddit: subreddit.into(),
            title: title.into(),
            content: SubmissionContent::Text(text.into()),
            resubmit: false,
            send_replies: true,
            captcha: None,
        }
    }

    /// A link post.
    pub fn link(
        subreddit: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            subreddit: subreddit.into(),
            title: title.into(),
            content: SubmissionContent::Link(url.into()),
            resubmit: false,
            send_replies: true,
            captcha: None,
        }
    }

    /// Allow resubmitting an already-posted link.
    pub fn resubmit(mut self, resubmit: bool) -> Self {
        self.resubmit = resubmit;
        self
    }

    /// Control whether replies land in the inbox.
    pub fn send_replies(mut self, send_replies: bool) -> Self {
        self.send_replies = send_replies;
        self
    }

    /// Attach a solved captcha.
    pub fn captcha(mut self, captcha: Captcha) -> Self {
        self.captcha = Some(captcha);
        self
    }

    fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("sr".to_string(), self.subreddit.clone()),
            ("title".to_string(), self.title.clone()),
            ("api_type".to_string(), "json".to_string()),
            ("resubmit".to_string(), self.resubmit.to_string()),
            ("sendreplies".to_string(), self.send_replies.to_string()),
        ];

        match &self.content {
            SubmissionContent::Text(text) => {
                params.push(("kind".to_string(), "self".to_string()));
                params.push(("text".to_string(), text.clone()));
            }
            SubmissionContent::Link(url) => {
                params.push(("kind".to_string(), "link".to_string()));
                params.push(("url".to_string(), url.clone()));
            }
        }

        if let Some(captcha) = &self.captcha {
            params.push(("iden".to_string(), captcha.iden.clone()));
            params.push(("captcha".to_string(), captcha.response.clone()));
        }

        params
    }
}
