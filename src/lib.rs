//! Typed client for the reddit REST API.
//!
//! Two session flavors cover the provider's two authentication schemes:
//!
//! - [`Session`]: cookie auth via the login endpoint.
//! - [`OAuthSession`]: OAuth2 password grant with bearer tokens.
//!
//! Every public operation issues at most one outbound HTTP call, blocks the
//! caller until it completes (30 s ceiling by default), and performs no
//! retries; failures surface immediately as [`Error`].
//!
//! # Example
//!
//! ```no_run
//! use snoo::OAuthSession;
//!
//! # async fn example() -> snoo::Result<()> {
//! let session = OAuthSession::builder()
//!     .username("spez")
//!     .password("hunter2")
//!     .client_id("my-client-id")
//!     .client_secret("my-client-secret")
//!     .user_agent("my-bot/0.1 by spez")
//!     .connect()
//!     .await?;
//!
//! let me = session.me().await?;
//! println!("{}", me.profile());
//!
//! let posts = me.submitted(&Default::default()).await?;
//! for post in posts {
//!     println!("{} ({})", post.title, post.score);
//! }
//!
//! session.revoke_token().await?;
//! # Ok(())
//! # }
//! ```
//!
//! The session types provide no internal synchronization; callers sharing a
//! session across tasks must serialize access themselves.

pub mod config;
pub mod error;
pub mod oauth;
pub mod request;
pub mod session;
pub mod types;

pub use config::Endpoints;
pub use error::{Error, Result};
pub use oauth::{AuthedRedditor, OAuthSession, OAuthSessionBuilder};
pub use request::{Auth, Method};
pub use session::{Captcha, NewSubmission, Session, SessionBuilder};
pub use types::{ListingOptions, Redditor, Sort, Submission, Subreddit, TimePeriod};
