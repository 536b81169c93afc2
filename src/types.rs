//! Domain records and the JSON envelopes the provider wraps them in.
//!
//! Records decode permissively: unknown fields are ignored and missing
//! optional fields fall back to their zero values. The exceptions are the
//! mail flags on [`Redditor`], where `null`/absent must stay distinguishable
//! from `false`.

use std::fmt;

use serde::Deserialize;

/// A reddit user profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Redditor {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub link_karma: i64,
    #[serde(default)]
    pub comment_karma: i64,
    /// Account creation time, epoch seconds.
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub is_gold: bool,
    #[serde(default)]
    pub is_mod: bool,
    /// `None` means the provider did not say (absent or `null`), which is
    /// distinct from `Some(false)`.
    #[serde(default)]
    pub has_mail: Option<bool>,
    #[serde(default)]
    pub has_mod_mail: Option<bool>,
    #[serde(default)]
    pub inbox_count: i64,
}

impl fmt::Display for Redditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-{})", self.name, self.link_karma, self.comment_karma)
    }
}

/// A submitted post, decoded from listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub id: String,
    /// Fullname (`t3_`-prefixed id).
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub permalink: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub ups: i64,
    #[serde(default)]
    pub downs: i64,
    #[serde(default)]
    pub num_comments: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub over_18: bool,
    #[serde(default)]
    pub is_self: bool,
    #[serde(default)]
    pub stickied: bool,
}

/// A subreddit's public metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Subreddit {
    #[serde(default)]
    pub id: String,
    /// Fullname (`t5_`-prefixed id).
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub public_description: String,
    #[serde(default)]
    pub subscribers: i64,
    #[serde(default)]
    pub created_utc: f64,
    #[serde(default)]
    pub over18: bool,
}

/// The `{kind, data}` wrapper several endpoints put around a record.
#[derive(Debug, Deserialize)]
pub(crate) struct Thing<T> {
    #[serde(default)]
    pub kind: String,
    pub data: T,
}

/// The `{data: {children: [{data: ...}]}}` wrapper around listings.
#[derive(Debug, Deserialize)]
pub(crate) struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
}

impl<T> Listing<T> {
    /// Flatten the listing, preserving the provider-given order.
    pub(crate) fn into_items(self) -> Vec<T> {
        self.data.children.into_iter().map(|child| child.data).collect()
    }
}

/// Sort order for listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sort {
    #[default]
    New,
    Hot,
    Top,
    Controversial,
}

impl Sort {
    pub fn as_str(self) -> &'static str {
        match self {
            Sort::New => "new",
            Sort::Hot => "hot",
            Sort::Top => "top",
            Sort::Controversial => "controversial",
        }
    }
}

/// Time window for time-filtered sorts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimePeriod {
    Hour,
    Day,
    Week,
    Month,
    Year,
    #[default]
    All,
}

impl TimePeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            TimePeriod::Hour => "hour",
            TimePeriod::Day => "day",
            TimePeriod::Week => "week",
            TimePeriod::Month => "month",
            TimePeriod::Year => "year",
            TimePeriod::All => "all",
        }
    }
}

/// Query options shared by listing endpoints.
#[derive(Debug, Clone)]
pub struct ListingOptions {
    pub limit: u32,
    pub sort: Sort,
    pub time: TimePeriod,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            limit: 25,
            sort: Sort::default(),
            time: TimePeriod::default(),
        }
    }
}

impl ListingOptions {
    pub(crate) fn push_params(&self, params: &mut Vec<(String, String)>) {
        params.push(("show".to_string(), "all".to_string()));
        params.push(("limit".to_string(), self.limit.to_string()));
        params.push(("sort".to_string(), self.sort.as_str().to_string()));
        params.push(("t".to_string(), self.time.as_str().to_string()));
    }
}
