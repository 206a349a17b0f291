//! Page views and the aggregate payload served to the dashboard

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch
pub type TimestampMs = i64;

pub const DAY_MS: TimestampMs = 24 * 60 * 60 * 1000;
pub const WEEK_MS: TimestampMs = 7 * DAY_MS;

/// A page view as handed over by the ingestion layer, before the store
/// stamps it. A missing path deserializes to an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPageView {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub referer: Option<String>,
}

impl NewPageView {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

/// One recorded visit to a documentation path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub path: String,
    /// Assigned by the store at ingestion
    pub timestamp: TimestampMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,
}

/// Number of retained views for one path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCount {
    pub path: String,
    pub count: u64,
}

/// Aggregates computed by [`crate::AnalyticsStore::snapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    /// Every view ever recorded, including evicted ones
    pub total_visits: u64,
    /// Distinct IPs ever recorded, including those of evicted views
    pub unique_visitors: usize,
    #[serde(rename = "last24hVisits")]
    pub last_24h_visits: usize,
    #[serde(rename = "last7dVisits")]
    pub last_7d_visits: usize,
    #[serde(rename = "uniqueVisitors24h")]
    pub unique_visitors_24h: usize,
    pub top_pages: Vec<PageCount>,
    /// Newest first
    pub recent_page_views: Vec<PageView>,
    /// Store creation time, RFC 3339 in UTC
    pub uptime_since: String,
}
