//! The page-view aggregator

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::StoreError;
use crate::types::{
    AnalyticsSnapshot, NewPageView, PageCount, PageView, TimestampMs, DAY_MS, WEEK_MS,
};

/// Maximum number of page views kept in memory
pub const DEFAULT_RETENTION_CAP: usize = 10_000;
/// Number of paths reported in `topPages`
pub const DEFAULT_TOP_PAGES: usize = 10;
/// Number of views reported in `recentPageViews`
pub const DEFAULT_RECENT_VIEWS: usize = 100;

/// Current wall-clock time in milliseconds since the Unix epoch
pub fn now_millis() -> TimestampMs {
    Utc::now().timestamp_millis()
}

/// Size limits of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreLimits {
    pub retention_cap: usize,
    pub top_pages: usize,
    pub recent_views: usize,
}

impl Default for StoreLimits {
    fn default() -> Self {
        Self {
            retention_cap: DEFAULT_RETENTION_CAP,
            top_pages: DEFAULT_TOP_PAGES,
            recent_views: DEFAULT_RECENT_VIEWS,
        }
    }
}

/// In-memory page-view store.
///
/// Views are kept in arrival order and capped at `retention_cap`; the oldest
/// are evicted first. The visit counter and the set of distinct IPs cover the
/// whole lifetime of the store and are never reduced by eviction, so the IP
/// set grows without bound.
///
/// The store does no locking of its own. Callers sharing it between tasks
/// wrap it in a mutex so that append plus eviction, and each snapshot, run
/// under a single lock acquisition.
#[derive(Debug, Clone)]
pub struct AnalyticsStore {
    page_views: VecDeque<PageView>,
    unique_ips: HashSet<String>,
    total_visits: u64,
    started_at: TimestampMs,
    limits: StoreLimits,
}

impl AnalyticsStore {
    /// Create an empty store with the default limits, started now
    pub fn new() -> Self {
        Self::build(StoreLimits::default(), now_millis())
    }

    /// Create an empty store with custom limits, started now
    pub fn with_limits(limits: StoreLimits) -> Result<Self, StoreError> {
        Self::with_limits_at(limits, now_millis())
    }

    /// Create an empty store with custom limits and an explicit start time
    pub fn with_limits_at(
        limits: StoreLimits,
        started_at: TimestampMs,
    ) -> Result<Self, StoreError> {
        if limits.retention_cap == 0 {
            return Err(StoreError::InvalidLimit("retention cap must be greater than zero"));
        }
        Ok(Self::build(limits, started_at))
    }

    fn build(limits: StoreLimits, started_at: TimestampMs) -> Self {
        Self {
            page_views: VecDeque::new(),
            unique_ips: HashSet::new(),
            total_visits: 0,
            started_at,
            limits,
        }
    }

    /// Record a page view stamped with the current time
    pub fn record(&mut self, view: NewPageView) -> TimestampMs {
        let timestamp = now_millis();
        self.record_at(view, timestamp);
        timestamp
    }

    /// Record a page view with an explicit timestamp
    pub fn record_at(&mut self, view: NewPageView, timestamp: TimestampMs) {
        let NewPageView {
            path,
            ip,
            user_agent,
            referer,
        } = view;

        self.total_visits += 1;
        if let Some(ip) = ip.as_deref().filter(|ip| !ip.is_empty()) {
            if !self.unique_ips.contains(ip) {
                self.unique_ips.insert(ip.to_string());
            }
        }

        self.page_views.push_back(PageView {
            path,
            timestamp,
            user_agent,
            ip,
            referer,
        });

        while self.page_views.len() > self.limits.retention_cap {
            if let Some(evicted) = self.page_views.pop_front() {
                tracing::trace!("Evicted page view for {} at {}", evicted.path, evicted.timestamp);
            }
        }
    }

    /// Aggregate the retained views as of the current time
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        self.snapshot_at(now_millis())
    }

    /// Aggregate the retained views as of `now`.
    ///
    /// Every call rescans the retained views; nothing is cached.
    pub fn snapshot_at(&self, now: TimestampMs) -> AnalyticsSnapshot {
        let day_cutoff = now.saturating_sub(DAY_MS);
        let week_cutoff = now.saturating_sub(WEEK_MS);

        let mut last_24h_visits = 0;
        let mut last_7d_visits = 0;
        let mut ips_24h: HashSet<&str> = HashSet::new();

        // Paths in first-seen order, so the stable sort below keeps ties in that order
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<(&str, u64)> = Vec::new();

        for view in &self.page_views {
            if view.timestamp > day_cutoff {
                last_24h_visits += 1;
                if let Some(ip) = view.ip.as_deref().filter(|ip| !ip.is_empty()) {
                    ips_24h.insert(ip);
                }
            }
            if view.timestamp > week_cutoff {
                last_7d_visits += 1;
            }

            match positions.get(view.path.as_str()) {
                Some(&index) => counts[index].1 += 1,
                None => {
                    positions.insert(view.path.as_str(), counts.len());
                    counts.push((view.path.as_str(), 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        let top_pages = counts
            .into_iter()
            .take(self.limits.top_pages)
            .map(|(path, count)| PageCount {
                path: path.to_string(),
                count,
            })
            .collect();

        let recent_page_views = self
            .page_views
            .iter()
            .rev()
            .take(self.limits.recent_views)
            .cloned()
            .collect();

        AnalyticsSnapshot {
            total_visits: self.total_visits,
            unique_visitors: self.unique_ips.len(),
            last_24h_visits,
            last_7d_visits,
            unique_visitors_24h: ips_24h.len(),
            top_pages,
            recent_page_views,
            uptime_since: format_timestamp(self.started_at),
        }
    }

    /// Number of retained page views
    pub fn len(&self) -> usize {
        self.page_views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page_views.is_empty()
    }

    pub fn total_visits(&self) -> u64 {
        self.total_visits
    }

    pub fn unique_visitors(&self) -> usize {
        self.unique_ips.len()
    }

    pub fn started_at(&self) -> TimestampMs {
        self.started_at
    }

    /// Maximum number of retained page views
    pub fn capacity(&self) -> usize {
        self.limits.retention_cap
    }

    pub fn limits(&self) -> StoreLimits {
        self.limits
    }

    /// Retained page views, oldest first
    pub fn page_views(&self) -> impl Iterator<Item = &PageView> {
        self.page_views.iter()
    }
}

impl Default for AnalyticsStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Render epoch milliseconds as RFC 3339 in UTC, e.g. `2024-05-01T12:00:00.000Z`
pub fn format_timestamp(timestamp: TimestampMs) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}
