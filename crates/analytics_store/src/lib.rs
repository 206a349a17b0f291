//! In-memory page-view analytics for the docs site.
//!
//! The store lives only as long as the process that owns it. Nothing is
//! written to disk: a restart or redeploy starts from zero.

pub mod errors;
pub mod store;
pub mod types;



pub use errors::StoreError;
pub use store::{
    now_millis, AnalyticsStore, StoreLimits, DEFAULT_RECENT_VIEWS, DEFAULT_RETENTION_CAP,
    DEFAULT_TOP_PAGES,
};
pub use types::{AnalyticsSnapshot, NewPageView, PageCount, PageView, TimestampMs, DAY_MS, WEEK_MS};
