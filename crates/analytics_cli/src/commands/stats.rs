use crate::api::{ClientError, DashboardClient};
use analytics_store::{AnalyticsSnapshot, TimestampMs};
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::fmt::{self, Write};

pub fn handle_stats_command(client: &DashboardClient, recent: usize) -> Result<()> {
    match client.fetch_analytics() {
        Ok(snapshot) => {
            print!("{}", render_snapshot(&snapshot, recent)?);
            Ok(())
        }
        Err(ClientError::Unauthorized) => Err(anyhow::anyhow!(
            "Access code rejected; run `docs-analytics login <code>` with the current code"
        )),
        Err(e) => Err(e.into()),
    }
}

/// Text version of the dashboard: stat cards, top pages and recent activity
pub fn render_snapshot(snapshot: &AnalyticsSnapshot, recent: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_snapshot(&mut out, snapshot, recent)?;
    Ok(out)
}

fn write_snapshot(
    out: &mut impl Write,
    snapshot: &AnalyticsSnapshot,
    recent: usize,
) -> fmt::Result {
    writeln!(out, "Analytics since {}", snapshot.uptime_since)?;
    writeln!(out)?;
    writeln!(out, "  Total visits        {:>8}", snapshot.total_visits)?;
    writeln!(out, "  Unique visitors     {:>8}", snapshot.unique_visitors)?;
    writeln!(out, "  Last 24h            {:>8}", snapshot.last_24h_visits)?;
    writeln!(out, "  Last 7 days         {:>8}", snapshot.last_7d_visits)?;
    writeln!(out, "  Unique (24h)        {:>8}", snapshot.unique_visitors_24h)?;

    writeln!(out)?;
    writeln!(out, "Top pages:")?;
    if snapshot.top_pages.is_empty() {
        writeln!(out, "  (no page views yet)")?;
    }
    for (rank, page) in snapshot.top_pages.iter().enumerate() {
        let path = display_path(&page.path);
        writeln!(out, "  {:>2}. {:<48} {:>6}", rank + 1, path, page.count)?;
    }

    writeln!(out)?;
    writeln!(out, "Recent activity:")?;
    if snapshot.recent_page_views.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for view in snapshot.recent_page_views.iter().take(recent) {
        writeln!(
            out,
            "  {}  {:<40} {:<16} {}",
            format_time(view.timestamp),
            display_path(&view.path),
            view.ip.as_deref().unwrap_or("-"),
            view.referer.as_deref().unwrap_or("-"),
        )?;
    }

    Ok(())
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(no path)"
    } else {
        path
    }
}

fn format_time(timestamp: TimestampMs) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
