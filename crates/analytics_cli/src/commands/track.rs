use crate::api::{DashboardClient, TrackRequest};
use anyhow::Result;

pub fn handle_track_command(
    client: &DashboardClient,
    path: String,
    referer: Option<String>,
) -> Result<()> {
    let request = TrackRequest { path, referer };
    if client.track(&request)? {
        println!("✅ Recorded page view for {}", request.path);
    } else {
        println!("❌ Server did not accept the page view for {}", request.path);
    }
    Ok(())
}
