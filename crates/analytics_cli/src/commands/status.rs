use crate::api::DashboardClient;
use anyhow::Result;

pub fn handle_status_command(client: &DashboardClient) -> Result<()> {
    match client.health_check() {
        Ok(true) => println!("✅ Server at {} is healthy", client.base_url()),
        Ok(false) => println!("❌ Server at {} returned an unexpected status", client.base_url()),
        Err(e) => println!("❌ Server at {} is not responding: {}", client.base_url(), e),
    }
    Ok(())
}
