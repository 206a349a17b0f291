use crate::api::{ClientError, DashboardClient};
use crate::config::ConfigManager;
use anyhow::Result;

/// Check the code against the server, then store it for later commands
pub fn handle_login_command(
    config_manager: &mut ConfigManager,
    server_url: &str,
    code: &str,
) -> Result<()> {
    let client = DashboardClient::new(server_url.to_string(), Some(code.to_string()));
    match client.fetch_analytics() {
        Ok(_) => {
            config_manager.set_server_url(client.base_url())?;
            config_manager.set_access_code(code)?;
            println!("✅ Access code accepted and saved for {}", client.base_url());
            Ok(())
        }
        Err(ClientError::Unauthorized) => {
            Err(anyhow::anyhow!("Access code rejected by {}", client.base_url()))
        }
        Err(e) => Err(e.into()),
    }
}
