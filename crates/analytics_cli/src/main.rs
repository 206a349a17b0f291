mod api;
mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docs-analytics")]
#[command(about = "Docs Analytics CLI Client")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Overrides the server URL from the config file
    #[arg(long)]
    server_url: Option<String>,

    /// Overrides the access code from the config file
    #[arg(long)]
    code: Option<String>,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Server status
    Status,
    /// Show the analytics dashboard
    Stats {
        /// Number of recent page views to list
        #[arg(long, default_value_t = 20)]
        recent: usize,
    },
    /// Record a page view
    Track {
        path: String,
        #[arg(long)]
        referer: Option<String>,
    },
    /// Verify and save the dashboard access code
    Login { code: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config_manager = config::ConfigManager::new(cli.config)?;
    let server_url = cli
        .server_url
        .unwrap_or_else(|| config_manager.get_config().server_url.clone());
    let access_code = cli
        .code
        .or_else(|| config_manager.get_config().access_code.clone());
    let client = api::DashboardClient::new(server_url.clone(), access_code);

    match cli.command {
        Commands::Status => commands::status::handle_status_command(&client),
        Commands::Stats { recent } => commands::stats::handle_stats_command(&client, recent),
        Commands::Track { path, referer } => {
            commands::track::handle_track_command(&client, path, referer)
        }
        Commands::Login { code } => {
            commands::login::handle_login_command(&mut config_manager, &server_url, &code)
        }
    }
}
