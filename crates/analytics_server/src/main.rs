use analytics_server::{build_router, AppConfig, AppState, DATA_ROUTE, TRACK_ROUTE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "analytics_server=debug,tower_http=debug,axum=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting docs analytics server...");

    // Load configuration
    tracing::info!("Loading configuration...");
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Configuration loaded successfully");

    let addr = match config.socket_addr() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::error!(
                "Invalid listen address {}:{}: {}",
                config.server.host,
                config.server.port,
                e
            );
            std::process::exit(1);
        }
    };

    let app_state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to initialize analytics store: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Analytics store initialized (in memory, retention cap {})",
        app_state.config.analytics.retention_cap
    );

    let app = build_router(app_state);

    tracing::debug!("Router built successfully");
    tracing::debug!("Registered routes:");
    tracing::debug!("  GET /");
    tracing::debug!("  POST {}", TRACK_ROUTE);
    tracing::debug!("  GET {}", DATA_ROUTE);

    // Run our app with hyper
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server listening on {}", addr);
            listener
        }
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting axum server...");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    };
}
