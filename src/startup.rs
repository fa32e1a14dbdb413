use crate::components::room_summary::{GoogleCalendarProvider, SummaryService, TokenManager};
use crate::config::ServerConfig;
use crate::error::Error;
use crate::handlers;
use crate::shutdown;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the server config
pub fn load_config() -> miette::Result<ServerConfig> {
    match ServerConfig::load() {
        Ok(config) => {
            info!(
                "Loaded {} rooms, timezone {}, {} am/pm labels",
                config.rooms.len(),
                config.timezone,
                config.meridiem_policy
            );
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Serve room summaries until a shutdown signal arrives
pub async fn start_server(config: ServerConfig) -> miette::Result<()> {
    let token_manager = TokenManager::new(&config);
    info!("Using credentials from {}", token_manager.token_path().display());

    let provider = Arc::new(GoogleCalendarProvider::new(token_manager));
    let service = SummaryService::from_config(provider, &config);
    let app = handlers::router(service);

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server shut down");
    Ok(())
}
