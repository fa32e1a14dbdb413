use roomsign::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting room summary server");

    // Load configuration
    let config = startup::load_config()?;

    // Start serving summaries
    startup::start_server(config).await
}
