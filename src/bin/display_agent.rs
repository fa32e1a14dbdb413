use roomsign::components::display_agent::{boot, store_for, DeepSleep, DisplayAgent, TimerSleep};
use roomsign::config::AgentConfig;
use roomsign::{shutdown, startup};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    let config = AgentConfig::load()?;
    info!(
        "Display for room {} polling {} every {}s",
        config.room_name,
        config.server_address,
        config.sleep_interval.as_secs()
    );

    let store = store_for(&config);
    let mut sleeper = TimerSleep;

    loop {
        // Every pass is a fresh power-on; only the state store carries over
        match DisplayAgent::for_host(&config) {
            Ok(mut agent) => {
                boot(&mut agent, store.as_ref()).await;
            }
            Err(e) => error!("Failed to initialize display agent: {}", e),
        }

        tokio::select! {
            _ = sleeper.deep_sleep(config.sleep_interval) => {}
            _ = shutdown::wait_for_signal() => {
                info!("Display agent stopped");
                break;
            }
        }
    }

    Ok(())
}
