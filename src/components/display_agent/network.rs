use crate::config::AgentConfig;
use crate::error::{config_error, network_error, AppResult};
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info};
use url::Url;

/// Network station interface of the device
#[async_trait]
pub trait Network: Send {
    /// Switch the radio into station mode
    async fn activate(&mut self) -> AppResult<()>;

    /// Whether the station currently has a working link
    async fn is_connected(&mut self) -> bool;

    /// Start joining a network; completion is observed through `is_connected`
    async fn begin_connect(&mut self, ssid: &str, password: &str) -> AppResult<()>;
}

/// Join the configured network, polling with doubling delays until
/// `connect_timeout` runs out
pub async fn connect_with_backoff(network: &mut dyn Network, config: &AgentConfig) -> AppResult<()> {
    network.activate().await?;

    if network.is_connected().await {
        debug!("Network already connected");
        return Ok(());
    }

    network
        .begin_connect(&config.wifi_ssid, &config.wifi_password)
        .await?;

    let deadline = Instant::now() + config.connect_timeout;
    let mut delay = config.connect_poll_initial;

    loop {
        if network.is_connected().await {
            info!("Connected to {}", config.wifi_ssid);
            return Ok(());
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(network_error(&format!(
                "Timed out after {:?} joining {}",
                config.connect_timeout, config.wifi_ssid
            )));
        }

        sleep(delay.min(deadline - now)).await;
        delay = (delay * 2).min(config.connect_poll_max);
    }
}

/// Host station: the link counts as up when the OS has a route to the
/// summary server. Nothing is sent, so a server that is down still counts
/// as connected and surfaces later as a fetch failure.
pub struct RouteCheckNetwork {
    host: String,
    port: u16,
    check_timeout: Duration,
    active: bool,
}

impl RouteCheckNetwork {
    pub fn new(server_address: &Url) -> AppResult<Self> {
        let host = server_address
            .host_str()
            .ok_or_else(|| config_error("SERVER_ADDRESS has no host"))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = server_address
            .port_or_known_default()
            .ok_or_else(|| config_error("SERVER_ADDRESS has no port"))?;

        Ok(Self {
            host,
            port,
            check_timeout: Duration::from_secs(1),
            active: false,
        })
    }

    /// Resolve the server and ask the OS to pick a route to it
    async fn route_to_server(&self) -> AppResult<SocketAddr> {
        let target = lookup_host((self.host.as_str(), self.port))
            .await?
            .next()
            .ok_or_else(|| network_error(&format!("No address for {}", self.host)))?;

        let local: SocketAddr = match target {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(target).await?;

        Ok(socket.local_addr()?)
    }
}

#[async_trait]
impl Network for RouteCheckNetwork {
    async fn activate(&mut self) -> AppResult<()> {
        self.active = true;
        Ok(())
    }

    async fn is_connected(&mut self) -> bool {
        if !self.active {
            return false;
        }

        match timeout(self.check_timeout, self.route_to_server()).await {
            Ok(Ok(local)) => {
                debug!("Route to {} via {}", self.host, local);
                true
            }
            Ok(Err(e)) => {
                debug!("No route to {}: {}", self.host, e);
                false
            }
            Err(_) => false,
        }
    }

    async fn begin_connect(&mut self, ssid: &str, _password: &str) -> AppResult<()> {
        // Association is handled by the host OS
        info!("Joining network {}", ssid);
        Ok(())
    }
}
