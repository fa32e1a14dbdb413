use crate::config::AgentConfig;
use crate::error::{config_error, network_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Where the display gets its room summary from
#[async_trait]
pub trait SummarySource: Send + Sync {
    /// Fetch the raw summary body for a room
    async fn fetch(&self, room: &str) -> AppResult<String>;
}

/// Summary source that calls the summary server over HTTP
pub struct HttpSummarySource {
    client: Client,
    base: Url,
}

impl HttpSummarySource {
    pub fn new(config: &AgentConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| config_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base: config.server_address.clone(),
        })
    }
}

/// `{server_address}/{room}`, keeping any path prefix of the server address
pub fn summary_url(base: &Url, room: &str) -> AppResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| config_error("SERVER_ADDRESS cannot be a base URL"))?
        .pop_if_empty()
        .push(room);
    Ok(url)
}

#[async_trait]
impl SummarySource for HttpSummarySource {
    async fn fetch(&self, room: &str) -> AppResult<String> {
        let url = summary_url(&self.base, room)?;
        debug!("Requesting {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(network_error(&format!("Summary server returned HTTP {}", status)));
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_url() {
        let base = Url::parse("http://192.168.1.10:5000").unwrap();
        assert_eq!(
            summary_url(&base, "oak").unwrap().as_str(),
            "http://192.168.1.10:5000/oak"
        );

        let base = Url::parse("http://pi.local/rooms/").unwrap();
        assert_eq!(
            summary_url(&base, "oak").unwrap().as_str(),
            "http://pi.local/rooms/oak"
        );
    }
}
