use crate::config::ServerConfig;
use crate::error::{google_calendar_error, AppResult};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Seconds before expiry at which a token is already treated as stale
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Token as kept in the credential file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp in seconds
    pub expires_at: i64,
}

/// Body of a successful response from the OAuth token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl StoredToken {
    /// Build a stored token from an endpoint response, keeping the old
    /// refresh token when the response carries none
    pub fn from_response(response: TokenResponse, previous_refresh: Option<String>, now: i64) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: now + response.expires_in.unwrap_or(3600),
        }
    }

    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at - EXPIRY_MARGIN_SECS > now
    }
}

/// File-backed OAuth token store that refreshes expired tokens
#[derive(Clone)]
pub struct TokenManager {
    token_path: PathBuf,
    client_id: String,
    client_secret: String,
    client: Client,
}

impl TokenManager {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            token_path: config.token_path.clone(),
            client_id: config.google_client_id.clone(),
            client_secret: config.google_client_secret.clone(),
            client: Client::new(),
        }
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Get a valid access token, refreshing the stored one when it has expired
    pub async fn get_access_token(&self) -> AppResult<String> {
        let token = self.load_token().await?;
        if token.is_valid_at(Utc::now().timestamp()) {
            return Ok(token.access_token);
        }

        let refreshed = self.refresh_token(&token).await?;
        Ok(refreshed.access_token)
    }

    /// Read the stored token
    pub async fn load_token(&self) -> AppResult<StoredToken> {
        let content = tokio::fs::read_to_string(&self.token_path).await.map_err(|e| {
            google_calendar_error(&format!(
                "No token at {} ({}). Run get_calendar_token first.",
                self.token_path.display(),
                e
            ))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| google_calendar_error(&format!("Failed to parse token JSON: {}", e)))
    }

    /// Exchange the refresh token for a new access token and store it
    async fn refresh_token(&self, token: &StoredToken) -> AppResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| google_calendar_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.client_id.clone()),
            ("client_secret", self.client_secret.clone()),
            ("refresh_token", refresh_token.clone()),
            ("grant_type", "refresh_token".to_string()),
        ];

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        let stored = StoredToken::from_response(body, Some(refresh_token), Utc::now().timestamp());
        self.set_token(&stored).await?;
        info!("Refreshed Google Calendar access token");

        Ok(stored)
    }

    /// Write a token to the credential file
    pub async fn set_token(&self, token: &StoredToken) -> AppResult<()> {
        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Readers only ever see a complete file
        let json = serde_json::to_string_pretty(token)?;
        let temp_path = self.temp_path();
        if let Err(e) = tokio::fs::write(&temp_path, json).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e.into());
        }
        tokio::fs::rename(&temp_path, &self.token_path).await?;

        Ok(())
    }

    /// Unique sibling of the token file, so concurrent writers do not share it
    fn temp_path(&self) -> PathBuf {
        let name = self
            .token_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "token".to_string());
        self.token_path
            .with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoomDirectory;

    fn manager_at(dir: &Path) -> TokenManager {
        let config = ServerConfig {
            google_client_id: "client".to_string(),
            google_client_secret: "secret".to_string(),
            token_path: dir.join("calendar-token.json"),
            rooms: RoomDirectory::new([("oak", "oak-calendar")]),
            timezone: chrono_tz::US::Pacific,
            meridiem_policy: Default::default(),
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
        };
        TokenManager::new(&config)
    }

    fn token(access: &str) -> StoredToken {
        StoredToken {
            access_token: access.to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_at: 4_102_444_800,
        }
    }

    #[tokio::test]
    async fn test_overlapping_writes_leave_a_whole_token() {
        let dir = std::env::temp_dir().join(format!("roomsign-token-{}", uuid::Uuid::new_v4()));
        let manager = manager_at(&dir);

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.set_token(&token(&format!("access-{}", i))).await })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        let stored = manager.load_token().await.unwrap();
        assert!(stored.access_token.starts_with("access-"));
        assert_eq!(manager.get_access_token().await.unwrap(), stored.access_token);

        // Only the token file remains
        let entries = std::fs::read_dir(&dir).unwrap().count();
        assert_eq!(entries, 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_from_response_keeps_refresh_token() {
        let response = TokenResponse {
            access_token: "new-access".to_string(),
            refresh_token: None,
            expires_in: Some(3599),
        };

        let token = StoredToken::from_response(response, Some("refresh".to_string()), 1_000);
        assert_eq!(token.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(token.expires_at, 4_599);
    }

    #[test]
    fn test_token_validity_margin() {
        let token = StoredToken {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: 1_000,
        };

        assert!(token.is_valid_at(900));
        assert!(!token.is_valid_at(950));
        assert!(!token.is_valid_at(1_000));
    }
}
