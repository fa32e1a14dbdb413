use super::models::RawEvent;
use super::provider::{EventProvider, EventQuery};
use super::token::TokenManager;
use crate::error::{google_calendar_error, AppResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars";

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<RawEvent>,
}

/// Event provider backed by the Google Calendar v3 API
#[derive(Clone)]
pub struct GoogleCalendarProvider {
    token_manager: TokenManager,
    client: Client,
}

impl GoogleCalendarProvider {
    pub fn new(token_manager: TokenManager) -> Self {
        Self {
            token_manager,
            client: Client::new(),
        }
    }

    /// Build the events URL with the query parameters
    pub fn events_url(query: &EventQuery) -> AppResult<Url> {
        let mut url = Url::parse(CALENDAR_API_BASE)
            .map_err(|e| google_calendar_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| google_calendar_error("Calendar API URL cannot have a path"))?
            .push(&query.calendar_id)
            .push("events");

        url.query_pairs_mut()
            .append_pair("timeMin", &query.time_min)
            .append_pair("timeMax", &query.time_max)
            .append_pair("maxResults", &query.max_results.to_string())
            .append_pair("singleEvents", "true")
            .append_pair("orderBy", "startTime");

        Ok(url)
    }
}

#[async_trait]
impl EventProvider for GoogleCalendarProvider {
    async fn list_events(&self, query: &EventQuery) -> AppResult<Vec<RawEvent>> {
        let access_token = self.token_manager.get_access_token().await?;
        let url = Self::events_url(query)?;
        debug!("Fetching events for calendar {}", query.calendar_id);

        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to fetch events: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to fetch events: HTTP {} - {}",
                status, error_body
            )));
        }

        let list: EventList = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse events response: {}", e)))?;

        Ok(list.items)
    }
}
