use super::models::{Event, RoomSummary};
use super::provider::{EventProvider, EventQuery, MAX_EVENTS};
use super::time::{title_case, today_window, MeridiemPolicy};
use crate::config::{RoomDirectory, ServerConfig};
use crate::error::AppResult;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, info};

/// Builds room summaries from provider events
#[derive(Clone)]
pub struct SummaryService {
    provider: Arc<dyn EventProvider>,
    rooms: RoomDirectory,
    timezone: Tz,
    policy: MeridiemPolicy,
}

impl SummaryService {
    pub fn new(
        provider: Arc<dyn EventProvider>,
        rooms: RoomDirectory,
        timezone: Tz,
        policy: MeridiemPolicy,
    ) -> Self {
        Self {
            provider,
            rooms,
            timezone,
            policy,
        }
    }

    /// Create a service with the rooms, timezone and policy from config
    pub fn from_config(provider: Arc<dyn EventProvider>, config: &ServerConfig) -> Self {
        Self::new(
            provider,
            config.rooms.clone(),
            config.timezone,
            config.meridiem_policy,
        )
    }

    /// Summary of the rest of today for a room
    pub async fn get_room_summary(&self, room: &str) -> AppResult<RoomSummary> {
        self.get_room_summary_at(room, Utc::now()).await
    }

    /// Summary of the rest of the day containing `now`
    pub async fn get_room_summary_at(&self, room: &str, now: DateTime<Utc>) -> AppResult<RoomSummary> {
        let calendar_id = self.rooms.resolve(room)?;
        let window = today_window(now, self.timezone)?;

        let query = EventQuery {
            calendar_id: calendar_id.to_string(),
            time_min: window.time_min,
            time_max: window.time_max,
            max_results: MAX_EVENTS,
        };

        let raw_events = self.provider.list_events(&query).await?;

        // All-day items do not take one of the displayed slots
        let mut events = Vec::with_capacity(MAX_EVENTS);
        for raw in &raw_events {
            if events.len() == MAX_EVENTS {
                break;
            }
            match Event::from_raw(raw, self.policy)? {
                Some(event) => events.push(event),
                None => debug!("Skipping all-day event {:?} in {}", raw.summary, room),
            }
        }

        info!("Serving {} events for room {}", events.len(), room);

        Ok(RoomSummary {
            room_name: title_case(room),
            todays_date: window.todays_date,
            events,
        })
    }
}
