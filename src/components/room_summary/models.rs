use super::time::{process_time, MeridiemPolicy};
use crate::error::{google_calendar_error, AppResult};
use serde::{Deserialize, Serialize};

/// Title used when the provider hides or omits an event's summary
pub const UNNAMED_EVENT: &str = "Unnamed event";

/// Start or end of a provider event
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RawEventTime {
    pub date_time: Option<String>,
    /// Set instead of `date_time` for all-day events
    pub date: Option<String>,
}

/// Event record as returned by the calendar provider
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RawEvent {
    pub summary: Option<String>,
    #[serde(default)]
    pub start: RawEventTime,
    #[serde(default)]
    pub end: RawEventTime,
}

impl RawEvent {
    /// Build a timed event
    pub fn timed(summary: &str, start: &str, end: &str) -> Self {
        Self {
            summary: Some(summary.to_string()),
            start: RawEventTime {
                date_time: Some(start.to_string()),
                date: None,
            },
            end: RawEventTime {
                date_time: Some(end.to_string()),
                date: None,
            },
        }
    }

    /// True when the event spans whole days rather than clock times
    pub fn is_all_day(&self) -> bool {
        self.start.date_time.is_none() && self.start.date.is_some()
    }
}

/// One event as shown on the display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub summary: String,
    pub time_display: String,
    pub long_display: String,
}

impl Event {
    /// Derive every display field from the raw start and end timestamps
    pub fn new(start: &str, end: &str, summary: &str, policy: MeridiemPolicy) -> AppResult<Self> {
        let (start_date, start_time) = process_time(start, policy)?;
        let (end_date, end_time) = process_time(end, policy)?;
        let time_display = format!("{}-{}", start_time, end_time);
        let long_display = format!("{} {}", time_display, summary);

        Ok(Self {
            start_date,
            start_time,
            end_date,
            end_time,
            summary: summary.to_string(),
            time_display,
            long_display,
        })
    }

    /// Convert a provider record; all-day events have no clock time and give `None`
    pub fn from_raw(raw: &RawEvent, policy: MeridiemPolicy) -> AppResult<Option<Self>> {
        if raw.is_all_day() {
            return Ok(None);
        }

        let start = raw
            .start
            .date_time
            .as_deref()
            .ok_or_else(|| google_calendar_error("Event has no start time"))?;
        let end = raw
            .end
            .date_time
            .as_deref()
            .ok_or_else(|| google_calendar_error("Event has no end time"))?;
        let summary = raw.summary.as_deref().unwrap_or(UNNAMED_EVENT);

        Self::new(start, end, summary, policy).map(Some)
    }
}

/// Summary payload for one room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomSummary {
    pub room_name: String,
    pub todays_date: String,
    pub events: Vec<Event>,
}
