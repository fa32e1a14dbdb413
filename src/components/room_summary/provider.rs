use super::models::RawEvent;
use crate::error::AppResult;
use async_trait::async_trait;

/// Most events a room summary ever shows
pub const MAX_EVENTS: usize = 3;

/// Parameters of one provider query.
///
/// Recurring events are always expanded into single occurrences and results
/// are ordered by start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub calendar_id: String,
    pub time_min: String,
    pub time_max: String,
    pub max_results: usize,
}

/// Source of raw calendar events
#[async_trait]
pub trait EventProvider: Send + Sync {
    /// List events in the query window, earliest first
    async fn list_events(&self, query: &EventQuery) -> AppResult<Vec<RawEvent>>;
}
