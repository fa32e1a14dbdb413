//! Per-room summaries of today's remaining events.

pub mod google;
pub mod models;
pub mod provider;
mod service;
pub mod time;
pub mod token;

pub use google::GoogleCalendarProvider;
pub use models::{Event, RawEvent, RoomSummary};
pub use provider::{EventProvider, EventQuery, MAX_EVENTS};
pub use service::SummaryService;
pub use time::{process_time, MeridiemPolicy};
pub use token::TokenManager;
