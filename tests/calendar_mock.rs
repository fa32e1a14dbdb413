use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use roomsign::components::room_summary::{
    EventProvider, EventQuery, MeridiemPolicy, RawEvent, SummaryService,
};
use roomsign::config::RoomDirectory;
use roomsign::error::{google_calendar_error, AppResult, Error};
use std::sync::{Arc, Mutex};

/// Mock calendar provider that records the queries it receives
#[derive(Clone, Default)]
pub struct MockProvider {
    events: Vec<RawEvent>,
    fail: bool,
    queries: Arc<Mutex<Vec<EventQuery>>>,
}

impl MockProvider {
    /// Create a mock returning the given events
    pub fn new(events: Vec<RawEvent>) -> Self {
        Self {
            events,
            ..Default::default()
        }
    }

    /// Create a mock whose every query fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<EventQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventProvider for MockProvider {
    async fn list_events(&self, query: &EventQuery) -> AppResult<Vec<RawEvent>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(google_calendar_error("Failed to fetch events: HTTP 401"));
        }
        Ok(self.events.clone())
    }
}

fn standup_and_review() -> Vec<RawEvent> {
    vec![
        RawEvent::timed("Standup", "2017-12-25T07:00:00-08:00", "2017-12-25T07:30:00-08:00"),
        RawEvent::timed("Review", "2017-12-25T09:00:00-08:00", "2017-12-25T09:30:00-08:00"),
    ]
}

fn service_with(provider: &MockProvider) -> SummaryService {
    let rooms = RoomDirectory::new([
        ("oak", "oak@resource.calendar.google.com"),
        ("maple", "maple@resource.calendar.google.com"),
    ]);
    SummaryService::new(
        Arc::new(provider.clone()),
        rooms,
        chrono_tz::US::Pacific,
        MeridiemPolicy::Standard,
    )
}

/// 06:00 Pacific on Christmas 2017
fn christmas_morning() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2017, 12, 25, 14, 0, 0).unwrap()
}

#[tokio::test]
async fn test_room_summary_for_oak() {
    let provider = MockProvider::new(standup_and_review());
    let service = service_with(&provider);

    let summary = service
        .get_room_summary_at("oak", christmas_morning())
        .await
        .unwrap();

    assert_eq!(summary.room_name, "Oak");
    assert_eq!(summary.todays_date, "12/25");
    assert_eq!(summary.events.len(), 2);
    assert_eq!(summary.events[0].time_display, "7:00am-7:30am");
    assert_eq!(summary.events[0].summary, "Standup");
    assert_eq!(summary.events[1].long_display, "9:00am-9:30am Review");
}

#[tokio::test]
async fn test_query_covers_rest_of_today() {
    let provider = MockProvider::new(Vec::new());
    let service = service_with(&provider);

    service
        .get_room_summary_at("OAK", christmas_morning())
        .await
        .unwrap();

    let queries = provider.queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].calendar_id, "oak@resource.calendar.google.com");
    assert_eq!(queries[0].time_min, "2017-12-25T06:00:00-08:00");
    assert_eq!(queries[0].time_max, "2017-12-25T23:59:59-08:00");
    assert_eq!(queries[0].max_results, 3);
}

#[tokio::test]
async fn test_summary_is_capped_at_three_events() {
    let events = (0..5)
        .map(|i| {
            RawEvent::timed(
                &format!("Meeting {}", i),
                &format!("2017-12-25T1{}:00:00-08:00", i),
                &format!("2017-12-25T1{}:45:00-08:00", i),
            )
        })
        .collect();
    let provider = MockProvider::new(events);
    let service = service_with(&provider);

    let summary = service
        .get_room_summary_at("maple", christmas_morning())
        .await
        .unwrap();

    assert_eq!(summary.events.len(), 3);
    assert_eq!(summary.events[0].summary, "Meeting 0");
    assert_eq!(summary.events[2].time_display, "12:00pm-12:45pm");
}

#[tokio::test]
async fn test_all_day_events_are_skipped() {
    let mut events = standup_and_review();
    let all_day: RawEvent = serde_json::from_str(
        r#"{"summary": "Holiday", "start": {"date": "2017-12-25"}, "end": {"date": "2017-12-26"}}"#,
    )
    .unwrap();
    events.insert(0, all_day);

    let provider = MockProvider::new(events);
    let summary = service_with(&provider)
        .get_room_summary_at("oak", christmas_morning())
        .await
        .unwrap();

    assert_eq!(summary.events.len(), 2);
    assert_eq!(summary.events[0].summary, "Standup");
}

#[tokio::test]
async fn test_all_day_event_does_not_take_a_slot() {
    let all_day: RawEvent = serde_json::from_str(
        r#"{"summary": "Holiday", "start": {"date": "2017-12-25"}, "end": {"date": "2017-12-26"}}"#,
    )
    .unwrap();
    let mut events = vec![all_day];
    events.extend(["A", "B", "C", "D"].iter().enumerate().map(|(i, title)| {
        RawEvent::timed(
            title,
            &format!("2017-12-25T1{}:00:00-08:00", i),
            &format!("2017-12-25T1{}:30:00-08:00", i),
        )
    }));

    let provider = MockProvider::new(events);
    let summary = service_with(&provider)
        .get_room_summary_at("oak", christmas_morning())
        .await
        .unwrap();

    let titles: Vec<&str> = summary.events.iter().map(|e| e.summary.as_str()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_unknown_room_is_not_found() {
    let provider = MockProvider::new(standup_and_review());
    let service = service_with(&provider);

    let result = service.get_room_summary_at("cedar", christmas_morning()).await;

    assert!(matches!(result, Err(Error::UnknownRoom(ref room)) if room == "cedar"));
    assert!(provider.queries().is_empty());
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let provider = MockProvider::failing();
    let service = service_with(&provider);

    let result = service.get_room_summary_at("oak", christmas_morning()).await;

    assert!(matches!(result, Err(Error::GoogleCalendar(_))));
}

#[tokio::test]
async fn test_repeated_requests_are_identical() {
    let provider = MockProvider::new(standup_and_review());
    let service = service_with(&provider);
    let now = christmas_morning();

    let first = service.get_room_summary_at("oak", now).await.unwrap();
    let second = service
        .get_room_summary_at("oak", now + chrono::Duration::seconds(30))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_legacy_policy_labels_noon_am() {
    let provider = MockProvider::new(vec![RawEvent::timed(
        "Lunch",
        "2017-12-25T12:00:00-08:00",
        "2017-12-25T13:00:00-08:00",
    )]);
    let service = SummaryService::new(
        Arc::new(provider),
        RoomDirectory::new([("oak", "oak-calendar")]),
        chrono_tz::US::Pacific,
        MeridiemPolicy::Legacy,
    );

    let summary = service
        .get_room_summary_at("oak", christmas_morning())
        .await
        .unwrap();

    assert_eq!(summary.events[0].time_display, "12:00am-1:00pm");
}
