use crate::error::{config_error, time_format_error, AppResult, Error};
use chrono::{DateTime, Datelike, SecondsFormat, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use std::fmt;
use std::str::FromStr;

/// Rule for turning a 24-hour hour into a 12-hour clock label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeridiemPolicy {
    /// Midnight is 12am, noon is 12pm
    #[default]
    Standard,
    /// Only hours after 12 are pm; noon reads 12am and midnight 0am.
    /// Matches the labels older displays were built against.
    Legacy,
}

impl MeridiemPolicy {
    /// Split an hour in 0..=23 into the displayed hour and its suffix
    pub fn label(self, hour: u32) -> (u32, &'static str) {
        match self {
            MeridiemPolicy::Legacy => {
                if hour > 12 {
                    (hour - 12, "pm")
                } else {
                    (hour, "am")
                }
            }
            MeridiemPolicy::Standard => match hour {
                0 => (12, "am"),
                1..=11 => (hour, "am"),
                12 => (12, "pm"),
                _ => (hour - 12, "pm"),
            },
        }
    }
}

impl FromStr for MeridiemPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(MeridiemPolicy::Standard),
            "legacy" => Ok(MeridiemPolicy::Legacy),
            other => Err(config_error(&format!(
                "Invalid MERIDIEM_POLICY '{}', expected 'standard' or 'legacy'",
                other
            ))),
        }
    }
}

impl fmt::Display for MeridiemPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeridiemPolicy::Standard => f.write_str("standard"),
            MeridiemPolicy::Legacy => f.write_str("legacy"),
        }
    }
}

/// Format a clock time as `H:MMam` / `H:MMpm`
pub fn format_clock(hour: u32, minute: u32, policy: MeridiemPolicy) -> String {
    let (hour, suffix) = policy.label(hour);
    format!("{}:{:02}{}", hour, minute, suffix)
}

/// Turn a provider timestamp into a `(M/D, H:MMam|pm)` pair.
///
/// The wall-clock fields are taken as written; the offset is assumed to be
/// the service timezone's and is not converted.
pub fn process_time(timestamp: &str, policy: MeridiemPolicy) -> AppResult<(String, String)> {
    let parsed = DateTime::parse_from_rfc3339(timestamp.trim())
        .map_err(|e| time_format_error(&format!("'{}': {}", timestamp, e)))?;

    let date = format!("{}/{}", parsed.month(), parsed.day());
    let time = format_clock(parsed.hour(), parsed.minute(), policy);

    Ok((date, time))
}

/// Format a date as `M/D` without padding
pub fn short_date<T: Datelike>(date: &T) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// Time range of the provider query: from now until the end of today
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    /// `M/D` of today in the service timezone
    pub todays_date: String,
    /// RFC 3339 timestamp for now
    pub time_min: String,
    /// RFC 3339 timestamp for 23:59:59 today
    pub time_max: String,
}

/// Compute the query window for `now` in the given timezone
pub fn today_window(now: DateTime<Utc>, timezone: Tz) -> AppResult<DayWindow> {
    let local_now = now.with_timezone(&timezone);

    let end_of_day = local_now
        .date_naive()
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| time_format_error("Failed to create end of day"))?;
    let end_of_day = match timezone.from_local_datetime(&end_of_day) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(_, _) => {
            return Err(time_format_error("Ambiguous local time"));
        }
        chrono::LocalResult::None => {
            return Err(time_format_error("Invalid local time"));
        }
    };

    Ok(DayWindow {
        todays_date: short_date(&local_now),
        time_min: local_now.to_rfc3339_opts(SecondsFormat::Secs, false),
        time_max: end_of_day.to_rfc3339_opts(SecondsFormat::Secs, false),
    })
}

/// Title-case a room identifier: each run of letters starts uppercase,
/// the rest of the run is lowercase
pub fn title_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut previous_is_letter = false;

    for c in input.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_time_morning_and_evening() {
        let policy = MeridiemPolicy::Standard;

        assert_eq!(
            process_time("2017-12-25T08:00:00-07:00", policy).unwrap(),
            ("12/25".to_string(), "8:00am".to_string())
        );
        assert_eq!(
            process_time("2017-12-25T20:00:00-07:00", policy).unwrap(),
            ("12/25".to_string(), "8:00pm".to_string())
        );
    }

    #[test]
    fn test_process_time_ignores_offset() {
        // The wall clock is kept even when the offset differs from the zone's
        let (date, time) = process_time("2017-01-05T09:05:00-08:00", MeridiemPolicy::Standard).unwrap();
        assert_eq!(date, "1/5");
        assert_eq!(time, "9:05am");
    }

    #[test]
    fn test_noon_and_midnight_per_policy() {
        assert_eq!(
            process_time("2017-12-25T12:00:00-07:00", MeridiemPolicy::Standard).unwrap().1,
            "12:00pm"
        );
        assert_eq!(
            process_time("2017-12-25T12:00:00-07:00", MeridiemPolicy::Legacy).unwrap().1,
            "12:00am"
        );
        assert_eq!(
            process_time("2017-12-25T00:30:00-07:00", MeridiemPolicy::Standard).unwrap().1,
            "12:30am"
        );
        assert_eq!(
            process_time("2017-12-25T00:30:00-07:00", MeridiemPolicy::Legacy).unwrap().1,
            "0:30am"
        );
    }

    #[test]
    fn test_policies_agree_away_from_boundaries() {
        for hour in (1..12).chain(13..24) {
            assert_eq!(
                MeridiemPolicy::Standard.label(hour),
                MeridiemPolicy::Legacy.label(hour),
                "hour {}",
                hour
            );
        }
    }

    #[test]
    fn test_minutes_are_padded() {
        assert_eq!(format_clock(7, 5, MeridiemPolicy::Standard), "7:05am");
        assert_eq!(format_clock(23, 59, MeridiemPolicy::Standard), "11:59pm");
    }

    #[test]
    fn test_process_time_rejects_garbage() {
        assert!(matches!(
            process_time("tomorrow at noon", MeridiemPolicy::Standard),
            Err(Error::TimeFormat(_))
        ));
        assert!(process_time("2017-12-25", MeridiemPolicy::Standard).is_err());
    }

    #[test]
    fn test_meridiem_policy_from_str() {
        assert_eq!("legacy".parse::<MeridiemPolicy>().unwrap(), MeridiemPolicy::Legacy);
        assert_eq!(" Standard ".parse::<MeridiemPolicy>().unwrap(), MeridiemPolicy::Standard);
        assert!("military".parse::<MeridiemPolicy>().is_err());
    }

    #[test]
    fn test_today_window() {
        // 2017-12-25 16:30 UTC is 08:30 in Los Angeles (PST, -08:00)
        let now = Utc.with_ymd_and_hms(2017, 12, 25, 16, 30, 0).unwrap();
        let window = today_window(now, chrono_tz::US::Pacific).unwrap();

        assert_eq!(window.todays_date, "12/25");
        assert_eq!(window.time_min, "2017-12-25T08:30:00-08:00");
        assert_eq!(window.time_max, "2017-12-25T23:59:59-08:00");
    }

    #[test]
    fn test_today_window_uses_local_date() {
        // Early UTC morning is still the previous evening in Los Angeles
        let now = Utc.with_ymd_and_hms(2018, 7, 4, 3, 0, 0).unwrap();
        let window = today_window(now, chrono_tz::US::Pacific).unwrap();

        assert_eq!(window.todays_date, "7/3");
        assert_eq!(window.time_max, "2018-07-03T23:59:59-07:00");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("oak"), "Oak");
        assert_eq!(title_case("BIG PINE"), "Big Pine");
        assert_eq!(title_case("room-2a"), "Room-2A");
        assert_eq!(title_case(""), "");
    }
}
