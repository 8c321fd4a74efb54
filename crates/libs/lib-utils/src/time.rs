//! # Time Utilities
//!
//! Date formatting for listing cards and comment threads, using chrono.
//!
//! Patterns use the tokens `YYYY`, `MM`, `DD`, `HH`, `mm` and `ss`. Each token
//! is substituted once, left to right, in that order.

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};

/// Pattern used by [`format_date`] callers that have no preference.
pub const DEFAULT_DATE_PATTERN: &str = "YYYY-MM-DD HH:mm:ss";

/// Get current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format any date-time with a `YYYY-MM-DD HH:mm:ss` style pattern.
pub fn format_date<T: Datelike + Timelike>(time: &T, pattern: &str) -> String {
    pattern
        .replacen("YYYY", &time.year().to_string(), 1)
        .replacen("MM", &format!("{:02}", time.month()), 1)
        .replacen("DD", &format!("{:02}", time.day()), 1)
        .replacen("HH", &format!("{:02}", time.hour()), 1)
        .replacen("mm", &format!("{:02}", time.minute()), 1)
        .replacen("ss", &format!("{:02}", time.second()), 1)
}

/// Render `time` relative to `now` ("5分钟前", "3小时前", "2天前").
///
/// With a pattern other than `"relative"`, the date is formatted with it
/// instead. Anything 30 days or older falls back to `YYYY-MM-DD`.
pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>, now: &DateTime<Tz>, pattern: Option<&str>) -> String {
    match pattern {
        None | Some("relative") => {
            let diff_ms = now.clone().signed_duration_since(time.clone()).num_milliseconds();
            let minutes = diff_ms.div_euclid(60_000);
            let hours = minutes.div_euclid(60);
            let days = hours.div_euclid(24);

            if minutes < 60 {
                format!("{}分钟前", minutes)
            } else if hours < 24 {
                format!("{}小时前", hours)
            } else if days < 30 {
                format!("{}天前", days)
            } else {
                format_date(time, "YYYY-MM-DD")
            }
        }
        Some(pattern) => format_date(time, pattern),
    }
}

/// Year as a string ("2024").
pub fn format_year<T: Datelike>(time: &T) -> String {
    time.year().to_string()
}

/// Whole days between two instants, rounded up, order-independent.
pub fn days_between<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> i64 {
    const DAY_MS: i64 = 24 * 60 * 60 * 1000;
    let diff = b.clone().signed_duration_since(a.clone()).num_milliseconds().abs();
    (diff + DAY_MS - 1) / DAY_MS
}

/// Parse a backend timestamp to UTC.
///
/// Accepts RFC3339 (`2024-01-01T08:00:00Z`) and the naive
/// `2024-01-01 08:00:00` / `2024-01-01T08:00:00` forms, which are taken as UTC.
pub fn parse_utc(moment: &str) -> Result<DateTime<Utc>, Error> {
    let moment = moment.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(moment) {
        return Ok(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(moment, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| Error::FailToDateParse(moment.to_string()))
}

// region:    --- Error
#[derive(Debug)]
pub enum Error {
    FailToDateParse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error
