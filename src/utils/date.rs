// src/utils/date.rs

//! Best-effort date parsing for tracker status lines.
//!
//! Status blocks read like `11-21-2018 09:20 AM by SSG_RedPanda`,
//! `November 21-2018 09:20 AM by ...` or `Today 09:20 AM by ...`. The parser
//! looks for a date and a time anywhere in the text and ignores the rest.

use std::sync::LazyLock;

use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use regex::Regex;

static NUMERIC_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{4})\b").unwrap());

static NAMED_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?(?:\s*[-,]\s*|\s+)(\d{4})\b",
    )
    .unwrap()
});

static RELATIVE_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(today|yesterday)\b").unwrap());

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}):(\d{2})(?::(\d{2}))?(?:\s*([ap])\.?m\.?\b)?").unwrap()
});

/// Parse a free-text posted-at string.
///
/// `today` anchors relative words and time-only strings. Returns `None`
/// when neither a date nor a time can be found, or the values are out of
/// range.
pub fn parse_posted_at(text: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    // Outer `None` means nothing date-like was found; inner `None` means it
    // was found but out of range, which fails the whole parse.
    let date = match find_date(text, today) {
        Some(found) => Some(found?),
        None => None,
    };
    let time = match find_time(text) {
        Some(found) => Some(found?),
        None => None,
    };

    if date.is_none() && time.is_none() {
        return None;
    }
    Some(NaiveDateTime::new(
        date.unwrap_or(today),
        time.unwrap_or_default(),
    ))
}

/// Convert a local wall-clock time into a Unix timestamp.
///
/// Times that fall into a DST gap are shifted forward by an hour.
pub fn local_timestamp(datetime: NaiveDateTime) -> Option<f64> {
    Local
        .from_local_datetime(&datetime)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(datetime + TimeDelta::hours(1)))
                .earliest()
        })
        .map(|dt| dt.timestamp() as f64)
}

fn find_date(text: &str, today: NaiveDate) -> Option<Option<NaiveDate>> {
    if let Some(caps) = NUMERIC_DATE.captures(text) {
        return Some(ymd(&caps[3], caps[1].parse().ok(), &caps[2]));
    }

    if let Some(caps) = NAMED_DATE.captures(text) {
        return Some(ymd(&caps[3], month_number(&caps[1]), &caps[2]));
    }

    let caps = RELATIVE_DAY.captures(text)?;
    if caps[1].eq_ignore_ascii_case("yesterday") {
        Some(today.checked_sub_days(Days::new(1)))
    } else {
        Some(Some(today))
    }
}

fn ymd(year: &str, month: Option<u32>, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month?, day.parse().ok()?)
}

fn find_time(text: &str) -> Option<Option<NaiveTime>> {
    let caps = TIME.captures(text)?;
    Some(time_from_parts(
        &caps[1],
        &caps[2],
        caps.get(3).map(|m| m.as_str()),
        caps.get(4).map(|m| m.as_str()),
    ))
}

fn time_from_parts(
    hour: &str,
    minute: &str,
    second: Option<&str>,
    meridiem: Option<&str>,
) -> Option<NaiveTime> {
    let mut hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    let second: u32 = second.map_or(Some(0), |s| s.parse().ok())?;

    if let Some(meridiem) = meridiem {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = meridiem.eq_ignore_ascii_case("p");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}
