//! Date Codec
//!
//! Due dates, creation dates and closed dates are stored as `month/day/year`
//! strings. Parsing accepts unpadded segments; formatting always pads.

use chrono::{Duration, Local, NaiveDate};

/// chrono format used when writing dates
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Parse `month/day/year`
///
/// Returns `None` for a wrong segment count, a non-numeric segment, or a
/// date that does not exist on the calendar.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    if parts
        .iter()
        .any(|part| part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let month = parts[0].parse::<u32>().ok()?;
    let day = parts[1].parse::<u32>().ok()?;
    let year = parts[2].parse::<i32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Format as zero-padded `MM/dd/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn today_string() -> String {
    format_date(today())
}

pub fn tomorrow_string() -> String {
    format_date(today() + Duration::days(1))
}

pub fn next_week_string() -> String {
    format_date(today() + Duration::weeks(1))
}

/// Whether a due date lies strictly before `today`
///
/// Missing or unparseable dates are never overdue.
pub fn is_overdue(due_date: Option<&str>, today: NaiveDate) -> bool {
    due_date
        .and_then(parse_date)
        .map(|due| due < today)
        .unwrap_or(false)
}
