//! Date cell parsing.
//!
//! Sheets carry dates as `d-m-y` or `y-m-d`, separated by `-` or `/`,
//! optionally followed by a time. The year is told apart from the day by
//! size: a component above 100 is the year. Anything ambiguous fails.

use chrono::NaiveDate;

const MAX_YEAR: i64 = 9999;

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let date = text.split(' ').next().unwrap_or_default().replace('/', "-");
    let parts: Vec<&str> = date.split('-').collect();
    let [first, month, last] = parts.as_slice() else {
        return None;
    };
    let first: i64 = first.trim().parse().ok()?;
    let month: i64 = month.trim().parse().ok()?;
    let last: i64 = last.trim().parse().ok()?;
    if !(1..=12).contains(&month) {
        return None;
    }
    let (year, day) = if first > 100 {
        (first, last)
    } else if last > 100 {
        (last, first)
    } else {
        return None;
    };
    if year > MAX_YEAR {
        return None;
    }
    NaiveDate::from_ymd_opt(
        i32::try_from(year).ok()?,
        u32::try_from(month).ok()?,
        u32::try_from(day).ok()?,
    )
}

/// `YYYY-MM-DD` rendering of a parsed date.
pub fn normalize_date(text: &str) -> Option<String> {
    parse_date(text).map(|date| date.format("%Y-%m-%d").to_string())
}
