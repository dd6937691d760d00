//! Small display formatting helpers shared by commands and the TUI.

use chrono::{DateTime, NaiveDate, Utc};

/// `14.2 acres`
#[must_use]
pub fn acres(area: f64) -> String {
    format!("{area:.1} acres")
}

/// Hours as `45 min` below one hour, `2.5 hrs` otherwise.
#[must_use]
pub fn hours(h: f64) -> String {
    if h < 1.0 {
        format!("{} min", (h * 60.0).round() as i64)
    } else {
        format!("{h:.1} hrs")
    }
}

/// `Jun 14, 2024`
#[must_use]
pub fn date(d: NaiveDate) -> String {
    d.format("%b %-d, %Y").to_string()
}

/// Calendar date of a UTC timestamp, `Jun 14, 2024`.
#[must_use]
pub fn datetime(dt: DateTime<Utc>) -> String {
    date(dt.date_naive())
}

/// `open` -> `Open`, `in_progress` -> `In progress`
#[must_use]
pub fn title_case(value: &str) -> String {
    let mut chars = value.replace('_', " ").chars().collect::<Vec<_>>();
    if let Some(first) = chars.first_mut() {
        *first = first.to_ascii_uppercase();
    }
    chars.into_iter().collect()
}
