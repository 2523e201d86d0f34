//! Date normalization and the month name table.

use chrono::{Datelike, NaiveDate};

/// Month names and abbreviations accepted by the natural-language scan.
pub(crate) const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("jan", 1),
    ("february", 2),
    ("feb", 2),
    ("march", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("june", 6),
    ("jun", 6),
    ("july", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oct", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dec", 12),
];

pub(crate) fn month_number(name: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(month, _)| month.eq_ignore_ascii_case(name))
        .map(|(_, number)| *number)
}

/// Formats `normalize` recognizes, tried in order.
const KNOWN_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%B %d, %Y",
    "%d %B %Y",
];

/// Years below this are artifacts of partial parses (a strategy
/// defaulting the year to 1) and get repaired.
const MIN_PLAUSIBLE_YEAR: i32 = 2020;

/// Coerce a date string to ISO 8601, repairing implausible years.
///
/// Input matching no known format comes back unchanged so the caller
/// can surface it downstream; this function never fails.
pub fn normalize(value: &str, today: NaiveDate) -> String {
    let trimmed = value.trim();
    for format in KNOWN_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return match repair_year(parsed, today) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => value.to_string(),
            };
        }
    }
    value.to_string()
}

/// Replace an implausible year with the reference year, rolling one
/// year further when the repaired date has already passed.
fn repair_year(date: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    if date.year() >= MIN_PLAUSIBLE_YEAR {
        return Some(date);
    }
    let this_year = date.with_year(today.year())?;
    if this_year < today {
        this_year.with_year(today.year() + 1)
    } else {
        Some(this_year)
    }
}
