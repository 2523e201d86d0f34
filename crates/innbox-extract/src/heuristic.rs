//! Deterministic booking extraction: regex and keyword heuristics.
//!
//! Five independent sub-extractions over the same text (name, two date
//! slots, room type, guest counts). Pure functions, no state between
//! calls; this strategy never fails, so it sits last in the
//! orchestrator's list.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use innbox_core::{Result, RoomType};

use crate::dates::{month_number, MONTHS};
use crate::strategy::{BookingDraft, ExtractionStrategy};

/// The always-available fallback strategy.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicStrategy;

#[async_trait]
impl ExtractionStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn extract(&self, text: &str, today: NaiveDate) -> Result<BookingDraft> {
        Ok(parse(text, today))
    }
}

/// Run all five sub-extractions over the text.
pub fn parse(text: &str, today: NaiveDate) -> BookingDraft {
    BookingDraft {
        guest_name: extract_name(text),
        check_in: extract_date(text, today, DateSlot::CheckIn),
        check_out: extract_date(text, today, DateSlot::CheckOut),
        room_type: extract_room_type(text),
        num_adults: ADULT_COUNT.extract(text),
        num_children: CHILD_COUNT.extract(text),
    }
}

// ---------------------------------------------------------------
// Guest name
// ---------------------------------------------------------------

/// Name patterns in precedence order; the first that matches wins.
/// The introducer is case-insensitive, the name itself must be
/// capitalized words.
static NAME_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i:my name is)\s+([A-Z][a-z]+(?: [A-Z][a-z]+)*)").unwrap(),
        Regex::new(r"(?i:booking for|guest(?:\s*name)?[:\s])\s*([A-Z][a-z]+(?: [A-Z][a-z]+)*)")
            .unwrap(),
        Regex::new(r"(?m)^(?i:hi|hello|dear)[,\s]+(?i:i am|i'm)\s+([A-Z][a-z]+(?: [A-Z][a-z]+)*)")
            .unwrap(),
    ]
});

fn extract_name(text: &str) -> Option<String> {
    NAME_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    })
}

// ---------------------------------------------------------------
// Dates
// ---------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateSlot {
    CheckIn,
    CheckOut,
}

static TOMORROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\btomorrow\b").unwrap());

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap());

/// "22nd March 2026" and "March 22, 2026", year optional. The day token
/// must end at a word boundary so a bare year is never read as a day.
static NATURAL_DATES: Lazy<Vec<Regex>> = Lazy::new(|| {
    let month = MONTHS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join("|");
    vec![
        Regex::new(&format!(
            r"(?i)\b(?P<day>\d{{1,2}})(?:st|nd|rd|th)?\s+(?P<month>{month})\b(?:,?\s*(?P<year>\d{{4}}))?"
        ))
        .unwrap(),
        Regex::new(&format!(
            r"(?i)\b(?P<month>{month})\s+(?P<day>\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s*(?P<year>\d{{4}}))?"
        ))
        .unwrap(),
    ]
});

/// Resolve one date slot with strict precedence: the word "tomorrow"
/// (check-in only), then explicit ISO dates in text order, then
/// natural-language dates sorted by their position in the text.
/// Booking requests near-universally state the check-in first, so
/// position is the disambiguation signal.
fn extract_date(text: &str, today: NaiveDate, slot: DateSlot) -> Option<String> {
    if slot == DateSlot::CheckIn && TOMORROW.is_match(text) {
        return today.succ_opt().map(iso);
    }

    // ISO dates are unambiguous and taken verbatim; the normalizer
    // downstream deals with anything that only looks like one.
    let iso_dates: Vec<&str> = ISO_DATE.find_iter(text).map(|m| m.as_str()).collect();
    if iso_dates.len() >= 2 {
        let pick = match slot {
            DateSlot::CheckIn => iso_dates[0],
            DateSlot::CheckOut => iso_dates[1],
        };
        return Some(pick.to_string());
    }
    if iso_dates.len() == 1 && slot == DateSlot::CheckIn {
        return Some(iso_dates[0].to_string());
    }

    let mut found: Vec<(usize, NaiveDate)> = Vec::new();
    for pattern in NATURAL_DATES.iter() {
        for caps in pattern.captures_iter(text) {
            let Some(date) = resolve_natural_date(&caps, today) else {
                continue;
            };
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            found.push((start, date));
        }
    }
    found.sort_by_key(|(start, _)| *start);

    let index = match slot {
        DateSlot::CheckIn => 0,
        DateSlot::CheckOut => 1,
    };
    found.get(index).map(|(_, date)| iso(*date))
}

/// Build a date from one natural-language match. A missing year means
/// the reference year, rolled forward when that date has already
/// passed; an explicitly written year is kept as-is. Invalid calendar
/// dates (February 30th) are dropped.
fn resolve_natural_date(caps: &regex::Captures<'_>, today: NaiveDate) -> Option<NaiveDate> {
    let day: u32 = caps.name("day")?.as_str().parse().ok()?;
    let month = month_number(caps.name("month")?.as_str())?;

    match caps.name("year") {
        Some(year) => {
            let year: i32 = year.as_str().parse().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        None => {
            let assumed = NaiveDate::from_ymd_opt(today.year(), month, day)?;
            if assumed < today {
                NaiveDate::from_ymd_opt(today.year() + 1, month, day)
            } else {
                Some(assumed)
            }
        }
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ---------------------------------------------------------------
// Room type
// ---------------------------------------------------------------

/// Room synonym table, longest keyword first so a multi-word phrase
/// ("presidential suite") beats its substrings ("suite").
static ROOM_SYNONYMS: Lazy<Vec<(&'static str, RoomType)>> = Lazy::new(|| {
    let mut table: Vec<(&'static str, RoomType)> = vec![
        ("deluxe", RoomType::Deluxe),
        ("suite", RoomType::Suite),
        ("premium suite", RoomType::PremiumSuite),
        ("standard", RoomType::Standard),
        ("single", RoomType::Standard),
        ("double", RoomType::Deluxe),
        ("twin", RoomType::Standard),
        ("family", RoomType::Family),
        ("presidential", RoomType::PresidentialSuite),
        ("presidential suite", RoomType::PresidentialSuite),
        ("executive", RoomType::ExecutiveSuite),
        ("penthouse", RoomType::Penthouse),
        ("sea view", RoomType::DeluxeSeaView),
        ("beach", RoomType::DeluxeSeaView),
    ];
    table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    table
});

fn extract_room_type(text: &str) -> Option<RoomType> {
    let lower = text.to_lowercase();
    ROOM_SYNONYMS
        .iter()
        .find(|(keyword, _)| lower.contains(*keyword))
        .map(|(_, room)| *room)
}

// ---------------------------------------------------------------
// Guest counts
// ---------------------------------------------------------------

const WORD_NUMBERS: &[(&str, u32)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
];

/// "<count> <keyword>" tried first, then "<keyword>: <count>".
struct CountPatterns {
    leading: Regex,
    trailing: Regex,
}

impl CountPatterns {
    fn new(keyword: &str) -> Self {
        let words = WORD_NUMBERS
            .iter()
            .map(|(word, _)| *word)
            .collect::<Vec<_>>()
            .join("|");
        Self {
            leading: Regex::new(&format!(r"(?i)\b(\d+|{words})\s+(?:{keyword})")).unwrap(),
            trailing: Regex::new(&format!(r"(?i)(?:{keyword})[:\s]+(\d+)")).unwrap(),
        }
    }

    fn extract(&self, text: &str) -> Option<u32> {
        if let Some(caps) = self.leading.captures(text) {
            return Some(parse_count(&caps[1]));
        }
        if let Some(caps) = self.trailing.captures(text) {
            return Some(caps[1].parse().unwrap_or(0));
        }
        None
    }
}

static ADULT_COUNT: Lazy<CountPatterns> = Lazy::new(|| CountPatterns::new("adults?"));
static CHILD_COUNT: Lazy<CountPatterns> = Lazy::new(|| CountPatterns::new("child(?:ren)?|kids?"));

fn parse_count(token: &str) -> u32 {
    if token.chars().all(|c| c.is_ascii_digit()) {
        return token.parse().unwrap_or(1);
    }
    WORD_NUMBERS
        .iter()
        .find(|(word, _)| word.eq_ignore_ascii_case(token))
        .map(|(_, number)| *number)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_name_precedence() {
        assert_eq!(
            extract_name("Hello, I'm Dana Smith. My name is Alice Johnson."),
            Some("Alice Johnson".into())
        );
        assert_eq!(
            extract_name("This is a booking for Bob Lee, arriving late."),
            Some("Bob Lee".into())
        );
        assert_eq!(extract_name("Guest: Carol White"), Some("Carol White".into()));
        assert_eq!(extract_name("Hi, I am Bob. Two nights please."), Some("Bob".into()));
        assert_eq!(extract_name("no names in here"), None);
    }

    #[test]
    fn test_tomorrow_beats_other_dates() {
        let today = date(2025, 6, 1);
        let draft = parse("Arriving tomorrow, leaving 2025-06-05.", today);
        assert_eq!(draft.check_in.as_deref(), Some("2025-06-02"));
    }

    #[test]
    fn test_two_iso_dates_in_text_order() {
        let draft = parse(
            "Stay from 2026-03-22 until 2026-03-25 please.",
            date(2025, 1, 1),
        );
        assert_eq!(draft.check_in.as_deref(), Some("2026-03-22"));
        assert_eq!(draft.check_out.as_deref(), Some("2026-03-25"));
    }

    #[test]
    fn test_single_iso_date_fills_check_in_only() {
        let draft = parse("Arriving 2026-03-22.", date(2025, 1, 1));
        assert_eq!(draft.check_in.as_deref(), Some("2026-03-22"));
        assert_eq!(draft.check_out, None);
    }

    #[test]
    fn test_natural_dates_sorted_by_position() {
        let draft = parse(
            "Check out on 25th March, check in on 22nd March.",
            date(2025, 1, 1),
        );
        // Position in text wins over the surrounding words.
        assert_eq!(draft.check_in.as_deref(), Some("2025-03-25"));
        assert_eq!(draft.check_out.as_deref(), Some("2025-03-22"));
    }

    #[test]
    fn test_yearless_date_rolls_past_reference() {
        let today = date(2025, 6, 1);
        let draft = parse("Arriving 22nd March", today);
        assert_eq!(draft.check_in.as_deref(), Some("2026-03-22"));

        let draft = parse("Arriving 22nd September", today);
        assert_eq!(draft.check_in.as_deref(), Some("2025-09-22"));
    }

    #[test]
    fn test_explicit_year_never_rolled() {
        let draft = parse("Arriving 15 January 2025", date(2025, 6, 1));
        assert_eq!(draft.check_in.as_deref(), Some("2025-01-15"));
    }

    #[test]
    fn test_month_first_form_with_year() {
        let draft = parse("From March 22, 2026 to March 25, 2026", date(2025, 1, 1));
        assert_eq!(draft.check_in.as_deref(), Some("2026-03-22"));
        assert_eq!(draft.check_out.as_deref(), Some("2026-03-25"));
    }

    #[test]
    fn test_bare_year_not_read_as_day() {
        // "March 2026" must not produce a phantom "March 20" date.
        let draft = parse("Sometime in March 2026 maybe?", date(2025, 1, 1));
        assert_eq!(draft.check_in, None);
        assert_eq!(draft.check_out, None);
    }

    #[test]
    fn test_invalid_calendar_date_dropped() {
        let draft = parse("Arriving 30th February", date(2025, 1, 1));
        assert_eq!(draft.check_in, None);
    }

    #[test]
    fn test_room_type_longest_keyword_wins() {
        assert_eq!(
            extract_room_type("a suite, ideally the presidential suite"),
            Some(RoomType::PresidentialSuite)
        );
        assert_eq!(
            extract_room_type("A Deluxe Sea View Room with breakfast"),
            Some(RoomType::DeluxeSeaView)
        );
        assert_eq!(extract_room_type("any standard room"), Some(RoomType::Standard));
        assert_eq!(extract_room_type("just a room"), None);
    }

    #[test]
    fn test_counts_digits_and_words() {
        let today = date(2025, 1, 1);
        let draft = parse("for 2 adults and one child", today);
        assert_eq!(draft.num_adults, Some(2));
        assert_eq!(draft.num_children, Some(1));

        let draft = parse("adults: 3, kids: 2", today);
        assert_eq!(draft.num_adults, Some(3));
        assert_eq!(draft.num_children, Some(2));
    }

    #[test]
    fn test_counts_absent() {
        let draft = parse("a quiet room please", date(2025, 1, 1));
        assert_eq!(draft.num_adults, None);
        assert_eq!(draft.num_children, None);
    }
}
