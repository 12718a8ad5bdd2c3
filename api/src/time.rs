//! Timestamp normalization into the fixed civil timezone, plus the calendar
//! keys and labels derived from it.
//!
//! Server timestamps come in two shapes: zoned (`Z` or a numeric offset) and
//! naive. Naive timestamps are UTC upstream, so they are read as UTC and then
//! shifted into [`CIVIL_TZ`] exactly like zoned ones. They are never read as
//! local civil time.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

pub const CIVIL_TZ: Tz = chrono_tz::Asia::Kolkata;

/// Rendered wherever a timestamp is absent or cannot be read.
pub const PLACEHOLDER: &str = "TBD";

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const ZONED_FORMATS: [&str; 8] = [
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M%:z",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalized {
    /// Empty or missing input.
    Absent,
    /// Present but unreadable. Formats as the placeholder.
    Invalid,
    Valid(DateTime<Tz>),
}

impl Normalized {
    pub fn valid(&self) -> Option<DateTime<Tz>> {
        match self {
            Normalized::Valid(dt) => Some(*dt),
            _ => None,
        }
    }
}

pub fn normalize(raw: Option<&str>) -> Normalized {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Normalized::Absent;
    };

    let instant = if has_zone_designator(raw) {
        parse_zoned(raw)
    } else {
        parse_naive_as_utc(raw)
    };

    match instant {
        Some(utc) => Normalized::Valid(utc.with_timezone(&CIVIL_TZ)),
        None => Normalized::Invalid,
    }
}

/// Current instant in the civil timezone.
pub fn now_civil() -> DateTime<Tz> {
    Utc::now().with_timezone(&CIVIL_TZ)
}

/// `Z`, `+HH:MM`, `+HHMM` (or the `-` forms) at the very end of the string.
///
/// Hour-only offsets such as `+05` are not designators. They fall through to
/// the naive formats, which reject the trailing offset, so they normalize to
/// [`Normalized::Invalid`].
fn has_zone_designator(raw: &str) -> bool {
    if raw.ends_with(['Z', 'z']) {
        return true;
    }

    let bytes = raw.as_bytes();
    let is_sign = |b: u8| b == b'+' || b == b'-';
    let digits = |s: &[u8]| s.iter().all(u8::is_ascii_digit);

    let with_colon = bytes.len() >= 6 && {
        let tail = &bytes[bytes.len() - 6..];
        is_sign(tail[0]) && digits(&tail[1..3]) && tail[3] == b':' && digits(&tail[4..6])
    };
    let compact = bytes.len() >= 5 && {
        let tail = &bytes[bytes.len() - 5..];
        is_sign(tail[0]) && digits(&tail[1..5])
    };
    with_colon || compact
}

fn parse_zoned(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // `%z` does not accept `Z`, so spell it as an offset for the fallbacks.
    let raw: Cow<'_, str> = match raw.strip_suffix(['Z', 'z']) {
        Some(stem) => Cow::Owned(format!("{stem}+00:00")),
        None => Cow::Borrowed(raw),
    };
    ZONED_FORMATS
        .iter()
        .find_map(|fmt| DateTime::<FixedOffset>::parse_from_str(&raw, fmt).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_naive_as_utc(raw: &str) -> Option<DateTime<Utc>> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

// ---------------------------------------------------------------------------
// Calendar keys
// ---------------------------------------------------------------------------

/// Canonical `YYYY-MM-DD` grouping key in the civil timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn from_timestamp(raw: Option<&str>) -> Option<Self> {
        normalize(raw).valid().map(|dt| Self(dt.date_naive()))
    }

    /// For calendar cells, which are already civil dates.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn month(&self) -> Month {
        Month::of(self.0)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = chrono::ParseError;

    /// Parses a canonical key, not a raw server timestamp.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

/// A calendar month, ordered chronologically, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    /// Const constructor; an out-of-range month is clamped into 1..=12.
    pub const fn clamped(year: i32, month: u32) -> Self {
        let month = if month < 1 {
            1
        } else if month > 12 {
            12
        } else {
            month
        };
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn last_day(&self) -> NaiveDate {
        self.succ().first_day().pred_opt().unwrap_or_else(|| self.first_day())
    }

    pub fn days(&self) -> u32 {
        self.last_day().day()
    }

    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn pred(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn contains(&self, day: DayKey) -> bool {
        day.month() == *self
    }

    /// "September 2025"
    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMonthError(pub String);

impl fmt::Display for ParseMonthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid month {:?}, expected YYYY-MM", self.0)
    }
}

impl std::error::Error for ParseMonthError {}

impl FromStr for Month {
    type Err = ParseMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMonthError(s.to_owned());
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(err());
        }
        let year = year.parse::<i32>().map_err(|_| err())?;
        let month = month.parse::<u32>().map_err(|_| err())?;
        Month::new(year, month).ok_or_else(err)
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// `YYYY-MM-DD`, or `""` when the timestamp is absent or unreadable.
pub fn day_key(raw: Option<&str>) -> String {
    DayKey::from_timestamp(raw).map(|k| k.to_string()).unwrap_or_default()
}

/// `hh:mm AM`
pub fn time_label(raw: Option<&str>) -> String {
    normalize(raw)
        .valid()
        .map(|dt| dt.format("%I:%M %p").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_owned())
}

/// `DD Mon YYYY`
pub fn date_label(raw: Option<&str>) -> String {
    normalize(raw)
        .valid()
        .map(|dt| dt.format("%d %b %Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_owned())
}

/// Single date when `end` is missing, unreadable, or on the same civil day as
/// `start`; otherwise `start - end`.
pub fn date_range_label(start: &str, end: Option<&str>) -> String {
    let Some(s) = normalize(Some(start)).valid() else {
        return PLACEHOLDER.to_owned();
    };
    let start_label = s.format("%d %b %Y").to_string();

    match normalize(end).valid() {
        Some(e) if e.date_naive() != s.date_naive() => {
            format!("{start_label} - {}", e.format("%d %b %Y"))
        }
        _ => start_label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        let naive = normalize(Some("2025-09-10T18:30:00"));
        let zulu = normalize(Some("2025-09-10T18:30:00Z"));
        assert!(naive.valid().is_some());
        assert_eq!(naive, zulu);

        let minutes = normalize(Some("2025-09-15T04:30"));
        assert!(minutes.valid().is_some());
        assert_eq!(minutes, normalize(Some("2025-09-15T04:30Z")));
        assert_eq!(minutes, normalize(Some("2025-09-15T10:00+05:30")));
        assert_eq!(minutes, normalize(Some("2025-09-15 04:30z")));
        assert_eq!(day_key(Some("2025-09-15T04:30Z")), "2025-09-15");
    }

    #[test]
    fn utc_evening_lands_on_next_civil_day() {
        let dt = normalize(Some("2025-09-10T18:30:00Z")).valid().unwrap();
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2025, 9, 11).unwrap());
        assert_eq!((dt.hour(), dt.minute()), (0, 0));
        assert_eq!(day_key(Some("2025-09-10T18:30:00")), "2025-09-11");
    }

    #[test]
    fn explicit_offsets_are_honoured() {
        let colon = normalize(Some("2025-09-15T10:00:00+05:30")).valid().unwrap();
        let compact = normalize(Some("2025-09-15T10:00:00+0530")).valid().unwrap();
        let negative = normalize(Some("2025-09-15T00:30:00-04:00")).valid().unwrap();
        assert_eq!(colon, compact);
        assert_eq!((colon.hour(), colon.minute()), (10, 0));
        assert_eq!(negative.format("%Y-%m-%d %H:%M").to_string(), "2025-09-15 10:00");
    }

    #[test]
    fn date_only_is_midnight_utc() {
        assert_eq!(time_label(Some("2025-09-15")), "05:30 AM");
        assert_eq!(day_key(Some("2025-09-15")), "2025-09-15");
    }

    #[test]
    fn zone_designator_detection() {
        assert!(has_zone_designator("2025-09-15T10:00:00Z"));
        assert!(has_zone_designator("2025-09-15T10:00:00+05:30"));
        assert!(has_zone_designator("2025-09-15T10:00:00-0400"));
        assert!(!has_zone_designator("2025-09-15T10:00:00"));
        assert!(!has_zone_designator("2025-09-15"));
        assert!(!has_zone_designator("2025-09-15T10:00"));
        assert!(!has_zone_designator("2025-09-15T10:00+05"));
    }

    #[test]
    fn hour_only_offsets_are_unreadable() {
        assert_eq!(normalize(Some("2025-09-15T10:00+05")), Normalized::Invalid);
        assert_eq!(normalize(Some("2025-09-15T10:00:00-04")), Normalized::Invalid);
        assert_eq!(time_label(Some("2025-09-15T10:00+05")), PLACEHOLDER);
    }

    #[test]
    fn absent_and_malformed_inputs_do_not_panic() {
        assert_eq!(normalize(None), Normalized::Absent);
        assert_eq!(normalize(Some("   ")), Normalized::Absent);
        assert_eq!(normalize(Some("next tuesday")), Normalized::Invalid);
        assert_eq!(normalize(Some("2025-13-40T99:00:00Z")), Normalized::Invalid);
        assert_eq!(day_key(Some("garbage")), "");
        assert_eq!(time_label(Some("garbage")), PLACEHOLDER);
        assert_eq!(time_label(None), PLACEHOLDER);
        assert_eq!(date_label(None), PLACEHOLDER);
    }

    #[test]
    fn day_key_is_stable_under_renormalization() {
        let raw = "2025-09-14T20:15:00Z";
        let first = normalize(Some(raw)).valid().unwrap();
        let again = first.to_rfc3339();
        assert_eq!(day_key(Some(raw)), day_key(Some(&again)));
        assert_eq!(day_key(Some(raw)), "2025-09-15");
        assert!(date_range_label(raw, None).starts_with("15 Sep 2025"));
    }

    #[test]
    fn time_label_uses_twelve_hour_clock() {
        assert_eq!(time_label(Some("2025-09-15T10:00:00Z")), "03:30 PM");
        assert_eq!(time_label(Some("2025-09-10T18:30:00")), "12:00 AM");
    }

    #[test]
    fn date_range_collapses_same_civil_day() {
        assert_eq!(
            date_range_label("2025-09-15T04:00:00Z", Some("2025-09-15T12:00:00Z")),
            "15 Sep 2025"
        );
        assert_eq!(date_range_label("2025-09-15T04:00:00Z", None), "15 Sep 2025");
        assert_eq!(
            date_range_label("2025-09-15T04:00:00Z", Some("2025-09-18T04:00:00Z")),
            "15 Sep 2025 - 18 Sep 2025"
        );
    }

    #[test]
    fn date_range_degrades_when_start_is_unreadable() {
        assert_eq!(date_range_label("", Some("2025-09-18T04:00:00Z")), PLACEHOLDER);
        assert_eq!(date_range_label("soon", None), PLACEHOLDER);
        assert_eq!(date_range_label("2025-09-15T04:00:00Z", Some("later")), "15 Sep 2025");
    }

    #[test]
    fn month_parsing_and_stepping() {
        let sep: Month = "2025-09".parse().unwrap();
        assert_eq!(sep, Month::clamped(2025, 9));
        assert_eq!(sep.to_string(), "2025-09");
        assert_eq!(sep.succ().to_string(), "2025-10");
        assert_eq!(Month::clamped(2025, 12).succ().to_string(), "2026-01");
        assert_eq!(Month::clamped(2025, 1).pred().to_string(), "2024-12");
        assert_eq!(sep.days(), 30);
        assert_eq!(sep.title(), "September 2025");
        assert!("2025-9".parse::<Month>().is_err());
        assert!("2025-13".parse::<Month>().is_err());
        assert!("september".parse::<Month>().is_err());
    }

    #[test]
    fn day_key_round_trips_through_display() {
        let key: DayKey = "2025-09-15".parse().unwrap();
        assert_eq!(key.to_string(), "2025-09-15");
        assert!(Month::clamped(2025, 9).contains(key));
        assert!(!Month::clamped(2025, 10).contains(key));
    }
}
