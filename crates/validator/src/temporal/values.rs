//! Partial calendar values that chrono does not model directly.
//!
//! [`YearMonth`], [`MonthDay`], [`Year`] and [`OffsetTime`] are only
//! constructible in valid states: `YearMonth::new(2007, 13)` and
//! `MonthDay::new(2, 30)` return `None`. [`Calendar`] pairs an instant with
//! the zone it is observed in.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc,
};
use chrono_tz::Tz;

use super::zone::Zone;

/// Number of days in `month` of `year`, `None` for an invalid month.
pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Error returned when parsing a partial calendar value fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} literal '{input}'")]
pub struct ParseValueError {
    kind: &'static str,
    input: String,
}

impl ParseValueError {
    fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_owned(),
        }
    }
}

// ============================================================================
// YEAR
// ============================================================================

/// A proleptic ISO year, e.g. `2007`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(i32);

impl Year {
    /// Creates a year.
    #[must_use]
    pub const fn new(year: i32) -> Self {
        Self(year)
    }

    /// Returns the numeric year.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Returns whether this is a leap year.
    #[must_use]
    pub const fn is_leap(self) -> bool {
        let y = self.0;
        (y % 4 == 0 && y % 100 != 0) || y % 400 == 0
    }

    /// Adds a signed number of years.
    #[must_use]
    pub fn checked_add_years(self, years: i64) -> Option<Self> {
        let year = i64::from(self.0).checked_add(years)?;
        i32::try_from(year).ok().map(Self)
    }
}

impl From<NaiveDate> for Year {
    fn from(date: NaiveDate) -> Self {
        Self(date.year())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Year {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| ParseValueError::new("year", s))
    }
}

// ============================================================================
// YEAR-MONTH
// ============================================================================

/// A year and month without a day, e.g. `2007-12`.
///
/// Ordered chronologically (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Creates a year-month, `None` when `month` is not in `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The month, `1..=12`.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Length of this month in days, honoring leap years.
    #[must_use]
    pub fn length_of_month(self) -> u32 {
        days_in_month(self.year, self.month).unwrap_or(31)
    }

    /// Months since year zero; strictly increasing with time.
    pub(crate) fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Adds a signed number of months.
    #[must_use]
    pub fn checked_add_months(self, months: i64) -> Option<Self> {
        let total = self.ordinal().checked_add(months)?;
        let year = i32::try_from(total.div_euclid(12)).ok()?;
        Self::new(year, total.rem_euclid(12) as u32 + 1)
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ParseValueError;

    /// Parses `YYYY-MM` (the year may carry a sign).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseValueError::new("year-month", s);
        let (year, month) = s.trim().rsplit_once('-').ok_or_else(err)?;
        if month.len() != 2 {
            return Err(err());
        }
        let year = year.parse::<i32>().map_err(|_| err())?;
        let month = month.parse::<u32>().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

// ============================================================================
// MONTH-DAY
// ============================================================================

/// A month and day without a year, e.g. `--12-03`.
///
/// February 29 is valid since it exists in leap years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    month: u32,
    day: u32,
}

impl MonthDay {
    /// Creates a month-day, `None` when the day does not exist in any year.
    #[must_use]
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so this admits February 29.
        let max = days_in_month(2000, month)?;
        (1..=max).contains(&day).then_some(Self { month, day })
    }

    /// The month, `1..=12`.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// The day of month.
    #[must_use]
    pub const fn day(self) -> u32 {
        self.day
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = ParseValueError;

    /// Parses `--MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseValueError::new("month-day", s);
        let rest = s.trim().strip_prefix("--").ok_or_else(err)?;
        let (month, day) = rest.split_once('-').ok_or_else(err)?;
        if month.len() != 2 || day.len() != 2 {
            return Err(err());
        }
        let month = month.parse::<u32>().map_err(|_| err())?;
        let day = day.parse::<u32>().map_err(|_| err())?;
        Self::new(month, day).ok_or_else(err)
    }
}

// ============================================================================
// OFFSET TIME
// ============================================================================

/// A wall-clock time with a UTC offset, e.g. `10:15:30+01:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OffsetTime {
    time: NaiveTime,
    offset: FixedOffset,
}

impl OffsetTime {
    /// Creates an offset time.
    #[must_use]
    pub const fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }

    /// The local time.
    #[must_use]
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    /// The offset from UTC.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Re-expresses the same instant at another offset, wrapping at midnight.
    #[must_use]
    pub fn with_offset_same_instant(&self, offset: FixedOffset) -> Self {
        let shift = i64::from(offset.local_minus_utc() - self.offset.local_minus_utc());
        let (time, _) = self
            .time
            .overflowing_add_signed(chrono::TimeDelta::seconds(shift));
        Self { time, offset }
    }
}

impl fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time, self.offset)
    }
}

impl FromStr for OffsetTime {
    type Err = ParseValueError;

    /// Parses `HH:MM[:SS[.fff]]` followed by `Z` or `±HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseValueError::new("offset time", s);
        let s = s.trim();
        let (time, offset) = if let Some(time) = s.strip_suffix('Z') {
            (time, FixedOffset::east_opt(0).ok_or_else(err)?)
        } else {
            let pos = s.rfind(['+', '-']).ok_or_else(err)?;
            let offset = parse_offset(&s[pos..]).ok_or_else(err)?;
            (&s[..pos], offset)
        };
        let time = time.parse::<NaiveTime>().map_err(|_| err())?;
        Ok(Self::new(time, offset))
    }
}

/// Parses `±HH:MM` (or `±HHMM`) into a fixed offset.
pub(crate) fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    let (hours, minutes) = match rest.split_once(':') {
        Some(parts) => parts,
        None if rest.len() == 4 => rest.split_at(2),
        None => return None,
    };
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    let hours = hours.parse::<i32>().ok()?;
    let minutes = minutes.parse::<i32>().ok()?;
    if hours > 18 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

// ============================================================================
// CALENDAR
// ============================================================================

/// A legacy calendar value: an instant plus the zone it was created in.
///
/// Unlike [`DateTime<Tz>`] the zone may be a region or a bare offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Calendar {
    instant: DateTime<Utc>,
    zone: Zone,
}

impl Calendar {
    /// Creates a calendar observing `instant` in `zone`.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>, zone: Zone) -> Self {
        Self { instant, zone }
    }

    /// The absolute instant.
    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    /// The zone carried by the calendar.
    #[must_use]
    pub const fn zone(&self) -> Zone {
        self.zone
    }

    /// The wall-clock date-time in the calendar's own zone.
    #[must_use]
    pub fn local(&self) -> DateTime<FixedOffset> {
        self.zone.at(self.instant)
    }
}

impl From<DateTime<Tz>> for Calendar {
    fn from(at: DateTime<Tz>) -> Self {
        Self::new(at.to_utc(), Zone::Named(at.timezone()))
    }
}

impl From<DateTime<FixedOffset>> for Calendar {
    fn from(at: DateTime<FixedOffset>) -> Self {
        Self::new(at.to_utc(), Zone::Fixed(*at.offset()))
    }
}

impl From<DateTime<Utc>> for Calendar {
    fn from(at: DateTime<Utc>) -> Self {
        Self::new(at, Zone::UTC)
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = self.local().to_rfc3339_opts(SecondsFormat::AutoSi, false);
        match self.zone {
            Zone::Named(tz) => write!(f, "{local}[{}]", tz.name()),
            Zone::Fixed(_) => f.write_str(&local),
        }
    }
}

impl FromStr for Calendar {
    type Err = ParseValueError;

    /// Parses an RFC 3339 date-time with an optional `[Region/City]` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseValueError::new("calendar", s);
        let text = s.trim();
        let (at, region) = match text.strip_suffix(']').and_then(|rest| rest.split_once('[')) {
            Some((at, region)) => (at, Some(region)),
            None => (text, None),
        };
        let at = DateTime::parse_from_rfc3339(at).map_err(|_| err())?;
        match region {
            Some(region) => {
                let tz = region.parse::<Tz>().map_err(|_| err())?;
                Ok(Self::from(tz.from_utc_datetime(&at.naive_utc())))
            }
            None => Ok(Self::from(at)),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
