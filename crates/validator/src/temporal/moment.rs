//! Reference moments: configured literals and the current time.

use std::cell::OnceCell;
use std::fmt;
use std::time::SystemTime;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;

use super::capability::capability;
use super::field::month_of;
use super::values::{Calendar, MonthDay, OffsetTime, Year, YearMonth};
use super::zone::Zone;
use super::{TemporalValue, TypeTag};
use crate::clock::Clock;
use crate::error::ConfigError;

// ============================================================================
// NOW
// ============================================================================

/// The current time for one validation call.
///
/// The clock's instant is read lazily and at most once, so every use of
/// `now` within a call observes the same instant.
pub struct Now<'a> {
    clock: &'a dyn Clock,
    instant: OnceCell<DateTime<Utc>>,
}

impl<'a> Now<'a> {
    /// Wraps a clock for one call.
    pub fn new(clock: &'a dyn Clock) -> Self {
        Self {
            clock,
            instant: OnceCell::new(),
        }
    }

    /// The current instant.
    pub fn instant(&self) -> DateTime<Utc> {
        *self.instant.get_or_init(|| self.clock.instant())
    }

    /// The clock's zone.
    pub fn zone(&self) -> Zone {
        self.clock.zone()
    }
}

impl fmt::Debug for Now<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Now")
            .field("clock", &self.clock)
            .field("instant", &self.instant.get())
            .finish()
    }
}

// ============================================================================
// MOMENT SPEC
// ============================================================================

/// A configured reference moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentSpec {
    /// The current time of the validation call.
    Now,
    /// A fixed value of the constraint's target type.
    Literal(TemporalValue),
}

impl MomentSpec {
    /// Sentinel for [`MomentSpec::Now`].
    pub const NOW: &'static str = "now";

    /// Parses `now` or a literal of the `target` type.
    pub fn parse(text: &str, target: TypeTag) -> Result<Self, ConfigError> {
        let text = text.trim();
        if text.eq_ignore_ascii_case(Self::NOW) {
            return Ok(Self::Now);
        }
        (capability(target).parse_moment)(text)
            .map(Self::Literal)
            .ok_or_else(|| ConfigError::InvalidMoment {
                input: text.to_owned(),
                target,
            })
    }

    /// The reference value for one call.
    pub fn resolve(&self, target: TypeTag, now: &Now<'_>, zone: Zone) -> TemporalValue {
        match self {
            Self::Now => (capability(target).now)(now, zone),
            Self::Literal(value) => *value,
        }
    }
}

impl fmt::Display for MomentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Now => f.write_str(Self::NOW),
            Self::Literal(value) => write!(f, "{value}"),
        }
    }
}

// ============================================================================
// LITERAL PARSERS
// ============================================================================

/// Splits a trailing `[Region/City]` from an RFC 3339 literal.
fn split_region(text: &str) -> (&str, Option<&str>) {
    match text.strip_suffix(']').and_then(|rest| rest.split_once('[')) {
        Some((at, region)) => (at, Some(region)),
        None => (text, None),
    }
}

fn parse_rfc3339(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(split_region(text).0).ok()
}

pub(crate) fn parse_instant(text: &str) -> Option<TemporalValue> {
    parse_rfc3339(text).map(|at| TemporalValue::Instant(at.with_timezone(&Utc)))
}

pub(crate) fn parse_system_time(text: &str) -> Option<TemporalValue> {
    parse_rfc3339(text).map(|at| TemporalValue::SystemTime(SystemTime::from(at)))
}

pub(crate) fn parse_offset_date_time(text: &str) -> Option<TemporalValue> {
    parse_rfc3339(text).map(TemporalValue::OffsetDateTime)
}

/// A zoned literal without a region keeps its offset.
pub(crate) fn parse_zoned_date_time(text: &str) -> Option<TemporalValue> {
    let (at, region) = split_region(text);
    let at = DateTime::parse_from_rfc3339(at).ok()?;
    match region {
        Some(region) => {
            let tz = region.parse::<Tz>().ok()?;
            Some(TemporalValue::ZonedDateTime(at.with_timezone(&tz)))
        }
        None => Some(TemporalValue::OffsetDateTime(at)),
    }
}

pub(crate) fn parse_offset_time(text: &str) -> Option<TemporalValue> {
    text.parse::<OffsetTime>().ok().map(TemporalValue::OffsetTime)
}

pub(crate) fn parse_local_date_time(text: &str) -> Option<TemporalValue> {
    text.parse::<NaiveDateTime>()
        .ok()
        .map(TemporalValue::LocalDateTime)
}

pub(crate) fn parse_local_date(text: &str) -> Option<TemporalValue> {
    text.parse::<NaiveDate>().ok().map(TemporalValue::LocalDate)
}

pub(crate) fn parse_local_time(text: &str) -> Option<TemporalValue> {
    text.parse::<NaiveTime>().ok().map(TemporalValue::LocalTime)
}

pub(crate) fn parse_year_month(text: &str) -> Option<TemporalValue> {
    text.parse::<YearMonth>().ok().map(TemporalValue::YearMonth)
}

pub(crate) fn parse_month_day(text: &str) -> Option<TemporalValue> {
    text.parse::<MonthDay>().ok().map(TemporalValue::MonthDay)
}

pub(crate) fn parse_year(text: &str) -> Option<TemporalValue> {
    text.parse::<Year>().ok().map(TemporalValue::Year)
}

pub(crate) fn parse_day_of_week(text: &str) -> Option<TemporalValue> {
    text.parse::<Weekday>().ok().map(TemporalValue::DayOfWeek)
}

pub(crate) fn parse_month(text: &str) -> Option<TemporalValue> {
    text.parse::<chrono::Month>().ok().map(TemporalValue::Month)
}

pub(crate) fn parse_calendar(text: &str) -> Option<TemporalValue> {
    text.parse::<Calendar>().ok().map(TemporalValue::Calendar)
}

// ============================================================================
// NOW SAMPLERS
// ============================================================================

fn local_now(now: &Now<'_>, zone: Zone) -> NaiveDateTime {
    zone.at(now.instant()).naive_local()
}

pub(crate) fn now_instant(now: &Now<'_>, _zone: Zone) -> TemporalValue {
    TemporalValue::Instant(now.instant())
}

pub(crate) fn now_system_time(now: &Now<'_>, _zone: Zone) -> TemporalValue {
    TemporalValue::SystemTime(SystemTime::from(now.instant()))
}

pub(crate) fn now_calendar(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::Calendar(Calendar::new(now.instant(), zone))
}

pub(crate) fn now_offset_date_time(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::OffsetDateTime(zone.at(now.instant()))
}

pub(crate) fn now_zoned_date_time(now: &Now<'_>, zone: Zone) -> TemporalValue {
    match zone {
        Zone::Named(tz) => TemporalValue::ZonedDateTime(now.instant().with_timezone(&tz)),
        Zone::Fixed(_) => TemporalValue::OffsetDateTime(zone.at(now.instant())),
    }
}

pub(crate) fn now_offset_time(now: &Now<'_>, zone: Zone) -> TemporalValue {
    let at = zone.at(now.instant());
    TemporalValue::OffsetTime(OffsetTime::new(at.time(), *at.offset()))
}

pub(crate) fn now_local_date_time(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::LocalDateTime(local_now(now, zone))
}

pub(crate) fn now_local_date(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::LocalDate(local_now(now, zone).date())
}

pub(crate) fn now_local_time(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::LocalTime(local_now(now, zone).time())
}

pub(crate) fn now_year_month(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::YearMonth(YearMonth::from(local_now(now, zone).date()))
}

pub(crate) fn now_month_day(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::MonthDay(MonthDay::from(local_now(now, zone).date()))
}

pub(crate) fn now_year(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::Year(Year::from(local_now(now, zone).date()))
}

pub(crate) fn now_day_of_week(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::DayOfWeek(local_now(now, zone).weekday())
}

pub(crate) fn now_month(now: &Now<'_>, zone: Zone) -> TemporalValue {
    TemporalValue::Month(month_of(&local_now(now, zone)))
}
