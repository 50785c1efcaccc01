//! Canonical projection of source values.

use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, Month, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};

use super::{TemporalValue, system_time_to_utc};
use super::moment::Now;
use super::values::{MonthDay, Year, YearMonth};
use super::zone::Zone;
use crate::error::EvaluationError;

/// A value normalized for comparison.
///
/// Instant-like values become [`CanonicalMoment::Zoned`] in the effective
/// zone. Zone-less values keep their own shape. Moments of different shapes
/// are incomparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonicalMoment {
    /// An absolute instant observed in a zone.
    Zoned {
        at: DateTime<FixedOffset>,
        zone: Zone,
    },
    LocalDateTime(NaiveDateTime),
    LocalDate(NaiveDate),
    LocalTime(NaiveTime),
    YearMonth(YearMonth),
    MonthDay(MonthDay),
    Year(Year),
    DayOfWeek(Weekday),
    Month(Month),
}

impl CanonicalMoment {
    /// Name of the shape, for diagnostics.
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Zoned { .. } => "ZonedDateTime",
            Self::LocalDateTime(_) => "LocalDateTime",
            Self::LocalDate(_) => "LocalDate",
            Self::LocalTime(_) => "LocalTime",
            Self::YearMonth(_) => "YearMonth",
            Self::MonthDay(_) => "MonthDay",
            Self::Year(_) => "Year",
            Self::DayOfWeek(_) => "DayOfWeek",
            Self::Month(_) => "Month",
        }
    }

    /// Orders two moments of the same shape.
    ///
    /// Zoned moments compare by instant, so the zone of observation does
    /// not matter.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Zoned { at: a, .. }, Self::Zoned { at: b, .. }) => Some(a.cmp(b)),
            (Self::LocalDateTime(a), Self::LocalDateTime(b)) => Some(a.cmp(b)),
            (Self::LocalDate(a), Self::LocalDate(b)) => Some(a.cmp(b)),
            (Self::LocalTime(a), Self::LocalTime(b)) => Some(a.cmp(b)),
            (Self::YearMonth(a), Self::YearMonth(b)) => Some(a.cmp(b)),
            (Self::MonthDay(a), Self::MonthDay(b)) => Some(a.cmp(b)),
            (Self::Year(a), Self::Year(b)) => Some(a.cmp(b)),
            (Self::DayOfWeek(a), Self::DayOfWeek(b)) => {
                Some(a.number_from_monday().cmp(&b.number_from_monday()))
            }
            (Self::Month(a), Self::Month(b)) => {
                Some(a.number_from_month().cmp(&b.number_from_month()))
            }
            _ => None,
        }
    }
}

/// Projects a value into its canonical form under `zone`.
///
/// Instants keep their absolute position and only change the zone of
/// observation. An offset time is shifted to the zone's offset, wrapping at
/// midnight; for a region the offset in force now is used. Zone-less values
/// pass through.
///
/// Fails only for a `SystemTime` outside the calendar range.
pub fn project(
    value: &TemporalValue,
    zone: Zone,
    now: &Now<'_>,
) -> Result<CanonicalMoment, EvaluationError> {
    let moment = match value {
        TemporalValue::OffsetTime(time) => {
            let offset = match zone {
                Zone::Fixed(offset) => offset,
                Zone::Named(_) => zone.offset_at(&now.instant()),
            };
            CanonicalMoment::LocalTime(time.with_offset_same_instant(offset).time())
        }
        TemporalValue::LocalDateTime(at) => CanonicalMoment::LocalDateTime(*at),
        TemporalValue::LocalDate(date) => CanonicalMoment::LocalDate(*date),
        TemporalValue::LocalTime(time) => CanonicalMoment::LocalTime(*time),
        TemporalValue::YearMonth(value) => CanonicalMoment::YearMonth(*value),
        TemporalValue::MonthDay(value) => CanonicalMoment::MonthDay(*value),
        TemporalValue::Year(value) => CanonicalMoment::Year(*value),
        TemporalValue::DayOfWeek(day) => CanonicalMoment::DayOfWeek(*day),
        TemporalValue::Month(month) => CanonicalMoment::Month(*month),
        TemporalValue::Instant(at) => zoned(*at, zone),
        TemporalValue::SystemTime(at) => match system_time_to_utc(*at) {
            Some(instant) => zoned(instant, zone),
            None => {
                return Err(EvaluationError::OutOfRange {
                    target: value.tag(),
                    value: format!("{at:?}"),
                });
            }
        },
        TemporalValue::OffsetDateTime(at) => zoned(at.to_utc(), zone),
        TemporalValue::ZonedDateTime(at) => zoned(at.to_utc(), zone),
        TemporalValue::Calendar(calendar) => zoned(calendar.instant(), zone),
    };
    Ok(moment)
}

fn zoned(instant: DateTime<Utc>, zone: Zone) -> CanonicalMoment {
    CanonicalMoment::Zoned {
        at: zone.at(instant),
        zone,
    }
}
