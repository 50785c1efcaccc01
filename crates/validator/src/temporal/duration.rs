//! ISO-8601 durations restricted to the units a target type supports.
//!
//! Grammar: `[±]P[nY][nM][nW][nD][T[nH][nM][n[.f]S]]`, case-insensitive,
//! each component optionally signed, up to nine fractional second digits.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Months, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;

use super::projection::CanonicalMoment;
use crate::error::{ConfigError, EvaluationError};

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^([-+]?)P(?:([-+]?[0-9]+)Y)?(?:([-+]?[0-9]+)M)?(?:([-+]?[0-9]+)W)?(?:([-+]?[0-9]+)D)?(?:(T)(?:([-+]?[0-9]+)H)?(?:([-+]?[0-9]+)M)?(?:([-+]?[0-9]+)(?:[.,]([0-9]{1,9}))?S)?)?$",
    )
    .expect("duration regex is valid")
});

// ============================================================================
// UNITS
// ============================================================================

/// A unit appearing in a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Years => "years",
            Self::Months => "months",
            Self::Weeks => "weeks",
            Self::Days => "days",
            Self::Hours => "hours",
            Self::Minutes => "minutes",
            Self::Seconds => "seconds",
        })
    }
}

/// The set of units a target type's arithmetic supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// All units.
    DateTime,
    /// Years, months, weeks, days.
    Date,
    /// Days (as 24 hours), hours, minutes, seconds.
    Time,
    /// Years, months.
    YearMonth,
    /// Years.
    Year,
}

impl Granularity {
    /// Whether durations of this granularity may carry `unit`.
    pub const fn allows(self, unit: DurationUnit) -> bool {
        use DurationUnit::*;
        match self {
            Self::DateTime => true,
            Self::Date => matches!(unit, Years | Months | Weeks | Days),
            Self::Time => matches!(unit, Days | Hours | Minutes | Seconds),
            Self::YearMonth => matches!(unit, Years | Months),
            Self::Year => matches!(unit, Years),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DateTime => "date-time",
            Self::Date => "date",
            Self::Time => "time",
            Self::YearMonth => "year-month",
            Self::Year => "year",
        })
    }
}

/// Direction in which a duration is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Plus,
    Minus,
}

// ============================================================================
// RESTRICTED DURATION
// ============================================================================

/// A parsed duration whose units fit a [`Granularity`].
///
/// # Examples
///
/// ```
/// use tempora_validator::temporal::duration::{Granularity, RestrictedDuration};
///
/// assert!(RestrictedDuration::parse("P1Y1M", Granularity::YearMonth).is_ok());
/// assert!(RestrictedDuration::parse("P1Y1M1DT1H", Granularity::Date).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RestrictedDuration {
    granularity: Granularity,
    months: i64,
    days: i64,
    time: TimeDelta,
    text: String,
}

impl RestrictedDuration {
    /// Parses `text`, rejecting units outside `granularity`.
    pub fn parse(text: &str, granularity: Granularity) -> Result<Self, ConfigError> {
        let text = text.trim();
        let invalid = |reason| ConfigError::InvalidDuration {
            input: text.to_owned(),
            reason,
        };

        let caps = DURATION_REGEX
            .captures(text)
            .ok_or_else(|| invalid("expected the form PnYnMnWnDTnHnMnS"))?;

        let units = [
            (2, DurationUnit::Years),
            (3, DurationUnit::Months),
            (4, DurationUnit::Weeks),
            (5, DurationUnit::Days),
            (7, DurationUnit::Hours),
            (8, DurationUnit::Minutes),
            (9, DurationUnit::Seconds),
        ];
        let mut amounts = [0_i64; 7];
        let mut any = false;
        for (slot, (group, unit)) in units.into_iter().enumerate() {
            let Some(m) = caps.get(group) else { continue };
            if !granularity.allows(unit) {
                return Err(ConfigError::DisallowedUnit {
                    input: text.to_owned(),
                    unit,
                    granularity,
                });
            }
            amounts[slot] = m
                .as_str()
                .parse()
                .map_err(|_| invalid("component out of range"))?;
            any = true;
        }
        if !any {
            return Err(invalid("at least one component is required"));
        }
        let has_time = (7..=9).any(|group| caps.get(group).is_some());
        if caps.get(6).is_some() && !has_time {
            return Err(invalid("'T' must be followed by a time component"));
        }

        let [years, months, weeks, days, hours, minutes, seconds] = amounts;
        let nanos = match caps.get(10) {
            Some(fraction) => {
                let negative = caps.get(9).is_some_and(|s| s.as_str().starts_with('-'));
                let nanos = fraction_nanos(fraction.as_str());
                if negative { -nanos } else { nanos }
            }
            None => 0,
        };

        let out_of_range = || invalid("duration out of range");
        let mut months = years
            .checked_mul(12)
            .and_then(|m| m.checked_add(months))
            .ok_or_else(out_of_range)?;
        let mut days = weeks
            .checked_mul(7)
            .and_then(|d| d.checked_add(days))
            .ok_or_else(out_of_range)?;
        let mut time = TimeDelta::try_hours(hours)
            .zip(TimeDelta::try_minutes(minutes))
            .zip(TimeDelta::try_seconds(seconds))
            .and_then(|((h, m), s)| h.checked_add(&m)?.checked_add(&s))
            .and_then(|t| t.checked_add(&TimeDelta::nanoseconds(nanos)))
            .ok_or_else(out_of_range)?;

        if granularity == Granularity::Time {
            time = TimeDelta::try_days(days)
                .and_then(|d| time.checked_add(&d))
                .ok_or_else(out_of_range)?;
            days = 0;
        }

        if caps.get(1).is_some_and(|s| s.as_str() == "-") {
            months = months.checked_neg().ok_or_else(out_of_range)?;
            days = days.checked_neg().ok_or_else(out_of_range)?;
            time = -time;
        }

        Ok(Self {
            granularity,
            months,
            days,
            time,
            text: text.to_owned(),
        })
    }

    /// The granularity this duration was parsed for.
    pub const fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Total years and months, in months.
    pub const fn months(&self) -> i64 {
        self.months
    }

    /// Total weeks and days, in days. Zero for time granularity.
    pub const fn days(&self) -> i64 {
        self.days
    }

    /// The exact time part.
    pub const fn time(&self) -> TimeDelta {
        self.time
    }

    /// The configured text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Shifts `moment` by this duration in the direction of `sign`.
    ///
    /// Months are added first with end-of-month clamping, then days on the
    /// local timeline, then the time part. For zoned moments the time part
    /// runs on the instant timeline; for times of day it wraps at midnight.
    /// Shapes without arithmetic (month-day, day of week, month) are returned
    /// unchanged; durations for them are refused at construction.
    pub fn apply(
        &self,
        moment: &CanonicalMoment,
        sign: Sign,
    ) -> Result<CanonicalMoment, EvaluationError> {
        let overflow = || EvaluationError::Overflow {
            duration: self.text.clone(),
        };
        let (months, days, time) = match sign {
            Sign::Plus => (self.months, self.days, self.time),
            Sign::Minus => (
                self.months.checked_neg().ok_or_else(overflow)?,
                self.days.checked_neg().ok_or_else(overflow)?,
                -self.time,
            ),
        };

        let shifted = match moment {
            CanonicalMoment::Zoned { at, zone } => {
                let at = if months == 0 && days == 0 {
                    *at
                } else {
                    let local = shift_date_time(at.naive_local(), months, days);
                    local.and_then(|local| zone.localize(local, Some(*at.offset())))
                        .ok_or_else(overflow)?
                };
                let instant = at
                    .with_timezone(&Utc)
                    .checked_add_signed(time)
                    .ok_or_else(overflow)?;
                Some(CanonicalMoment::Zoned {
                    at: zone.at(instant),
                    zone: *zone,
                })
            }
            CanonicalMoment::LocalDateTime(at) => shift_date_time(*at, months, days)
                .and_then(|at| at.checked_add_signed(time))
                .map(CanonicalMoment::LocalDateTime),
            CanonicalMoment::LocalDate(date) => {
                shift_date(*date, months, days).map(CanonicalMoment::LocalDate)
            }
            CanonicalMoment::LocalTime(clock) => Some(CanonicalMoment::LocalTime(
                clock.overflowing_add_signed(time).0,
            )),
            CanonicalMoment::YearMonth(value) => value
                .checked_add_months(months)
                .map(CanonicalMoment::YearMonth),
            CanonicalMoment::Year(year) => {
                year.checked_add_years(months / 12).map(CanonicalMoment::Year)
            }
            other @ (CanonicalMoment::MonthDay(_)
            | CanonicalMoment::DayOfWeek(_)
            | CanonicalMoment::Month(_)) => Some(*other),
        };

        shifted.ok_or_else(overflow)
    }
}

impl fmt::Display for RestrictedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// `"5"` -> 500 ms in nanoseconds.
fn fraction_nanos(digits: &str) -> i64 {
    digits
        .bytes()
        .chain(std::iter::repeat(b'0'))
        .take(9)
        .fold(0, |acc, digit| acc * 10 + i64::from(digit - b'0'))
}

fn shift_date(date: NaiveDate, months: i64, days: i64) -> Option<NaiveDate> {
    let count = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    let date = if months >= 0 {
        date.checked_add_months(count)?
    } else {
        date.checked_sub_months(count)?
    };
    date.checked_add_signed(TimeDelta::try_days(days)?)
}

fn shift_date_time(at: NaiveDateTime, months: i64, days: i64) -> Option<NaiveDateTime> {
    Some(shift_date(at.date(), months, days)?.and_time(at.time()))
}

// ============================================================================
// TESTS
// ============================================================================
