//! Calendrical fields and their extraction from canonical moments.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, Month, NaiveDate, Timelike, Weekday};

use super::projection::CanonicalMoment;
use super::values::YearMonth;
use crate::error::{ConfigError, EvaluationError};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Month of a date.
pub(crate) fn month_of(date: &impl Datelike) -> Month {
    MONTHS[date.month0() as usize]
}

/// Month by number, January = 1.
pub(crate) fn month_from_number(number: u32) -> Option<Month> {
    MONTHS.get(usize::try_from(number.checked_sub(1)?).ok()?).copied()
}

pub(crate) const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
}

pub(crate) const fn month_name(month: Month) -> &'static str {
    match month {
        Month::January => "JANUARY",
        Month::February => "FEBRUARY",
        Month::March => "MARCH",
        Month::April => "APRIL",
        Month::May => "MAY",
        Month::June => "JUNE",
        Month::July => "JULY",
        Month::August => "AUGUST",
        Month::September => "SEPTEMBER",
        Month::October => "OCTOBER",
        Month::November => "NOVEMBER",
        Month::December => "DECEMBER",
    }
}

// ============================================================================
// FIELD
// ============================================================================

/// A calendrical field that component constraints inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Year,
    YearMonth,
    Month,
    DayOfMonth,
    DayOfWeek,
    DayOfYear,
    Hour,
    Minute,
    Second,
    Nanosecond,
}

impl Field {
    /// All fields.
    pub const ALL: [Self; 10] = [
        Self::Year,
        Self::YearMonth,
        Self::Month,
        Self::DayOfMonth,
        Self::DayOfWeek,
        Self::DayOfYear,
        Self::Hour,
        Self::Minute,
        Self::Second,
        Self::Nanosecond,
    ];

    /// The field name, as used in constraint kind names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Year => "Year",
            Self::YearMonth => "YearMonth",
            Self::Month => "Month",
            Self::DayOfMonth => "DayOfMonth",
            Self::DayOfWeek => "DayOfWeek",
            Self::DayOfYear => "DayOfYear",
            Self::Hour => "Hour",
            Self::Minute => "Minute",
            Self::Second => "Second",
            Self::Nanosecond => "Nanosecond",
        }
    }

    /// Whether values of this field are plain integers.
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::YearMonth | Self::Month | Self::DayOfWeek)
    }

    /// Valid integer range, `None` for non-integer or unbounded fields.
    const fn range(self) -> Option<(i64, i64)> {
        match self {
            Self::DayOfMonth => Some((1, 31)),
            Self::DayOfYear => Some((1, 366)),
            Self::Hour => Some((0, 23)),
            Self::Minute | Self::Second => Some((0, 59)),
            Self::Nanosecond => Some((0, 999_999_999)),
            _ => None,
        }
    }

    /// Parses a configured value of this field.
    ///
    /// Months and days of week accept names (`DECEMBER`, `Wed`) or numbers
    /// (January = 1, Monday = 1).
    pub fn parse_value(self, text: &str) -> Result<ComponentValue, ConfigError> {
        let text = text.trim();
        let invalid = || ConfigError::InvalidValue {
            input: text.to_owned(),
            field: self,
        };

        match self {
            Self::YearMonth => text
                .parse::<YearMonth>()
                .map(ComponentValue::YearMonth)
                .map_err(|_| invalid()),
            Self::Month => text
                .parse::<Month>()
                .ok()
                .or_else(|| month_from_number(text.parse().ok()?))
                .map(ComponentValue::Month)
                .ok_or_else(invalid),
            Self::DayOfWeek => text
                .parse::<Weekday>()
                .ok()
                .or_else(|| {
                    let number: usize = text.parse().ok()?;
                    WEEKDAYS.get(number.checked_sub(1)?).copied()
                })
                .map(ComponentValue::DayOfWeek)
                .ok_or_else(invalid),
            Self::Year => text
                .parse::<i32>()
                .map(|year| ComponentValue::Integer(i64::from(year)))
                .map_err(|_| invalid()),
            _ => {
                let value: i64 = text.parse().map_err(|_| invalid())?;
                match self.range() {
                    Some((min, max)) if !(min..=max).contains(&value) => Err(invalid()),
                    _ => Ok(ComponentValue::Integer(value)),
                }
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// COMPONENT VALUE
// ============================================================================

/// A single field value.
///
/// Ordered by the field's natural sequence: Monday < ... < Sunday and
/// January < ... < December, regardless of locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentValue {
    Integer(i64),
    DayOfWeek(Weekday),
    Month(Month),
    YearMonth(YearMonth),
}

impl ComponentValue {
    /// The integer value, for integer fields.
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    fn sort_key(&self) -> (u8, i64) {
        match self {
            Self::Integer(value) => (0, *value),
            Self::DayOfWeek(day) => (1, i64::from(day.number_from_monday())),
            Self::Month(month) => (2, i64::from(month.number_from_month())),
            Self::YearMonth(value) => (3, value.ordinal()),
        }
    }
}

impl Ord for ComponentValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for ComponentValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ComponentValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::DayOfWeek(day) => f.write_str(weekday_name(*day)),
            Self::Month(month) => f.write_str(month_name(*month)),
            Self::YearMonth(value) => write!(f, "{value}"),
        }
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Extracts `field` from a canonical moment.
///
/// Fails with [`EvaluationError::UnsupportedField`] when the moment's shape
/// does not carry the field, e.g. an hour from a date.
pub fn extract(moment: &CanonicalMoment, field: Field) -> Result<ComponentValue, EvaluationError> {
    let value = match moment {
        CanonicalMoment::Zoned { at, .. } => date_field(at, field).or_else(|| time_field(at, field)),
        CanonicalMoment::LocalDateTime(at) => {
            date_field(at, field).or_else(|| time_field(at, field))
        }
        CanonicalMoment::LocalDate(date) => date_field(date, field),
        CanonicalMoment::LocalTime(time) => time_field(time, field),
        CanonicalMoment::YearMonth(value) => match field {
            Field::Year => Some(ComponentValue::Integer(i64::from(value.year()))),
            Field::YearMonth => Some(ComponentValue::YearMonth(*value)),
            Field::Month => month_from_number(value.month()).map(ComponentValue::Month),
            _ => None,
        },
        CanonicalMoment::MonthDay(value) => match field {
            Field::Month => month_from_number(value.month()).map(ComponentValue::Month),
            Field::DayOfMonth => Some(ComponentValue::Integer(i64::from(value.day()))),
            _ => None,
        },
        CanonicalMoment::Year(year) => {
            (field == Field::Year).then(|| ComponentValue::Integer(i64::from(year.get())))
        }
        CanonicalMoment::DayOfWeek(day) => {
            (field == Field::DayOfWeek).then_some(ComponentValue::DayOfWeek(*day))
        }
        CanonicalMoment::Month(month) => {
            (field == Field::Month).then_some(ComponentValue::Month(*month))
        }
    };

    value.ok_or(EvaluationError::UnsupportedField {
        field,
        target: moment.shape(),
    })
}

/// The full calendar date of a moment, for day-of-month boundary checks.
pub fn full_date(moment: &CanonicalMoment) -> Result<NaiveDate, EvaluationError> {
    match moment {
        CanonicalMoment::Zoned { at, .. } => Ok(at.date_naive()),
        CanonicalMoment::LocalDateTime(at) => Ok(at.date()),
        CanonicalMoment::LocalDate(date) => Ok(*date),
        _ => Err(EvaluationError::UnsupportedField {
            field: Field::DayOfMonth,
            target: moment.shape(),
        }),
    }
}

fn date_field(date: &impl Datelike, field: Field) -> Option<ComponentValue> {
    Some(match field {
        Field::Year => ComponentValue::Integer(i64::from(date.year())),
        Field::YearMonth => ComponentValue::YearMonth(YearMonth::new(date.year(), date.month())?),
        Field::Month => ComponentValue::Month(month_of(date)),
        Field::DayOfMonth => ComponentValue::Integer(i64::from(date.day())),
        Field::DayOfWeek => ComponentValue::DayOfWeek(date.weekday()),
        Field::DayOfYear => ComponentValue::Integer(i64::from(date.ordinal())),
        _ => return None,
    })
}

fn time_field(time: &impl Timelike, field: Field) -> Option<ComponentValue> {
    let value = match field {
        Field::Hour => time.hour(),
        Field::Minute => time.minute(),
        Field::Second => time.second(),
        Field::Nanosecond => time.nanosecond(),
        _ => return None,
    };
    Some(ComponentValue::Integer(i64::from(value)))
}

// ============================================================================
// TESTS
// ============================================================================
