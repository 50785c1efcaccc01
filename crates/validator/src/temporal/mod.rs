//! Temporal types and the normalization pipeline.
//!
//! A validated value enters as a [`TemporalValue`], is projected into a
//! [`CanonicalMoment`](projection::CanonicalMoment) under an effective
//! [`Zone`](zone::Zone), and may then be decomposed into
//! [`ComponentValue`](field::ComponentValue)s or shifted by a
//! [`RestrictedDuration`](duration::RestrictedDuration).

pub mod capability;
pub mod duration;
pub mod field;
pub mod moment;
pub mod projection;
pub mod values;
pub mod zone;

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{
    DateTime, FixedOffset, Month, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub use values::{Calendar, MonthDay, OffsetTime, Year, YearMonth};
pub use zone::Zone;

use crate::error::ConfigError;
use field::{month_name, weekday_name};

// ============================================================================
// TYPE TAG
// ============================================================================

/// The supported source types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeTag {
    /// Absolute instant, `DateTime<Utc>`.
    Instant,
    /// Legacy epoch-based time, `std::time::SystemTime`.
    SystemTime,
    /// Date-time with a fixed offset.
    OffsetDateTime,
    /// Date-time in an IANA zone.
    ZonedDateTime,
    /// Time of day with an offset.
    OffsetTime,
    /// Date-time without zone.
    LocalDateTime,
    /// Date without zone.
    LocalDate,
    /// Time of day without zone.
    LocalTime,
    /// Year and month.
    YearMonth,
    /// Month and day of month.
    MonthDay,
    /// Proleptic year.
    Year,
    /// Day of week.
    DayOfWeek,
    /// Month of year.
    Month,
    /// Legacy calendar carrying its own zone, [`Calendar`].
    Calendar,
}

impl TypeTag {
    /// All tags in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Instant,
        Self::SystemTime,
        Self::OffsetDateTime,
        Self::ZonedDateTime,
        Self::OffsetTime,
        Self::LocalDateTime,
        Self::LocalDate,
        Self::LocalTime,
        Self::YearMonth,
        Self::MonthDay,
        Self::Year,
        Self::DayOfWeek,
        Self::Month,
        Self::Calendar,
    ];

    /// The tag name, as used in constraint tables.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Instant => "Instant",
            Self::SystemTime => "SystemTime",
            Self::OffsetDateTime => "OffsetDateTime",
            Self::ZonedDateTime => "ZonedDateTime",
            Self::OffsetTime => "OffsetTime",
            Self::LocalDateTime => "LocalDateTime",
            Self::LocalDate => "LocalDate",
            Self::LocalTime => "LocalTime",
            Self::YearMonth => "YearMonth",
            Self::MonthDay => "MonthDay",
            Self::Year => "Year",
            Self::DayOfWeek => "DayOfWeek",
            Self::Month => "Month",
            Self::Calendar => "Calendar",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| ConfigError::UnknownTypeTag(s.to_owned()))
    }
}

// ============================================================================
// TEMPORAL VALUE
// ============================================================================

/// A value of one of the supported source types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalValue {
    Instant(DateTime<Utc>),
    SystemTime(SystemTime),
    OffsetDateTime(DateTime<FixedOffset>),
    ZonedDateTime(DateTime<Tz>),
    OffsetTime(OffsetTime),
    LocalDateTime(NaiveDateTime),
    LocalDate(NaiveDate),
    LocalTime(NaiveTime),
    YearMonth(YearMonth),
    MonthDay(MonthDay),
    Year(Year),
    DayOfWeek(Weekday),
    Month(Month),
    Calendar(Calendar),
}

impl TemporalValue {
    /// The type tag of this value.
    pub const fn tag(&self) -> TypeTag {
        match self {
            Self::Instant(_) => TypeTag::Instant,
            Self::SystemTime(_) => TypeTag::SystemTime,
            Self::OffsetDateTime(_) => TypeTag::OffsetDateTime,
            Self::ZonedDateTime(_) => TypeTag::ZonedDateTime,
            Self::OffsetTime(_) => TypeTag::OffsetTime,
            Self::LocalDateTime(_) => TypeTag::LocalDateTime,
            Self::LocalDate(_) => TypeTag::LocalDate,
            Self::LocalTime(_) => TypeTag::LocalTime,
            Self::YearMonth(_) => TypeTag::YearMonth,
            Self::MonthDay(_) => TypeTag::MonthDay,
            Self::Year(_) => TypeTag::Year,
            Self::DayOfWeek(_) => TypeTag::DayOfWeek,
            Self::Month(_) => TypeTag::Month,
            Self::Calendar(_) => TypeTag::Calendar,
        }
    }

    /// The zone or offset carried by the value itself.
    pub fn zone(&self) -> Option<Zone> {
        match self {
            Self::OffsetDateTime(at) => Some(Zone::Fixed(*at.offset())),
            Self::ZonedDateTime(at) => Some(Zone::Named(at.timezone())),
            Self::OffsetTime(time) => Some(Zone::Fixed(time.offset())),
            Self::Calendar(calendar) => Some(calendar.zone()),
            _ => None,
        }
    }

    /// The absolute instant, for instant-like values.
    ///
    /// `None` for zone-less values and for a `SystemTime` outside the
    /// calendar range.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Instant(at) => Some(*at),
            Self::SystemTime(at) => system_time_to_utc(*at),
            Self::OffsetDateTime(at) => Some(at.with_timezone(&Utc)),
            Self::ZonedDateTime(at) => Some(at.with_timezone(&Utc)),
            Self::Calendar(calendar) => Some(calendar.instant()),
            _ => None,
        }
    }
}

/// Converts a system time to a calendar instant.
///
/// `None` when the time lies outside the range chrono can represent.
pub(crate) fn system_time_to_utc(at: SystemTime) -> Option<DateTime<Utc>> {
    match at.duration_since(UNIX_EPOCH) {
        Ok(since) => {
            let secs = i64::try_from(since.as_secs()).ok()?;
            DateTime::from_timestamp(secs, since.subsec_nanos())
        }
        Err(before) => {
            let before = before.duration();
            let secs = i64::try_from(before.as_secs()).ok()?.checked_neg()?;
            match before.subsec_nanos() {
                0 => DateTime::from_timestamp(secs, 0),
                nanos => DateTime::from_timestamp(secs.checked_sub(1)?, 1_000_000_000 - nanos),
            }
        }
    }
}

impl fmt::Display for TemporalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::SystemTime(at) => match system_time_to_utc(*at) {
                Some(at) => f.write_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
                None => write!(f, "{at:?}"),
            },
            Self::OffsetDateTime(at) => {
                f.write_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            }
            Self::ZonedDateTime(at) => write!(
                f,
                "{}[{}]",
                at.fixed_offset().to_rfc3339_opts(SecondsFormat::AutoSi, false),
                at.timezone().name()
            ),
            Self::OffsetTime(time) => write!(f, "{time}"),
            Self::LocalDateTime(at) => write!(f, "{}", at.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::LocalDate(date) => write!(f, "{date}"),
            Self::LocalTime(time) => write!(f, "{time}"),
            Self::YearMonth(value) => write!(f, "{value}"),
            Self::MonthDay(value) => write!(f, "{value}"),
            Self::Year(value) => write!(f, "{value}"),
            Self::DayOfWeek(day) => f.write_str(weekday_name(*day)),
            Self::Month(month) => f.write_str(month_name(*month)),
            Self::Calendar(calendar) => write!(f, "{calendar}"),
        }
    }
}

macro_rules! temporal_value_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for TemporalValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

temporal_value_from! {
    Instant(DateTime<Utc>),
    SystemTime(SystemTime),
    OffsetDateTime(DateTime<FixedOffset>),
    ZonedDateTime(DateTime<Tz>),
    OffsetTime(OffsetTime),
    LocalDateTime(NaiveDateTime),
    LocalDate(NaiveDate),
    LocalTime(NaiveTime),
    YearMonth(YearMonth),
    MonthDay(MonthDay),
    Year(Year),
    DayOfWeek(Weekday),
    Month(Month),
    Calendar(Calendar),
}
