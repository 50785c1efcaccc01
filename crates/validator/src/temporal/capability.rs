//! Per-type capability records.
//!
//! A single constraint engine serves every source type; what differs between
//! types lives in one static record per [`TypeTag`].

use super::TemporalValue;
use super::TypeTag;
use super::duration::Granularity;
use super::moment::{self, Now};
use super::zone::{Zone, ZoneSupport};

/// What the engine needs to know about one source type.
#[derive(Debug)]
pub struct Capability {
    /// The type this record describes.
    pub tag: TypeTag,
    /// Which zone policies the type admits.
    pub zone_support: ZoneSupport,
    /// Units a duration may carry, `None` if durations are not supported.
    pub granularity: Option<Granularity>,
    /// Parses a moment literal of this type.
    pub parse_moment: fn(&str) -> Option<TemporalValue>,
    /// Samples the current time as a value of this type.
    pub now: fn(&Now<'_>, Zone) -> TemporalValue,
}

macro_rules! capabilities {
    ($($tag:ident: $support:ident, $granularity:expr, $parse:ident, $now:ident;)*) => {
        static CAPABILITIES: [Capability; TypeTag::ALL.len()] = [
            $(
                Capability {
                    tag: TypeTag::$tag,
                    zone_support: ZoneSupport::$support,
                    granularity: $granularity,
                    parse_moment: moment::$parse,
                    now: moment::$now,
                },
            )*
        ];
    };
}

capabilities! {
    Instant:        Assignable, Some(Granularity::DateTime),  parse_instant,          now_instant;
    SystemTime:     Assignable, Some(Granularity::DateTime),  parse_system_time,      now_system_time;
    OffsetDateTime: Carried,    Some(Granularity::DateTime),  parse_offset_date_time, now_offset_date_time;
    ZonedDateTime:  Carried,    Some(Granularity::DateTime),  parse_zoned_date_time,  now_zoned_date_time;
    OffsetTime:     Carried,    Some(Granularity::Time),      parse_offset_time,      now_offset_time;
    LocalDateTime:  LocalOnly,  Some(Granularity::DateTime),  parse_local_date_time,  now_local_date_time;
    LocalDate:      LocalOnly,  Some(Granularity::Date),      parse_local_date,       now_local_date;
    LocalTime:      LocalOnly,  Some(Granularity::Time),      parse_local_time,       now_local_time;
    YearMonth:      LocalOnly,  Some(Granularity::YearMonth), parse_year_month,       now_year_month;
    MonthDay:       LocalOnly,  None,                         parse_month_day,        now_month_day;
    Year:           LocalOnly,  Some(Granularity::Year),      parse_year,             now_year;
    DayOfWeek:      LocalOnly,  None,                         parse_day_of_week,      now_day_of_week;
    Month:          LocalOnly,  None,                         parse_month,            now_month;
    Calendar:       Carried,    Some(Granularity::DateTime),  parse_calendar,         now_calendar;
}

/// The capability record of a type.
pub fn capability(tag: TypeTag) -> &'static Capability {
    // Records are declared in `TypeTag::ALL` order.
    &CAPABILITIES[tag as usize]
}
