//! Zone resolution policy.
//!
//! A constraint's `zoneId` attribute is one of `system`, `provided`, or an
//! explicit zone identifier. [`EffectiveZone::resolve`] checks it against the
//! target type once, at construction; [`EffectiveZone::zone`] picks the
//! concrete [`Zone`] per call without further checks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDateTime, Offset, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::TypeTag;
use super::moment::Now;
use super::values::parse_offset;
use crate::error::ConfigError;

// ============================================================================
// ZONE
// ============================================================================

/// A time zone: either an IANA region with transition rules or a fixed offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// IANA zone such as `Europe/Paris`.
    Named(Tz),
    /// Fixed offset from UTC such as `+01:00`.
    Fixed(FixedOffset),
}

impl Zone {
    /// The UTC zone.
    pub const UTC: Self = Self::Named(Tz::UTC);

    /// Parses an IANA zone name, `Z`, or a `±HH:MM` offset.
    pub fn parse(id: &str) -> Result<Self, ConfigError> {
        let id = id.trim();
        if id == "Z" {
            return Ok(Self::UTC);
        }
        if id.starts_with(['+', '-']) {
            return parse_offset(id)
                .map(Self::Fixed)
                .ok_or_else(|| ConfigError::UnknownZone(id.to_owned()));
        }
        id.parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| ConfigError::UnknownZone(id.to_owned()))
    }

    /// Offset in force at the given instant.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            Self::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
            Self::Fixed(offset) => *offset,
        }
    }

    /// The same instant observed in this zone.
    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset_at(&instant))
    }

    /// Resolves a wall-clock date-time in this zone.
    ///
    /// In an overlap the `preferred` offset wins when it is one of the two
    /// candidates, otherwise the earlier instant. In a gap the wall clock is
    /// moved forward by the length of the gap. `None` only on overflow.
    pub fn localize(
        &self,
        local: NaiveDateTime,
        preferred: Option<FixedOffset>,
    ) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Fixed(offset) => from_local(local, *offset),
            Self::Named(tz) => match tz.from_local_datetime(&local) {
                LocalResult::Single(dt) => Some(dt.fixed_offset()),
                LocalResult::Ambiguous(earlier, later) => {
                    let later = later.fixed_offset();
                    if preferred == Some(*later.offset()) {
                        Some(later)
                    } else {
                        Some(earlier.fixed_offset())
                    }
                }
                LocalResult::None => {
                    // No two transitions fall within a day of each other.
                    let probe = local.checked_sub_signed(TimeDelta::days(1))?;
                    let before = tz.offset_from_utc_datetime(&probe).fix();
                    let shifted = from_local(local, before)?;
                    Some(self.at(shifted.with_timezone(&Utc)))
                }
            },
        }
    }
}

fn from_local(local: NaiveDateTime, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let utc = local.checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
    Some(DateTime::from_naive_utc_and_offset(utc, offset))
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(tz) => f.write_str(tz.name()),
            Self::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for Zone {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// POLICY
// ============================================================================

/// The configured zone strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZonePolicy {
    /// Use the zone of the context clock.
    SystemDefault,
    /// Use the zone or offset carried by the validated value.
    Provided,
    /// Use a fixed, configured zone.
    Explicit(Zone),
}

impl ZonePolicy {
    /// Literal selecting [`ZonePolicy::SystemDefault`].
    pub const SYSTEM: &'static str = "system";
    /// Literal selecting [`ZonePolicy::Provided`].
    pub const PROVIDED: &'static str = "provided";
}

impl FromStr for ZonePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            Self::SYSTEM => Ok(Self::SystemDefault),
            Self::PROVIDED => Ok(Self::Provided),
            other => Zone::parse(other).map(Self::Explicit),
        }
    }
}

/// What zone policies a source type admits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneSupport {
    /// The value carries its own zone or offset: all policies.
    Carried,
    /// An absolute instant without a zone: `system` or explicit.
    Assignable,
    /// A zone-less local value: `system` only.
    LocalOnly,
}

/// A zone policy that has been checked against its target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectiveZone {
    /// The context clock's zone.
    System,
    /// The value's own zone.
    Source,
    /// A configured zone.
    Fixed(Zone),
}

impl EffectiveZone {
    /// Validates the `zoneId` literal for `target`.
    pub fn resolve(
        zone_id: &str,
        target: TypeTag,
        support: ZoneSupport,
    ) -> Result<Self, ConfigError> {
        let zone_id = zone_id.trim();
        if zone_id == ZonePolicy::PROVIDED && support != ZoneSupport::Carried {
            return Err(ConfigError::ProvidedZoneNotSupported { target });
        }
        if support == ZoneSupport::LocalOnly && zone_id != ZonePolicy::SYSTEM {
            return Err(ConfigError::ZoneNotAllowed {
                target,
                expected: ZonePolicy::SYSTEM,
                actual: zone_id.to_owned(),
            });
        }

        Ok(match zone_id.parse::<ZonePolicy>()? {
            ZonePolicy::SystemDefault => Self::System,
            ZonePolicy::Provided => Self::Source,
            ZonePolicy::Explicit(zone) => Self::Fixed(zone),
        })
    }

    /// The concrete zone for one call.
    pub fn zone(&self, source: Option<Zone>, now: &Now<'_>) -> Zone {
        match self {
            Self::System => now.zone(),
            Self::Source => source.unwrap_or_else(|| now.zone()),
            Self::Fixed(zone) => *zone,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
