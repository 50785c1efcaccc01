//! The clock used to resolve `now`.
//!
//! Constraints never read the ambient system time directly. The clock comes
//! from the [`ValidationContext`](crate::foundation::ValidationContext), so a
//! test can pin both the current instant and the default zone.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::temporal::zone::Zone;

/// Source of the current instant and the default zone.
pub trait Clock: Send + Sync + Debug {
    /// The current instant.
    fn instant(&self) -> DateTime<Utc>;

    /// The zone used by the `system` zone policy.
    fn zone(&self) -> Zone;
}

// ============================================================================
// SYSTEM CLOCK
// ============================================================================

/// Clock backed by the operating system time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    zone: Zone,
}

impl SystemClock {
    /// System time observed in the given zone.
    pub const fn new(zone: Zone) -> Self {
        Self { zone }
    }

    /// System time observed in UTC.
    pub const fn utc() -> Self {
        Self::new(Zone::UTC)
    }
}

impl Default for SystemClock {
    /// System time in the host zone, or UTC when the host zone is unknown.
    fn default() -> Self {
        Self::new(host_zone())
    }
}

impl Clock for SystemClock {
    fn instant(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn zone(&self) -> Zone {
        self.zone
    }
}

fn host_zone() -> Zone {
    match iana_time_zone::get_timezone() {
        Ok(name) => match name.parse::<Tz>() {
            Ok(tz) => Zone::Named(tz),
            Err(_) => {
                warn!(zone = %name, "host zone is not in the tz database, using UTC");
                Zone::UTC
            }
        },
        Err(error) => {
            warn!(%error, "cannot determine host zone, using UTC");
            Zone::UTC
        }
    }
}

// ============================================================================
// FIXED CLOCK
// ============================================================================

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    instant: DateTime<Utc>,
    zone: Zone,
}

impl FixedClock {
    /// Always reports `instant`, observed in `zone`.
    pub const fn new(instant: DateTime<Utc>, zone: Zone) -> Self {
        Self { instant, zone }
    }

    /// Always reports `instant`, observed in UTC.
    pub const fn utc(instant: DateTime<Utc>) -> Self {
        Self::new(instant, Zone::UTC)
    }
}

impl Clock for FixedClock {
    fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    fn zone(&self) -> Zone {
        self.zone
    }
}
