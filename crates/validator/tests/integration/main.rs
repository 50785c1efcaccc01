//! Integration tests for tempora-validator.

mod comparisons;
mod fields;
mod messages;
mod registry;
mod zones;

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};
use tempora_validator::prelude::*;

/// 2007-12-03T10:15:30Z, a Monday.
pub fn reference_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2007, 12, 3, 10, 15, 30).unwrap()
}

pub fn ctx() -> ValidationContext {
    ValidationContext::new(FixedClock::utc(reference_instant()))
}

pub fn ctx_at(instant: DateTime<Utc>, zone: &str) -> ValidationContext {
    ValidationContext::new(FixedClock::new(instant, Zone::parse(zone).unwrap()))
}

pub fn is_valid(
    constraint: &TemporalConstraint,
    value: impl Into<TemporalValue>,
    ctx: &ValidationContext,
) -> bool {
    constraint.validate_value(value, ctx).unwrap().is_valid()
}

/// A clock that counts how often the instant is read.
#[derive(Debug, Default)]
pub struct CountingClock {
    reads: AtomicUsize,
}

impl CountingClock {
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Clock for CountingClock {
    fn instant(&self) -> DateTime<Utc> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2007, 12, 3, 8, 0, 0).unwrap()
    }

    fn zone(&self) -> Zone {
        Zone::UTC
    }
}
