//! # tempora-validator
//!
//! Declarative temporal constraints for date and time values.
//!
//! A constraint compares a value against a reference moment (`After`,
//! `MinAfter`, ...), tests one of its fields (`DayOfWeekIn`, `MinuteModulo`,
//! ...), or checks that it falls on the last day of its month. Every
//! constraint is configured once, checked eagerly, and then validates any
//! number of values of its target type under an explicit zone policy.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use tempora_validator::prelude::*;
//!
//! let at_least_a_day_ahead = ConstraintConfig::new("MinAfter")
//!     .duration("P1D")
//!     .build(TypeTag::Instant)
//!     .unwrap();
//!
//! let now = Utc.with_ymd_and_hms(2007, 12, 3, 10, 15, 30).unwrap();
//! let ctx = ValidationContext::new(FixedClock::utc(now));
//!
//! let tomorrow = Utc.with_ymd_and_hms(2007, 12, 4, 10, 15, 30).unwrap();
//! assert!(at_least_a_day_ahead.validate_value(tomorrow, &ctx).unwrap().is_valid());
//! ```
//!
//! ## Layout
//!
//! - [`temporal`]: supported types, zones, projection, fields, durations
//! - [`constraints`]: the constraint engine, rules and messages
//! - [`config`]: serde configuration records and tables
//! - [`registry`]: property-level validation over a table
//! - [`foundation`]: validation traits, context and violation types
//! - [`clock`]: the source of `now`

// ValidationError is the violation type of every call; boxing it would add
// indirection to every validation for no practical benefit.
#![allow(clippy::result_large_err)]

pub mod clock;
pub mod combinators;
pub mod config;
pub mod constraints;
pub mod error;
pub mod foundation;
pub mod prelude;
pub mod registry;
pub mod temporal;
