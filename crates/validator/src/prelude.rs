//! Prelude module for convenient imports.
//!
//! Provides a single `use tempora_validator::prelude::*;` import that brings
//! in the configuration, engine, context and value types.
//!
//! # Examples
//!
//! ```rust
//! use tempora_validator::prelude::*;
//!
//! let weekday = ConstraintConfig::new("DayOfWeekNotIn")
//!     .values(["SATURDAY", "SUNDAY"])
//!     .build(TypeTag::LocalDate)
//!     .unwrap();
//! assert_eq!(weekday.template().key(), "tempora.DayOfWeekNotIn");
//! ```

// ============================================================================
// FOUNDATION: Core traits, context, violations
// ============================================================================

pub use crate::foundation::{
    Validate, ValidateExt, ValidationContext, ValidationError, ValidationErrors, Verdict,
};

// ============================================================================
// ENGINE: Configuration, constraints, registry
// ============================================================================

pub use crate::config::{ConstraintConfig, ConstraintTable, PropertyRule};
pub use crate::constraints::{ConstraintKind, TemporalConstraint};
pub use crate::registry::{ConstraintRegistry, Validatable};

// ============================================================================
// TEMPORAL: Values, zones, clocks
// ============================================================================

pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::error::{ConfigError, EvaluationError};
pub use crate::temporal::{
    Calendar, MonthDay, OffsetTime, TemporalValue, TypeTag, Year, YearMonth, Zone,
};

// ============================================================================
// COMBINATORS
// ============================================================================

pub use crate::combinators::{Optional, optional};
