//! Validation context
//!
//! Supplies per-run state to constraints: the clock that resolves `now`, the
//! active validation groups, and the property path used in violations.

use std::borrow::Cow;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};

// ============================================================================
// VALIDATION CONTEXT
// ============================================================================

/// Context for validation operations.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tempora_validator::clock::FixedClock;
/// use tempora_validator::foundation::ValidationContext;
///
/// let mut ctx = ValidationContext::builder()
///     .clock(FixedClock::utc(Utc.with_ymd_and_hms(2007, 12, 3, 10, 15, 30).unwrap()))
///     .group("Booking")
///     .build();
///
/// ctx.push_field("booking");
/// ctx.push_field("start");
/// assert_eq!(ctx.field_path(), "booking.start");
/// ```
#[derive(Debug, Clone)]
pub struct ValidationContext {
    clock: Arc<dyn Clock>,

    /// Active groups; empty means the default group.
    groups: Vec<String>,

    /// Current field path for nested object validation.
    field_path: Vec<String>,
}

impl ValidationContext {
    /// Creates a context with the given clock and the default group.
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self::builder().clock(clock).build()
    }

    /// Starts a builder.
    pub fn builder() -> ValidationContextBuilder {
        ValidationContextBuilder::default()
    }

    /// The clock provider.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The active groups.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Pushes a field name onto the path for nested validation.
    pub fn push_field(&mut self, field: impl Into<String>) {
        self.field_path.push(field.into());
    }

    /// Pops a field name from the path.
    pub fn pop_field(&mut self) -> Option<String> {
        self.field_path.pop()
    }

    /// Gets the current field path as a dot-separated string.
    pub fn field_path(&self) -> String {
        self.field_path.join(".")
    }

    /// The current path, if any, for a violation.
    pub fn path(&self) -> Option<Cow<'static, str>> {
        (!self.field_path.is_empty()).then(|| Cow::Owned(self.field_path()))
    }

    /// The path of `property` below the current path.
    pub fn path_for(&self, property: &str) -> Cow<'static, str> {
        if self.field_path.is_empty() {
            Cow::Owned(property.to_owned())
        } else {
            Cow::Owned(format!("{}.{property}", self.field_path()))
        }
    }
}

impl Default for ValidationContext {
    /// System clock in the host zone, default group, empty path.
    fn default() -> Self {
        Self::new(SystemClock::default())
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`ValidationContext`].
#[derive(Debug, Default)]
pub struct ValidationContextBuilder {
    clock: Option<Arc<dyn Clock>>,
    groups: Vec<String>,
    field_path: Vec<String>,
}

impl ValidationContextBuilder {
    /// Sets the clock.
    #[must_use = "builder methods must be chained or built"]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Sets an already shared clock.
    #[must_use = "builder methods must be chained or built"]
    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Activates a group.
    #[must_use = "builder methods must be chained or built"]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Activates several groups.
    #[must_use = "builder methods must be chained or built"]
    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Sets the base property path.
    #[must_use = "builder methods must be chained or built"]
    pub fn path(mut self, field: impl Into<String>) -> Self {
        self.field_path.push(field.into());
        self
    }

    /// Builds the context; the system clock is used when none was set.
    pub fn build(self) -> ValidationContext {
        ValidationContext {
            clock: self
                .clock
                .unwrap_or_else(|| Arc::new(SystemClock::default())),
            groups: self.groups,
            field_path: self.field_path,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
