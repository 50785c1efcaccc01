//! Temporal constraints.
//!
//! One engine, [`TemporalConstraint`], serves every constraint kind and every
//! source type. It is built once from a
//! [`ConstraintConfig`](crate::config::ConstraintConfig) and then validates
//! any number of values:
//!
//! 1. resolve the effective zone for the value,
//! 2. project the value into its canonical form,
//! 3. evaluate the rule (moment comparison, field predicate, last day of month),
//! 4. report a pre-rendered violation on failure.

pub mod comparison;
pub mod component;
pub mod message;

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::clock::Clock;
use crate::error::{ConfigError, EvaluationError};
use crate::foundation::{Validate, ValidationContext, Verdict};
use crate::temporal::field::{Field, extract, full_date};
use crate::temporal::moment::Now;
use crate::temporal::projection::project;
use crate::temporal::values::YearMonth;
use crate::temporal::zone::EffectiveZone;
use crate::temporal::{TemporalValue, TypeTag};

pub use comparison::{Comparison, MomentComparison};
pub use component::{FieldOp, FieldPredicate, Operands};
pub use message::MessageTemplate;

/// The group a constraint belongs to when none is configured.
pub const DEFAULT_GROUP: &str = "Default";

// ============================================================================
// CONSTRAINT KIND
// ============================================================================

/// What a constraint checks, named like `MinAfter`, `DayOfWeekBefore`,
/// `MinuteModulo` or `LastDayOfMonth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConstraintKind {
    /// Comparison against a (shifted) reference moment.
    Moment(Comparison),
    /// Predicate over one field.
    Field(Field, FieldOp),
    /// The day is the last day of its month.
    LastDayOfMonth,
}

impl ConstraintKind {
    const LAST_DAY_OF_MONTH: &'static str = "LastDayOfMonth";
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Moment(comparison) => f.write_str(comparison.name()),
            Self::Field(field, op) => write!(f, "{}{}", field.name(), op.name()),
            Self::LastDayOfMonth => f.write_str(Self::LAST_DAY_OF_MONTH),
        }
    }
}

impl FromStr for ConstraintKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::LAST_DAY_OF_MONTH {
            return Ok(Self::LastDayOfMonth);
        }
        if let Some(comparison) = Comparison::ALL.into_iter().find(|c| c.name() == s) {
            return Ok(Self::Moment(comparison));
        }

        // Longest field name first: `YearMonthIs` must not match `Year`.
        let mut fields = Field::ALL;
        fields.sort_by_key(|field| std::cmp::Reverse(field.name().len()));
        fields
            .into_iter()
            .find_map(|field| {
                let suffix = s.strip_prefix(field.name())?;
                let op = FieldOp::ALL.into_iter().find(|op| op.name() == suffix)?;
                Some(Self::Field(field, op))
            })
            .ok_or_else(|| ConfigError::UnknownKind(s.to_owned()))
    }
}

impl TryFrom<String> for ConstraintKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConstraintKind> for String {
    fn from(kind: ConstraintKind) -> Self {
        kind.to_string()
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// The evaluation rule of a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Compare against a reference moment.
    Compare(MomentComparison),
    /// Test one field.
    Field {
        field: Field,
        predicate: FieldPredicate,
    },
    /// Day of month equals the length of the month.
    LastDayOfMonth,
}

/// An immutable, shareable constraint engine.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use tempora_validator::prelude::*;
///
/// let constraint = ConstraintConfig::new("DayOfWeekIn")
///     .values(["SATURDAY", "SUNDAY"])
///     .build(TypeTag::LocalDate)
///     .unwrap();
///
/// let ctx = ValidationContext::default();
/// let saturday = NaiveDate::from_ymd_opt(2007, 12, 1).unwrap();
/// let monday = NaiveDate::from_ymd_opt(2007, 12, 3).unwrap();
///
/// assert!(constraint.validate_value(saturday, &ctx).unwrap().is_valid());
/// assert!(!constraint.validate_value(monday, &ctx).unwrap().is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct TemporalConstraint {
    kind: ConstraintKind,
    target: TypeTag,
    zone: EffectiveZone,
    rule: Rule,
    template: MessageTemplate,
    groups: Vec<String>,
}

impl TemporalConstraint {
    pub(crate) fn new(
        kind: ConstraintKind,
        target: TypeTag,
        zone: EffectiveZone,
        rule: Rule,
        template: MessageTemplate,
        groups: Vec<String>,
    ) -> Self {
        let groups = if groups.is_empty() {
            vec![DEFAULT_GROUP.to_owned()]
        } else {
            groups
        };
        Self {
            kind,
            target,
            zone,
            rule,
            template,
            groups,
        }
    }

    /// The constraint kind.
    pub const fn kind(&self) -> ConstraintKind {
        self.kind
    }

    /// The type the constraint validates.
    pub const fn target(&self) -> TypeTag {
        self.target
    }

    /// The checked zone policy.
    pub const fn zone(&self) -> EffectiveZone {
        self.zone
    }

    /// The evaluation rule.
    pub const fn rule(&self) -> &Rule {
        &self.rule
    }

    /// The message template.
    pub const fn template(&self) -> &MessageTemplate {
        &self.template
    }

    /// Groups the constraint belongs to; never empty.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Whether the constraint runs for the active groups.
    pub fn applies_to<S: AsRef<str>>(&self, active: &[S]) -> bool {
        if active.is_empty() {
            return self.groups.iter().any(|g| g == DEFAULT_GROUP);
        }
        active
            .iter()
            .any(|group| self.groups.iter().any(|g| g == group.as_ref()))
    }

    /// Evaluates the rule against a present value.
    ///
    /// `now` is taken from `clock` at most once.
    pub fn test(&self, value: &TemporalValue, clock: &dyn Clock) -> Result<bool, EvaluationError> {
        if value.tag() != self.target {
            return Err(EvaluationError::TypeMismatch {
                expected: self.target,
                actual: value.tag(),
            });
        }

        let now = Now::new(clock);
        let zone = self.zone.zone(value.zone(), &now);
        let object = project(value, zone, &now)?;

        match &self.rule {
            Rule::Compare(comparison) => comparison.evaluate(&object, self.target, zone, &now),
            Rule::Field { field, predicate } => Ok(predicate.test(&extract(&object, *field)?)),
            Rule::LastDayOfMonth => {
                let date = full_date(&object)?;
                Ok(date.day() == YearMonth::from(date).length_of_month())
            }
        }
    }

    /// Validates anything convertible into a [`TemporalValue`].
    pub fn validate_value(
        &self,
        value: impl Into<TemporalValue>,
        ctx: &ValidationContext,
    ) -> Result<Verdict, EvaluationError> {
        self.validate(&value.into(), ctx)
    }
}

impl Validate for TemporalConstraint {
    type Input = TemporalValue;

    fn validate(
        &self,
        input: &TemporalValue,
        ctx: &ValidationContext,
    ) -> Result<Verdict, EvaluationError> {
        let valid = self.test(input, ctx.clock())?;
        trace!(kind = %self.kind, target = %self.target, %input, valid, "evaluated temporal constraint");

        if valid {
            Ok(Verdict::Valid)
        } else {
            Ok(Verdict::Invalid(self.template.violation(ctx.path())))
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
