//! Configuration and evaluation errors.
//!
//! Violations are data, see [`crate::foundation::ValidationError`]. The two
//! enums here are the failure channels: [`ConfigError`] aborts constraint
//! construction, [`EvaluationError`] aborts a single validation call.

use thiserror::Error;

use crate::constraints::ConstraintKind;
use crate::temporal::TypeTag;
use crate::temporal::duration::{DurationUnit, Granularity};
use crate::temporal::field::Field;

/// A constraint configuration that cannot be turned into an engine.
///
/// Raised once at construction, never per value.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `zoneId = "provided"` on a type that carries no zone or offset.
    #[error("zone policy 'provided' is not supported for {target}")]
    ProvidedZoneNotSupported {
        /// Target type of the constraint.
        target: TypeTag,
    },

    /// A zone-less type configured with a zone other than the allowed one.
    #[error("zone id for {target} must be '{expected}', got '{actual}'")]
    ZoneNotAllowed {
        /// Target type of the constraint.
        target: TypeTag,
        /// The only accepted literal.
        expected: &'static str,
        /// The configured literal.
        actual: String,
    },

    /// The zone identifier is neither an IANA zone nor an offset.
    #[error("unknown zone id '{0}'")]
    UnknownZone(String),

    /// The duration does not follow the ISO-8601 grammar.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// Configured text.
        input: String,
        /// What went wrong.
        reason: &'static str,
    },

    /// The duration uses a unit the target granularity does not allow.
    #[error("duration '{input}' uses {unit}, which {granularity} durations do not allow")]
    DisallowedUnit {
        /// Configured text.
        input: String,
        /// First offending unit.
        unit: DurationUnit,
        /// Granularity of the target type.
        granularity: Granularity,
    },

    /// The target type supports no duration arithmetic at all.
    #[error("durations are not supported for {target}")]
    DurationNotSupported {
        /// Target type of the constraint.
        target: TypeTag,
    },

    /// A moment literal that does not parse as the target type.
    #[error("invalid moment '{input}' for {target}")]
    InvalidMoment {
        /// Configured text.
        input: String,
        /// Target type of the constraint.
        target: TypeTag,
    },

    /// A component value outside the field's domain.
    #[error("invalid value '{input}' for field {field}")]
    InvalidValue {
        /// Configured text.
        input: String,
        /// Field the value was configured for.
        field: Field,
    },

    /// Modulo on a field that is not an integer.
    #[error("modulo is not supported for field {field}")]
    ModuloNotSupported {
        /// Non-integer field.
        field: Field,
    },

    /// A modulus that is zero or negative.
    #[error("modulo must be positive, got {0}")]
    InvalidModulo(i64),

    /// A required attribute was not configured.
    #[error("{kind} requires attribute '{attribute}'")]
    MissingAttribute {
        /// Constraint kind.
        kind: ConstraintKind,
        /// Attribute name.
        attribute: &'static str,
    },

    /// An attribute that the constraint kind does not take.
    #[error("{kind} does not take attribute '{attribute}'")]
    UnexpectedAttribute {
        /// Constraint kind.
        kind: ConstraintKind,
        /// Attribute name.
        attribute: &'static str,
    },

    /// Unknown constraint kind name.
    #[error("unknown constraint kind '{0}'")]
    UnknownKind(String),

    /// Unknown type tag name.
    #[error("unknown type tag '{0}'")]
    UnknownTypeTag(String),

    /// The constraint table is not valid JSON for the table schema.
    #[error("constraint table: {0}")]
    Table(#[from] serde_json::Error),

    /// A configuration error for a specific property of the table.
    #[error("property '{property}': {source}")]
    Property {
        /// Property name from the table.
        property: String,
        /// Underlying error.
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attaches the property this error was raised for.
    pub fn for_property(self, property: impl Into<String>) -> Self {
        Self::Property {
            property: property.into(),
            source: Box::new(self),
        }
    }
}

/// A validation call that cannot produce a verdict.
///
/// Distinct from a violation: the constraint is misapplied to the value, so
/// neither "valid" nor "invalid" would be truthful.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The canonical form of the value has no such field.
    #[error("field {field} is not supported for {target} values")]
    UnsupportedField {
        /// Requested field.
        field: Field,
        /// Shape of the canonical value.
        target: &'static str,
    },

    /// A value of another type than the constraint was built for.
    #[error("constraint for {expected} cannot validate a {actual} value")]
    TypeMismatch {
        /// Type the constraint was built for.
        expected: TypeTag,
        /// Type of the value.
        actual: TypeTag,
    },

    /// The value and the reference moment have different canonical shapes.
    #[error("cannot compare a {value} value with a {reference} moment")]
    Incomparable {
        /// Shape of the validated value.
        value: &'static str,
        /// Shape of the reference moment.
        reference: &'static str,
    },

    /// Shifting the reference moment left the representable range.
    #[error("applying duration {duration} overflows the representable range")]
    Overflow {
        /// Duration text.
        duration: String,
    },

    /// The value lies outside the range of calendar instants.
    #[error("{target} value {value} is outside the supported date range")]
    OutOfRange {
        /// Type of the value.
        target: TypeTag,
        /// Debug rendering of the value.
        value: String,
    },
}
