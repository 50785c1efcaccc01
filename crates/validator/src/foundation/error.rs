//! Violation types returned by constraints.
//!
//! A violation is the expected, recoverable outcome of validation: it is
//! returned as data inside a [`Verdict`], never through the `Err` channel.
//! Configuration and evaluation failures live in [`crate::error`].
//!
//! All string fields use `Cow<'static, str>` so that static template keys
//! and messages do not allocate.

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;

/// Ordered key-value parameters attached to a violation (typically 1-3).
pub type Params = SmallVec<[(Cow<'static, str>, Cow<'static, str>); 4]>;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A single constraint violation.
///
/// # Examples
///
/// ```
/// use tempora_validator::foundation::ValidationError;
///
/// let error = ValidationError::new("tempora.After", "must be after 2007-12-03")
///     .with_field("booking.start")
///     .with_param("moment", "2007-12-03");
///
/// assert_eq!(error.param("moment"), Some("2007-12-03"));
/// assert_eq!(error.field.as_deref(), Some("booking.start"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Message template key, e.g. `tempora.DayOfWeekBefore`.
    pub code: Cow<'static, str>,

    /// Human-readable message in English, rendered from the template.
    pub message: Cow<'static, str>,

    /// Property path of the failing value, e.g. `booking.start`.
    pub field: Option<Cow<'static, str>>,

    /// Parameters the message was rendered from.
    pub params: Params,

    /// Opaque payload entries copied from the constraint configuration.
    pub payload: Vec<Cow<'static, str>>,
}

impl ValidationError {
    /// Creates a new violation with a template key and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            params: SmallVec::new(),
            payload: Vec::new(),
        }
    }

    /// Sets the property path for this violation.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Adds a message parameter.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Attaches payload entries.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_payload<I, S>(mut self, payload: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        self.payload.extend(payload.into_iter().map(Into::into));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "[{}] {}: {}", field, self.code, self.message)?;
        } else {
            write!(f, "{}: {}", self.code, self.message)?;
        }

        if !self.params.is_empty() {
            write!(f, " (params: [")?;
            for (i, (k, v)) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{k}={v}")?;
            }
            write!(f, "])")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// VERDICT
// ============================================================================

/// Outcome of validating one value against one constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a verdict must be inspected"]
pub enum Verdict {
    /// The value satisfies the constraint.
    Valid,
    /// The value violates the constraint.
    Invalid(ValidationError),
}

impl Verdict {
    /// Returns `true` for [`Verdict::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the violation, if any.
    pub fn violation(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Invalid(error) => Some(error),
        }
    }

    /// Converts into a `Result`, with the violation as the error.
    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(error) => Err(error),
        }
    }
}

// ============================================================================
// ERROR COLLECTION
// ============================================================================

/// A collection of violations, e.g. for all constraints of one object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Creates a new empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Adds a violation.
    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Records the violation of an invalid verdict; valid verdicts are ignored.
    pub fn record(&mut self, verdict: Verdict) {
        if let Verdict::Invalid(error) = verdict {
            self.errors.push(error);
        }
    }

    /// Returns true if there are any violations.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns all violations.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Iterates over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Converts to a Result.
    #[must_use = "result must be used"]
    pub fn into_result<T>(self, ok_value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(ok_value)
        } else {
            Err(self)
        }
    }
}

impl FromIterator<ValidationError> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = ValidationError>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.errors.len())?;
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// TESTS
// ============================================================================
