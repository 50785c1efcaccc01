//! Core traits for the validation system.

use crate::combinators::Optional;
use crate::error::EvaluationError;
use crate::foundation::{ValidationContext, Verdict};

// ============================================================================
// CORE VALIDATOR TRAIT
// ============================================================================

/// The trait every constraint implements.
///
/// A call has three outcomes: `Ok(Verdict::Valid)`, `Ok(Verdict::Invalid(_))`
/// for an ordinary violation, and `Err(EvaluationError)` when the constraint
/// cannot be applied to the input at all. Evaluation errors must be
/// propagated, never read as either verdict.
///
/// # Examples
///
/// ```
/// use tempora_validator::error::EvaluationError;
/// use tempora_validator::foundation::{Validate, ValidationContext, ValidationError, Verdict};
///
/// struct NonNegative;
///
/// impl Validate for NonNegative {
///     type Input = i64;
///
///     fn validate(&self, input: &i64, _ctx: &ValidationContext) -> Result<Verdict, EvaluationError> {
///         Ok(if *input >= 0 {
///             Verdict::Valid
///         } else {
///             Verdict::Invalid(ValidationError::new("non_negative", "must not be negative"))
///         })
///     }
/// }
///
/// let ctx = ValidationContext::default();
/// assert!(NonNegative.validate(&3, &ctx).unwrap().is_valid());
/// ```
pub trait Validate {
    /// The type of input being validated.
    ///
    /// Use `?Sized` to allow validation of unsized types.
    type Input: ?Sized;

    /// Validates the input value.
    fn validate(
        &self,
        input: &Self::Input,
        ctx: &ValidationContext,
    ) -> Result<Verdict, EvaluationError>;
}

impl<V: Validate + ?Sized> Validate for &V {
    type Input = V::Input;

    fn validate(
        &self,
        input: &Self::Input,
        ctx: &ValidationContext,
    ) -> Result<Verdict, EvaluationError> {
        (**self).validate(input, ctx)
    }
}

impl<V: Validate + ?Sized> Validate for std::sync::Arc<V> {
    type Input = V::Input;

    fn validate(
        &self,
        input: &Self::Input,
        ctx: &ValidationContext,
    ) -> Result<Verdict, EvaluationError> {
        (**self).validate(input, ctx)
    }
}

// ============================================================================
// VALIDATOR EXTENSION TRAIT
// ============================================================================

/// Extension methods for validators.
pub trait ValidateExt: Validate + Sized {
    /// Accepts `Option<Input>`, treating `None` as valid.
    ///
    /// Absent values are never handed to the wrapped constraint.
    fn optional(self) -> Optional<Self>
    where
        Self::Input: Sized,
    {
        Optional::new(self)
    }
}

impl<T: Validate> ValidateExt for T {}
