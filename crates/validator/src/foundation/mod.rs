//! Core validation types and traits
//!
//! - **Traits**: [`Validate`], [`ValidateExt`]
//! - **Outcomes**: [`Verdict`], [`ValidationError`], [`ValidationErrors`]
//! - **Context**: [`ValidationContext`] with the clock provider
//!
//! Evaluation errors travel separately from violations, see
//! [`crate::error::EvaluationError`].

pub mod context;
pub mod error;
pub mod traits;

pub use context::{ValidationContext, ValidationContextBuilder};
pub use error::{Params, ValidationError, ValidationErrors, Verdict};
pub use traits::{Validate, ValidateExt};

use crate::error::EvaluationError;

// ============================================================================
// UTILITIES
// ============================================================================

/// Validates a value with multiple validators, collecting every violation.
///
/// Stops at the first evaluation error.
pub fn validate_with_all<V>(
    value: &V::Input,
    validators: &[&V],
    ctx: &ValidationContext,
) -> Result<ValidationErrors, EvaluationError>
where
    V: Validate + ?Sized,
{
    let mut errors = ValidationErrors::new();
    for validator in validators {
        errors.record(validator.validate(value, ctx)?);
    }
    Ok(errors)
}

// ============================================================================
// TESTS
// ============================================================================
