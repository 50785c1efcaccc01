//! Optional combinator: absent values are valid.

use crate::error::EvaluationError;
use crate::foundation::{Validate, ValidationContext, Verdict};

/// Makes a validator work with `Option` inputs.
///
/// `None` is always valid; the inner validator only sees present values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Optional<V> {
    pub(crate) inner: V,
}

impl<V> Optional<V> {
    pub fn new(inner: V) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &V {
        &self.inner
    }

    pub fn into_inner(self) -> V {
        self.inner
    }
}

impl<V, T> Validate for Optional<V>
where
    V: Validate<Input = T>,
{
    type Input = Option<T>;

    fn validate(
        &self,
        input: &Self::Input,
        ctx: &ValidationContext,
    ) -> Result<Verdict, EvaluationError> {
        match input {
            None => Ok(Verdict::Valid),
            Some(value) => self.inner.validate(value, ctx),
        }
    }
}

pub fn optional<V>(validator: V) -> Optional<V> {
    Optional::new(validator)
}
