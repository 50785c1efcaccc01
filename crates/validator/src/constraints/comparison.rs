//! Comparisons against a reference moment.

use std::cmp::Ordering;
use std::fmt;

use super::ConstraintKind;
use crate::error::{ConfigError, EvaluationError};
use crate::temporal::TypeTag;
use crate::temporal::capability::capability;
use crate::temporal::duration::{RestrictedDuration, Sign};
use crate::temporal::moment::{MomentSpec, Now};
use crate::temporal::projection::{CanonicalMoment, project};
use crate::temporal::zone::Zone;

/// The eight moment comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// object > moment
    After,
    /// object <= moment
    NotAfter,
    /// object < moment
    Before,
    /// object >= moment
    NotBefore,
    /// object >= moment + duration
    MinAfter,
    /// object <= moment + duration
    MaxAfter,
    /// object <= moment - duration
    MinBefore,
    /// object >= moment - duration
    MaxBefore,
}

impl Comparison {
    /// All comparisons.
    pub const ALL: [Self; 8] = [
        Self::After,
        Self::NotAfter,
        Self::Before,
        Self::NotBefore,
        Self::MinAfter,
        Self::MaxAfter,
        Self::MinBefore,
        Self::MaxBefore,
    ];

    /// The kind name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::After => "After",
            Self::NotAfter => "NotAfter",
            Self::Before => "Before",
            Self::NotBefore => "NotBefore",
            Self::MinAfter => "MinAfter",
            Self::MaxAfter => "MaxAfter",
            Self::MinBefore => "MinBefore",
            Self::MaxBefore => "MaxBefore",
        }
    }

    /// Whether the comparison is against a duration-shifted moment.
    pub const fn takes_duration(self) -> bool {
        matches!(
            self,
            Self::MinAfter | Self::MaxAfter | Self::MinBefore | Self::MaxBefore
        )
    }

    /// Direction in which the duration shifts the moment.
    const fn shift(self) -> Sign {
        match self {
            Self::MinBefore | Self::MaxBefore => Sign::Minus,
            _ => Sign::Plus,
        }
    }

    /// Whether `object.cmp(reference) == ordering` satisfies the comparison.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::After => ordering == Ordering::Greater,
            Self::Before => ordering == Ordering::Less,
            Self::NotAfter | Self::MaxAfter | Self::MinBefore => ordering != Ordering::Greater,
            Self::NotBefore | Self::MinAfter | Self::MaxBefore => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A comparison with its reference moment and optional duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MomentComparison {
    comparison: Comparison,
    moment: MomentSpec,
    duration: Option<RestrictedDuration>,
}

impl MomentComparison {
    /// Builds the comparison for `target`.
    ///
    /// The moment defaults to `now`. Min/Max comparisons require a duration
    /// that fits the target's granularity; plain ones reject it.
    pub fn new(
        comparison: Comparison,
        moment: Option<&str>,
        duration: Option<&str>,
        target: TypeTag,
    ) -> Result<Self, ConfigError> {
        let kind = ConstraintKind::Moment(comparison);
        let moment = MomentSpec::parse(moment.unwrap_or(MomentSpec::NOW), target)?;

        let duration = match (comparison.takes_duration(), duration) {
            (true, None) => {
                return Err(ConfigError::MissingAttribute {
                    kind,
                    attribute: "duration",
                });
            }
            (false, Some(_)) => {
                return Err(ConfigError::UnexpectedAttribute {
                    kind,
                    attribute: "duration",
                });
            }
            (false, None) => None,
            (true, Some(text)) => {
                let granularity = capability(target)
                    .granularity
                    .ok_or(ConfigError::DurationNotSupported { target })?;
                Some(RestrictedDuration::parse(text, granularity)?)
            }
        };

        Ok(Self {
            comparison,
            moment,
            duration,
        })
    }

    /// The comparison.
    pub const fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// The reference moment.
    pub const fn moment(&self) -> &MomentSpec {
        &self.moment
    }

    /// The duration, for Min/Max comparisons.
    pub const fn duration(&self) -> Option<&RestrictedDuration> {
        self.duration.as_ref()
    }

    /// Tests a projected value.
    ///
    /// The reference moment is resolved and projected in the same zone as
    /// the value, then shifted by the duration.
    pub fn evaluate(
        &self,
        object: &CanonicalMoment,
        target: TypeTag,
        zone: Zone,
        now: &Now<'_>,
    ) -> Result<bool, EvaluationError> {
        let reference = project(&self.moment.resolve(target, now, zone), zone, now)?;
        let reference = match &self.duration {
            Some(duration) => duration.apply(&reference, self.comparison.shift())?,
            None => reference,
        };

        let ordering = object
            .compare(&reference)
            .ok_or(EvaluationError::Incomparable {
                value: object.shape(),
                reference: reference.shape(),
            })?;
        Ok(self.comparison.holds(ordering))
    }
}
