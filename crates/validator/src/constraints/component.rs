//! Predicates over a single calendrical field.

use std::collections::BTreeSet;
use std::fmt;

use super::ConstraintKind;
use crate::error::ConfigError;
use crate::temporal::field::{ComponentValue, Field};

/// The operation of a field constraint, without its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOp {
    Is,
    In,
    NotIn,
    Before,
    After,
    NotBefore,
    NotAfter,
    Modulo,
}

impl FieldOp {
    /// All operations, longest name first so suffix matching is unambiguous.
    pub const ALL: [Self; 8] = [
        Self::NotBefore,
        Self::NotAfter,
        Self::Modulo,
        Self::Before,
        Self::NotIn,
        Self::After,
        Self::Is,
        Self::In,
    ];

    /// The suffix in constraint kind names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Is => "Is",
            Self::In => "In",
            Self::NotIn => "NotIn",
            Self::Before => "Before",
            Self::After => "After",
            Self::NotBefore => "NotBefore",
            Self::NotAfter => "NotAfter",
            Self::Modulo => "Modulo",
        }
    }
}

impl fmt::Display for FieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Configured operands of a field constraint.
#[derive(Debug, Clone, Copy, Default)]
pub struct Operands<'a> {
    pub value: Option<&'a str>,
    pub values: Option<&'a [String]>,
    pub modulo: Option<i64>,
}

/// A field predicate with parsed operands.
///
/// Sets are kept sorted for logarithmic lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPredicate {
    Is(ComponentValue),
    In(BTreeSet<ComponentValue>),
    NotIn(BTreeSet<ComponentValue>),
    Before(ComponentValue),
    After(ComponentValue),
    NotBefore(ComponentValue),
    NotAfter(ComponentValue),
    /// `component mod modulo == remainder`, Euclidean.
    Modulo { modulo: i64, remainder: i64 },
}

impl FieldPredicate {
    /// Parses the operands `op` takes for `field`, rejecting the others.
    pub fn new(field: Field, op: FieldOp, operands: Operands<'_>) -> Result<Self, ConfigError> {
        let kind = ConstraintKind::Field(field, op);
        let missing = |attribute| ConfigError::MissingAttribute { kind, attribute };
        let unexpected = |attribute| ConfigError::UnexpectedAttribute { kind, attribute };

        if op != FieldOp::Modulo && operands.modulo.is_some() {
            return Err(unexpected("modulo"));
        }
        let set_op = matches!(op, FieldOp::In | FieldOp::NotIn);
        if set_op && operands.value.is_some() {
            return Err(unexpected("value"));
        }
        if !set_op && operands.values.is_some() {
            return Err(unexpected("values"));
        }

        let set = || -> Result<BTreeSet<ComponentValue>, ConfigError> {
            operands
                .values
                .ok_or_else(|| missing("values"))?
                .iter()
                .map(|text| field.parse_value(text))
                .collect()
        };
        let single = || field.parse_value(operands.value.ok_or_else(|| missing("value"))?);

        Ok(match op {
            FieldOp::In => Self::In(set()?),
            FieldOp::NotIn => Self::NotIn(set()?),
            FieldOp::Is => Self::Is(single()?),
            FieldOp::Before => Self::Before(single()?),
            FieldOp::After => Self::After(single()?),
            FieldOp::NotBefore => Self::NotBefore(single()?),
            FieldOp::NotAfter => Self::NotAfter(single()?),
            FieldOp::Modulo => {
                if !field.is_integer() {
                    return Err(ConfigError::ModuloNotSupported { field });
                }
                let modulo = operands.modulo.ok_or_else(|| missing("modulo"))?;
                if modulo <= 0 {
                    return Err(ConfigError::InvalidModulo(modulo));
                }
                let remainder = single()?.as_integer().unwrap_or_default().rem_euclid(modulo);
                Self::Modulo { modulo, remainder }
            }
        })
    }

    /// Tests an extracted component.
    pub fn test(&self, component: &ComponentValue) -> bool {
        match self {
            Self::Is(value) => component == value,
            Self::In(values) => values.contains(component),
            Self::NotIn(values) => !values.contains(component),
            Self::Before(value) => component < value,
            Self::After(value) => component > value,
            Self::NotBefore(value) => component >= value,
            Self::NotAfter(value) => component <= value,
            Self::Modulo { modulo, remainder } => component
                .as_integer()
                .is_some_and(|v| v.rem_euclid(*modulo) == *remainder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use rstest::rstest;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    #[case(5, true)]
    #[case(25, true)]
    #[case(45, true)]
    #[case(6, false)]
    #[case(24, false)]
    #[case(46, false)]
    fn minute_modulo(#[case] minute: i64, #[case] accepted: bool) {
        let predicate = FieldPredicate::new(
            Field::Minute,
            FieldOp::Modulo,
            Operands {
                value: Some("25"),
                modulo: Some(20),
                ..Operands::default()
            },
        )
        .unwrap();
        assert_eq!(predicate, FieldPredicate::Modulo { modulo: 20, remainder: 5 });
        assert_eq!(predicate.test(&ComponentValue::Integer(minute)), accepted);
    }

    #[test]
    fn modulo_needs_an_integer_field_and_positive_modulus() {
        let on_weekday = FieldPredicate::new(
            Field::DayOfWeek,
            FieldOp::Modulo,
            Operands {
                value: Some("MONDAY"),
                modulo: Some(2),
                ..Operands::default()
            },
        );
        assert!(matches!(on_weekday, Err(ConfigError::ModuloNotSupported { .. })));

        let zero = FieldPredicate::new(
            Field::Minute,
            FieldOp::Modulo,
            Operands {
                value: Some("0"),
                modulo: Some(0),
                ..Operands::default()
            },
        );
        assert!(matches!(zero, Err(ConfigError::InvalidModulo(0))));
    }

    #[test]
    fn empty_sets() {
        let empty = values(&[]);
        let operands = Operands {
            values: Some(&empty),
            ..Operands::default()
        };
        let is_in = FieldPredicate::new(Field::Hour, FieldOp::In, operands).unwrap();
        let not_in = FieldPredicate::new(Field::Hour, FieldOp::NotIn, operands).unwrap();

        for hour in 0..24 {
            assert!(!is_in.test(&ComponentValue::Integer(hour)));
            assert!(not_in.test(&ComponentValue::Integer(hour)));
        }
    }

    #[test]
    fn membership() {
        let weekend = values(&["SATURDAY", "sun"]);
        let predicate = FieldPredicate::new(
            Field::DayOfWeek,
            FieldOp::In,
            Operands {
                values: Some(&weekend),
                ..Operands::default()
            },
        )
        .unwrap();

        assert!(predicate.test(&ComponentValue::DayOfWeek(Weekday::Sun)));
        assert!(!predicate.test(&ComponentValue::DayOfWeek(Weekday::Fri)));
    }

    #[test]
    fn day_of_week_before_wednesday() {
        let predicate = FieldPredicate::new(
            Field::DayOfWeek,
            FieldOp::Before,
            Operands {
                value: Some("WEDNESDAY"),
                ..Operands::default()
            },
        )
        .unwrap();

        let accepted: Vec<_> = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|day| predicate.test(&ComponentValue::DayOfWeek(*day)))
        .collect();
        assert_eq!(accepted, [Weekday::Mon, Weekday::Tue]);
    }

    #[test]
    fn operands_are_checked() {
        let missing = FieldPredicate::new(Field::Hour, FieldOp::Is, Operands::default());
        assert!(matches!(
            missing,
            Err(ConfigError::MissingAttribute { attribute: "value", .. })
        ));

        let hours = values(&["9"]);
        let unexpected = FieldPredicate::new(
            Field::Hour,
            FieldOp::Is,
            Operands {
                value: Some("9"),
                values: Some(&hours),
                ..Operands::default()
            },
        );
        assert!(matches!(
            unexpected,
            Err(ConfigError::UnexpectedAttribute { attribute: "values", .. })
        ));
    }
}
