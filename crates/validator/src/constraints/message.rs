//! Message template keys and default English messages.
//!
//! The key is chosen once per constraint from its kind and target type. A
//! field constraint on a type whose own value *is* that field (e.g.
//! `DayOfWeekBefore` on a `DayOfWeek`) gets the narrower `.value` key and
//! drops the field name from its phrasing.

use std::borrow::Cow;

use super::ConstraintKind;
use super::comparison::Comparison;
use super::component::FieldOp;
use crate::foundation::{Params, ValidationError};
use crate::temporal::TypeTag;
use crate::temporal::field::Field;

/// Prefix of every template key.
pub const KEY_PREFIX: &str = "tempora";

/// Whether `kind` on `target` inspects the target's own value.
pub fn is_own_value(kind: ConstraintKind, target: TypeTag) -> bool {
    matches!(
        (kind, target),
        (ConstraintKind::Field(Field::Year, _), TypeTag::Year)
            | (ConstraintKind::Field(Field::YearMonth, _), TypeTag::YearMonth)
            | (ConstraintKind::Field(Field::Month, _), TypeTag::Month)
            | (ConstraintKind::Field(Field::DayOfWeek, _), TypeTag::DayOfWeek)
    )
}

/// The template key for `kind` on `target`.
pub fn template_key(kind: ConstraintKind, target: TypeTag) -> String {
    if is_own_value(kind, target) {
        format!("{KEY_PREFIX}.{kind}.value")
    } else {
        format!("{KEY_PREFIX}.{kind}")
    }
}

const fn field_phrase(field: Field) -> &'static str {
    match field {
        Field::Year => "year",
        Field::YearMonth => "year-month",
        Field::Month => "month",
        Field::DayOfMonth => "day of month",
        Field::DayOfWeek => "day of week",
        Field::DayOfYear => "day of year",
        Field::Hour => "hour",
        Field::Minute => "minute",
        Field::Second => "second",
        Field::Nanosecond => "nanosecond",
    }
}

fn default_pattern(kind: ConstraintKind) -> &'static str {
    match kind {
        ConstraintKind::Moment(comparison) => match comparison {
            Comparison::After => "must be after {moment}",
            Comparison::NotAfter => "must not be after {moment}",
            Comparison::Before => "must be before {moment}",
            Comparison::NotBefore => "must not be before {moment}",
            Comparison::MinAfter => "must be at least {duration} after {moment}",
            Comparison::MaxAfter => "must be at most {duration} after {moment}",
            Comparison::MinBefore => "must be at least {duration} before {moment}",
            Comparison::MaxBefore => "must be at most {duration} before {moment}",
        },
        ConstraintKind::Field(_, op) => match op {
            FieldOp::Is => "must be {value}",
            FieldOp::In => "must be one of [{values}]",
            FieldOp::NotIn => "must not be one of [{values}]",
            FieldOp::Before => "must be before {value}",
            FieldOp::After => "must be after {value}",
            FieldOp::NotBefore => "must not be before {value}",
            FieldOp::NotAfter => "must not be after {value}",
            FieldOp::Modulo => "must be congruent to {value} modulo {modulo}",
        },
        ConstraintKind::LastDayOfMonth => "must be the last day of its month",
    }
}

/// Replaces `{name}` placeholders with parameter values.
///
/// Unknown placeholders are left as they are.
pub fn interpolate(pattern: &str, params: &Params) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let value = after.find('}').and_then(|end| {
            let name = &after[..end];
            params
                .iter()
                .find(|(key, _)| key.as_ref() == name)
                .map(|(_, value)| (value, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// A pre-rendered violation for one constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    prototype: ValidationError,
}

impl MessageTemplate {
    /// Renders the message for `kind` on `target` from `params`.
    ///
    /// A custom `message` replaces the default text, not the key.
    pub fn new(
        kind: ConstraintKind,
        target: TypeTag,
        params: Params,
        message: Option<&str>,
        payload: &[String],
    ) -> Self {
        let text = match message {
            Some(custom) => interpolate(custom, &params),
            None => {
                let rendered = interpolate(default_pattern(kind), &params);
                match kind {
                    ConstraintKind::Field(field, _) if !is_own_value(kind, target) => {
                        format!("{} {rendered}", field_phrase(field))
                    }
                    _ => rendered,
                }
            }
        };

        let mut prototype = ValidationError::new(template_key(kind, target), text)
            .with_payload(payload.iter().cloned());
        prototype.params = params;
        Self { prototype }
    }

    /// The template key.
    pub fn key(&self) -> &str {
        &self.prototype.code
    }

    /// The rendered message.
    pub fn message(&self) -> &str {
        &self.prototype.message
    }

    /// A violation at `path`.
    pub fn violation(&self, path: Option<Cow<'static, str>>) -> ValidationError {
        let error = self.prototype.clone();
        match path {
            Some(path) => error.with_field(path),
            None => error,
        }
    }
}
