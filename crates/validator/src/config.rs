//! Constraint configuration.
//!
//! [`ConstraintConfig`] is the attribute record of one constraint: its kind,
//! message, groups, payload, zone policy and kind-specific operands. It is
//! plain data (serde, hashable) and is turned into an engine with
//! [`ConstraintConfig::build`]. A [`ConstraintTable`] lists the constraints
//! per property and is the input of the
//! [`ConstraintRegistry`](crate::registry::ConstraintRegistry).
//!
//! ```json
//! [
//!   {
//!     "property": "start",
//!     "type": "ZonedDateTime",
//!     "constraints": [
//!       { "kind": "MinAfter", "duration": "P1D", "zoneId": "provided" },
//!       { "kind": "DayOfWeekNotIn", "values": ["SATURDAY", "SUNDAY"] }
//!     ]
//!   }
//! ]
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::constraints::{
    ConstraintKind, FieldPredicate, MessageTemplate, MomentComparison, Operands, Rule,
    TemporalConstraint,
};
use crate::error::ConfigError;
use crate::foundation::Params;
use crate::temporal::TypeTag;
use crate::temporal::capability::capability;
use crate::temporal::zone::{EffectiveZone, ZonePolicy};

fn default_zone_id() -> String {
    ZonePolicy::SYSTEM.to_owned()
}

fn is_default_zone_id(zone_id: &str) -> bool {
    zone_id == ZonePolicy::SYSTEM
}

/// A configured value; tables may write integers without quotes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Integer(value) => value.to_string(),
        }
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Into::into))
}

fn scalars<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(Option::<Vec<Scalar>>::deserialize(deserializer)?
        .map(|items| items.into_iter().map(Into::into).collect()))
}

// ============================================================================
// CONSTRAINT CONFIG
// ============================================================================

/// Attributes of one constraint.
///
/// # Examples
///
/// ```
/// use tempora_validator::config::ConstraintConfig;
/// use tempora_validator::temporal::TypeTag;
///
/// let constraint = ConstraintConfig::new("MinuteModulo")
///     .value("25")
///     .modulo(20)
///     .build(TypeTag::LocalTime)
///     .unwrap();
///
/// assert_eq!(constraint.template().key(), "tempora.MinuteModulo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConstraintConfig {
    /// Kind name, e.g. `MinAfter` or `DayOfWeekIn`.
    pub kind: String,

    /// Custom message text; `{param}` placeholders are interpolated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Validation groups; empty means the default group.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    /// Opaque entries copied into every violation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payload: Vec<String>,

    /// `system`, `provided`, or a zone id.
    #[serde(default = "default_zone_id", skip_serializing_if = "is_default_zone_id")]
    pub zone_id: String,

    /// Reference moment; `now` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moment: Option<String>,

    /// ISO-8601 duration for Min/Max comparisons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Operand of single-value field constraints.
    ///
    /// `MinuteModulo` tables may spell it `minute`.
    #[serde(
        default,
        alias = "minute",
        deserialize_with = "scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<String>,

    /// Operands of `In` / `NotIn`.
    #[serde(default, deserialize_with = "scalars", skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,

    /// Modulus of `Modulo` constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulo: Option<i64>,
}

impl ConstraintConfig {
    /// A configuration of the given kind with all attributes at their defaults.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: None,
            groups: Vec::new(),
            payload: Vec::new(),
            zone_id: default_zone_id(),
            moment: None,
            duration: None,
            value: None,
            values: None,
            modulo: None,
        }
    }

    /// Sets a custom message.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a validation group.
    #[must_use = "builder methods must be chained or built"]
    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.groups.push(group.into());
        self
    }

    /// Adds a payload entry.
    #[must_use = "builder methods must be chained or built"]
    pub fn payload(mut self, entry: impl Into<String>) -> Self {
        self.payload.push(entry.into());
        self
    }

    /// Sets the zone policy.
    #[must_use = "builder methods must be chained or built"]
    pub fn zone_id(mut self, zone_id: impl Into<String>) -> Self {
        self.zone_id = zone_id.into();
        self
    }

    /// Sets the reference moment.
    #[must_use = "builder methods must be chained or built"]
    pub fn moment(mut self, moment: impl Into<String>) -> Self {
        self.moment = Some(moment.into());
        self
    }

    /// Sets the duration.
    #[must_use = "builder methods must be chained or built"]
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    /// Sets the single operand.
    #[must_use = "builder methods must be chained or built"]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the minute operand of `MinuteModulo`, same as [`value`](Self::value).
    #[must_use = "builder methods must be chained or built"]
    pub fn minute(mut self, minute: i64) -> Self {
        self.value = Some(minute.to_string());
        self
    }

    /// Sets the operand set.
    #[must_use = "builder methods must be chained or built"]
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the modulus.
    #[must_use = "builder methods must be chained or built"]
    pub fn modulo(mut self, modulo: i64) -> Self {
        self.modulo = Some(modulo);
        self
    }

    /// Builds the engine for `target`.
    ///
    /// Every attribute is checked here: zone policy legality, duration units,
    /// moment and value literals, and attributes the kind does not take.
    pub fn build(&self, target: TypeTag) -> Result<TemporalConstraint, ConfigError> {
        let kind: ConstraintKind = self.kind.parse()?;
        let zone = EffectiveZone::resolve(&self.zone_id, target, capability(target).zone_support)?;

        let mut params = Params::new();
        let rule = match kind {
            ConstraintKind::Moment(comparison) => {
                self.reject_operands(kind, &["value", "values", "modulo"])?;
                let comparison = MomentComparison::new(
                    comparison,
                    self.moment.as_deref(),
                    self.duration.as_deref(),
                    target,
                )?;
                params.push(param("moment", comparison.moment().to_string()));
                if let Some(duration) = comparison.duration() {
                    params.push(param("duration", duration.to_string()));
                }
                Rule::Compare(comparison)
            }
            ConstraintKind::Field(field, op) => {
                self.reject_operands(kind, &["moment", "duration"])?;
                let predicate = FieldPredicate::new(
                    field,
                    op,
                    Operands {
                        value: self.value.as_deref(),
                        values: self.values.as_deref(),
                        modulo: self.modulo,
                    },
                )?;
                params.extend(self.predicate_params(&predicate));
                Rule::Field { field, predicate }
            }
            ConstraintKind::LastDayOfMonth => {
                self.reject_operands(kind, &["moment", "duration", "value", "values", "modulo"])?;
                Rule::LastDayOfMonth
            }
        };

        let template = MessageTemplate::new(
            kind,
            target,
            params,
            self.message.as_deref(),
            &self.payload,
        );
        debug!(%kind, %target, zone = ?zone, key = template.key(), "built temporal constraint");

        Ok(TemporalConstraint::new(
            kind,
            target,
            zone,
            rule,
            template,
            self.groups.clone(),
        ))
    }

    fn reject_operands(
        &self,
        kind: ConstraintKind,
        attributes: &[&'static str],
    ) -> Result<(), ConfigError> {
        let present = |attribute: &str| match attribute {
            "moment" => self.moment.is_some(),
            "duration" => self.duration.is_some(),
            "value" => self.value.is_some(),
            "values" => self.values.is_some(),
            "modulo" => self.modulo.is_some(),
            _ => false,
        };
        match attributes.iter().find(|attribute| present(**attribute)) {
            Some(&attribute) => Err(ConfigError::UnexpectedAttribute { kind, attribute }),
            None => Ok(()),
        }
    }

    fn predicate_params(&self, predicate: &FieldPredicate) -> Params {
        let mut params = Params::new();
        match predicate {
            FieldPredicate::In(values) | FieldPredicate::NotIn(values) => {
                let joined = values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                params.push(param("values", joined));
            }
            FieldPredicate::Modulo { modulo, .. } => {
                let value = self.value.as_deref().unwrap_or_default().trim().to_owned();
                params.push(param("value", value));
                params.push(param("modulo", modulo.to_string()));
            }
            FieldPredicate::Is(value)
            | FieldPredicate::Before(value)
            | FieldPredicate::After(value)
            | FieldPredicate::NotBefore(value)
            | FieldPredicate::NotAfter(value) => params.push(param("value", value.to_string())),
        }
        params
    }
}

fn param(key: &'static str, value: String) -> (Cow<'static, str>, Cow<'static, str>) {
    (Cow::Borrowed(key), Cow::Owned(value))
}

// ============================================================================
// CONSTRAINT TABLE
// ============================================================================

/// The constraints declared on one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyRule {
    /// Property name, also the violation path.
    pub property: String,

    /// Declared type of the property.
    #[serde(rename = "type")]
    pub target: TypeTag,

    /// Constraints, validated in order.
    #[serde(default)]
    pub constraints: Vec<ConstraintConfig>,
}

/// A declarative list of property rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstraintTable {
    pub properties: Vec<PropertyRule>,
}

impl ConstraintTable {
    /// Parses a table from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Adds a property rule.
    #[must_use = "builder methods must be chained or built"]
    pub fn property<I>(mut self, property: impl Into<String>, target: TypeTag, constraints: I) -> Self
    where
        I: IntoIterator<Item = ConstraintConfig>,
    {
        self.properties.push(PropertyRule {
            property: property.into(),
            target,
            constraints: constraints.into_iter().collect(),
        });
        self
    }
}

// ============================================================================
// TESTS
// ============================================================================
