//! Property-level validation over a constraint table.
//!
//! A [`ConstraintRegistry`] builds every constraint of a
//! [`ConstraintTable`] up front and then validates objects that expose their
//! temporal properties through [`Validatable`]. Identical configurations on
//! the same target type share one engine.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::{ConstraintConfig, ConstraintTable};
use crate::constraints::TemporalConstraint;
use crate::error::{ConfigError, EvaluationError};
use crate::foundation::{ValidationContext, ValidationErrors};
use crate::temporal::{TemporalValue, TypeTag};

// ============================================================================
// VALIDATABLE
// ============================================================================

/// An object whose temporal properties can be looked up by name.
///
/// Returning `None` means the property is absent; absent values are valid
/// for every temporal constraint.
pub trait Validatable {
    /// The current value of `name`, if present.
    fn property(&self, name: &str) -> Option<TemporalValue>;
}

impl<S: BuildHasher> Validatable for HashMap<String, TemporalValue, S> {
    fn property(&self, name: &str) -> Option<TemporalValue> {
        self.get(name).copied()
    }
}

impl Validatable for BTreeMap<String, TemporalValue> {
    fn property(&self, name: &str) -> Option<TemporalValue> {
        self.get(name).copied()
    }
}

impl<T: Validatable + ?Sized> Validatable for &T {
    fn property(&self, name: &str) -> Option<TemporalValue> {
        (**self).property(name)
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// The constraints of one property.
#[derive(Debug, Clone)]
pub struct PropertyConstraints {
    property: String,
    target: TypeTag,
    constraints: Vec<Arc<TemporalConstraint>>,
}

impl PropertyConstraints {
    /// Property name.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Declared type.
    pub const fn target(&self) -> TypeTag {
        self.target
    }

    /// Constraints in declaration order.
    pub fn constraints(&self) -> &[Arc<TemporalConstraint>] {
        &self.constraints
    }
}

/// Prebuilt constraints for a set of properties.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use tempora_validator::prelude::*;
///
/// let registry = ConstraintRegistry::from_json(r#"[
///     { "property": "checkIn", "type": "LocalDate",
///       "constraints": [{ "kind": "After", "zoneId": "system" }] }
/// ]"#).unwrap();
///
/// let ctx = ValidationContext::new(FixedClock::utc(
///     Utc.with_ymd_and_hms(2007, 12, 3, 10, 0, 0).unwrap(),
/// ));
///
/// let mut booking = HashMap::new();
/// booking.insert(
///     "checkIn".to_owned(),
///     TemporalValue::from(NaiveDate::from_ymd_opt(2007, 12, 1).unwrap()),
/// );
///
/// let errors = registry.validate(&booking, &ctx).unwrap();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors.errors()[0].field.as_deref(), Some("checkIn"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConstraintRegistry {
    properties: Vec<PropertyConstraints>,
    engines: usize,
}

impl ConstraintRegistry {
    /// Builds every constraint of `table`.
    ///
    /// Fails on the first misconfigured constraint, naming its property.
    pub fn from_table(table: &ConstraintTable) -> Result<Self, ConfigError> {
        let mut cache: HashMap<(&ConstraintConfig, TypeTag), Arc<TemporalConstraint>> =
            HashMap::new();
        let mut properties = Vec::with_capacity(table.properties.len());

        for rule in &table.properties {
            let mut constraints = Vec::with_capacity(rule.constraints.len());
            for config in &rule.constraints {
                let engine = match cache.entry((config, rule.target)) {
                    Entry::Occupied(entry) => Arc::clone(entry.get()),
                    Entry::Vacant(entry) => {
                        let built = config
                            .build(rule.target)
                            .map_err(|error| error.for_property(&rule.property))?;
                        Arc::clone(entry.insert(Arc::new(built)))
                    }
                };
                constraints.push(engine);
            }
            debug!(
                property = %rule.property,
                target = %rule.target,
                constraints = constraints.len(),
                "registered property constraints"
            );
            properties.push(PropertyConstraints {
                property: rule.property.clone(),
                target: rule.target,
                constraints,
            });
        }

        Ok(Self {
            properties,
            engines: cache.len(),
        })
    }

    /// Parses and builds a JSON table.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::from_table(&ConstraintTable::from_json(json)?)
    }

    /// Registered properties in table order.
    pub fn properties(&self) -> &[PropertyConstraints] {
        &self.properties
    }

    /// Constraints registered for `property`; empty when unknown.
    pub fn constraints(&self, property: &str) -> &[Arc<TemporalConstraint>] {
        self.properties
            .iter()
            .find(|p| p.property == property)
            .map(|p| p.constraints.as_slice())
            .unwrap_or_default()
    }

    /// Number of distinct engines after deduplication.
    pub const fn engine_count(&self) -> usize {
        self.engines
    }

    /// Validates every registered property of `object`.
    ///
    /// Constraints outside the active groups are skipped. Absent properties
    /// are valid. Violations carry the property path.
    pub fn validate<T: Validatable + ?Sized>(
        &self,
        object: &T,
        ctx: &ValidationContext,
    ) -> Result<ValidationErrors, EvaluationError> {
        let mut errors = ValidationErrors::new();
        for entry in &self.properties {
            if let Some(value) = object.property(&entry.property) {
                Self::check(entry, &value, ctx, &mut errors)?;
            }
        }
        Ok(errors)
    }

    /// Validates a single value against the constraints of `property`.
    pub fn validate_property(
        &self,
        property: &str,
        value: &TemporalValue,
        ctx: &ValidationContext,
    ) -> Result<ValidationErrors, EvaluationError> {
        let mut errors = ValidationErrors::new();
        if let Some(entry) = self.properties.iter().find(|p| p.property == property) {
            Self::check(entry, value, ctx, &mut errors)?;
        }
        Ok(errors)
    }

    fn check(
        entry: &PropertyConstraints,
        value: &TemporalValue,
        ctx: &ValidationContext,
        errors: &mut ValidationErrors,
    ) -> Result<(), EvaluationError> {
        for constraint in entry
            .constraints
            .iter()
            .filter(|c| c.applies_to(ctx.groups()))
        {
            let valid = constraint.test(value, ctx.clock())?;
            trace!(property = %entry.property, kind = %constraint.kind(), valid, "checked property");
            if !valid {
                errors.add(
                    constraint
                        .template()
                        .violation(Some(ctx.path_for(&entry.property))),
                );
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
