//! Table-driven validation through the registry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use pretty_assertions::assert_eq;
use tempora_validator::prelude::*;

use crate::ctx;

const BOOKING: &str = r#"[
    {
        "property": "checkIn",
        "type": "ZonedDateTime",
        "constraints": [
            { "kind": "MinAfter", "duration": "P1D", "zoneId": "provided" },
            { "kind": "DayOfWeekNotIn", "values": ["SATURDAY", "SUNDAY"], "zoneId": "provided" }
        ]
    },
    {
        "property": "arrival",
        "type": "LocalTime",
        "constraints": [
            { "kind": "MinuteIn", "values": [0, 30] },
            { "kind": "HourNotBefore", "value": 14, "groups": ["Strict"] }
        ]
    },
    {
        "property": "departure",
        "type": "LocalTime",
        "constraints": [
            { "kind": "MinuteIn", "values": [0, 30] }
        ]
    },
    {
        "property": "invoiceDate",
        "type": "LocalDate",
        "constraints": [
            { "kind": "LastDayOfMonth", "payload": ["billing"] }
        ]
    }
]"#;

fn paris(y: i32, m: u32, d: u32, h: u32) -> TemporalValue {
    TemporalValue::from(Tz::Europe__Paris.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
}

fn time(h: u32, m: u32) -> TemporalValue {
    TemporalValue::from(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

#[test]
fn loads_and_deduplicates_a_json_table() {
    let registry = ConstraintRegistry::from_json(BOOKING).unwrap();

    let names: Vec<_> = registry.properties().iter().map(|p| p.property()).collect();
    assert_eq!(names, ["checkIn", "arrival", "departure", "invoiceDate"]);
    assert_eq!(registry.engine_count(), 5);
    assert!(Arc::ptr_eq(
        &registry.constraints("arrival")[0],
        &registry.constraints("departure")[0]
    ));
}

#[test]
fn aggregates_violations_with_paths() {
    let registry = ConstraintRegistry::from_json(BOOKING).unwrap();

    let mut booking = HashMap::new();
    // A Saturday, well over a day after 2007-12-03T10:15:30Z.
    booking.insert("checkIn".to_owned(), paris(2007, 12, 8, 12));
    booking.insert("arrival".to_owned(), time(13, 15));
    booking.insert("departure".to_owned(), time(11, 0));
    booking.insert(
        "invoiceDate".to_owned(),
        TemporalValue::from(NaiveDate::from_ymd_opt(2007, 11, 29).unwrap()),
    );

    let errors = registry.validate(&booking, &ctx()).unwrap();
    let found: Vec<_> = errors
        .iter()
        .map(|e| (e.field.as_deref().unwrap_or_default(), &*e.code))
        .collect();
    assert_eq!(
        found,
        [
            ("checkIn", "tempora.DayOfWeekNotIn"),
            ("arrival", "tempora.MinuteIn"),
            ("invoiceDate", "tempora.LastDayOfMonth"),
        ]
    );
    assert_eq!(errors.errors()[2].payload, ["billing"]);
}

#[test]
fn absent_properties_are_valid() {
    let registry = ConstraintRegistry::from_json(BOOKING).unwrap();
    let empty: HashMap<String, TemporalValue> = HashMap::new();
    assert!(registry.validate(&empty, &ctx()).unwrap().is_empty());
}

#[test]
fn groups_select_constraints() {
    let registry = ConstraintRegistry::from_json(BOOKING).unwrap();
    let arrival = time(13, 0);

    assert!(registry.validate_property("arrival", &arrival, &ctx()).unwrap().is_empty());

    let strict = ValidationContext::builder()
        .clock(FixedClock::utc(crate::reference_instant()))
        .group("Strict")
        .build();
    let errors = registry.validate_property("arrival", &arrival, &strict).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.errors()[0].code, "tempora.HourNotBefore");
    assert_eq!(errors.errors()[0].message, "hour must not be before 14");
}

#[test]
fn base_path_prefixes_property_paths() {
    let registry = ConstraintRegistry::from_json(BOOKING).unwrap();
    let ctx = ValidationContext::builder()
        .clock(FixedClock::utc(crate::reference_instant()))
        .path("booking")
        .build();

    let errors = registry.validate_property("departure", &time(11, 5), &ctx).unwrap();
    assert_eq!(errors.errors()[0].field.as_deref(), Some("booking.departure"));
}

#[test]
fn misconfigured_tables_fail_on_load() {
    let error = ConstraintRegistry::from_json(
        r#"[{ "property": "birthday", "type": "LocalDate",
              "constraints": [{ "kind": "MinBefore", "duration": "PT1H" }] }]"#,
    )
    .unwrap_err();
    assert!(matches!(
        error,
        ConfigError::Property { ref property, ref source }
            if property == "birthday" && matches!(**source, ConfigError::DisallowedUnit { .. })
    ));

    assert!(matches!(
        ConstraintRegistry::from_json("{ not json"),
        Err(ConfigError::Table(_))
    ));
}

#[test]
fn evaluation_errors_abort_the_object() {
    let registry = ConstraintRegistry::from_json(BOOKING).unwrap();
    let mut booking = HashMap::new();
    booking.insert(
        "arrival".to_owned(),
        TemporalValue::from(DateTime::<Utc>::from_timestamp(0, 0).unwrap()),
    );
    assert!(matches!(
        registry.validate(&booking, &ctx()),
        Err(EvaluationError::TypeMismatch { .. })
    ));
}
