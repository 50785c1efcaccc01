//! Zone policy legality and zone-dependent projection.

use chrono::{DateTime, FixedOffset, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempora_validator::prelude::*;

use crate::{ctx, ctx_at, is_valid};

const LOCAL_TAGS: [TypeTag; 8] = [
    TypeTag::LocalDateTime,
    TypeTag::LocalDate,
    TypeTag::LocalTime,
    TypeTag::YearMonth,
    TypeTag::MonthDay,
    TypeTag::Year,
    TypeTag::DayOfWeek,
    TypeTag::Month,
];

#[test]
fn local_types_accept_only_system() {
    for target in LOCAL_TAGS {
        assert!(ConstraintConfig::new("After").build(target).is_ok(), "{target}");

        let provided = ConstraintConfig::new("After").zone_id("provided").build(target);
        assert!(
            matches!(provided, Err(ConfigError::ProvidedZoneNotSupported { .. })),
            "{target}"
        );

        let explicit = ConstraintConfig::new("After").zone_id("UTC").build(target);
        match explicit {
            Err(ConfigError::ZoneNotAllowed { expected, actual, .. }) => {
                assert_eq!(expected, "system");
                assert_eq!(actual, "UTC");
            }
            other => panic!("{target}: unexpected {other:?}"),
        }
    }
}

#[rstest]
#[case(TypeTag::Instant)]
#[case(TypeTag::SystemTime)]
fn instants_reject_provided_but_take_explicit_zones(#[case] target: TypeTag) {
    assert!(matches!(
        ConstraintConfig::new("Before").zone_id("provided").build(target),
        Err(ConfigError::ProvidedZoneNotSupported { .. })
    ));
    assert!(ConstraintConfig::new("Before").zone_id("America/New_York").build(target).is_ok());
    assert!(ConstraintConfig::new("Before").zone_id("-05:00").build(target).is_ok());
}

#[rstest]
#[case(TypeTag::OffsetDateTime)]
#[case(TypeTag::ZonedDateTime)]
#[case(TypeTag::OffsetTime)]
#[case(TypeTag::Calendar)]
fn zone_carrying_types_accept_every_policy(#[case] target: TypeTag) {
    for zone_id in ["system", "provided", "UTC", "Asia/Tokyo", "+01:00"] {
        assert!(
            ConstraintConfig::new("NotAfter").zone_id(zone_id).build(target).is_ok(),
            "{target} with {zone_id}"
        );
    }
}

#[test]
fn unknown_zone_ids_fail_at_build() {
    assert!(matches!(
        ConstraintConfig::new("After").zone_id("Atlantis/Capital").build(TypeTag::Instant),
        Err(ConfigError::UnknownZone(_))
    ));
}

#[test]
fn provided_zone_and_utc_see_different_days() {
    let value = DateTime::parse_from_rfc3339("2007-12-03T23:30:00-01:00").unwrap();

    let provided = ConstraintConfig::new("DayOfMonthIs")
        .value("3")
        .zone_id("provided")
        .build(TypeTag::OffsetDateTime)
        .unwrap();
    let utc = ConstraintConfig::new("DayOfMonthIs")
        .value("3")
        .zone_id("UTC")
        .build(TypeTag::OffsetDateTime)
        .unwrap();

    assert!(is_valid(&provided, value, &ctx()));
    assert!(!is_valid(&utc, value, &ctx()));

    let utc_fourth = ConstraintConfig::new("DayOfMonthIs")
        .value("4")
        .zone_id("UTC")
        .build(TypeTag::OffsetDateTime)
        .unwrap();
    assert!(is_valid(&utc_fourth, value, &ctx()));
}

#[test]
fn calendar_is_observed_in_its_own_zone() {
    let calendar =
        Calendar::from(DateTime::parse_from_rfc3339("2007-12-03T23:30:00-01:00").unwrap());

    let provided = ConstraintConfig::new("DayOfMonthIs")
        .value("3")
        .zone_id("provided")
        .build(TypeTag::Calendar)
        .unwrap();
    let utc = ConstraintConfig::new("DayOfMonthIs")
        .value("4")
        .zone_id("UTC")
        .build(TypeTag::Calendar)
        .unwrap();

    assert!(is_valid(&provided, calendar, &ctx()));
    assert!(is_valid(&utc, calendar, &ctx()));
    assert!(ConstraintConfig::new("After").build(TypeTag::Calendar).is_ok());
}

#[test]
fn system_policy_follows_the_clock_zone() {
    let hour_is_23 = ConstraintConfig::new("HourIs")
        .value("23")
        .build(TypeTag::Instant)
        .unwrap();
    let instant: DateTime<Utc> = "2007-12-04T00:30:00Z".parse().unwrap();

    assert!(!is_valid(&hour_is_23, instant, &ctx()));
    assert!(is_valid(&hour_is_23, instant, &ctx_at(instant, "-01:00")));
}

#[test]
fn offset_time_is_moved_to_the_resolved_offset() {
    let value = OffsetTime::new(
        chrono::NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
        FixedOffset::west_opt(3600).unwrap(),
    );

    let in_utc = ConstraintConfig::new("HourIs")
        .value("0")
        .zone_id("UTC")
        .build(TypeTag::OffsetTime)
        .unwrap();
    let as_given = ConstraintConfig::new("HourIs")
        .value("23")
        .zone_id("provided")
        .build(TypeTag::OffsetTime)
        .unwrap();

    assert!(is_valid(&in_utc, value, &ctx()));
    assert!(is_valid(&as_given, value, &ctx()));
}
