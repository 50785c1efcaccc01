//! Moment comparisons, durations and the single clock read.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::Tz;
use rstest::rstest;
use tempora_validator::prelude::*;

use crate::{CountingClock, ctx, is_valid, reference_instant};

fn instant_constraint(kind: &str) -> TemporalConstraint {
    ConstraintConfig::new(kind)
        .duration("P1D")
        .build(TypeTag::Instant)
        .unwrap()
}

#[rstest]
#[case("MinAfter", TimeDelta::days(1), TimeDelta::nanoseconds(-1))]
#[case("MaxAfter", TimeDelta::days(1), TimeDelta::nanoseconds(1))]
#[case("MinBefore", TimeDelta::days(-1), TimeDelta::nanoseconds(1))]
#[case("MaxBefore", TimeDelta::days(-1), TimeDelta::nanoseconds(-1))]
fn bounds_are_inclusive_to_the_nanosecond(
    #[case] kind: &str,
    #[case] offset: TimeDelta,
    #[case] past_bound: TimeDelta,
) {
    let constraint = instant_constraint(kind);
    let boundary = reference_instant() + offset;

    assert!(is_valid(&constraint, boundary, &ctx()), "{kind} at boundary");
    assert!(
        !is_valid(&constraint, boundary + past_bound, &ctx()),
        "{kind} past boundary"
    );
}

#[rstest]
#[case("After", 1, true)]
#[case("After", 0, false)]
#[case("NotAfter", 0, true)]
#[case("NotAfter", 1, false)]
#[case("Before", -1, true)]
#[case("Before", 0, false)]
#[case("NotBefore", 0, true)]
#[case("NotBefore", -1, false)]
fn plain_comparisons_against_now(#[case] kind: &str, #[case] nanos: i64, #[case] valid: bool) {
    let constraint = ConstraintConfig::new(kind).build(TypeTag::Instant).unwrap();
    let value = reference_instant() + TimeDelta::nanoseconds(nanos);
    assert_eq!(is_valid(&constraint, value, &ctx()), valid);
}

#[test]
fn literal_moments_compare_by_value() {
    let constraint = ConstraintConfig::new("Before")
        .moment("2008-01-01")
        .build(TypeTag::LocalDate)
        .unwrap();

    assert!(is_valid(&constraint, NaiveDate::from_ymd_opt(2007, 12, 31).unwrap(), &ctx()));
    assert!(!is_valid(&constraint, NaiveDate::from_ymd_opt(2008, 1, 1).unwrap(), &ctx()));
}

#[test]
fn duration_units_follow_the_target_granularity() {
    let date_only = ConstraintConfig::new("MinAfter").duration("P1Y1M1DT1H");
    assert!(matches!(
        date_only.build(TypeTag::LocalDate),
        Err(ConfigError::DisallowedUnit { .. })
    ));
    assert!(date_only.build(TypeTag::LocalDateTime).is_ok());

    let year_month = ConstraintConfig::new("MinAfter").duration("P1Y1M");
    assert!(year_month.build(TypeTag::YearMonth).is_ok());
    assert!(matches!(
        year_month.build(TypeTag::Year),
        Err(ConfigError::DisallowedUnit { .. })
    ));

    let one_day = ConstraintConfig::new("MaxBefore").duration("P1D");
    assert!(one_day.build(TypeTag::LocalTime).is_ok());
    assert!(matches!(
        one_day.build(TypeTag::MonthDay),
        Err(ConfigError::DurationNotSupported { .. })
    ));

    assert!(matches!(
        ConstraintConfig::new("MinAfter").duration("1D").build(TypeTag::Instant),
        Err(ConfigError::InvalidDuration { .. })
    ));
}

#[test]
fn duration_presence_matches_the_kind() {
    assert!(matches!(
        ConstraintConfig::new("MinAfter").build(TypeTag::Instant),
        Err(ConfigError::MissingAttribute { attribute: "duration", .. })
    ));
    assert!(matches!(
        ConstraintConfig::new("After").duration("P1D").build(TypeTag::Instant),
        Err(ConfigError::UnexpectedAttribute { attribute: "duration", .. })
    ));
}

#[test]
fn calendar_days_follow_daylight_saving() {
    // Europe/Paris switches to summer time on 2007-03-25.
    let one_day = ConstraintConfig::new("MinAfter")
        .moment("2007-03-24T12:00:00+01:00[Europe/Paris]")
        .duration("P1D")
        .zone_id("provided")
        .build(TypeTag::ZonedDateTime)
        .unwrap();
    let twenty_four_hours = ConstraintConfig::new("MinAfter")
        .moment("2007-03-24T12:00:00+01:00[Europe/Paris]")
        .duration("PT24H")
        .zone_id("provided")
        .build(TypeTag::ZonedDateTime)
        .unwrap();

    let noon: DateTime<Tz> = DateTime::parse_from_rfc3339("2007-03-25T12:00:00+02:00")
        .unwrap()
        .with_timezone(&Tz::Europe__Paris);

    assert!(is_valid(&one_day, noon, &ctx()));
    assert!(!is_valid(&one_day, noon - TimeDelta::seconds(1), &ctx()));
    assert!(!is_valid(&twenty_four_hours, noon, &ctx()));
    assert!(is_valid(&twenty_four_hours, noon + TimeDelta::hours(1), &ctx()));
}

#[test]
fn mixed_units_shift_a_literal_instant() {
    let constraint = ConstraintConfig::new("MinAfter")
        .moment("2007-12-03T10:15:30.00Z")
        .duration("P1Y1M1DT1H1M1S")
        .build(TypeTag::Instant)
        .unwrap();
    let bound: DateTime<Utc> = "2009-01-04T11:16:31Z".parse().unwrap();

    assert!(is_valid(&constraint, bound, &ctx()));
    assert!(!is_valid(&constraint, bound - TimeDelta::nanoseconds(1), &ctx()));
}

#[test]
fn month_arithmetic_clamps_to_month_end() {
    let constraint = ConstraintConfig::new("MaxAfter")
        .moment("2008-01-31")
        .duration("P1M")
        .build(TypeTag::LocalDate)
        .unwrap();

    assert!(is_valid(&constraint, NaiveDate::from_ymd_opt(2008, 2, 29).unwrap(), &ctx()));
    assert!(!is_valid(&constraint, NaiveDate::from_ymd_opt(2008, 3, 1).unwrap(), &ctx()));
}

#[test]
fn local_time_durations_wrap_at_midnight() {
    let constraint = ConstraintConfig::new("MinAfter")
        .moment("23:00:00")
        .duration("PT2H")
        .build(TypeTag::LocalTime)
        .unwrap();

    assert!(is_valid(&constraint, NaiveTime::from_hms_opt(1, 0, 0).unwrap(), &ctx()));
    assert!(!is_valid(&constraint, NaiveTime::from_hms_opt(0, 59, 59).unwrap(), &ctx()));
}

#[test]
fn now_is_read_once_per_call() {
    let constraint = ConstraintConfig::new("After")
        .zone_id("Europe/Paris")
        .build(TypeTag::OffsetTime)
        .unwrap();
    let clock = Arc::new(CountingClock::default());
    let ctx = ValidationContext::builder()
        .shared_clock(Arc::clone(&clock) as Arc<dyn Clock>)
        .build();

    // 10:00+01:00 against 09:00 in Paris.
    let value = OffsetTime::new(
        NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
        chrono::FixedOffset::east_opt(3600).unwrap(),
    );
    assert!(is_valid(&constraint, value, &ctx));
    assert_eq!(clock.reads(), 1);

    assert!(is_valid(&constraint, value, &ctx));
    assert_eq!(clock.reads(), 2);
}

#[test]
fn type_mismatch_is_an_evaluation_error() {
    let constraint = ConstraintConfig::new("After").build(TypeTag::LocalDate).unwrap();
    let result = constraint.validate_value(Utc::now(), &ctx());
    assert!(matches!(
        result,
        Err(EvaluationError::TypeMismatch {
            expected: TypeTag::LocalDate,
            actual: TypeTag::Instant,
        })
    ));
}

#[test]
fn system_time_beyond_the_calendar_is_an_error() {
    let constraint = ConstraintConfig::new("After").build(TypeTag::SystemTime).unwrap();
    let far_future: SystemTime = UNIX_EPOCH + Duration::from_secs(10_000_000_000_000);

    let result = constraint.validate_value(far_future, &ctx());
    assert!(matches!(
        result,
        Err(EvaluationError::OutOfRange {
            target: TypeTag::SystemTime,
            ..
        })
    ));
}
