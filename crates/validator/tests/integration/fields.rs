//! Field predicates and the last-day-of-month check.

use chrono::{Month, NaiveDate, NaiveTime, Weekday};
use rstest::rstest;
use tempora_validator::prelude::*;

use crate::{ctx, is_valid};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn minute(m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(10, m, 0).unwrap()
}

#[rstest]
#[case(5, true)]
#[case(25, true)]
#[case(45, true)]
#[case(6, false)]
#[case(24, false)]
#[case(46, false)]
fn minute_modulo(#[case] m: u32, #[case] valid: bool) {
    let constraint = ConstraintConfig::new("MinuteModulo")
        .value("25")
        .modulo(20)
        .build(TypeTag::LocalTime)
        .unwrap();
    assert_eq!(is_valid(&constraint, minute(m), &ctx()), valid);
}

#[test]
fn modulo_configuration_is_checked() {
    assert!(matches!(
        ConstraintConfig::new("MinuteModulo").value("1").modulo(0).build(TypeTag::LocalTime),
        Err(ConfigError::InvalidModulo(0))
    ));
    assert!(matches!(
        ConstraintConfig::new("DayOfWeekModulo").value("1").modulo(2).build(TypeTag::LocalDate),
        Err(ConfigError::ModuloNotSupported { .. })
    ));
    assert!(matches!(
        ConstraintConfig::new("MinuteModulo").value("1").build(TypeTag::LocalTime),
        Err(ConfigError::MissingAttribute { attribute: "modulo", .. })
    ));
}

#[rstest]
#[case(date(2008, 2, 29), true)]
#[case(date(2007, 2, 28), true)]
#[case(date(2007, 2, 27), false)]
#[case(date(2007, 12, 31), true)]
#[case(date(2007, 4, 30), true)]
#[case(date(2007, 5, 30), false)]
fn last_day_of_month(#[case] value: NaiveDate, #[case] valid: bool) {
    let constraint = ConstraintConfig::new("LastDayOfMonth")
        .build(TypeTag::LocalDate)
        .unwrap();
    assert_eq!(is_valid(&constraint, value, &ctx()), valid);
}

#[test]
fn february_29_only_exists_in_leap_years() {
    assert!(NaiveDate::from_ymd_opt(2007, 2, 29).is_none());
    assert!(MonthDay::new(2, 29).is_some());
    assert!(MonthDay::new(2, 30).is_none());
}

#[test]
fn last_day_of_month_needs_a_full_date() {
    let constraint = ConstraintConfig::new("LastDayOfMonth")
        .build(TypeTag::LocalTime)
        .unwrap();
    let result = constraint.validate_value(minute(0), &ctx());
    assert!(matches!(result, Err(EvaluationError::UnsupportedField { .. })));
}

#[rstest]
#[case(date(2007, 12, 3), true)]
#[case(date(2007, 12, 4), true)]
#[case(date(2007, 12, 5), false)]
#[case(date(2007, 12, 6), false)]
#[case(date(2007, 12, 9), false)]
fn day_of_week_before_wednesday(#[case] value: NaiveDate, #[case] valid: bool) {
    let constraint = ConstraintConfig::new("DayOfWeekBefore")
        .value("WEDNESDAY")
        .build(TypeTag::LocalDate)
        .unwrap();
    assert_eq!(is_valid(&constraint, value, &ctx()), valid);
}

#[test]
fn day_of_week_values_are_their_own_field() {
    let constraint = ConstraintConfig::new("DayOfWeekBefore")
        .value("WEDNESDAY")
        .build(TypeTag::DayOfWeek)
        .unwrap();
    assert!(is_valid(&constraint, Weekday::Mon, &ctx()));
    assert!(is_valid(&constraint, Weekday::Tue, &ctx()));
    assert!(!is_valid(&constraint, Weekday::Wed, &ctx()));
    assert!(!is_valid(&constraint, Weekday::Sun, &ctx()));
}

#[test]
fn empty_sets() {
    let none_allowed = ConstraintConfig::new("HourIn")
        .values(Vec::<String>::new())
        .build(TypeTag::LocalTime)
        .unwrap();
    let none_forbidden = ConstraintConfig::new("HourNotIn")
        .values(Vec::<String>::new())
        .build(TypeTag::LocalTime)
        .unwrap();

    for m in [0, 30, 59] {
        assert!(!is_valid(&none_allowed, minute(m), &ctx()));
        assert!(is_valid(&none_forbidden, minute(m), &ctx()));
    }

    assert!(matches!(
        ConstraintConfig::new("HourIn").build(TypeTag::LocalTime),
        Err(ConfigError::MissingAttribute { attribute: "values", .. })
    ));
}

#[test]
fn month_sets_accept_names_and_numbers() {
    let summer = ConstraintConfig::new("MonthIn")
        .values(["JUNE", "7", "august"])
        .build(TypeTag::Month)
        .unwrap();
    assert!(is_valid(&summer, Month::July, &ctx()));
    assert!(is_valid(&summer, Month::August, &ctx()));
    assert!(!is_valid(&summer, Month::September, &ctx()));

    assert!(matches!(
        ConstraintConfig::new("MonthIn").values(["13"]).build(TypeTag::Month),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[rstest]
#[case("YearIs", "2007", true)]
#[case("YearNotBefore", "2008", false)]
#[case("YearMonthIs", "2007-12", true)]
#[case("YearMonthAfter", "2007-11", true)]
#[case("DayOfYearIs", "337", true)]
#[case("DayOfMonthNotAfter", "2", false)]
fn date_fields(#[case] kind: &str, #[case] value: &str, #[case] valid: bool) {
    let constraint = ConstraintConfig::new(kind)
        .value(value)
        .build(TypeTag::LocalDate)
        .unwrap();
    assert_eq!(is_valid(&constraint, date(2007, 12, 3), &ctx()), valid, "{kind}");
}

#[test]
fn fields_missing_from_the_shape_abort_validation() {
    let constraint = ConstraintConfig::new("HourIs")
        .value("10")
        .build(TypeTag::LocalDate)
        .unwrap();
    let result = constraint.validate_value(date(2007, 12, 3), &ctx());
    assert!(matches!(result, Err(EvaluationError::UnsupportedField { .. })));
}

#[test]
fn optional_values_skip_absent_input() {
    let constraint = ConstraintConfig::new("HourIs")
        .value("10")
        .build(TypeTag::LocalTime)
        .unwrap()
        .optional();

    assert!(constraint.validate(&None, &ctx()).unwrap().is_valid());
    assert!(
        !constraint
            .validate(&Some(TemporalValue::from(NaiveTime::from_hms_opt(11, 0, 0).unwrap())), &ctx())
            .unwrap()
            .is_valid()
    );
}
