//! Violation keys, messages, paths and payloads.

use chrono::{NaiveDate, Weekday};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tempora_validator::prelude::*;

use crate::ctx;

fn violation(
    constraint: &TemporalConstraint,
    value: impl Into<TemporalValue>,
    ctx: &ValidationContext,
) -> ValidationError {
    match constraint.validate_value(value, ctx).unwrap() {
        Verdict::Invalid(error) => error,
        Verdict::Valid => panic!("expected a violation"),
    }
}

#[rstest]
#[case("DayOfWeekBefore", "WEDNESDAY", TypeTag::DayOfWeek, "tempora.DayOfWeekBefore.value")]
#[case("DayOfWeekBefore", "WEDNESDAY", TypeTag::LocalDate, "tempora.DayOfWeekBefore")]
#[case("MonthIs", "MAY", TypeTag::Month, "tempora.MonthIs.value")]
#[case("MonthIs", "MAY", TypeTag::YearMonth, "tempora.MonthIs")]
#[case("YearIs", "2000", TypeTag::Year, "tempora.YearIs.value")]
#[case("YearIs", "2000", TypeTag::LocalDateTime, "tempora.YearIs")]
#[case("YearMonthIs", "2000-01", TypeTag::YearMonth, "tempora.YearMonthIs.value")]
fn template_keys(
    #[case] kind: &str,
    #[case] value: &str,
    #[case] target: TypeTag,
    #[case] key: &str,
) {
    let constraint = ConstraintConfig::new(kind).value(value).build(target).unwrap();
    assert_eq!(constraint.template().key(), key);
}

#[test]
fn default_messages() {
    let narrow = ConstraintConfig::new("DayOfWeekBefore")
        .value("wednesday")
        .build(TypeTag::DayOfWeek)
        .unwrap();
    let error = violation(&narrow, Weekday::Fri, &ctx());
    assert_eq!(error.code, "tempora.DayOfWeekBefore.value");
    assert_eq!(error.message, "must be before WEDNESDAY");
    assert_eq!(error.param("value"), Some("WEDNESDAY"));
    assert_eq!(error.field, None);

    let generic = ConstraintConfig::new("DayOfWeekBefore")
        .value("WEDNESDAY")
        .build(TypeTag::LocalDate)
        .unwrap();
    let error = violation(&generic, NaiveDate::from_ymd_opt(2007, 12, 7).unwrap(), &ctx());
    assert_eq!(error.message, "day of week must be before WEDNESDAY");

    let min_after = ConstraintConfig::new("MinAfter")
        .duration("P1D")
        .build(TypeTag::LocalDate)
        .unwrap();
    let error = violation(&min_after, NaiveDate::from_ymd_opt(2007, 12, 3).unwrap(), &ctx());
    assert_eq!(error.message, "must be at least P1D after now");
    assert_eq!(error.param("moment"), Some("now"));
}

#[test]
fn custom_message_payload_and_path() {
    let constraint = ConstraintConfig::new("After")
        .moment("2007-12-03")
        .message("{moment} has passed")
        .payload("severity=error")
        .build(TypeTag::LocalDate)
        .unwrap();

    let ctx = ValidationContext::builder()
        .clock(FixedClock::utc(crate::reference_instant()))
        .path("booking")
        .build();
    let error = violation(&constraint, NaiveDate::from_ymd_opt(2007, 12, 1).unwrap(), &ctx);

    assert_eq!(error.code, "tempora.After");
    assert_eq!(error.message, "2007-12-03 has passed");
    assert_eq!(error.field.as_deref(), Some("booking"));
    assert_eq!(error.payload, ["severity=error"]);
}
