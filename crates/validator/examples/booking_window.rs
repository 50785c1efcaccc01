//! Validates a hotel booking against a constraint table.
//!
//! Run with: `cargo run -p tempora-validator --example booking_window`

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tempora_validator::prelude::*;

const TABLE: &str = r#"[
    {
        "property": "checkIn",
        "type": "ZonedDateTime",
        "constraints": [
            { "kind": "MinAfter", "duration": "PT12H", "zoneId": "provided",
              "message": "check-in must be booked {duration} ahead" },
            { "kind": "MaxAfter", "duration": "P1Y", "zoneId": "provided" }
        ]
    },
    {
        "property": "arrival",
        "type": "LocalTime",
        "constraints": [
            { "kind": "HourNotBefore", "value": 14 },
            { "kind": "MinuteIn", "values": [0, 15, 30, 45] }
        ]
    },
    {
        "property": "invoiceDate",
        "type": "LocalDate",
        "constraints": [{ "kind": "LastDayOfMonth" }]
    }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ConstraintRegistry::from_json(TABLE)?;

    let now = Utc.with_ymd_and_hms(2007, 12, 3, 10, 15, 30).single().ok_or("invalid clock")?;
    let ctx = ValidationContext::builder()
        .clock(FixedClock::new(now, Zone::parse("Europe/Paris")?))
        .path("booking")
        .build();

    let check_in = Tz::Europe__Paris
        .with_ymd_and_hms(2007, 12, 3, 18, 0, 0)
        .single()
        .ok_or("ambiguous check-in")?;
    let arrival = NaiveTime::from_hms_opt(13, 20, 0).ok_or("invalid arrival")?;
    let invoice = NaiveDate::from_ymd_opt(2007, 12, 31).ok_or("invalid invoice date")?;

    let mut booking = HashMap::new();
    booking.insert("checkIn".to_owned(), TemporalValue::from(check_in));
    booking.insert("arrival".to_owned(), TemporalValue::from(arrival));
    booking.insert("invoiceDate".to_owned(), TemporalValue::from(invoice));

    let errors = registry.validate(&booking, &ctx)?;
    if errors.is_empty() {
        println!("booking is valid");
    } else {
        for error in errors.iter() {
            println!("{error}");
        }
    }
    Ok(())
}
