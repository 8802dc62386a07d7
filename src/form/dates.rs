//! Portal date handling (`dd.MM.yyyy`).

use chrono::{Datelike, Duration, NaiveDate};
use serde_json::Value;

pub const PORTAL_DATE_FORMAT: &str = "%d.%m.%Y";

pub fn parse_portal_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), PORTAL_DATE_FORMAT).ok()
}

/// Parse a snapshot value holding a portal date string
pub fn parse_value(value: &Value) -> Option<NaiveDate> {
    value.as_str().and_then(parse_portal_date)
}

pub fn format_portal_date(date: NaiveDate) -> String {
    date.format(PORTAL_DATE_FORMAT).to_string()
}

/// Shift a portal date string by `days`; `None` for unparseable input
pub fn add_days(input: &str, days: i64) -> Option<String> {
    let date = parse_portal_date(input)?;
    date.checked_add_signed(Duration::days(days))
        .map(format_portal_date)
}

/// Completed years between `birth` and `reference`; zero for future births
pub fn age_on(birth: NaiveDate, reference: NaiveDate) -> u32 {
    if reference < birth {
        return 0;
    }
    let mut years = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_week_later() {
        assert_eq!(add_days("01.03.2026", 7).as_deref(), Some("08.03.2026"));
        assert_eq!(add_days("28.02.2026", 1).as_deref(), Some("01.03.2026"));
        assert_eq!(add_days("2026-03-01", 7), None);
    }

    #[test]
    fn test_age_respects_birthday() {
        let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
        let before = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();
        let on = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();

        assert_eq!(age_on(birth, before), 35);
        assert_eq!(age_on(birth, on), 36);
        assert_eq!(age_on(on, birth), 0);
    }

    #[test]
    fn test_parse_value_requires_string() {
        assert!(parse_value(&Value::from("15.06.1990")).is_some());
        assert!(parse_value(&Value::from(15)).is_none());
    }
}
