use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Timestamps are stored as RFC 3339 UTC text so that the same value is
/// portable between the SQLite and PostgreSQL backends.
pub(crate) fn now_rfc3339() -> String {
    format_offset(OffsetDateTime::now_utc())
}

pub(crate) fn format_offset(value: OffsetDateTime) -> String {
    value.format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, PrimitiveDateTime, Time};

    #[test]
    fn format_offset_outputs_utc_z() {
        let date = Date::from_calendar_date(2025, time::Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        let value = PrimitiveDateTime::new(date, time).assume_utc();
        assert_eq!(format_offset(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn now_is_parseable_rfc3339() {
        let now = now_rfc3339();
        assert!(OffsetDateTime::parse(&now, &Rfc3339).is_ok());
    }

    #[test]
    fn rfc3339_orders_lexicographically() {
        let earlier = "2025-01-02T10:20:30Z";
        let later = "2025-01-02T10:20:31Z";
        assert!(earlier < later);
    }
}
