use chrono::{DateTime, NaiveDate, Utc};

#[must_use]
pub fn format_date(value: NaiveDate) -> String {
    value.format("%d %b %Y").to_string()
}

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%d %b %Y %H:%M").to_string()
}

/// One decimal place, e.g. `4.5`.
#[must_use]
pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracker_core::time::fixed_now;

    #[test]
    fn dates_read_day_month_year() {
        assert_eq!(format_date(fixed_now().date_naive()), "14 Nov 2023");
        assert_eq!(format_datetime(fixed_now()), "14 Nov 2023 22:13");
        assert_eq!(format_hours(4.0), "4.0");
    }
}
