//! 时间工具函数
//!
//! Delivery dates travel as `DD/MM/YYYY` strings on the admin API and are
//! stored as `i64` Unix millis at UTC midnight. Repository code only ever
//! sees millis.

use chrono::{NaiveDate, NaiveTime};

use super::{AppError, AppResult};

/// Parse a strict `DD/MM/YYYY` date into Unix millis at UTC midnight.
///
/// The input must be zero-padded and denote a real calendar day: the
/// parsed date is formatted back and compared with the input, so
/// `31/02/2024` and `1/2/2024` are both rejected.
pub fn parse_delivery_date(date: &str) -> AppResult<i64> {
    let parsed = NaiveDate::parse_from_str(date, "%d/%m/%Y")
        .map_err(|_| AppError::validation(format!("Invalid expected delivery date: {date}")))?;
    if parsed.format("%d/%m/%Y").to_string() != date {
        return Err(AppError::validation(format!(
            "Invalid expected delivery date: {date}"
        )));
    }
    Ok(parsed.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

/// Format Unix millis as a `DD/MM/YYYY` (en-GB) date for display.
pub fn format_en_gb(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_date_to_utc_midnight() {
        // 2024-01-01T00:00:00Z
        assert_eq!(parse_delivery_date("01/01/2024").unwrap(), 1_704_067_200_000);
    }

    #[test]
    fn round_trips_through_en_gb_format() {
        let millis = parse_delivery_date("07/03/2025").unwrap();
        assert_eq!(format_en_gb(millis), "07/03/2025");
    }

    #[test]
    fn rejects_nonexistent_calendar_day() {
        assert!(parse_delivery_date("31/02/2024").is_err());
        assert!(parse_delivery_date("31/04/2024").is_err());
        assert!(parse_delivery_date("29/02/2023").is_err());
    }

    #[test]
    fn accepts_leap_day() {
        assert!(parse_delivery_date("29/02/2024").is_ok());
    }

    #[test]
    fn rejects_unpadded_or_wrong_shape() {
        assert!(parse_delivery_date("1/2/2024").is_err());
        assert!(parse_delivery_date("2024-02-01").is_err());
        assert!(parse_delivery_date("01-02-2024").is_err());
        assert!(parse_delivery_date("01/02/24").is_err());
        assert!(parse_delivery_date("").is_err());
    }
}
