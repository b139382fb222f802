//! Shared utility functions for SNCF punctuality crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{Datelike, Months, NaiveDate};

    /// Parse a monthly key ("YYYY-MM") into the first day of that month.
    ///
    /// A full "YYYY-MM-DD" date is accepted too and snapped to the first of its month.
    pub fn parse_year_month(s: &str) -> Result<NaiveDate, DateError> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return first_of_month(date.year(), date.month())
                .ok_or_else(|| DateError(format!("{s:?}: no first day of month")));
        }
        NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
            .map_err(|e| DateError(format!("{s:?}: {e}")))
    }

    /// The first day of the given month, or None for an invalid month.
    pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, 1)
    }

    /// The same calendar day `years` years earlier.
    /// Feb 29 falls back to Feb 28 when the target year is not a leap year.
    pub fn years_before(date: &NaiveDate, years: u32) -> NaiveDate {
        date.checked_sub_months(Months::new(years.saturating_mul(12)))
            .unwrap_or(NaiveDate::MIN)
    }

}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
