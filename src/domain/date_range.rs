//! Requested date range and the target filename derived from it

use super::errors::AppError;
use super::result::Result;
use chrono::{Days, NaiveDate, Utc};
use std::fmt;

/// Inclusive range of calendar days to export
///
/// `from <= to` always holds for a constructed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `from > to`
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(AppError::Validation(format!(
                "Start date {from} is after end date {to}"
            )));
        }
        Ok(Self { from, to })
    }

    /// A range covering a single day
    pub fn single(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    /// Build a range from optional bounds; each missing bound defaults to
    /// the day before `today`
    pub fn from_options(
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self> {
        let yesterday = today
            .checked_sub_days(Days::new(1))
            .ok_or_else(|| AppError::Validation(format!("No day before {today}")))?;
        Self::new(from.unwrap_or(yesterday), to.unwrap_or(yesterday))
    }

    /// Same as [`DateRange::from_options`] with "today" taken in UTC
    pub fn from_options_utc(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        Self::from_options(from, to, Utc::now().date_naive())
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn is_single_day(&self) -> bool {
        self.from == self.to
    }

    /// Format both bounds with a strftime pattern
    pub fn format_bounds(&self, date_format: &str) -> (String, String) {
        (
            self.from.format(date_format).to_string(),
            self.to.format(date_format).to_string(),
        )
    }

    /// Target filename: `<from>` for a single day, `<from>-<to>` otherwise,
    /// followed by `extension`
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use dataexport::domain::DateRange;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    /// assert_eq!(DateRange::single(day).filename("%Y%m%d", ".csv"), "20240115.csv");
    /// ```
    pub fn filename(&self, date_format: &str, extension: &str) -> String {
        let (from, to) = self.format_bounds(date_format);
        if self.is_single_day() {
            format!("{from}{extension}")
        } else {
            format!("{from}-{to}{extension}")
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single_day() {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{} to {}", self.from, self.to)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_filename() {
        let range = DateRange::new(date(2024, 1, 15), date(2024, 1, 15)).unwrap();
        assert_eq!(range.filename("%Y%m%d", ".csv"), "20240115.csv");
    }

    #[test]
    fn test_multi_day_filename() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert_eq!(range.filename("%Y%m%d", ".txt"), "20240101-20240131.txt");
    }

    #[test]
    fn test_filename_without_extension() {
        let range = DateRange::single(date(2023, 12, 31));
        assert_eq!(range.filename("%Y%m%d", ""), "20231231");
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = DateRange::new(date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_defaults_to_yesterday() {
        let range = DateRange::from_options(None, None, date(2024, 3, 1)).unwrap();
        assert_eq!(range.from(), date(2024, 2, 29));
        assert_eq!(range.to(), date(2024, 2, 29));
        assert!(range.is_single_day());
    }

    #[test]
    fn test_missing_end_defaults_to_yesterday() {
        let range = DateRange::from_options(Some(date(2024, 2, 20)), None, date(2024, 3, 1)).unwrap();
        assert_eq!(range.from(), date(2024, 2, 20));
        assert_eq!(range.to(), date(2024, 2, 29));
    }

    #[test]
    fn test_download_format_bounds() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let (from, to) = range.format_bounds("%m%d%Y");
        assert_eq!(from, "01012024");
        assert_eq!(to, "01312024");
    }

    #[test]
    fn test_display() {
        assert_eq!(DateRange::single(date(2024, 1, 15)).to_string(), "2024-01-15");
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert_eq!(range.to_string(), "2024-01-01 to 2024-01-31");
    }
}
