use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inputs shared by every report.
///
/// `as_of` stands in for "today"; callers pass it explicitly so a report run
/// is reproducible. The remaining fields default to the classic report
/// definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportParams {
    pub as_of: NaiveDate,
    /// Calendar year counted by the claims-in-year report.
    pub claims_year: i32,
    /// Maximum days between sale and claim for the claims-within-window report.
    pub claim_window_days: i64,
    /// Launch lookback for the recent-launch-claims report.
    pub launch_lookback_years: u32,
    pub high_volume_country: String,
    pub high_volume_lookback_years: u32,
    /// Monthly units must exceed this to be reported.
    pub high_volume_threshold: i64,
    pub category_lookback_years: u32,
}

impl ReportParams {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            claims_year: 2020,
            claim_window_days: 180,
            launch_lookback_years: 2,
            high_volume_country: "USA".to_string(),
            high_volume_lookback_years: 3,
            high_volume_threshold: 5000,
            category_lookback_years: 2,
        }
    }

    /// Window covering the last `years` years up to and including `as_of`.
    pub fn lookback(&self, years: u32) -> DateWindow {
        DateWindow {
            from: years_before(self.as_of, years),
            to: self.as_of,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.as_of.year()
    }
}

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// `date - N years` with month arithmetic: Feb 29 clamps to Feb 28.
pub fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn years_before_clamps_leap_day() {
        assert_eq!(years_before(date(2024, 2, 29), 1), date(2023, 2, 28));
        assert_eq!(years_before(date(2024, 6, 15), 3), date(2021, 6, 15));
    }

    #[test]
    fn lookback_is_inclusive_on_both_ends() {
        let params = ReportParams::new(date(2024, 6, 15));
        let window = params.lookback(2);
        assert!(window.contains(date(2022, 6, 15)));
        assert!(window.contains(date(2024, 6, 15)));
        assert!(!window.contains(date(2022, 6, 14)));
        assert!(!window.contains(date(2024, 6, 16)));
    }

    #[test]
    fn defaults_match_report_definitions() {
        let params = ReportParams::new(date(2024, 1, 1));
        assert_eq!(params.claims_year, 2020);
        assert_eq!(params.claim_window_days, 180);
        assert_eq!(params.high_volume_country, "USA");
        assert_eq!(params.high_volume_threshold, 5000);
        assert_eq!(params.current_year(), 2024);
    }
}
