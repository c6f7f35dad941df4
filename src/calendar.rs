use chrono::{Datelike, Local, Month, NaiveDate};

use crate::error::{Result, SolarYieldError};

/// Upper-case three letter month codes, indexed from 0 (January).
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Inclusive range of years covered by the gridded dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearRange {
    pub from: i32,
    pub to: i32,
}

impl YearRange {
    /// First year of the measurement record. Never changes.
    pub const FIRST_YEAR: i32 = 1979;
    /// Last year known to be present; operators move this forward as data arrives.
    pub const LAST_YEAR: i32 = 2024;

    pub fn new(from: i32, to: i32) -> Self {
        YearRange { from, to }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.from..=self.to).contains(&year)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.from..=self.to
    }
}

impl Default for YearRange {
    fn default() -> Self {
        YearRange::new(Self::FIRST_YEAR, Self::LAST_YEAR)
    }
}

/// Check the year against the default dataset range.
pub fn is_valid_year(year: i32) -> bool {
    YearRange::default().contains(year)
}

/// Number of days in the month (1 = January), leap years included.
pub fn days_in_month(month: u32, year: i32) -> Result<u32> {
    if !(1..=12).contains(&month) {
        return Err(SolarYieldError::InvalidMonth(month.into()));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => Ok((next - first).num_days() as u32),
        _ => Err(SolarYieldError::InvalidYear(year)),
    }
}

/// Calendar month for a 1-based ordinal.
pub fn month_from_number(month: u32) -> Result<Month> {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or(SolarYieldError::InvalidMonth(month.into()))
}

/// Full English month name ("January") for a 1-based ordinal.
pub fn month_name(month: u32) -> Result<&'static str> {
    Ok(month_from_number(month)?.name())
}

/// Three letter month code for a 0-based index. Unknown indices map to "JAN".
pub fn month_abbr(index: usize) -> &'static str {
    MONTH_ABBREVIATIONS.get(index).copied().unwrap_or("JAN")
}

/// Three letter code of a calendar month.
pub fn abbr_of(month: Month) -> &'static str {
    MONTH_ABBREVIATIONS[month.number_from_month() as usize - 1]
}

/// Parse a three letter month code, case-insensitive.
pub fn month_from_abbr(abbr: &str) -> Option<Month> {
    let abbr = abbr.trim();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|candidate| candidate.eq_ignore_ascii_case(abbr))
        .and_then(|index| month_from_number(index as u32 + 1).ok())
}

/// Checks whether the string is a valid `YYYY-MM-DD` date.
pub fn is_valid_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

pub fn current_year() -> i32 {
    Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    #[test_case(2, 2024, 29; "leap february")]
    #[test_case(2, 2023, 28; "common february")]
    #[test_case(2, 1900, 28; "century is not leap")]
    #[test_case(2, 2000, 29; "fourth century is leap")]
    #[test_case(1, 2023, 31; "january")]
    #[test_case(4, 2023, 30; "april")]
    #[test_case(12, 2023, 31; "december rolls into next year")]
    fn month_lengths(month: u32, year: i32, expected: u32) {
        assert_eq!(days_in_month(month, year).unwrap(), expected);
    }

    #[test]
    fn month_out_of_range() {
        assert_matches!(days_in_month(13, 2024), Err(SolarYieldError::InvalidMonth(13)));
        assert_matches!(days_in_month(0, 2024), Err(SolarYieldError::InvalidMonth(0)));
    }

    #[test]
    fn year_lengths_add_up() {
        let total: u32 = (1..=12).map(|m| days_in_month(m, 2024).unwrap()).sum();
        assert_eq!(total, 366);
        let total: u32 = (1..=12).map(|m| days_in_month(m, 2023).unwrap()).sum();
        assert_eq!(total, 365);
    }

    #[test]
    fn names() {
        assert_eq!(month_name(1).unwrap(), "January");
        assert_eq!(month_name(12).unwrap(), "December");
        assert_matches!(month_name(13), Err(SolarYieldError::InvalidMonth(13)));
    }

    #[test_case(0, "JAN")]
    #[test_case(9, "OCT")]
    #[test_case(11, "DEC")]
    #[test_case(12, "JAN"; "past the table falls back to january")]
    fn abbreviations(index: usize, expected: &str) {
        assert_eq!(month_abbr(index), expected);
    }

    #[test]
    fn abbreviation_round_trip() {
        for (index, abbr) in MONTH_ABBREVIATIONS.iter().enumerate() {
            let month = month_from_abbr(abbr).unwrap();
            assert_eq!(month.number_from_month() as usize, index + 1);
            assert_eq!(abbr_of(month), *abbr);
        }
        assert_eq!(month_from_abbr(" oct "), Some(Month::October));
        assert_eq!(month_from_abbr("October"), None);
        assert_eq!(month_from_abbr("DAY"), None);
    }

    #[test]
    fn year_range() {
        assert!(is_valid_year(1979));
        assert!(is_valid_year(2024));
        assert!(!is_valid_year(1978));
        assert!(!is_valid_year(2025));

        let range = YearRange::new(2000, 2002);
        assert_eq!(range.years().collect::<Vec<_>>(), vec![2000, 2001, 2002]);
    }

    #[test]
    fn date_strings() {
        assert!(is_valid_date("2024-02-29"));
        assert!(!is_valid_date("2023-02-29"));
        assert!(!is_valid_date("29/02/2024"));
    }
}
