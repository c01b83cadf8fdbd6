//! Sales Table Schema
//! Column names, supported year range and calendar month ordering.

use serde::Serialize;
use std::fmt;

pub const YEAR: &str = "Year";
pub const MONTH: &str = "Month";
pub const VEHICLE_TYPE: &str = "Vehicle_Type";
pub const AUTOMOBILE_SALES: &str = "Automobile_Sales";
pub const ADVERTISING_EXPENDITURE: &str = "Advertising_Expenditure";
pub const UNEMPLOYMENT_RATE: &str = "unemployment_rate";
pub const RECESSION: &str = "Recession";

/// Every column a source table must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    YEAR,
    MONTH,
    VEHICLE_TYPE,
    AUTOMOBILE_SALES,
    ADVERTISING_EXPENDITURE,
    UNEMPLOYMENT_RATE,
    RECESSION,
];

pub const MIN_YEAR: i32 = 1980;
pub const MAX_YEAR: i32 = 2023;

pub fn is_supported_year(year: i32) -> bool {
    (MIN_YEAR..=MAX_YEAR).contains(&year)
}

/// Years offered by the year selector.
pub fn supported_years() -> impl Iterator<Item = i32> {
    MIN_YEAR..=MAX_YEAR
}

/// Calendar month, ordered January first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Parse a month label such as "Jan", "january" or "JAN".
    /// Only the first three letters are significant.
    pub fn parse(label: &str) -> Option<Month> {
        let prefix: String = label.trim().chars().take(3).collect::<String>().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.abbreviation().to_lowercase() == prefix)
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_parse_accepts_abbreviations_and_full_names() {
        assert_eq!(Month::parse("Jan"), Some(Month::Jan));
        assert_eq!(Month::parse("september"), Some(Month::Sep));
        assert_eq!(Month::parse(" DEC "), Some(Month::Dec));
        assert_eq!(Month::parse("Foo"), None);
        assert_eq!(Month::parse(""), None);
    }

    #[test]
    fn months_order_by_calendar() {
        let mut months = vec![Month::Dec, Month::Apr, Month::Jan, Month::Aug];
        months.sort();
        assert_eq!(months, vec![Month::Jan, Month::Apr, Month::Aug, Month::Dec]);
    }

    #[test]
    fn supported_year_range_is_inclusive() {
        assert!(is_supported_year(1980));
        assert!(is_supported_year(2023));
        assert!(!is_supported_year(1979));
        assert!(!is_supported_year(2024));
        assert_eq!(supported_years().count(), 44);
    }
}
