//! Aggregated Table Module
//! Grouping keys, measures and the ordered result rows of one aggregation.

use crate::data::schema::{
    ADVERTISING_EXPENDITURE, AUTOMOBILE_SALES, MONTH, UNEMPLOYMENT_RATE, VEHICLE_TYPE, YEAR,
};
use crate::data::Month;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A column the pipeline groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Dimension {
    Year,
    Month,
    VehicleType,
    UnemploymentRate,
}

impl Dimension {
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Year => YEAR,
            Dimension::Month => MONTH,
            Dimension::VehicleType => VEHICLE_TYPE,
            Dimension::UnemploymentRate => UNEMPLOYMENT_RATE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Month => "Month",
            Dimension::VehicleType => "Vehicle Type",
            Dimension::UnemploymentRate => "Unemployment Rate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Aggregation {
    Mean,
    Sum,
}

/// Which record field is aggregated and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Measure {
    pub field: &'static str,
    pub aggregation: Aggregation,
}

impl Measure {
    pub const fn mean(field: &'static str) -> Self {
        Self {
            field,
            aggregation: Aggregation::Mean,
        }
    }

    pub const fn sum(field: &'static str) -> Self {
        Self {
            field,
            aggregation: Aggregation::Sum,
        }
    }

    pub fn label(&self) -> String {
        let field = match self.field {
            AUTOMOBILE_SALES => "Automobile Sales",
            ADVERTISING_EXPENDITURE => "Advertising Expenditure",
            other => other,
        };
        match self.aggregation {
            Aggregation::Mean => format!("Average {}", field),
            Aggregation::Sum => format!("Total {}", field),
        }
    }
}

/// One grouping key value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum KeyValue {
    Year(i32),
    Month(Month),
    Text(String),
    Number(f64),
}

impl KeyValue {
    fn rank(&self) -> u8 {
        match self {
            KeyValue::Year(_) => 0,
            KeyValue::Month(_) => 1,
            KeyValue::Number(_) => 2,
            KeyValue::Text(_) => 3,
        }
    }

    /// Natural order: years and numbers ascending, months by calendar,
    /// text lexically. Unparsable month labels sort after real months.
    pub fn natural_cmp(&self, other: &KeyValue) -> Ordering {
        match (self, other) {
            (KeyValue::Year(a), KeyValue::Year(b)) => a.cmp(b),
            (KeyValue::Month(a), KeyValue::Month(b)) => a.cmp(b),
            (KeyValue::Number(a), KeyValue::Number(b)) => a.total_cmp(b),
            (KeyValue::Text(a), KeyValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    /// Numeric position for continuous axes.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            KeyValue::Year(y) => Some(*y as f64),
            KeyValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Year(y) => write!(f, "{}", y),
            KeyValue::Month(m) => write!(f, "{}", m),
            KeyValue::Text(t) => f.write_str(t),
            KeyValue::Number(n) => write!(f, "{}", n),
        }
    }
}

/// What an aggregated table stands for in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableRole {
    RecessionSalesTrend,
    RecessionVehicleAverage,
    RecessionAdvertisingShare,
    UnemploymentEffect,
    RecessionSalesHierarchy,
    YearlySalesTrend,
    MonthlySales { year: i32 },
    VehicleAverage { year: i32 },
    AdvertisingShare { year: i32 },
}

impl TableRole {
    /// Short identifier, used for export file names.
    pub fn slug(&self) -> &'static str {
        match self {
            TableRole::RecessionSalesTrend => "recession_sales_trend",
            TableRole::RecessionVehicleAverage => "recession_vehicle_average",
            TableRole::RecessionAdvertisingShare => "recession_advertising_share",
            TableRole::UnemploymentEffect => "unemployment_effect",
            TableRole::RecessionSalesHierarchy => "recession_sales_hierarchy",
            TableRole::YearlySalesTrend => "yearly_sales_trend",
            TableRole::MonthlySales { .. } => "monthly_sales",
            TableRole::VehicleAverage { .. } => "vehicle_average",
            TableRole::AdvertisingShare { .. } => "advertising_share",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRow {
    pub keys: Vec<KeyValue>,
    pub value: f64,
}

/// Result of grouping the sales table by one or two dimensions.
/// Rows are ordered by their keys' natural order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedTable {
    pub role: TableRole,
    pub dimensions: Vec<Dimension>,
    pub measure: Measure,
    pub rows: Vec<AggregatedRow>,
}

impl AggregatedTable {
    /// Build a table, sorting rows into natural key order.
    pub fn new(
        role: TableRole,
        dimensions: Vec<Dimension>,
        measure: Measure,
        mut rows: Vec<AggregatedRow>,
    ) -> Self {
        rows.sort_by(|a, b| {
            a.keys
                .iter()
                .zip(b.keys.iter())
                .map(|(x, y)| x.natural_cmp(y))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        Self {
            role,
            dimensions,
            measure,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl AggregatedTable {
        pub(crate) fn is_empty(&self) -> bool {
            self.rows.is_empty()
        }

        pub(crate) fn total(&self) -> f64 {
            self.rows.iter().map(|r| r.value).sum()
        }

        /// Distinct values of the key at `level`, in sorted row order.
        pub(crate) fn distinct_keys(&self, level: usize) -> Vec<KeyValue> {
            let mut seen: Vec<KeyValue> = Vec::new();
            for row in &self.rows {
                if let Some(key) = row.keys.get(level) {
                    if !seen.contains(key) {
                        seen.push(key.clone());
                    }
                }
            }
            seen
        }
    }

    fn row(keys: Vec<KeyValue>, value: f64) -> AggregatedRow {
        AggregatedRow { keys, value }
    }

    #[test]
    fn rows_sort_by_calendar_month_not_lexically() {
        let rows = vec![
            row(vec![KeyValue::Month(Month::Oct)], 1.0),
            row(vec![KeyValue::Month(Month::Apr)], 2.0),
            row(vec![KeyValue::Month(Month::Feb)], 3.0),
        ];
        let table = AggregatedTable::new(
            TableRole::MonthlySales { year: 2000 },
            vec![Dimension::Month],
            Measure::sum(AUTOMOBILE_SALES),
            rows,
        );
        let order: Vec<String> = table.rows.iter().map(|r| r.keys[0].to_string()).collect();
        assert_eq!(order, vec!["Feb", "Apr", "Oct"]);
    }

    #[test]
    fn two_level_keys_sort_by_first_then_second() {
        let rows = vec![
            row(vec![KeyValue::Number(6.5), KeyValue::Text("Sports".into())], 1.0),
            row(vec![KeyValue::Number(2.1), KeyValue::Text("Sports".into())], 2.0),
            row(vec![KeyValue::Number(2.1), KeyValue::Text("Executivecar".into())], 3.0),
        ];
        let table = AggregatedTable::new(
            TableRole::UnemploymentEffect,
            vec![Dimension::UnemploymentRate, Dimension::VehicleType],
            Measure::mean(AUTOMOBILE_SALES),
            rows,
        );
        let values: Vec<f64> = table.rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0]);
        assert_eq!(
            table.distinct_keys(1),
            vec![
                KeyValue::Text("Executivecar".into()),
                KeyValue::Text("Sports".into())
            ]
        );
        assert_eq!(table.total(), 6.0);
    }

    #[test]
    fn measure_labels() {
        assert_eq!(
            Measure::mean(AUTOMOBILE_SALES).label(),
            "Average Automobile Sales"
        );
        assert_eq!(
            Measure::sum(ADVERTISING_EXPENDITURE).label(),
            "Total Advertising Expenditure"
        );
    }
}
