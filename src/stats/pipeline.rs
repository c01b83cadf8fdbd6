//! Report Pipeline Module
//! Maps a report selection to its ordered list of aggregated tables.
//!
//! Recession report (year ignored), over rows flagged as recession:
//! 1. mean sales by year
//! 2. mean sales by vehicle type
//! 3. advertising expenditure total by vehicle type
//! 4. mean sales by (unemployment rate, vehicle type)
//! 5. sales total by (year, vehicle type)
//!
//! Yearly report:
//! 1. mean sales by year over the whole table
//! 2. sales total by month for the selected year
//! 3. mean sales by vehicle type for the selected year
//! 4. advertising expenditure total by vehicle type for the selected year

use crate::data::schema::{ADVERTISING_EXPENDITURE, AUTOMOBILE_SALES, RECESSION, YEAR};
use crate::data::{Month, SalesTable};
use crate::stats::selection::{ReportType, SelectionState};
use crate::stats::table::{
    AggregatedRow, AggregatedTable, Aggregation, Dimension, KeyValue, Measure, TableRole,
};
use polars::prelude::*;
use thiserror::Error;

const VALUE_COLUMN: &str = "__value";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Stateless report computation over an immutable sales table.
pub struct ReportPipeline;

impl ReportPipeline {
    /// Compute the ordered aggregates for a selection.
    ///
    /// Returns an empty list when no report is selected, or when the yearly
    /// report lacks a supported year. A filter that leaves no rows produces
    /// an empty table in its slot rather than an error.
    pub fn compute(
        table: &SalesTable,
        selection: &SelectionState,
    ) -> Result<Vec<AggregatedTable>, PipelineError> {
        match selection.report_type {
            ReportType::Unselected => Ok(Vec::new()),
            ReportType::RecessionStatistics => Self::recession_tables(table),
            ReportType::YearlyStatistics => match selection.effective_year() {
                Some(year) => Self::yearly_tables(table, year),
                None => Ok(Vec::new()),
            },
        }
    }

    fn recession_tables(table: &SalesTable) -> Result<Vec<AggregatedTable>, PipelineError> {
        let recession = table.lazy().filter(col(RECESSION));

        Ok(vec![
            Self::aggregate(
                recession.clone(),
                TableRole::RecessionSalesTrend,
                &[Dimension::Year],
                Measure::mean(AUTOMOBILE_SALES),
            )?,
            Self::aggregate(
                recession.clone(),
                TableRole::RecessionVehicleAverage,
                &[Dimension::VehicleType],
                Measure::mean(AUTOMOBILE_SALES),
            )?,
            Self::aggregate(
                recession.clone(),
                TableRole::RecessionAdvertisingShare,
                &[Dimension::VehicleType],
                Measure::sum(ADVERTISING_EXPENDITURE),
            )?,
            Self::aggregate(
                recession.clone(),
                TableRole::UnemploymentEffect,
                &[Dimension::UnemploymentRate, Dimension::VehicleType],
                Measure::mean(AUTOMOBILE_SALES),
            )?,
            Self::aggregate(
                recession,
                TableRole::RecessionSalesHierarchy,
                &[Dimension::Year, Dimension::VehicleType],
                Measure::sum(AUTOMOBILE_SALES),
            )?,
        ])
    }

    fn yearly_tables(table: &SalesTable, year: i32) -> Result<Vec<AggregatedTable>, PipelineError> {
        let in_year = table.lazy().filter(col(YEAR).eq(lit(year as i64)));

        Ok(vec![
            Self::aggregate(
                table.lazy(),
                TableRole::YearlySalesTrend,
                &[Dimension::Year],
                Measure::mean(AUTOMOBILE_SALES),
            )?,
            Self::aggregate(
                in_year.clone(),
                TableRole::MonthlySales { year },
                &[Dimension::Month],
                Measure::sum(AUTOMOBILE_SALES),
            )?,
            Self::aggregate(
                in_year.clone(),
                TableRole::VehicleAverage { year },
                &[Dimension::VehicleType],
                Measure::mean(AUTOMOBILE_SALES),
            )?,
            Self::aggregate(
                in_year,
                TableRole::AdvertisingShare { year },
                &[Dimension::VehicleType],
                Measure::sum(ADVERTISING_EXPENDITURE),
            )?,
        ])
    }

    /// Group `frame` by `dimensions` and reduce `measure` per group.
    /// Rows with a null key or a null result are left out.
    fn aggregate(
        frame: LazyFrame,
        role: TableRole,
        dimensions: &[Dimension],
        measure: Measure,
    ) -> Result<AggregatedTable, PipelineError> {
        let keys: Vec<Expr> = dimensions.iter().map(|d| col(d.column())).collect();
        let value = match measure.aggregation {
            Aggregation::Mean => col(measure.field).mean(),
            Aggregation::Sum => col(measure.field).sum(),
        };

        let grouped = frame
            .group_by(keys)
            .agg([value.alias(VALUE_COLUMN)])
            .collect()?;

        let key_columns: Vec<Vec<Option<KeyValue>>> = dimensions
            .iter()
            .map(|d| Self::read_keys(&grouped, *d))
            .collect::<Result<_, _>>()?;
        let values = grouped.column(VALUE_COLUMN)?.cast(&DataType::Float64)?;
        let values = values.f64()?;

        let mut rows = Vec::with_capacity(grouped.height());
        for i in 0..grouped.height() {
            let Some(value) = values.get(i) else {
                continue;
            };
            let keys: Option<Vec<KeyValue>> =
                key_columns.iter().map(|column| column[i].clone()).collect();
            if let Some(keys) = keys {
                rows.push(AggregatedRow { keys, value });
            }
        }

        log::debug!(
            "{} by {:?}: {} groups",
            role.slug(),
            dimensions,
            rows.len()
        );
        Ok(AggregatedTable::new(role, dimensions.to_vec(), measure, rows))
    }

    fn read_keys(df: &DataFrame, dimension: Dimension) -> PolarsResult<Vec<Option<KeyValue>>> {
        let column = df.column(dimension.column())?;
        let keys = match dimension {
            Dimension::Year => column
                .i64()?
                .into_iter()
                .map(|v| v.map(|y| KeyValue::Year(y as i32)))
                .collect(),
            Dimension::Month => column
                .str()?
                .into_iter()
                .map(|v| {
                    v.map(|label| {
                        Month::parse(label)
                            .map(KeyValue::Month)
                            .unwrap_or_else(|| KeyValue::Text(label.to_string()))
                    })
                })
                .collect(),
            Dimension::VehicleType => column
                .str()?
                .into_iter()
                .map(|v| v.map(|s| KeyValue::Text(s.to_string())))
                .collect(),
            Dimension::UnemploymentRate => column
                .f64()?
                .into_iter()
                .map(|v| v.map(KeyValue::Number))
                .collect(),
        };
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{MONTH, UNEMPLOYMENT_RATE, VEHICLE_TYPE};

    struct Row {
        year: i64,
        month: &'static str,
        vehicle: &'static str,
        sales: f64,
        advertising: f64,
        unemployment: f64,
        recession: bool,
    }

    fn row(
        year: i64,
        month: &'static str,
        vehicle: &'static str,
        sales: f64,
        advertising: f64,
        recession: bool,
    ) -> Row {
        Row {
            year,
            month,
            vehicle,
            sales,
            advertising,
            unemployment: 5.0,
            recession,
        }
    }

    fn table(rows: &[Row]) -> SalesTable {
        let df = df!(
            YEAR => rows.iter().map(|r| r.year).collect::<Vec<_>>(),
            MONTH => rows.iter().map(|r| r.month).collect::<Vec<_>>(),
            VEHICLE_TYPE => rows.iter().map(|r| r.vehicle).collect::<Vec<_>>(),
            AUTOMOBILE_SALES => rows.iter().map(|r| r.sales).collect::<Vec<_>>(),
            ADVERTISING_EXPENDITURE => rows.iter().map(|r| r.advertising).collect::<Vec<_>>(),
            UNEMPLOYMENT_RATE => rows.iter().map(|r| r.unemployment).collect::<Vec<_>>(),
            RECESSION => rows.iter().map(|r| r.recession).collect::<Vec<_>>()
        )
        .unwrap();
        SalesTable::from_dataframe(df).unwrap()
    }

    fn sample() -> SalesTable {
        table(&[
            row(1980, "Jan", "Sports", 100.0, 1000.0, true),
            row(1980, "Feb", "Supperminicar", 300.0, 2000.0, true),
            row(1981, "Jan", "Sports", 200.0, 1500.0, true),
            row(1981, "Mar", "Executivecar", 400.0, 500.0, true),
            row(1982, "Jan", "Sports", 900.0, 3000.0, false),
            row(2020, "Dec", "Sports", 50.0, 700.0, true),
            row(2020, "Jan", "Mediumfamilycar", 70.0, 800.0, true),
            row(2020, "Jun", "Sports", 30.0, 900.0, true),
        ])
    }

    fn first_keys(table: &AggregatedTable) -> Vec<KeyValue> {
        table.rows.iter().map(|r| r.keys[0].clone()).collect()
    }

    fn recession() -> SelectionState {
        SelectionState::new(ReportType::RecessionStatistics, None)
    }

    fn yearly(year: i32) -> SelectionState {
        SelectionState::new(ReportType::YearlyStatistics, Some(year))
    }

    #[test]
    fn unselected_produces_nothing() {
        let out = ReportPipeline::compute(&sample(), &SelectionState::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn yearly_without_supported_year_produces_nothing() {
        let t = sample();
        let no_year = SelectionState::new(ReportType::YearlyStatistics, None);
        assert!(ReportPipeline::compute(&t, &no_year).unwrap().is_empty());
        assert!(ReportPipeline::compute(&t, &yearly(1979)).unwrap().is_empty());
        assert!(ReportPipeline::compute(&t, &yearly(2024)).unwrap().is_empty());
    }

    #[test]
    fn recession_trend_only_contains_recession_years() {
        let t = table(&[
            row(1980, "Jan", "Sports", 100.0, 10.0, true),
            row(1980, "Feb", "Sports", 300.0, 10.0, true),
            row(1981, "Jan", "Sports", 200.0, 10.0, true),
            row(1982, "Jan", "Sports", 900.0, 10.0, false),
        ]);
        let out = ReportPipeline::compute(&t, &recession()).unwrap();
        assert_eq!(out.len(), 5);

        let trend = &out[0];
        assert_eq!(trend.role, TableRole::RecessionSalesTrend);
        assert_eq!(first_keys(trend), vec![KeyValue::Year(1980), KeyValue::Year(1981)]);
        assert_eq!(trend.rows[0].value, 200.0);
        assert_eq!(trend.rows[1].value, 200.0);
    }

    #[test]
    fn recession_report_table_order_and_shapes() {
        let out = ReportPipeline::compute(&sample(), &recession()).unwrap();
        let roles: Vec<TableRole> = out.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                TableRole::RecessionSalesTrend,
                TableRole::RecessionVehicleAverage,
                TableRole::RecessionAdvertisingShare,
                TableRole::UnemploymentEffect,
                TableRole::RecessionSalesHierarchy,
            ]
        );

        let unemployment = &out[3];
        assert_eq!(
            unemployment.dimensions,
            vec![Dimension::UnemploymentRate, Dimension::VehicleType]
        );
        // All rows share one rate, so each vehicle type stays its own series.
        assert_eq!(unemployment.distinct_keys(1).len(), 4);
    }

    #[test]
    fn recession_advertising_share_keeps_every_row() {
        let out = ReportPipeline::compute(&sample(), &recession()).unwrap();
        let share = &out[2];
        // Recession rows only: 1000 + 2000 + 1500 + 500 + 700 + 800 + 900.
        assert_eq!(share.total(), 7400.0);
    }

    #[test]
    fn recession_hierarchy_sums_match_yearly_totals() {
        let out = ReportPipeline::compute(&sample(), &recession()).unwrap();
        let hierarchy = &out[4];
        let total_1980: f64 = hierarchy
            .rows
            .iter()
            .filter(|r| r.keys[0] == KeyValue::Year(1980))
            .map(|r| r.value)
            .sum();
        assert_eq!(total_1980, 400.0);
        assert!(hierarchy
            .rows
            .iter()
            .all(|r| r.keys[0] != KeyValue::Year(1982)));
    }

    #[test]
    fn yearly_missing_year_keeps_full_trend() {
        let out = ReportPipeline::compute(&sample(), &yearly(1985)).unwrap();
        assert_eq!(out.len(), 4);
        assert!(out[1].is_empty());
        assert!(out[2].is_empty());
        assert!(out[3].is_empty());
        assert_eq!(
            first_keys(&out[0]),
            vec![
                KeyValue::Year(1980),
                KeyValue::Year(1981),
                KeyValue::Year(1982),
                KeyValue::Year(2020)
            ]
        );
    }

    #[test]
    fn yearly_vehicle_types_match_rows_of_that_year() {
        let out = ReportPipeline::compute(&sample(), &yearly(2020)).unwrap();
        let vehicles = &out[2];
        assert_eq!(vehicles.role, TableRole::VehicleAverage { year: 2020 });
        assert_eq!(
            vehicles.distinct_keys(0),
            vec![
                KeyValue::Text("Mediumfamilycar".into()),
                KeyValue::Text("Sports".into())
            ]
        );
        assert_eq!(vehicles.rows[1].value, 40.0);
    }

    #[test]
    fn monthly_sales_follow_calendar_order() {
        let out = ReportPipeline::compute(&sample(), &yearly(2020)).unwrap();
        let monthly = &out[1];
        assert_eq!(
            first_keys(monthly),
            vec![
                KeyValue::Month(Month::Jan),
                KeyValue::Month(Month::Jun),
                KeyValue::Month(Month::Dec)
            ]
        );
        assert_eq!(monthly.total(), 150.0);
    }

    #[test]
    fn yearly_advertising_share_matches_filtered_rows() {
        let out = ReportPipeline::compute(&sample(), &yearly(2020)).unwrap();
        assert_eq!(out[3].total(), 700.0 + 800.0 + 900.0);
    }

    #[test]
    fn compute_is_deterministic() {
        let t = sample();
        for selection in [recession(), yearly(1980), yearly(2020)] {
            let first = ReportPipeline::compute(&t, &selection).unwrap();
            let second = ReportPipeline::compute(&t, &selection).unwrap();
            assert_eq!(first, second);
        }
    }
}
