//! Dataset Loader Module
//! Fetches the sales CSV from disk or over HTTP and normalizes it with Polars.

use crate::data::schema::{
    ADVERTISING_EXPENDITURE, AUTOMOBILE_SALES, MAX_YEAR, MIN_YEAR, MONTH, RECESSION,
    REQUIRED_COLUMNS, UNEMPLOYMENT_RATE, VEHICLE_TYPE, YEAR,
};
use polars::prelude::*;
use reqwest::blocking::Client;
use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use thiserror::Error;

/// Historical automobile sales dataset published by IBM Skills Network.
pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMDeveloperSkillsNetwork-DV0101EN-SkillsNetwork/Data%20Files/historical_automobile_sales.csv";

/// Every variant means the dataset is unavailable; none is recoverable.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Dataset unavailable at {location}: {reason}")]
    Unreachable { location: String, reason: String },
    #[error("Dataset unavailable at {url}: HTTP status {status}")]
    HttpStatus { url: String, status: u16 },
    #[error("Dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Failed to parse dataset: {0}")]
    Parse(#[from] PolarsError),
}

/// Where the dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Path(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are URLs, everything else is a path.
    pub fn parse(location: &str) -> Self {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::Path(PathBuf::from(location))
        }
    }
}

impl Default for DataSource {
    fn default() -> Self {
        DataSource::Url(DEFAULT_DATA_URL.to_string())
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Immutable, validated sales table. Built once at startup and lent to
/// every pipeline call.
#[derive(Debug, Clone)]
pub struct SalesTable {
    df: DataFrame,
}

impl SalesTable {
    /// Validate required columns, normalize their types and drop rows
    /// without a supported year or a vehicle type.
    pub fn from_dataframe(df: DataFrame) -> Result<Self, LoaderError> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !present.iter().any(|p| p == *name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoaderError::MissingColumns(missing));
        }

        let source_rows = df.height();
        let normalized = df
            .lazy()
            .select([
                col(YEAR).cast(DataType::Int64),
                col(MONTH).cast(DataType::String),
                col(VEHICLE_TYPE).cast(DataType::String),
                col(AUTOMOBILE_SALES).cast(DataType::Float64),
                col(ADVERTISING_EXPENDITURE).cast(DataType::Float64),
                col(UNEMPLOYMENT_RATE).cast(DataType::Float64),
                col(RECESSION).cast(DataType::Boolean),
            ])
            .filter(
                col(YEAR)
                    .gt_eq(lit(MIN_YEAR as i64))
                    .and(col(YEAR).lt_eq(lit(MAX_YEAR as i64)))
                    .and(col(VEHICLE_TYPE).is_not_null()),
            )
            .collect()?;

        let dropped = source_rows - normalized.height();
        if dropped > 0 {
            log::warn!(
                "Dropped {} of {} rows with missing vehicle type or year outside {}-{}",
                dropped,
                source_rows,
                MIN_YEAR,
                MAX_YEAR
            );
        }

        Ok(Self { df: normalized })
    }

    pub fn lazy(&self) -> LazyFrame {
        self.df.clone().lazy()
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i32> {
        let Ok(unique) = self.df.column(YEAR).and_then(|c| c.unique()) else {
            return Vec::new();
        };
        let mut years: Vec<i32> = unique
            .i64()
            .map(|ca| ca.into_iter().flatten().map(|y| y as i32).collect())
            .unwrap_or_default();
        years.sort_unstable();
        years
    }
}

/// Loads the sales dataset. A failure here is fatal: there is no retry.
pub struct DatasetLoader;

impl DatasetLoader {
    pub fn load(source: &DataSource) -> Result<SalesTable, LoaderError> {
        log::info!("Loading dataset from {}", source);

        let df = match source {
            DataSource::Path(path) => {
                if !path.is_file() {
                    return Err(LoaderError::Unreachable {
                        location: path.display().to_string(),
                        reason: "file not found".to_string(),
                    });
                }
                LazyCsvReader::new(path)
                    .with_infer_schema_length(Some(10000))
                    .with_ignore_errors(true)
                    .finish()?
                    .collect()?
            }
            DataSource::Url(url) => {
                let bytes = Self::fetch(url)?;
                Self::parse_csv_bytes(bytes)?
            }
        };

        let table = SalesTable::from_dataframe(df)?;
        log::info!(
            "Loaded {} rows covering {} years",
            table.row_count(),
            table.years().len()
        );
        Ok(table)
    }

    /// Parse CSV content already held in memory.
    pub fn parse_csv_bytes(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }

    fn fetch(url: &str) -> Result<Vec<u8>, LoaderError> {
        let unreachable = |e: reqwest::Error| LoaderError::Unreachable {
            location: url.to_string(),
            reason: e.to_string(),
        };

        let resp = Client::new().get(url).send().map_err(unreachable)?;
        if !resp.status().is_success() {
            return Err(LoaderError::HttpStatus {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        let body = resp.bytes().map_err(unreachable)?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "Date,Year,Month,Recession,Consumer_Confidence,Automobile_Sales,Advertising_Expenditure,Vehicle_Type,unemployment_rate";

    fn csv(rows: &[&str]) -> Vec<u8> {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out.into_bytes()
    }

    #[test]
    fn source_classification() {
        assert_eq!(
            DataSource::parse("https://example.com/sales.csv"),
            DataSource::Url("https://example.com/sales.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("HTTP://example.com/a.csv"),
            DataSource::Url("HTTP://example.com/a.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/sales.csv"),
            DataSource::Path(PathBuf::from("data/sales.csv"))
        );
        assert!(matches!(DataSource::default(), DataSource::Url(_)));
    }

    #[test]
    fn parses_and_normalizes_in_memory_csv() {
        let bytes = csv(&[
            "1/31/1980,1980,Jan,1,108.24,456.0,1558,Supperminicar,5.4",
            "2/29/1980,1980,Feb,1,98.75,555.9,3048,Smallfamiliycar,4.8",
            "3/31/1981,1981,Mar,0,107.48,620.0,3137,Mediumfamilycar,3.4",
        ]);
        let df = DatasetLoader::parse_csv_bytes(bytes).unwrap();
        let table = SalesTable::from_dataframe(df).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.years(), vec![1980, 1981]);

        let frame = table.dataframe();
        assert_eq!(frame.width(), REQUIRED_COLUMNS.len());
        assert_eq!(frame.column(RECESSION).unwrap().dtype(), &DataType::Boolean);
        assert_eq!(frame.column(YEAR).unwrap().dtype(), &DataType::Int64);
        assert_eq!(
            frame.column(AUTOMOBILE_SALES).unwrap().dtype(),
            &DataType::Float64
        );
    }

    #[test]
    fn missing_columns_are_named() {
        let bytes = b"Year,Month,Vehicle_Type,Automobile_Sales\n1980,Jan,Sports,10\n".to_vec();
        let df = DatasetLoader::parse_csv_bytes(bytes).unwrap();
        match SalesTable::from_dataframe(df) {
            Err(LoaderError::MissingColumns(missing)) => {
                assert_eq!(
                    missing,
                    vec![
                        ADVERTISING_EXPENDITURE.to_string(),
                        UNEMPLOYMENT_RATE.to_string(),
                        RECESSION.to_string(),
                    ]
                );
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn drops_rows_outside_supported_years() {
        let bytes = csv(&[
            "1/31/1979,1979,Jan,1,100.0,400.0,1000,Sports,5.0",
            "1/31/1980,1980,Jan,1,100.0,410.0,1000,Sports,5.0",
            "1/31/2024,2024,Jan,0,100.0,420.0,1000,Sports,5.0",
        ]);
        let df = DatasetLoader::parse_csv_bytes(bytes).unwrap();
        let table = SalesTable::from_dataframe(df).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.years(), vec![1980]);
    }

    #[test]
    fn loads_from_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&csv(&[
            "1/31/1990,1990,Jan,0,100.0,400.0,1000,Sports,5.0",
            "2/28/1990,1990,Feb,0,100.0,500.0,1200,Sports,5.0",
        ]))
        .unwrap();
        file.flush().unwrap();

        let source = DataSource::Path(file.path().to_path_buf());
        let table = DatasetLoader::load(&source).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.years(), vec![1990]);
    }

    #[test]
    fn missing_file_is_unreachable() {
        let dir = tempfile::tempdir().unwrap();
        let source = DataSource::Path(dir.path().join("absent.csv"));
        assert!(matches!(
            DatasetLoader::load(&source),
            Err(LoaderError::Unreachable { .. })
        ));
    }
}
