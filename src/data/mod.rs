//! Data module - dataset loading and schema

mod loader;
pub mod schema;

pub use loader::{DataSource, DatasetLoader, SalesTable, DEFAULT_DATA_URL};
pub use schema::Month;
