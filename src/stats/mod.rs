//! Stats module - report selection and aggregation

mod pipeline;
mod selection;
pub mod table;

pub use pipeline::ReportPipeline;
pub use selection::{ReportType, SelectionState};
pub use table::{AggregatedTable, KeyValue, TableRole};
