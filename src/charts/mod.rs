//! Charts module - Chart descriptions and rendering

mod descriptor;
mod plotter;
mod renderer;

pub use descriptor::{build_charts, ChartDescriptor, ChartKind};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
