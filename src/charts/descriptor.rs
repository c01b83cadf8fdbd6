//! Chart Descriptor Module
//! Turns aggregated tables into renderer-neutral chart descriptions.

use crate::stats::{AggregatedTable, KeyValue, TableRole};
use serde::Serialize;
use std::f64::consts::TAU;

/// Shared series palette (RGB), used by both the interactive and static renderers.
pub const PALETTE: [[u8; 3]; 10] = [
    [52, 152, 219],  // Blue
    [231, 76, 60],   // Red
    [46, 204, 113],  // Green
    [155, 89, 182],  // Purple
    [243, 156, 18],  // Orange
    [26, 188, 156],  // Teal
    [233, 30, 99],   // Pink
    [0, 188, 212],   // Cyan
    [121, 85, 72],   // Brown
    [96, 125, 139],  // Blue Grey
];

pub fn palette_color(index: usize) -> [u8; 3] {
    PALETTE[index % PALETTE.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Hierarchical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub key: KeyValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<KeyValue>,
    pub value: f64,
}

/// One chart: kind, title, axis labels and the aggregated points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub role: TableRole,
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Name of the secondary series dimension, when points carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_label: Option<String>,
    pub points: Vec<ChartPoint>,
}

/// One slice of a part-to-whole chart. Angles are in radians, clockwise
/// from twelve o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub share: f64,
    pub start: f64,
    pub end: f64,
    /// 0 for the inner ring, 1 for the outer ring of a sunburst.
    pub ring: usize,
    /// Palette index; children inherit their parent's.
    pub color: usize,
}

impl Slice {
    pub fn mid_angle(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

impl ChartDescriptor {
    /// Build the chart for a table. Kind and title follow the table's role.
    pub fn from_table(table: &AggregatedTable) -> Self {
        let (kind, title) = match table.role {
            TableRole::RecessionSalesTrend => (
                ChartKind::Line,
                "Automobile Sales Fluctuate over Recession Period".to_string(),
            ),
            TableRole::RecessionVehicleAverage => (
                ChartKind::Bar,
                "Average Number of Vehicles Sold by Vehicle Type".to_string(),
            ),
            TableRole::RecessionAdvertisingShare => (
                ChartKind::Pie,
                "Total Expenditure Share by Vehicle Type during Recessions".to_string(),
            ),
            TableRole::UnemploymentEffect => (
                ChartKind::Bar,
                "Effect of Unemployment Rate on Vehicle Type and Sales".to_string(),
            ),
            TableRole::RecessionSalesHierarchy => (
                ChartKind::Hierarchical,
                "Sunburst Chart of Automobile Sales During Recession Period".to_string(),
            ),
            TableRole::YearlySalesTrend => (ChartKind::Line, "Yearly Automobile Sales".to_string()),
            TableRole::MonthlySales { .. } => (
                ChartKind::Line,
                "Total Monthly Automobile Sales".to_string(),
            ),
            TableRole::VehicleAverage { year } => (
                ChartKind::Bar,
                format!("Average Vehicles Sold by Vehicle Type in the year {}", year),
            ),
            TableRole::AdvertisingShare { .. } => (
                ChartKind::Pie,
                "Total Advertisement Expenditure for Each Vehicle".to_string(),
            ),
        };

        let x_label = table
            .dimensions
            .first()
            .map(|d| d.label().to_string())
            .unwrap_or_default();
        let series_label = table.dimensions.get(1).map(|d| d.label().to_string());

        let points = table
            .rows
            .iter()
            .filter_map(|row| {
                Some(ChartPoint {
                    key: row.keys.first()?.clone(),
                    series: row.keys.get(1).cloned(),
                    value: row.value,
                })
            })
            .collect();

        Self {
            role: table.role,
            kind,
            title,
            x_label,
            y_label: table.measure.label(),
            series_label,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distinct primary keys, in point order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for p in &self.points {
            let label = p.key.to_string();
            if !out.contains(&label) {
                out.push(label);
            }
        }
        out
    }

    /// Distinct secondary series, sorted.
    pub fn series_names(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .points
            .iter()
            .filter_map(|p| p.series.as_ref().map(|s| s.to_string()))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Proportion of the total per primary key. Empty when the total is not
    /// positive.
    pub fn shares(&self) -> Vec<(String, f64)> {
        let total: f64 = self.points.iter().map(|p| p.value).sum();
        if total.is_nan() || total <= 0.0 {
            return Vec::new();
        }
        self.points
            .iter()
            .map(|p| (p.key.to_string(), p.value / total))
            .collect()
    }

    /// Angular layout of a pie chart.
    pub fn pie_slices(&self) -> Vec<Slice> {
        let mut start = 0.0;
        self.shares()
            .into_iter()
            .enumerate()
            .map(|(i, (label, share))| {
                let end = start + share * TAU;
                let slice = Slice {
                    label,
                    share,
                    start,
                    end,
                    ring: 0,
                    color: i,
                };
                start = end;
                slice
            })
            .collect()
    }

    /// Two-ring layout: primary keys on the inner ring, each subdivided by
    /// its series values on the outer ring. Shares are of the grand total.
    pub fn sunburst_slices(&self) -> Vec<Slice> {
        let total: f64 = self.points.iter().map(|p| p.value).sum();
        if total.is_nan() || total <= 0.0 {
            return Vec::new();
        }

        let mut slices = Vec::new();
        let mut start = 0.0;
        for (i, parent) in self.categories().into_iter().enumerate() {
            let children: Vec<&ChartPoint> = self
                .points
                .iter()
                .filter(|p| p.key.to_string() == parent)
                .collect();
            let parent_value: f64 = children.iter().map(|p| p.value).sum();
            let parent_end = start + parent_value / total * TAU;

            let mut child_start = start;
            for child in children {
                let child_end = child_start + child.value / total * TAU;
                slices.push(Slice {
                    label: child
                        .series
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    share: child.value / total,
                    start: child_start,
                    end: child_end,
                    ring: 1,
                    color: i,
                });
                child_start = child_end;
            }

            slices.push(Slice {
                label: parent,
                share: parent_value / total,
                start,
                end: parent_end,
                ring: 0,
                color: i,
            });
            start = parent_end;
        }
        slices
    }
}

/// Build one chart per table, preserving order.
pub fn build_charts(tables: &[AggregatedTable]) -> Vec<ChartDescriptor> {
    tables.iter().map(ChartDescriptor::from_table).collect()
}

/// Label of the category placed at integer position `value`; blank between
/// categories and outside the range.
pub fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// Outline of an annular sector, as (x, y) with y pointing up.
/// `inner` of zero gives a plain pie wedge.
pub fn wedge_outline(start: f64, end: f64, inner: f64, outer: f64) -> Vec<[f64; 2]> {
    let steps = (((end - start) / TAU) * 96.0).ceil().max(2.0) as usize;
    let at = |angle: f64, r: f64| [r * angle.sin(), r * angle.cos()];

    let mut outline = Vec::with_capacity(2 * steps + 2);
    for i in 0..=steps {
        let a = start + (end - start) * i as f64 / steps as f64;
        outline.push(at(a, outer));
    }
    if inner > 0.0 {
        for i in (0..=steps).rev() {
            let a = start + (end - start) * i as f64 / steps as f64;
            outline.push(at(a, inner));
        }
    } else {
        outline.push([0.0, 0.0]);
    }
    outline
}
