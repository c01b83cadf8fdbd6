//! Chart Plotter Module
//! Draws chart descriptors interactively using egui_plot.

use crate::charts::descriptor::{
    category_label, palette_color, wedge_outline, ChartDescriptor, ChartKind, Slice,
};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

const PLOT_HEIGHT: f32 = 320.0;
const SUNBURST_INNER: f64 = 0.45;
/// Slices narrower than this get no text label.
const MIN_LABEL_SHARE: f64 = 0.03;

/// Creates interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn color(index: usize) -> Color32 {
        let [r, g, b] = palette_color(index);
        Color32::from_rgb(r, g, b)
    }

    /// Draw any chart according to its kind.
    pub fn draw_chart(ui: &mut egui::Ui, chart: &ChartDescriptor) {
        match chart.kind {
            ChartKind::Line => Self::draw_line_chart(ui, chart),
            ChartKind::Bar if chart.series_label.is_some() => Self::draw_series_bar_chart(ui, chart),
            ChartKind::Bar => Self::draw_bar_chart(ui, chart),
            ChartKind::Pie => Self::draw_pie_chart(ui, chart),
            ChartKind::Hierarchical => Self::draw_sunburst_chart(ui, chart),
        }
    }

    /// Numeric keys (years) keep their value on the x axis; categorical keys
    /// (months) are placed at their index and labelled by the formatter.
    pub fn draw_line_chart(ui: &mut egui::Ui, chart: &ChartDescriptor) {
        let numeric = chart.points.iter().all(|p| p.key.as_f64().is_some());
        let labels = chart.categories();

        let points: Vec<[f64; 2]> = chart
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let x = if numeric {
                    p.key.as_f64().unwrap_or(i as f64)
                } else {
                    i as f64
                };
                [x, p.value]
            })
            .collect();

        let mut plot = Plot::new(format!("line_{}", chart.role.slug()))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .include_y(0.0);

        if !numeric {
            plot = plot.x_axis_formatter(move |mark, _range| category_label(&labels, mark.value));
        }

        let color = Self::color(0);
        plot.show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.clone()))
                    .color(color)
                    .width(2.0)
                    .name(&chart.y_label),
            );
            plot_ui.points(Points::new(PlotPoints::from(points)).radius(3.0).color(color));
        });
    }

    /// One bar per category, each in its own color.
    pub fn draw_bar_chart(ui: &mut egui::Ui, chart: &ChartDescriptor) {
        let labels = chart.categories();
        let formatter_labels = labels.clone();

        Plot::new(format!("bar_{}", chart.role.slug()))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .x_axis_formatter(move |mark, _range| category_label(&formatter_labels, mark.value))
            .show(ui, |plot_ui| {
                for (i, p) in chart.points.iter().enumerate() {
                    let color = Self::color(i);
                    let bar = Bar::new(i as f64, p.value).width(0.7).fill(color);
                    plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(&labels[i]));
                }
            });
    }

    /// Categories on the x axis, one colored bar per series side by side.
    pub fn draw_series_bar_chart(ui: &mut egui::Ui, chart: &ChartDescriptor) {
        let categories = chart.categories();
        let series = chart.series_names();
        let formatter_labels = categories.clone();
        let slot = 0.8 / series.len().max(1) as f64;

        Plot::new(format!("series_bar_{}", chart.role.slug()))
            .height(PLOT_HEIGHT)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .x_axis_formatter(move |mark, _range| category_label(&formatter_labels, mark.value))
            .show(ui, |plot_ui| {
                for (s, name) in series.iter().enumerate() {
                    let offset = -0.4 + slot * (s as f64 + 0.5);
                    let bars: Vec<Bar> = chart
                        .points
                        .iter()
                        .filter(|p| p.series.as_ref().map(|v| v.to_string()).as_ref() == Some(name))
                        .filter_map(|p| {
                            let c = categories.iter().position(|c| *c == p.key.to_string())?;
                            Some(Bar::new(c as f64 + offset, p.value).width(slot * 0.9))
                        })
                        .collect();
                    let color = Self::color(s);
                    plot_ui.bar_chart(BarChart::new(bars).color(color).name(name));
                }
            });
    }

    pub fn draw_pie_chart(ui: &mut egui::Ui, chart: &ChartDescriptor) {
        let slices = chart.pie_slices();
        Self::draw_slices(ui, &format!("pie_{}", chart.role.slug()), &slices, 0.0);
    }

    pub fn draw_sunburst_chart(ui: &mut egui::Ui, chart: &ChartDescriptor) {
        let slices = chart.sunburst_slices();
        Self::draw_slices(ui, &format!("sunburst_{}", chart.role.slug()), &slices, SUNBURST_INNER);
    }

    /// Draw annular slices on a square, axis-less plot. Inner-ring slices
    /// span `0..split` (or the full radius when `split` is zero), outer-ring
    /// slices span `split..1`.
    fn draw_slices(ui: &mut egui::Ui, id: &str, slices: &[Slice], split: f64) {
        Plot::new(id)
            .height(PLOT_HEIGHT)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .include_x(-1.1)
            .include_x(1.1)
            .include_y(-1.1)
            .include_y(1.1)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                for slice in slices {
                    let (inner, outer) = match (slice.ring, split > 0.0) {
                        (0, true) => (0.0, split),
                        (_, true) => (split, 1.0),
                        _ => (0.0, 1.0),
                    };
                    let base = Self::color(slice.color);
                    let fill = if slice.ring == 0 {
                        base
                    } else {
                        base.gamma_multiply(0.65)
                    };

                    let mut polygon = Polygon::new(PlotPoints::from(wedge_outline(
                        slice.start,
                        slice.end,
                        inner,
                        outer,
                    )))
                    .fill_color(fill)
                    .stroke(egui::Stroke::new(1.0, Color32::WHITE));
                    if slice.ring == 0 {
                        polygon = polygon.name(&slice.label);
                    }
                    plot_ui.polygon(polygon);

                    if slice.share >= MIN_LABEL_SHARE {
                        let r = (inner + outer) / 2.0;
                        let angle = slice.mid_angle();
                        let text = if split > 0.0 {
                            slice.label.clone()
                        } else {
                            format!("{:.1}%", slice.share * 100.0)
                        };
                        plot_ui.text(Text::new(
                            PlotPoint::new(r * angle.sin(), r * angle.cos()),
                            RichText::new(text).size(11.0).color(Color32::BLACK),
                        ));
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_cycle_through_palette() {
        assert_eq!(ChartPlotter::color(0), ChartPlotter::color(10));
        assert_ne!(ChartPlotter::color(0), ChartPlotter::color(1));
    }
}
