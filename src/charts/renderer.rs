//! Static Chart Renderer
//! Renders chart descriptors to PNG bytes with plotters, for headless export.
//!
//! Layout per image:
//! 1. Title centered at the top
//! 2. Line / bar charts: axes with descriptions, category labels under bars,
//!    series legend in the upper right when the chart has a series dimension
//! 3. Pie / sunburst: rings centered under the title, slice labels inside

use crate::charts::descriptor::{
    category_label, palette_color, wedge_outline, ChartDescriptor, ChartKind, Slice,
};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use thiserror::Error;

const FONT: &str = "sans-serif";
const TITLE_SIZE: u32 = 26;
const SUNBURST_INNER: f64 = 0.45;
const MIN_LABEL_SHARE: f64 = 0.03;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to draw for \"{0}\"")]
    EmptyAggregation(String),
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Image buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn rgb(index: usize) -> RGBColor {
    let [r, g, b] = palette_color(index);
    RGBColor(r, g, b)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart to PNG bytes.
    ///
    /// Charts with no points, and part-to-whole charts whose total is not
    /// positive, fail with `EmptyAggregation`.
    pub fn render_png(chart: &ChartDescriptor, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let slices = match chart.kind {
            ChartKind::Pie => chart.pie_slices(),
            ChartKind::Hierarchical => chart.sunburst_slices(),
            ChartKind::Line | ChartKind::Bar => Vec::new(),
        };
        let part_to_whole = matches!(chart.kind, ChartKind::Pie | ChartKind::Hierarchical);
        if chart.is_empty() || (part_to_whole && slices.is_empty()) {
            return Err(RenderError::EmptyAggregation(chart.title.clone()));
        }

        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            match chart.kind {
                ChartKind::Line => Self::draw_line(&root, chart)?,
                ChartKind::Bar if chart.series_label.is_some() => Self::draw_series_bars(&root, chart)?,
                ChartKind::Bar => Self::draw_bars(&root, chart)?,
                ChartKind::Pie => Self::draw_slices(&root, &chart.title, &slices, 0.0)?,
                ChartKind::Hierarchical => {
                    Self::draw_slices(&root, &chart.title, &slices, SUNBURST_INNER)?
                }
            }

            root.present().map_err(draw_err)?;
        }

        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    fn y_upper(chart: &ChartDescriptor) -> f64 {
        let max = chart.points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    fn draw_line(root: &Area, chart: &ChartDescriptor) -> Result<(), RenderError> {
        let numeric = chart.points.iter().all(|p| p.key.as_f64().is_some());
        let labels = chart.categories();

        let points: Vec<(f64, f64)> = chart
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let x = if numeric {
                    p.key.as_f64().unwrap_or(i as f64)
                } else {
                    i as f64
                };
                (x, p.value)
            })
            .collect();

        let x_min = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let x_max = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let pad = if x_max > x_min { (x_max - x_min) * 0.02 } else { 0.5 };

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((x_min - pad)..(x_max + pad), 0f64..Self::y_upper(chart))
            .map_err(draw_err)?;

        let formatter = |x: &f64| {
            if numeric {
                format!("{:.0}", x)
            } else {
                category_label(&labels, *x)
            }
        };
        let mut mesh = ctx.configure_mesh();
        mesh.x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&formatter);
        if !numeric {
            mesh.x_labels(labels.len());
        }
        mesh.draw().map_err(draw_err)?;

        let color = rgb(0);
        ctx.draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(draw_err)?;
        ctx.draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
        )
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_bars(root: &Area, chart: &ChartDescriptor) -> Result<(), RenderError> {
        let labels = chart.categories();
        let n = chart.points.len() as f64;

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..Self::y_upper(chart))
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|x: &f64| category_label(&labels, *x))
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        ctx.draw_series(chart.points.iter().enumerate().map(|(i, p)| {
            let x = i as f64;
            Rectangle::new([(x - 0.35, 0.0), (x + 0.35, p.value)], rgb(i).filled())
        }))
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_series_bars(root: &Area, chart: &ChartDescriptor) -> Result<(), RenderError> {
        let categories = chart.categories();
        let series = chart.series_names();
        let n = categories.len() as f64;
        let slot = 0.8 / series.len().max(1) as f64;

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (FONT, TITLE_SIZE))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..Self::y_upper(chart))
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(categories.len().min(20))
            .x_label_formatter(&|x: &f64| category_label(&categories, *x))
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        for (s, name) in series.iter().enumerate() {
            let color = rgb(s);
            let offset = -0.4 + slot * s as f64;
            let bars: Vec<Rectangle<(f64, f64)>> = chart
                .points
                .iter()
                .filter(|p| p.series.as_ref().map(|v| v.to_string()).as_ref() == Some(name))
                .filter_map(|p| {
                    let c = categories.iter().position(|c| *c == p.key.to_string())? as f64;
                    let left = c + offset;
                    Some(Rectangle::new(
                        [(left, 0.0), (left + slot * 0.9, p.value)],
                        color.filled(),
                    ))
                })
                .collect();

            ctx.draw_series(bars)
                .map_err(draw_err)?
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }

    /// Pie when `split` is zero, two-ring sunburst otherwise.
    fn draw_slices(root: &Area, title: &str, slices: &[Slice], split: f64) -> Result<(), RenderError> {
        let area = root.titled(title, (FONT, TITLE_SIZE)).map_err(draw_err)?;
        let (w, h) = area.dim_in_pixel();
        let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
        let radius = w.min(h) as f64 / 2.0 * 0.85;
        let to_pixel = |[x, y]: [f64; 2]| ((cx + x * radius) as i32, (cy - y * radius) as i32);

        let label_style = (FONT, 14)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));

        for slice in slices {
            let (inner, outer) = match (slice.ring, split > 0.0) {
                (0, true) => (0.0, split),
                (_, true) => (split, 1.0),
                _ => (0.0, 1.0),
            };
            let base = rgb(slice.color);
            let style = if slice.ring == 0 {
                base.filled()
            } else {
                base.mix(0.65).filled()
            };

            let outline: Vec<(i32, i32)> = wedge_outline(slice.start, slice.end, inner, outer)
                .into_iter()
                .map(to_pixel)
                .collect();
            area.draw(&Polygon::new(outline.clone(), style))
                .map_err(draw_err)?;
            area.draw(&PathElement::new(outline, WHITE.stroke_width(1)))
                .map_err(draw_err)?;

            if slice.share >= MIN_LABEL_SHARE {
                let r = (inner + outer) / 2.0;
                let angle = slice.mid_angle();
                let text = if split > 0.0 {
                    slice.label.clone()
                } else {
                    format!("{} ({:.1}%)", slice.label, slice.share * 100.0)
                };
                area.draw(&Text::new(
                    text,
                    to_pixel([r * angle.sin(), r * angle.cos()]),
                    label_style.clone(),
                ))
                .map_err(draw_err)?;
            }
        }
        Ok(())
    }
}
