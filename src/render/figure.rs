use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::RenderError;

/// Pixel size of a single-panel figure.
pub const SINGLE_SIZE: (u32, u32) = (800, 600);
/// Pixel size of a multi-panel composite figure.
pub const COMPOSITE_SIZE: (u32, u32) = (1800, 1200);

const FONT: &str = "sans-serif";
const LEGEND_STRIP: i32 = 50;

// ---------------------------------------------------------------------------
// Line – one labelled curve
// ---------------------------------------------------------------------------

/// A curve drawn through `(x[i], y[i])`. Points where either coordinate is
/// NaN break the curve into separate segments.
#[derive(Debug, Clone)]
pub struct Line {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub color: RGBColor,
    pub label: Option<String>,
}

impl Line {
    pub fn new(x: Vec<f64>, y: Vec<f64>, color: RGBColor) -> Self {
        Line {
            x,
            y,
            color,
            label: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Runs of consecutive finite points.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for (&x, &y) in self.x.iter().zip(&self.y) {
            if x.is_finite() && y.is_finite() {
                current.push((x, y));
            } else if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&x, &y)| (x, y))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

// ---------------------------------------------------------------------------
// Axes – one titled panel
// ---------------------------------------------------------------------------

/// A single plot panel. Built with chained setters and handed to a [`Figure`].
#[derive(Debug, Clone, Default)]
pub struct Axes {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub lines: Vec<Line>,
    pub hide_x_axis: bool,
    pub legend: bool,
}

impl Axes {
    pub fn new(title: impl Into<String>) -> Self {
        Axes {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    pub fn line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn hide_x_axis(mut self) -> Self {
        self.hide_x_axis = true;
        self
    }

    pub fn with_legend(mut self) -> Self {
        self.legend = true;
        self
    }

    /// Legend entries of the labelled lines, in drawing order.
    pub fn legend_entries(&self) -> Vec<(String, RGBColor)> {
        self.lines
            .iter()
            .filter_map(|l| l.label.clone().map(|label| (label, l.color)))
            .collect()
    }

    /// Data extent over all finite points, padded so it is never empty.
    pub fn ranges(&self) -> ((f64, f64), (f64, f64)) {
        let mut x = (f64::INFINITY, f64::NEG_INFINITY);
        let mut y = (f64::INFINITY, f64::NEG_INFINITY);
        for (px, py) in self.lines.iter().flat_map(Line::finite_points) {
            x = (x.0.min(px), x.1.max(px));
            y = (y.0.min(py), y.1.max(py));
        }
        (pad_range(x, 0.0), pad_range(y, 0.05))
    }
}

fn pad_range((lo, hi): (f64, f64), margin: f64) -> (f64, f64) {
    if lo > hi {
        return (0.0, 1.0);
    }
    if hi - lo < f64::EPSILON * hi.abs().max(1.0) {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * margin;
    (lo - pad, hi + pad)
}

// ---------------------------------------------------------------------------
// Figure – a grid of panels written to one image
// ---------------------------------------------------------------------------

/// A complete image: panels laid out row-major on a `rows x cols` grid, with
/// an optional legend strip across the top. Unused grid cells stay blank.
#[derive(Debug, Clone)]
pub struct Figure {
    pub size: (u32, u32),
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Axes>,
    pub legend: Vec<(String, RGBColor)>,
}

impl Figure {
    /// One panel on a single-panel canvas.
    pub fn single(axes: Axes) -> Self {
        Figure {
            size: SINGLE_SIZE,
            rows: 1,
            cols: 1,
            panels: vec![axes],
            legend: Vec::new(),
        }
    }

    /// An empty `rows x cols` composite.
    pub fn grid(rows: usize, cols: usize) -> Self {
        Figure {
            size: COMPOSITE_SIZE,
            rows,
            cols,
            panels: Vec::new(),
            legend: Vec::new(),
        }
    }

    pub fn panel(mut self, axes: Axes) -> Self {
        self.panels.push(axes);
        self
    }

    /// Figure-level legend shown above the panels.
    pub fn legend(mut self, entries: Vec<(String, RGBColor)>) -> Self {
        self.legend = entries;
        self
    }

    pub fn check_layout(&self) -> Result<(), RenderError> {
        if self.rows == 0 || self.cols == 0 || self.panels.len() > self.rows * self.cols {
            return Err(RenderError::Layout {
                panels: self.panels.len(),
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Render into a bitmap file. The image format follows the extension.
    pub fn draw_bitmap(&self, path: &Path) -> Result<(), RenderError> {
        self.check_layout()?;

        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        self.draw_on(&root)?;
        root.present().map_err(backend)?;
        Ok(())
    }

    fn draw_on<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(backend)?;

        let strip = if self.legend.is_empty() { 0 } else { LEGEND_STRIP };
        let (legend_area, body) = root.split_vertically(strip);
        draw_figure_legend(&legend_area, &self.legend)?;

        let cells = body.split_evenly((self.rows, self.cols));
        for (axes, cell) in self.panels.iter().zip(&cells) {
            draw_axes(cell, axes)?;
        }
        Ok(())
    }
}

fn draw_figure_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[(String, RGBColor)],
) -> Result<(), RenderError> {
    let y = LEGEND_STRIP / 2;
    let mut x = 40;
    for (label, color) in entries {
        area.draw(&PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(3)))
            .map_err(backend)?;
        area.draw(&Text::new(label.clone(), (x + 40, y - 10), (FONT, 22).into_font()))
            .map_err(backend)?;
        x += 60 + 12 * label.chars().count() as i32;
    }
    Ok(())
}

fn draw_axes<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, axes: &Axes) -> Result<(), RenderError> {
    let ((x0, x1), (y0, y1)) = axes.ranges();

    let mut chart = ChartBuilder::on(area)
        .caption(&axes.title, (FONT, 24))
        .margin(15)
        .x_label_area_size(if axes.hide_x_axis { 0 } else { 45 })
        .y_label_area_size(70)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(backend)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.x_desc(axes.x_label.as_str())
            .y_desc(axes.y_label.as_str())
            .label_style((FONT, 15))
            .axis_desc_style((FONT, 18));
        if axes.hide_x_axis {
            mesh.disable_x_axis().disable_x_mesh();
        }
        mesh.draw().map_err(backend)?;
    }

    for line in &axes.lines {
        let style = line.color.stroke_width(2);
        let mut segments = line.segments();
        if segments.is_empty() {
            // still registers the legend entry
            segments.push(Vec::new());
        }
        for (i, segment) in segments.into_iter().enumerate() {
            let drawn = chart
                .draw_series(LineSeries::new(segment, style))
                .map_err(backend)?;
            if let (0, Some(label)) = (i, &line.label) {
                let color = line.color;
                drawn
                    .label(label.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
            }
        }
    }

    if axes.legend && !axes.legend_entries().is_empty() {
        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .label_font((FONT, 16))
            .draw()
            .map_err(backend)?;
    }
    Ok(())
}

fn backend<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Backend(err.to_string())
}
