//! Minimal SVG rendering for line charts and label heat maps.

use std::fmt;

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 500.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 150.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 60.0;
const TICKS: usize = 5;

/// Colour of the n-th series or label
pub fn palette(index: usize) -> &'static str {
    const COLORS: [&str; 10] = [
        "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2",
        "#7f7f7f", "#bcbd22", "#17becf",
    ];
    COLORS[index % COLORS.len()]
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// One named line; `None` values leave a gap
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, Option<f64>)>,
}

#[derive(Debug, Clone, Default)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Fixed y axis range; derived from the data when unset
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<Series>,
}

impl LineChart {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            ..Default::default()
        }
    }

    pub fn with_y_range(mut self, min: f64, max: f64) -> Self {
        self.y_range = Some((min, max));
        self
    }

    pub fn add_series(&mut self, name: impl Into<String>, points: Vec<(f64, Option<f64>)>) {
        self.series.push(Series {
            name: name.into(),
            points,
        });
    }

    fn x_bounds(&self) -> (f64, f64) {
        let xs = self.series.iter().flat_map(|s| s.points.iter().map(|p| p.0));
        widen(bounds(xs))
    }

    fn y_bounds(&self) -> (f64, f64) {
        if let Some(range) = self.y_range {
            return widen(range);
        }
        let ys = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().filter_map(|p| p.1));
        widen(bounds(ys))
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LineChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x_min, x_max) = self.x_bounds();
        let (y_min, y_max) = self.y_bounds();
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;

        let sx = |x: f64| MARGIN_LEFT + (x - x_min) / (x_max - x_min) * plot_w;
        let sy = |y: f64| MARGIN_TOP + plot_h - (y - y_min) / (y_max - y_min) * plot_h;

        header(f, &self.title)?;

        // Axes
        writeln!(
            f,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="black"/>"#,
            MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h
        )?;
        for i in 0..=TICKS {
            let t = i as f64 / TICKS as f64;
            let x = x_min + t * (x_max - x_min);
            let y = y_min + t * (y_max - y_min);
            writeln!(
                f,
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="middle">{}</text>"#,
                sx(x),
                MARGIN_TOP + plot_h + 18.0,
                format_tick(x)
            )?;
            writeln!(
                f,
                r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{}</text>"#,
                MARGIN_LEFT - 6.0,
                sy(y) + 4.0,
                format_tick(y)
            )?;
        }
        writeln!(
            f,
            r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            HEIGHT - 15.0,
            escape(&self.x_label)
        )?;
        writeln!(
            f,
            r#"<text x="18" y="{:.1}" font-size="14" text-anchor="middle" transform="rotate(-90 18 {:.1})">{}</text>"#,
            MARGIN_TOP + plot_h / 2.0,
            MARGIN_TOP + plot_h / 2.0,
            escape(&self.y_label)
        )?;

        for (index, series) in self.series.iter().enumerate() {
            let color = palette(index);
            let mut commands = Vec::with_capacity(series.points.len());
            let mut pen_down = false;
            for &(x, y) in &series.points {
                match y {
                    Some(y) => {
                        let cmd = if pen_down { 'L' } else { 'M' };
                        commands.push(format!("{}{:.2},{:.2}", cmd, sx(x), sy(y)));
                        pen_down = true;
                    }
                    None => pen_down = false,
                }
            }
            writeln!(
                f,
                r#"<path d="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
                commands.join(" "),
                color
            )?;
            legend_entry(f, index, &series.name, color)?;
        }

        writeln!(f, "</svg>")
    }
}

/// Categorical grid of label indices
#[derive(Debug, Clone)]
pub struct HeatMap {
    pub title: String,
    pub cells: Vec<Vec<usize>>,
    pub labels: Vec<String>,
}

impl HeatMap {
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HeatMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.cells.len().max(1);
        let cols = self.cells.iter().map(Vec::len).max().unwrap_or(0).max(1);
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let cell = (plot_w / cols as f64).min(plot_h / rows as f64);

        header(f, &self.title)?;
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &label) in row.iter().enumerate() {
                writeln!(
                    f,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                    MARGIN_LEFT + c as f64 * cell,
                    MARGIN_TOP + r as f64 * cell,
                    cell,
                    cell,
                    palette(label)
                )?;
            }
        }
        for (index, name) in self.labels.iter().enumerate() {
            legend_entry(f, index, name, palette(index))?;
        }

        writeln!(f, "</svg>")
    }
}

fn header(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(
        f,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WIDTH,
        h = HEIGHT
    )?;
    writeln!(f, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
    writeln!(
        f,
        r#"<text x="{:.1}" y="24" font-size="16" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        escape(title)
    )
}

fn legend_entry(f: &mut fmt::Formatter<'_>, index: usize, name: &str, color: &str) -> fmt::Result {
    let x = WIDTH - MARGIN_RIGHT + 15.0;
    let y = MARGIN_TOP + 10.0 + index as f64 * 20.0;
    writeln!(
        f,
        r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/>"#,
        x,
        y - 10.0,
        color
    )?;
    writeln!(
        f,
        r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
        x + 18.0,
        y,
        escape(name)
    )
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 1.0))
}

/// Avoid a zero-width axis
fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi - lo > f64::EPSILON {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

fn format_tick(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
