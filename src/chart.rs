use std::path::Path;

use plotters::{
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{error::ChartError, stats::LatencySeries};

const PIXELS_PER_INCH: u32 = 100;
const TITLE_LINE_HEIGHT: i32 = 22;
const FONT: &str = "sans-serif";

/// Look and size of the rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    pub dark_mode: bool,
    pub width_in: u32,
    pub height_in: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            dark_mode: false,
            width_in: 8,
            height_in: 6,
        }
    }
}

impl ChartStyle {
    #[must_use]
    pub fn pixels(&self) -> (u32, u32) {
        (
            self.width_in.saturating_mul(PIXELS_PER_INCH),
            self.height_in.saturating_mul(PIXELS_PER_INCH),
        )
    }

    fn palette(&self) -> Palette {
        if self.dark_mode {
            Palette {
                background: BLACK,
                text: WHITE,
                axis: RGBColor(128, 128, 128),
                grid: RGBColor(128, 128, 128),
                line: RGBColor(141, 211, 199),
            }
        } else {
            Palette {
                background: WHITE,
                text: BLACK,
                axis: BLACK,
                grid: RGBColor(176, 176, 176),
                line: RGBColor(31, 119, 180),
            }
        }
    }
}

struct Palette {
    background: RGBColor,
    text: RGBColor,
    axis: RGBColor,
    grid: RGBColor,
    line: RGBColor,
}

/// The multi-line heading drawn above the plot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartTitle {
    lines: Vec<String>,
}

impl ChartTitle {
    #[must_use]
    pub fn new(host: &str, datetime: &str, isp: &str, summary: &str) -> Self {
        Self {
            lines: vec![
                format!("Ping Latency: {host} - {datetime}"),
                format!("ISP: {isp}"),
                summary.to_string(),
            ],
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] { &self.lines }
}

fn draw_err(e: impl std::fmt::Display) -> ChartError { ChartError(e.to_string()) }

// y range with some headroom, never empty
fn latency_range(series: &LatencySeries) -> (f64, f64) {
    let (lo, hi) = series
        .latencies()
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    ((lo - pad).max(0.0), hi + pad)
}

fn time_range(series: &LatencySeries) -> (f64, f64) {
    let end = series.times().last().copied().unwrap_or(0.0);
    (0.0, end.max(1.0))
}

/// Draws `series` as a line chart and writes it to `path` as PNG.
pub fn render(
    path: &Path,
    series: &LatencySeries,
    title: &ChartTitle,
    style: &ChartStyle,
) -> Result<(), ChartError> {
    let palette = style.palette();
    let root = BitMapBackend::new(path, style.pixels()).into_drawing_area();
    root.fill(&palette.background).map_err(draw_err)?;

    let title_height = i32::try_from(title.lines().len())
        .unwrap_or(0)
        .saturating_mul(TITLE_LINE_HEIGHT)
        + 10;
    let (heading, body) = root.split_vertically(title_height);

    let center = i32::try_from(style.pixels().0 / 2).unwrap_or(i32::MAX);
    let text = TextStyle::from((FONT, 16).into_font())
        .color(&palette.text)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, line) in title.lines().iter().enumerate() {
        let y = 5 + i32::try_from(i).unwrap_or(0) * TITLE_LINE_HEIGHT;
        heading.draw_text(line, &text, (center, y)).map_err(draw_err)?;
    }

    let (x_lo, x_hi) = time_range(series);
    let (y_lo, y_hi) = latency_range(series);
    let mut chart = ChartBuilder::on(&body)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(draw_err)?;

    let label_style = TextStyle::from((FONT, 14).into_font()).color(&palette.text);
    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc("Latency (ms)")
        .axis_style(ShapeStyle {
            color: palette.axis.to_rgba(),
            filled: false,
            stroke_width: 1,
        })
        .bold_line_style(ShapeStyle {
            color: palette.grid.mix(0.4),
            filled: false,
            stroke_width: 1,
        })
        .light_line_style(ShapeStyle {
            color: palette.grid.mix(0.15),
            filled: false,
            stroke_width: 1,
        })
        .label_style(label_style.clone())
        .axis_desc_style(label_style)
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(
            series.points(),
            ShapeStyle {
                color: palette.line.to_rgba(),
                filled: false,
                stroke_width: 2,
            },
        ))
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_in_inches() {
        let style = ChartStyle::default();
        assert_eq!(style.pixels(), (800, 600));
    }

    #[test]
    fn title_has_three_lines() {
        let t = ChartTitle::new(
            "example.com",
            "2024-01-01 12:00:00",
            "Example Net",
            "Min: 1.00, Max: 1.00, Avg: 1.00, Jitter: 0.00, Last: 1.00",
        );
        assert_eq!(
            t.lines(),
            [
                "Ping Latency: example.com - 2024-01-01 12:00:00",
                "ISP: Example Net",
                "Min: 1.00, Max: 1.00, Avg: 1.00, Jitter: 0.00, Last: 1.00",
            ]
        );
    }

    #[test]
    fn ranges_are_never_empty() {
        let mut s = LatencySeries::new();
        assert_eq!(latency_range(&s), (0.0, 1.0));
        assert_eq!(time_range(&s), (0.0, 1.0));

        s.push(0.0, 20.0);
        let (lo, hi) = latency_range(&s);
        assert!(lo < 20.0 && hi > 20.0);

        s.push(30.0, 40.0);
        assert_eq!(time_range(&s), (0.0, 30.0));
        let (lo, hi) = latency_range(&s);
        assert!(lo <= 20.0 && hi >= 40.0);
    }

    #[test]
    fn writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");
        let mut s = LatencySeries::new();
        s.push(0.0, 18.0);
        s.push(1.0, 22.5);
        let title = ChartTitle::new("example.com", "2024-01-01 12:00:00", "net", "stats");
        let style = ChartStyle {
            dark_mode: true,
            width_in: 4,
            height_in: 3,
        };

        render(&path, &s, &title, &style).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"), "not a png");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = LatencySeries::new();
        s.push(0.0, 1.0);
        let err = render(
            &dir.path().join("absent/plot.png"),
            &s,
            &ChartTitle::default(),
            &ChartStyle::default(),
        );
        assert!(err.is_err());
    }

    #[test]
    fn range_does_not_go_negative() {
        let mut s = LatencySeries::new();
        s.push(0.0, 0.1);
        assert!(latency_range(&s).0 >= 0.0);
    }
}
