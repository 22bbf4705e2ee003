//! Minimal SVG bar chart

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use super::ChartRenderer;
use crate::domain::volume::IntervalVolumeSeries;
use crate::shared::errors::ChartError;
use crate::shared::utils::sanitize_file_stem;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 360.0;
const MARGIN: f64 = 40.0;

/// Renders interval volumes as `<output_dir>/<title>.svg`
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    output_dir: PathBuf,
}

impl SvgChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, title: &str, volumes: &IntervalVolumeSeries) -> Result<PathBuf, ChartError> {
        if volumes.is_empty() {
            return Err(ChartError::EmptySeries);
        }

        fs::create_dir_all(&self.output_dir)?;
        let path = self
            .output_dir
            .join(format!("{}.svg", sanitize_file_stem(title)));
        fs::write(&path, bar_chart_svg(title, volumes.values()))?;
        Ok(path)
    }
}

fn bar_chart_svg(title: &str, values: &[i64]) -> String {
    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;
    let max = values.iter().copied().max().unwrap_or(0).max(1) as f64;
    let slot = plot_w / values.len() as f64;
    let bar_w = slot * 0.8;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = WIDTH,
        h = HEIGHT
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="16">{}</text>"#,
        WIDTH / 2.0,
        MARGIN / 2.0 + 6.0,
        escape_xml(title)
    );

    for (i, &v) in values.iter().enumerate() {
        // Negative intervals are drawn flat
        let h = (v.max(0) as f64 / max) * plot_h;
        let x = MARGIN + slot * i as f64 + (slot - bar_w) / 2.0;
        let y = MARGIN + plot_h - h;
        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="steelblue"><title>{}</title></rect>"#,
            x, y, bar_w, h, v
        );
    }

    let _ = writeln!(
        svg,
        r#"<line x1="{m}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/>"#,
        m = MARGIN,
        b = MARGIN + plot_h,
        r = WIDTH - MARGIN
    );
    svg.push_str("</svg>\n");
    svg
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
