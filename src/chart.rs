//! Pareto chart: bars for individual share on the left axis, a cumulative
//! line on the right axis. Series follow the table order exactly.

use crate::config::ChartConfig;
use crate::types::RankedTable;
use crate::util::format_count;
use serde::Serialize;
use std::fmt::Write;

pub const BAR_AXIS_LABEL: &str = "% Individual";
pub const LINE_AXIS_LABEL: &str = "% Acumulada";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub categories: Vec<String>,
    pub bars: Vec<f64>,
    pub line: Vec<f64>,
    /// Raw counts drawn above the bars, when enabled.
    pub bar_labels: Option<Vec<String>>,
    pub primary_axis_label: String,
    pub secondary_axis_label: String,
    pub secondary_axis_range: (f64, f64),
    pub bar_color: String,
    pub line_color: String,
}

impl ChartSeries {
    pub fn from_table(table: &RankedTable, config: &ChartConfig) -> Self {
        let bar_labels = config
            .annotate_counts
            .then(|| table.nonconforming_counts().into_iter().map(format_count).collect());
        Self {
            categories: table.supplier_names().into_iter().map(String::from).collect(),
            bars: table.individual_shares(),
            line: table.cumulative_shares(),
            bar_labels,
            primary_axis_label: BAR_AXIS_LABEL.to_string(),
            secondary_axis_label: LINE_AXIS_LABEL.to_string(),
            secondary_axis_range: (0.0, config.secondary_axis_max),
            bar_color: config.bar_color.clone(),
            line_color: config.line_color.clone(),
        }
    }

    /// Top of the bar axis: the largest bar rounded up to a multiple of 10.
    pub fn primary_axis_max(&self) -> f64 {
        let max = self.bars.iter().copied().fold(0.0_f64, f64::max);
        ((max / 10.0).ceil() * 10.0).max(10.0)
    }
}

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 70.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 140.0;
const TICKS: usize = 5;

/// Render the series as a standalone SVG document.
pub fn render_svg(series: &ChartSeries, config: &ChartConfig) -> String {
    let width = f64::from(config.width);
    let height = f64::from(config.height);
    let plot_w = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_h = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
    let bottom = MARGIN_TOP + plot_h;
    let right = MARGIN_LEFT + plot_w;

    let left_max = series.primary_axis_max();
    let (right_min, right_max) = series.secondary_axis_range;
    let right_span = (right_max - right_min).max(f64::EPSILON);
    let y_left = |v: f64| bottom - v / left_max * plot_h;
    let y_right = |v: f64| bottom - (v - right_min) / right_span * plot_h;

    let n = series.categories.len().max(1);
    let slot = plot_w / n as f64;
    let bar_w = slot * 0.8;
    let x_center = |i: usize| MARGIN_LEFT + slot * (i as f64 + 0.5);

    // Writing into a String cannot fail, so the fmt results are discarded.
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#,
        w = config.width,
        h = config.height
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="{}"/>"#, escape(&config.background));

    for t in 0..=TICKS {
        let frac = t as f64 / TICKS as f64;
        let y = bottom - frac * plot_h;
        let _ = writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{right:.1}" y2="{y:.1}" stroke="#E5E5E5"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" fill="{}">{:.0}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 4.0,
            escape(&series.bar_color),
            frac * left_max
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="start" fill="{}">{:.0}</text>"#,
            right + 6.0,
            y + 4.0,
            escape(&series.line_color),
            right_min + frac * right_span
        );
    }

    for (i, value) in series.bars.iter().enumerate() {
        let top = y_left(*value);
        let _ = writeln!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
            x_center(i) - bar_w / 2.0,
            top,
            bar_w,
            (bottom - top).max(0.0),
            escape(&series.bar_color)
        );
        if let Some(label) = series.bar_labels.as_ref().and_then(|l| l.get(i)) {
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" fill="{}">{}</text>"#,
                x_center(i),
                top - 4.0,
                escape(&config.text_color),
                escape(label)
            );
        }
    }

    let points: Vec<String> = series
        .line
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", x_center(i), y_right(*v)))
        .collect();
    let _ = writeln!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2.5"/>"#,
        points.join(" "),
        escape(&series.line_color)
    );
    for (i, v) in series.line.iter().enumerate() {
        let _ = writeln!(
            svg,
            r#"<circle cx="{:.1}" cy="{:.1}" r="4" fill="{}"/>"#,
            x_center(i),
            y_right(*v),
            escape(&series.line_color)
        );
    }

    for (i, name) in series.categories.iter().enumerate() {
        let (x, y) = (x_center(i), bottom + 14.0);
        let _ = writeln!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="end" transform="rotate(-45 {x:.1} {y:.1})" fill="{}">{}</text>"#,
            escape(&config.text_color),
            escape(name)
        );
    }

    let mid = MARGIN_TOP + plot_h / 2.0;
    let _ = writeln!(
        svg,
        r#"<text x="18" y="{mid:.1}" text-anchor="middle" transform="rotate(-90 18 {mid:.1})" fill="{}">{}</text>"#,
        escape(&series.bar_color),
        escape(&series.primary_axis_label)
    );
    let rx = width - 18.0;
    let _ = writeln!(
        svg,
        r#"<text x="{rx:.1}" y="{mid:.1}" text-anchor="middle" transform="rotate(90 {rx:.1} {mid:.1})" fill="{}">{}</text>"#,
        escape(&series.line_color),
        escape(&series.secondary_axis_label)
    );
    svg.push_str("</svg>\n");
    svg
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranker::rank;
    use crate::types::SupplierRecord;

    fn table() -> RankedTable {
        let rec = |n: &str, nc: f64| SupplierRecord {
            supplier_name: n.to_string(),
            nonconforming_count: nc,
            delivered_count: 100.0,
        };
        rank(&[rec("X", 10.0), rec("Y & Co", 3000.0), rec("Z", 5.0)]).unwrap()
    }

    #[test]
    fn series_follow_table_order() {
        let t = table();
        let series = ChartSeries::from_table(&t, &ChartConfig::default());
        assert_eq!(series.categories, ["Y & Co", "X", "Z"]);
        assert_eq!(series.bars, t.individual_shares());
        assert_eq!(series.line, t.cumulative_shares());
        assert_eq!(series.secondary_axis_range, (0.0, 105.0));
        assert_eq!(series.bar_labels, None);
    }

    #[test]
    fn count_labels_are_optional_and_grouped() {
        let config = ChartConfig {
            annotate_counts: true,
            ..ChartConfig::default()
        };
        let series = ChartSeries::from_table(&table(), &config);
        assert_eq!(
            series.bar_labels.as_deref(),
            Some(&["3,000".to_string(), "10".to_string(), "5".to_string()][..])
        );
    }

    #[test]
    fn primary_axis_rounds_up_to_ten() {
        let series = ChartSeries::from_table(&table(), &ChartConfig::default());
        // Y holds 3000 / 3015 of the total, about 99.5%.
        assert_eq!(series.primary_axis_max(), 100.0);
    }

    #[test]
    fn svg_escapes_names_and_uses_configured_colours() {
        let config = ChartConfig {
            annotate_counts: true,
            ..ChartConfig::default()
        };
        let svg = render_svg(&ChartSeries::from_table(&table(), &config), &config);
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("Y &amp; Co"));
        assert!(!svg.contains("Y & Co"));
        assert!(svg.contains(r##"fill="#134883""##));
        assert!(svg.contains(r##"stroke="#F8AC2E""##));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains(">3,000</text>"));
    }
}
