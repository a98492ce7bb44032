//! Standalone HTML output with one inline SVG per plot

use std::io::Write;

use super::{escape_xml, BoxPlot, BoxStats, Document, DocumentRenderer, LinePlot, Plot};
use crate::Result;

const COLORS: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 130.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 50.0;
const TICKS: usize = 5;

/// HTML renderer.
#[derive(Debug, Clone, Copy)]
pub struct HtmlRenderer {
    width: f64,
    height: f64,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::with_size(720.0, 420.0)
    }
}

/// Data range padded so flat series still get a visible span.
#[derive(Debug, Clone, Copy)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    fn of(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() {
            return Self { min: 0.0, max: 1.0 };
        }
        let pad = if max > min { (max - min) * 0.05 } else { min.abs().max(1.0) * 0.1 };
        Self {
            min: min - pad,
            max: max + pad,
        }
    }

    fn fraction(self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }

    #[allow(clippy::cast_precision_loss)]
    fn tick(self, i: usize) -> f64 {
        self.min + (self.max - self.min) * i as f64 / TICKS as f64
    }
}

impl HtmlRenderer {
    /// Create a renderer drawing each plot at `width` x `height` pixels.
    #[must_use]
    pub const fn with_size(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Get the SVG width in pixels.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Get the SVG height in pixels.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    fn plot_width(&self) -> f64 {
        self.width - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height(&self) -> f64 {
        self.height - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn px(&self, range: Range, x: f64) -> f64 {
        MARGIN_LEFT + range.fraction(x) * self.plot_width()
    }

    fn py(&self, range: Range, y: f64) -> f64 {
        self.height - MARGIN_BOTTOM - range.fraction(y) * self.plot_height()
    }

    fn frame(&self, out: &mut dyn Write, title: &str, x_label: &str, y_label: &str) -> Result<()> {
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(
            out,
            r#"  <text x="{}" y="{}" class="title" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + self.plot_width() / 2.0,
            MARGIN_TOP / 2.0 + 6.0,
            escape_xml(title)
        )?;
        let bottom = self.height - MARGIN_BOTTOM;
        writeln!(
            out,
            r#"  <line x1="{l}" y1="{t}" x2="{l}" y2="{b}" stroke="black"/>
  <line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/>"#,
            l = MARGIN_LEFT,
            t = MARGIN_TOP,
            b = bottom,
            r = self.width - MARGIN_RIGHT
        )?;
        writeln!(
            out,
            r#"  <text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
            MARGIN_LEFT + self.plot_width() / 2.0,
            self.height - 10.0,
            escape_xml(x_label)
        )?;
        let mid = MARGIN_TOP + self.plot_height() / 2.0;
        writeln!(
            out,
            r#"  <text x="15" y="{mid}" class="label" text-anchor="middle" transform="rotate(-90, 15, {mid})">{}</text>"#,
            escape_xml(y_label)
        )?;
        Ok(())
    }

    fn y_ticks(&self, out: &mut dyn Write, range: Range) -> Result<()> {
        for i in 0..=TICKS {
            let v = range.tick(i);
            let y = self.py(range, v);
            writeln!(
                out,
                r#"  <line x1="{}" y1="{y:.1}" x2="{}" y2="{y:.1}" class="grid"/>
  <text x="{}" y="{:.1}" class="axis" text-anchor="end">{v:.3e}</text>"#,
                MARGIN_LEFT,
                self.width - MARGIN_RIGHT,
                MARGIN_LEFT - 5.0,
                y + 4.0
            )?;
        }
        Ok(())
    }

    fn line_plot(&self, out: &mut dyn Write, plot: &LinePlot) -> Result<()> {
        let x_range = Range::of(plot.series().iter().flat_map(|s| s.x.iter().copied()));
        let y_range = Range::of(plot.series().iter().flat_map(|s| s.y.iter().copied()));

        self.frame(out, plot.title(), plot.x_label(), plot.y_label())?;
        self.y_ticks(out, y_range)?;
        for i in 0..=TICKS {
            let v = x_range.tick(i);
            writeln!(
                out,
                r#"  <text x="{:.1}" y="{}" class="axis" text-anchor="middle">{v:.3}</text>"#,
                self.px(x_range, v),
                self.height - MARGIN_BOTTOM + 15.0
            )?;
        }

        for (idx, series) in plot.series().iter().enumerate() {
            let color = COLORS[idx % COLORS.len()];
            let points: Vec<String> = series
                .points()
                .map(|(x, y)| format!("{:.1},{:.1}", self.px(x_range, x), self.py(y_range, y)))
                .collect();
            if points.len() > 1 {
                writeln!(
                    out,
                    r#"  <polyline points="{}" fill="none" stroke="{color}" stroke-width="2"/>"#,
                    points.join(" ")
                )?;
            }
            for (x, y) in series.points() {
                writeln!(
                    out,
                    r#"  <circle cx="{:.1}" cy="{:.1}" r="3" fill="{color}"/>"#,
                    self.px(x_range, x),
                    self.py(y_range, y)
                )?;
            }
            #[allow(clippy::cast_precision_loss)]
            let legend_y = MARGIN_TOP + 10.0 + idx as f64 * 16.0;
            writeln!(
                out,
                r#"  <rect x="{}" y="{legend_y}" width="12" height="12" fill="{color}"/>
  <text x="{}" y="{}" class="legend">{}</text>"#,
                self.width - MARGIN_RIGHT + 10.0,
                self.width - MARGIN_RIGHT + 28.0,
                legend_y + 10.0,
                escape_xml(&series.name)
            )?;
        }
        writeln!(out, "</svg>")?;
        Ok(())
    }

    fn box_plot(&self, out: &mut dyn Write, plot: &BoxPlot) -> Result<()> {
        let stats: Vec<(&str, BoxStats)> = plot
            .samples()
            .iter()
            .filter_map(|(tag, values)| BoxStats::from_samples(values).map(|s| (tag.as_str(), s)))
            .collect();
        let y_range = Range::of(
            stats
                .iter()
                .flat_map(|(_, s)| [s.lower_whisker, s.upper_whisker]),
        );

        self.frame(out, plot.title(), "", plot.y_label())?;
        self.y_ticks(out, y_range)?;

        #[allow(clippy::cast_precision_loss)]
        let slot = self.plot_width() / stats.len().max(1) as f64;
        let half = slot * 0.3;
        for (idx, (tag, s)) in stats.iter().enumerate() {
            let color = COLORS[idx % COLORS.len()];
            #[allow(clippy::cast_precision_loss)]
            let cx = MARGIN_LEFT + slot * (idx as f64 + 0.5);
            let (lw, lq, md, uq, uw) = (
                self.py(y_range, s.lower_whisker),
                self.py(y_range, s.lower_quartile),
                self.py(y_range, s.median),
                self.py(y_range, s.upper_quartile),
                self.py(y_range, s.upper_whisker),
            );
            writeln!(
                out,
                r#"  <line x1="{cx:.1}" y1="{lw:.1}" x2="{cx:.1}" y2="{uw:.1}" stroke="black"/>
  <rect x="{:.1}" y="{uq:.1}" width="{:.1}" height="{:.1}" fill="{color}" fill-opacity="0.6" stroke="black"/>
  <line x1="{:.1}" y1="{md:.1}" x2="{:.1}" y2="{md:.1}" stroke="black" stroke-width="2"/>
  <text x="{cx:.1}" y="{}" class="axis" text-anchor="middle">{}</text>"#,
                cx - half,
                2.0 * half,
                lq - uq,
                cx - half,
                cx + half,
                self.height - MARGIN_BOTTOM + 15.0,
                escape_xml(tag)
            )?;
        }
        writeln!(out, "</svg>")?;
        Ok(())
    }
}

impl DocumentRenderer for HtmlRenderer {
    fn render(&self, document: &Document, out: &mut dyn Write) -> Result<()> {
        let title = escape_xml(document.title());
        writeln!(
            out,
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 20px; }}
    .plot {{ margin: 24px auto; max-width: {w}px; }}
    .axis {{ font-size: 10px; fill: #333; }}
    .title {{ font-size: 15px; font-weight: bold; fill: #333; }}
    .label {{ font-size: 12px; fill: #555; }}
    .legend {{ font-size: 11px; fill: #333; }}
    .grid {{ stroke: #e0e0e0; stroke-width: 0.5; }}
  </style>
</head>
<body>
<h1>{title}</h1>"#,
            w = self.width
        )?;
        for plot in document.plots() {
            writeln!(out, r#"<div class="plot">"#)?;
            match plot {
                Plot::Line(line) => self.line_plot(out, line)?,
                Plot::Box(boxes) => self.box_plot(out, boxes)?,
            }
            writeln!(out, "</div>")?;
        }
        writeln!(out, "</body>\n</html>")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn render(document: &Document) -> String {
        let mut buf = Vec::new();
        HtmlRenderer::default().render(document, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_line_plot_has_one_polyline_per_multi_point_series() {
        let mut plot = LinePlot::new("Iter, rotation error");
        plot.set_axis_labels("Noise", "Error (rad)");
        plot.add_series("16", vec![0.0, 0.1], vec![0.01, 0.02]);
        plot.add_series("<64>", vec![0.0], vec![0.03]);
        let mut doc = Document::new("FGR & friends");
        doc.add_plot(Plot::Line(plot));

        let html = render(&doc);
        assert!(html.contains("<title>FGR &amp; friends</title>"));
        assert_eq!(html.matches("<polyline").count(), 1);
        assert_eq!(html.matches("<circle").count(), 3);
        assert!(html.contains("&lt;64&gt;"));
        assert!(html.contains("Error (rad)"));
    }

    #[test]
    fn test_box_plot_draws_one_box_per_tag() {
        let mut samples = BTreeMap::new();
        samples.insert("icp".to_string(), vec![0.5, 0.7]);
        samples.insert("total".to_string(), vec![1.0, 1.0, 1.2]);
        let mut plot = BoxPlot::new("Timings");
        plot.set_axis_label("Seconds");
        plot.add_samples(samples);
        let mut doc = Document::new("t");
        doc.add_plot(Plot::Box(plot));

        let html = render(&doc);
        assert_eq!(html.matches("fill-opacity=\"0.6\"").count(), 2);
        assert!(html.contains(">icp</text>"));
        assert!(html.contains("Seconds"));
    }

    #[test]
    fn test_empty_plots_still_render() {
        let mut doc = Document::new("empty");
        doc.add_plot(Plot::Line(LinePlot::new("nothing")));
        doc.add_plot(Plot::Box(BoxPlot::new("Timings")));
        let html = render(&doc);
        assert_eq!(html.matches("<svg").count(), 2);
        assert!(!html.contains("NaN"));
    }

    #[test]
    fn test_with_size_sets_svg_dimensions() {
        let renderer = HtmlRenderer::with_size(400.0, 300.0);
        assert!((renderer.width() - 400.0).abs() < f64::EPSILON);
        assert!((renderer.height() - 300.0).abs() < f64::EPSILON);

        let mut doc = Document::new("sized");
        doc.add_plot(Plot::Line(LinePlot::new("one")));
        let mut buf = Vec::new();
        renderer.render(&doc, &mut buf).unwrap();
        let html = String::from_utf8(buf).unwrap();
        assert!(html.contains(r#"width="400" height="300" viewBox="0 0 400 300""#));
    }
}
