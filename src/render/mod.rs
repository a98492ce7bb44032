//! Report document model and renderers
//!
//! A [`Document`] is a title plus an ordered list of plots. It is rendered as
//! a standalone HTML page with inline SVG ([`HtmlRenderer`]) or a standalone
//! LaTeX file using pgfplots ([`LatexRenderer`]); the output file extension
//! picks the format (see [`OutputFormat::infer`]).

mod html;
mod latex;

pub use html::HtmlRenderer;
pub use latex::LatexRenderer;

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{Error, Result};

/// One named line of a [`LinePlot`].
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend entry
    pub name: String,
    /// X coordinates
    pub x: Vec<f64>,
    /// Y coordinates, same length as `x` unless points were dropped
    pub y: Vec<f64>,
}

impl Series {
    /// Points as `(x, y)` pairs, truncated to the shorter side.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Multi-series X/Y line plot.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlot {
    title: String,
    x_label: String,
    y_label: String,
    series: Vec<Series>,
}

impl LinePlot {
    /// Create an empty plot.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            series: Vec::new(),
        }
    }

    /// Set both axis labels.
    pub fn set_axis_labels(&mut self, x_label: impl Into<String>, y_label: impl Into<String>) {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
    }

    /// Append a named series.
    pub fn add_series(&mut self, name: impl Into<String>, x: Vec<f64>, y: Vec<f64>) {
        self.series.push(Series {
            name: name.into(),
            x,
            y,
        });
    }

    /// Get the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the X-axis label.
    #[must_use]
    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    /// Get the Y-axis label.
    #[must_use]
    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// Get the series in insertion order.
    #[must_use]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Find a series by name.
    #[must_use]
    pub fn series_named(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

/// Box plot with one box per tag.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlot {
    title: String,
    y_label: String,
    samples: BTreeMap<String, Vec<f64>>,
}

impl BoxPlot {
    /// Create an empty box plot.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            y_label: String::new(),
            samples: BTreeMap::new(),
        }
    }

    /// Set the value axis label.
    pub fn set_axis_label(&mut self, y_label: impl Into<String>) {
        self.y_label = y_label.into();
    }

    /// Replace the samples with one list per tag.
    pub fn add_samples(&mut self, samples: BTreeMap<String, Vec<f64>>) {
        self.samples = samples;
    }

    /// Get the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the value axis label.
    #[must_use]
    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// Get the samples keyed by tag.
    #[must_use]
    pub const fn samples(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.samples
    }
}

/// A renderable plot.
#[derive(Debug, Clone, PartialEq)]
pub enum Plot {
    /// X/Y lines
    Line(LinePlot),
    /// Duration distribution per tag
    Box(BoxPlot),
}

/// Titled sequence of plots.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    title: String,
    plots: Vec<Plot>,
}

impl Document {
    /// Create an empty document.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            plots: Vec::new(),
        }
    }

    /// Append a plot.
    pub fn add_plot(&mut self, plot: Plot) {
        self.plots.push(plot);
    }

    /// Get the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Get the plots in insertion order.
    #[must_use]
    pub fn plots(&self) -> &[Plot] {
        &self.plots
    }
}

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Standalone HTML with inline SVG
    Html,
    /// Standalone LaTeX with pgfplots
    Latex,
}

impl OutputFormat {
    /// Pick the format from the file extension.
    ///
    /// An extension containing `tex` selects LaTeX, one containing `html` or
    /// `HTML` selects HTML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOutput`] for anything else, including a
    /// missing extension.
    pub fn infer(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        if extension.contains("tex") {
            Ok(Self::Latex)
        } else if extension.contains("html") || extension.contains("HTML") {
            Ok(Self::Html)
        } else {
            Err(Error::UnsupportedOutput(path.display().to_string()))
        }
    }
}

/// Writes a [`Document`] in one concrete format.
pub trait DocumentRenderer {
    /// Render the whole document to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails.
    fn render(&self, document: &Document, out: &mut dyn Write) -> Result<()>;
}

/// Render `document` to `path` in `format`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be created or written.
pub fn render_to_file(document: &Document, path: &Path, format: OutputFormat) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    match format {
        OutputFormat::Html => HtmlRenderer::default().render(document, &mut out)?,
        OutputFormat::Latex => LatexRenderer.render(document, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// Five-number summary used to draw a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BoxStats {
    pub lower_whisker: f64,
    pub lower_quartile: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub upper_whisker: f64,
}

impl BoxStats {
    /// Quartiles by linear interpolation; whiskers reach the furthest sample
    /// within 1.5 IQR of the box.
    pub(crate) fn from_samples(samples: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let quantile = |q: f64| {
            #[allow(clippy::cast_precision_loss)]
            let pos = q * (sorted.len() - 1) as f64;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(sorted.len() - 1);
            #[allow(clippy::cast_precision_loss)]
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        };

        let lower_quartile = quantile(0.25);
        let median = quantile(0.5);
        let upper_quartile = quantile(0.75);
        let reach = 1.5 * (upper_quartile - lower_quartile);
        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|v| *v >= lower_quartile - reach)
            .unwrap_or(lower_quartile);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= upper_quartile + reach)
            .unwrap_or(upper_quartile);

        Some(Self {
            lower_whisker,
            lower_quartile,
            median,
            upper_quartile,
            upper_whisker,
        })
    }
}

/// Escape text for HTML/SVG content and attributes.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape text for LaTeX body text.
pub(crate) fn escape_latex(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '~' => escaped.push_str("\\textasciitilde{}"),
            '^' => escaped.push_str("\\textasciicircum{}"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_output_format() {
        assert_eq!(OutputFormat::infer(Path::new("out.html")).unwrap(), OutputFormat::Html);
        assert_eq!(OutputFormat::infer(Path::new("out.HTML")).unwrap(), OutputFormat::Html);
        assert_eq!(OutputFormat::infer(Path::new("out.tex")).unwrap(), OutputFormat::Latex);
        assert_eq!(OutputFormat::infer(Path::new("dir/out.latex")).unwrap(), OutputFormat::Latex);
        assert!(matches!(
            OutputFormat::infer(Path::new("out.csv")),
            Err(Error::UnsupportedOutput(_))
        ));
        assert!(OutputFormat::infer(Path::new("out")).is_err());
    }

    #[test]
    fn test_box_stats_odd_count() {
        let stats = BoxStats::from_samples(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert!((stats.median - 3.0).abs() < f64::EPSILON);
        assert!((stats.lower_quartile - 2.0).abs() < f64::EPSILON);
        assert!((stats.upper_quartile - 4.0).abs() < f64::EPSILON);
        assert!((stats.lower_whisker - 1.0).abs() < f64::EPSILON);
        assert!((stats.upper_whisker - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_box_stats_outlier_outside_whisker() {
        let stats = BoxStats::from_samples(&[1.0, 1.0, 1.0, 1.0, 100.0]).unwrap();
        assert!((stats.upper_whisker - 1.0).abs() < f64::EPSILON);
        assert!(BoxStats::from_samples(&[]).is_none());
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_xml("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape_latex("max_iter 50%"), "max\\_iter 50\\%");
    }
}
