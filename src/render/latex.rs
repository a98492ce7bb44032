//! Standalone LaTeX output using pgfplots

use std::io::Write;

use super::{escape_latex, BoxPlot, BoxStats, Document, DocumentRenderer, LinePlot, Plot};
use crate::Result;

/// LaTeX renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct LatexRenderer;

impl LatexRenderer {
    fn line_plot(out: &mut dyn Write, plot: &LinePlot) -> Result<()> {
        writeln!(out, "\\begin{{figure}}[h]\n\\centering\n\\begin{{tikzpicture}}")?;
        writeln!(
            out,
            "\\begin{{axis}}[width=0.85\\textwidth, xlabel={{{}}}, ylabel={{{}}}, legend pos=outer north east, grid=major]",
            escape_latex(plot.x_label()),
            escape_latex(plot.y_label())
        )?;
        for series in plot.series() {
            write!(out, "\\addplot coordinates {{")?;
            for (x, y) in series.points() {
                write!(out, " ({x}, {y})")?;
            }
            writeln!(out, " }};")?;
            writeln!(out, "\\addlegendentry{{{}}}", escape_latex(&series.name))?;
        }
        writeln!(out, "\\end{{axis}}\n\\end{{tikzpicture}}")?;
        writeln!(
            out,
            "\\caption{{{}}}\n\\end{{figure}}\n",
            escape_latex(plot.title())
        )?;
        Ok(())
    }

    fn box_plot(out: &mut dyn Write, plot: &BoxPlot) -> Result<()> {
        let stats: Vec<(&str, BoxStats)> = plot
            .samples()
            .iter()
            .filter_map(|(tag, values)| BoxStats::from_samples(values).map(|s| (tag.as_str(), s)))
            .collect();
        if stats.is_empty() {
            writeln!(
                out,
                "\\begin{{figure}}[h]\n\\centering\n\\caption{{{} (no timing data)}}\n\\end{{figure}}\n",
                escape_latex(plot.title())
            )?;
            return Ok(());
        }
        let ticks: Vec<String> = (1..=stats.len()).map(|i| i.to_string()).collect();
        let labels: Vec<String> = stats.iter().map(|(tag, _)| escape_latex(tag)).collect();

        writeln!(out, "\\begin{{figure}}[h]\n\\centering\n\\begin{{tikzpicture}}")?;
        writeln!(
            out,
            "\\begin{{axis}}[width=0.85\\textwidth, ylabel={{{}}}, xtick={{{}}}, xticklabels={{{}}}]",
            escape_latex(plot.y_label()),
            ticks.join(","),
            labels.join(",")
        )?;
        for (_, s) in &stats {
            writeln!(
                out,
                "\\addplot+[boxplot prepared={{lower whisker={}, lower quartile={}, median={}, upper quartile={}, upper whisker={}}}] coordinates {{}};",
                s.lower_whisker, s.lower_quartile, s.median, s.upper_quartile, s.upper_whisker
            )?;
        }
        writeln!(out, "\\end{{axis}}\n\\end{{tikzpicture}}")?;
        writeln!(
            out,
            "\\caption{{{}}}\n\\end{{figure}}\n",
            escape_latex(plot.title())
        )?;
        Ok(())
    }
}

impl DocumentRenderer for LatexRenderer {
    fn render(&self, document: &Document, out: &mut dyn Write) -> Result<()> {
        writeln!(
            out,
            "\\documentclass{{article}}
\\usepackage[margin=2cm]{{geometry}}
\\usepackage{{pgfplots}}
\\usepgfplotslibrary{{statistics}}
\\pgfplotsset{{compat=1.16}}
\\title{{{}}}
\\date{{\\today}}
\\begin{{document}}
\\maketitle
",
            escape_latex(document.title())
        )?;
        for plot in document.plots() {
            match plot {
                Plot::Line(line) => Self::line_plot(out, line)?,
                Plot::Box(boxes) => Self::box_plot(out, boxes)?,
            }
        }
        writeln!(out, "\\end{{document}}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_latex_document_structure() {
        let mut line = LinePlot::new("max_iter, rotation error");
        line.set_axis_labels("Noise", "Error (rad)");
        line.add_series("10", vec![0.1], vec![0.0]);
        line.add_series("50", vec![0.1, 0.2], vec![0.5, 0.25]);

        let mut samples = BTreeMap::new();
        samples.insert("total".to_string(), vec![1.0, 1.0]);
        let mut boxes = BoxPlot::new("Timings");
        boxes.set_axis_label("Seconds");
        boxes.add_samples(samples);

        let mut doc = Document::new("FGR");
        doc.add_plot(Plot::Line(line));
        doc.add_plot(Plot::Box(boxes));

        let mut buf = Vec::new();
        LatexRenderer.render(&doc, &mut buf).unwrap();
        let tex = String::from_utf8(buf).unwrap();

        assert!(tex.starts_with("\\documentclass{article}"));
        assert!(tex.trim_end().ends_with("\\end{document}"));
        assert!(tex.contains("\\caption{max\\_iter, rotation error}"));
        assert_eq!(tex.matches("\\addplot coordinates").count(), 2);
        assert!(tex.contains(" (0.1, 0.5) (0.2, 0.25) };"));
        assert!(tex.contains("boxplot prepared={lower whisker=1, lower quartile=1, median=1"));
        assert!(tex.contains("xticklabels={total}"));
    }

    #[test]
    fn test_box_plot_without_samples_has_no_axis() {
        let mut doc = Document::new("all incomplete");
        doc.add_plot(Plot::Box(BoxPlot::new("Timings")));

        let mut buf = Vec::new();
        LatexRenderer.render(&doc, &mut buf).unwrap();
        let tex = String::from_utf8(buf).unwrap();

        assert!(tex.contains("\\caption{Timings (no timing data)}"));
        assert!(!tex.contains("\\begin{axis}"));
        assert!(!tex.contains("xticklabels"));
    }
}
