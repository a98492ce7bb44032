//! Sweep accumulators and their conversion into report plots

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pose::PoseError;
use crate::render::{BoxPlot, Document, LinePlot, Plot};

/// Errors of one tested value across the datasets that completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSeries {
    value: String,
    sigma: Vec<f64>,
    rotation: Vec<f64>,
    translation: Vec<f64>,
}

impl ValueSeries {
    /// Create an empty series for a tested value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            sigma: Vec::new(),
            rotation: Vec::new(),
            translation: Vec::new(),
        }
    }

    /// Append the error measured on a dataset.
    pub fn push(&mut self, sigma: f64, error: PoseError) {
        self.sigma.push(sigma);
        self.rotation.push(error.rotation);
        self.translation.push(error.translation);
    }

    /// Get the tested value (the series name).
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the X coordinates of the recorded points.
    #[must_use]
    pub fn sigma(&self) -> &[f64] {
        &self.sigma
    }

    /// Get the rotation errors, aligned with [`Self::sigma`].
    #[must_use]
    pub fn rotation(&self) -> &[f64] {
        &self.rotation
    }

    /// Get the translation errors, aligned with [`Self::sigma`].
    #[must_use]
    pub fn translation(&self) -> &[f64] {
        &self.translation
    }

    /// Number of recorded points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sigma.len()
    }

    /// Whether no dataset completed for this value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sigma.is_empty()
    }
}

/// All tested values of one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSeries {
    name: String,
    flag: String,
    values: Vec<ValueSeries>,
}

impl ParameterSeries {
    /// Create an empty series set for a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, flag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flag: flag.into(),
            values: Vec::new(),
        }
    }

    /// Append the finished series of one value.
    pub fn push(&mut self, series: ValueSeries) {
        self.values.push(series);
    }

    /// Get the parameter label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the parameter flag.
    #[must_use]
    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Get the per-value series in sweep order.
    #[must_use]
    pub fn values(&self) -> &[ValueSeries] {
        &self.values
    }

    /// Find the series of a tested value.
    #[must_use]
    pub fn value(&self, value: &str) -> Option<&ValueSeries> {
        self.values.iter().find(|v| v.value == value)
    }
}

/// Every duration reported under each timing tag, in invocation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingAggregate {
    samples: BTreeMap<String, Vec<f64>>,
}

impl TimingAggregate {
    /// Create an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one duration, creating the tag on first sight.
    pub fn record(&mut self, tag: &str, seconds: f64) {
        self.samples.entry(tag.to_string()).or_default().push(seconds);
    }

    /// Durations recorded for a tag.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&[f64]> {
        self.samples.get(tag).map(Vec::as_slice)
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All samples keyed by tag.
    #[must_use]
    pub const fn samples(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.samples
    }
}

/// Everything a sweep measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    dataset_variable: String,
    parameters: Vec<ParameterSeries>,
    timings: TimingAggregate,
}

impl SweepResult {
    /// Create an empty result; `dataset_variable` labels every X axis.
    #[must_use]
    pub fn new(dataset_variable: impl Into<String>) -> Self {
        Self {
            dataset_variable: dataset_variable.into(),
            parameters: Vec::new(),
            timings: TimingAggregate::new(),
        }
    }

    /// Append a finished parameter.
    pub fn push_parameter(&mut self, series: ParameterSeries) {
        self.parameters.push(series);
    }

    /// Mutable access to the timing aggregate.
    pub fn timings_mut(&mut self) -> &mut TimingAggregate {
        &mut self.timings
    }

    /// Get the X-axis label.
    #[must_use]
    pub fn dataset_variable(&self) -> &str {
        &self.dataset_variable
    }

    /// Get the swept parameters in sweep order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSeries] {
        &self.parameters
    }

    /// Find a swept parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterSeries> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Get the timing aggregate.
    #[must_use]
    pub const fn timings(&self) -> &TimingAggregate {
        &self.timings
    }

    /// Build the report document.
    ///
    /// Each parameter contributes a rotation-error plot followed by a
    /// translation-error plot; a timing box plot closes the document.
    #[must_use]
    pub fn to_document(&self, title: &str) -> Document {
        let mut doc = Document::new(title);
        for parameter in &self.parameters {
            let mut rotation = LinePlot::new(format!("{}, rotation error", parameter.name));
            rotation.set_axis_labels(&self.dataset_variable, "Error (rad)");
            let mut translation = LinePlot::new(format!("{}, translation error", parameter.name));
            translation.set_axis_labels(&self.dataset_variable, "Error");
            for series in &parameter.values {
                rotation.add_series(&series.value, series.sigma.clone(), series.rotation.clone());
                translation.add_series(
                    &series.value,
                    series.sigma.clone(),
                    series.translation.clone(),
                );
            }
            doc.add_plot(Plot::Line(rotation));
            doc.add_plot(Plot::Line(translation));
        }

        let mut timings = BoxPlot::new("Timings");
        timings.set_axis_label("Seconds");
        timings.add_samples(self.timings.samples.clone());
        doc.add_plot(Plot::Box(timings));
        doc
    }
}
