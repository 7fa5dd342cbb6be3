//! Comparator - configured entry point that reports through a log sink.

use super::align::align_with;
use super::correlation::{cross_correlate, prepare};
use super::delay::estimate_delay;
use super::metrics::compare_with;
use super::types::{AlignedPair, ComparisonConfig, ComparisonReport, DelayEstimate};
use crate::config::Settings;
use crate::logging::{LogConfig, LogSink};
use crate::models::SectionStatistic;
use crate::sections::{calc_section_statistic, SectionWindow};
use crate::signal::{interpolate_invalid, SignalInput, SignalResult};

/// Runs comparisons with a fixed configuration.
///
/// Holds the comparison settings and an injected [`LogSink`]; every
/// operation logs its phase and result there. The free functions in this
/// module give the same numbers without the sink.
#[derive(Debug)]
pub struct Comparator {
    config: ComparisonConfig,
    window: SectionWindow,
    statistic: SectionStatistic,
    log: LogSink,
}

impl Comparator {
    /// Create a comparator with a disabled log sink.
    pub fn new(config: ComparisonConfig) -> Self {
        Self {
            config,
            window: SectionWindow::new(1, 0),
            statistic: SectionStatistic::default(),
            log: LogSink::disabled(),
        }
    }

    /// Create a comparator from settings.
    ///
    /// The sink is configured from `[logging]` but has no outputs; attach
    /// one with [`Comparator::with_log_sink`].
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            config: ComparisonConfig::from(&settings.analysis),
            window: SectionWindow::new(settings.sections.window, settings.sections.offset),
            statistic: settings.sections.statistic,
            log: LogSink::new("sigcmp", LogConfig::from(&settings.logging)),
        }
    }

    /// Set the log sink.
    pub fn with_log_sink(mut self, log: LogSink) -> Self {
        self.log = log;
        self
    }

    /// Set the default section window and statistic.
    pub fn with_sections(mut self, window: SectionWindow, statistic: SectionStatistic) -> Self {
        self.window = window;
        self.statistic = statistic;
        self
    }

    /// Get the comparison configuration.
    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// Get the log sink.
    pub fn log_sink(&self) -> &LogSink {
        &self.log
    }

    /// Interpolate invalid values of one signal.
    pub fn interpolate(&self, input: impl Into<SignalInput>) -> SignalResult<Vec<f64>> {
        let input = input.into();
        let filled = self.logged(interpolate_invalid(input, &self.config.invalid_values))?;
        self.log.detail(&format!("interpolated length: {}", filled.len()));
        Ok(filled)
    }

    /// Full cross-correlation of the mean-centred signals.
    pub fn calc_corrfunc(
        &self,
        meas: impl Into<SignalInput>,
        reference: impl Into<SignalInput>,
    ) -> SignalResult<Vec<f64>> {
        let (meas, reference) = self.logged(prepare(meas.into(), reference.into(), &self.config))?;
        self.log.detail(&format!(
            "correlating meas ({} samples) with ref ({} samples), fft: {}",
            meas.len(),
            reference.len(),
            self.config.use_fft(meas.len(), reference.len())
        ));
        Ok(cross_correlate(&meas, &reference, &self.config))
    }

    /// Estimate the delay of `meas` relative to `reference`.
    pub fn calc_delay(
        &self,
        meas: impl Into<SignalInput>,
        reference: impl Into<SignalInput>,
    ) -> SignalResult<DelayEstimate> {
        self.log.phase("Delay estimation");
        let estimate = self.logged(estimate_delay(meas.into(), reference.into(), &self.config))?;
        self.log.detail(&format!(
            "meas: {} samples, ref: {} samples, peak: {:.6}",
            estimate.meas_len, estimate.ref_len, estimate.peak
        ));
        self.log.result(&format!("delay = {} samples", estimate.delay));
        Ok(estimate)
    }

    /// Align `meas` onto `reference`, estimating the delay when `None`.
    pub fn align(
        &self,
        meas: impl Into<SignalInput>,
        reference: impl Into<SignalInput>,
        delay: Option<i64>,
    ) -> SignalResult<AlignedPair> {
        self.log.phase("Alignment");
        let (pair, estimate) =
            self.logged(align_with(meas.into(), reference.into(), &self.config, delay))?;
        if estimate.is_some() {
            self.log.result(&format!("estimated delay = {} samples", pair.delay));
        }
        self.log.detail(&format!(
            "aligned length: {}, complete pairs: {}",
            pair.len(),
            pair.complete_pairs().len()
        ));
        Ok(pair)
    }

    /// Align once and compute every metric.
    pub fn compare(
        &self,
        meas: impl Into<SignalInput>,
        reference: impl Into<SignalInput>,
        delay: Option<i64>,
    ) -> SignalResult<ComparisonReport> {
        self.log.phase("Comparison");
        let report = self.logged(compare_with(meas.into(), reference.into(), &self.config, delay))?;

        self.log.result(&format!(
            "delay = {} ({}), overlap = {}/{}",
            report.delay,
            if report.delay_estimated { "estimated" } else { "supplied" },
            report.overlap,
            report.aligned_len
        ));
        if report.corrcoef.is_nan() {
            self.log.warn("correlation coefficient undefined for constant data");
        }
        self.log.result(&format!(
            "r = {:.4}, ME = {:.4}, MAE = {:.4}, RMSE = {:.4}, accuracy(<= {}) = {:.3}",
            report.corrcoef,
            report.mean_error,
            report.mean_abs_error,
            report.root_mean_sq_error,
            report.threshold,
            report.accuracy
        ));
        self.log.success("Comparison finished");
        Ok(report)
    }

    /// Section statistic with an explicit window.
    pub fn sections(
        &self,
        input: impl Into<SignalInput>,
        window: SectionWindow,
        statistic: SectionStatistic,
    ) -> SignalResult<Vec<f64>> {
        self.log.section(&format!("Sections ({})", statistic));
        let values = self.logged(calc_section_statistic(input, window, statistic))?;
        self.log.detail(&format!(
            "window: {}, offset: {}, sections: {}",
            window.window,
            window.offset,
            values.len()
        ));
        Ok(values)
    }

    /// Section statistic with the configured window and statistic.
    pub fn configured_sections(&self, input: impl Into<SignalInput>) -> SignalResult<Vec<f64>> {
        self.sections(input, self.window, self.statistic)
    }

    /// Report an error through the sink before returning it.
    fn logged<T>(&self, result: SignalResult<T>) -> SignalResult<T> {
        if let Err(ref e) = result {
            self.log.show_tail("comparison");
            self.log.error(&e.to_string());
        }
        result
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new(ComparisonConfig::default())
    }
}
