//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::comparison::{DEFAULT_ACCURACY_THRESHOLD, DEFAULT_FFT_THRESHOLD};
use crate::logging::LogLevel;
use crate::models::{CorrelationBackend, SectionStatistic};

use super::manager::{ConfigError, ConfigResult};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Delay estimation and metric settings.
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Section-wise aggregation settings.
    #[serde(default)]
    pub sections: SectionSettings,
}

impl Settings {
    /// Reject values no computation can run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sections.window == 0 {
            return Err(ConfigError::Invalid(
                "sections.window must be greater than zero".to_string(),
            ));
        }

        let threshold = self.analysis.accuracy_threshold;
        if threshold.is_nan() || threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "analysis.accuracy_threshold must be >= 0, got {}",
                threshold
            )));
        }

        if self.analysis.fft_threshold == 0 {
            return Err(ConfigError::Invalid(
                "analysis.fft_threshold must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level written to log sinks.
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact log format.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of recent lines kept for the error tail.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Prefix lines with a timestamp.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            show_timestamps: true,
        }
    }
}

/// Delay estimation and metric settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Literal sample values treated as missing (sensor error codes).
    #[serde(default)]
    pub invalid_values: Vec<f64>,

    /// How the cross-correlation is computed.
    #[serde(default)]
    pub correlation_backend: CorrelationBackend,

    /// `len(meas) * len(ref)` above which the auto backend uses FFT.
    #[serde(default = "default_fft_threshold")]
    pub fft_threshold: usize,

    /// Absolute-error threshold for accuracy.
    #[serde(default = "default_accuracy_threshold")]
    pub accuracy_threshold: f64,
}

fn default_fft_threshold() -> usize {
    DEFAULT_FFT_THRESHOLD
}

fn default_accuracy_threshold() -> f64 {
    DEFAULT_ACCURACY_THRESHOLD
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            invalid_values: Vec::new(),
            correlation_backend: CorrelationBackend::default(),
            fft_threshold: default_fft_threshold(),
            accuracy_threshold: default_accuracy_threshold(),
        }
    }
}

/// Section-wise aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSettings {
    /// Samples per window.
    #[serde(default = "default_window")]
    pub window: usize,

    /// Samples skipped before the first window.
    #[serde(default)]
    pub offset: usize,

    /// Statistic reduced per window.
    #[serde(default)]
    pub statistic: SectionStatistic,
}

fn default_window() -> usize {
    10
}

impl Default for SectionSettings {
    fn default() -> Self {
        Self {
            window: default_window(),
            offset: 0,
            statistic: SectionStatistic::default(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Logging,
    Analysis,
    Sections,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 3] = [
        ConfigSection::Logging,
        ConfigSection::Analysis,
        ConfigSection::Sections,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Logging => "logging",
            ConfigSection::Analysis => "analysis",
            ConfigSection::Sections => "sections",
        }
    }

    /// Comment line written above the table.
    pub(crate) fn description(&self) -> &'static str {
        match self {
            ConfigSection::Logging => "Logging configuration",
            ConfigSection::Analysis => "Delay estimation and comparison metrics",
            ConfigSection::Sections => "Section-wise aggregation",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[logging]"));
        assert!(toml.contains("[analysis]"));
        assert!(toml.contains("[sections]"));
        assert!(toml.contains("correlation_backend = \"auto\""));
    }

    #[test]
    fn settings_round_trip() {
        let mut settings = Settings::default();
        settings.analysis.invalid_values = vec![-999.0, 9999.0];
        settings.sections.statistic = SectionStatistic::StdDev;

        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[analysis]\ninvalid_values = [-1.0]";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        // Custom value preserved
        assert_eq!(parsed.analysis.invalid_values, vec![-1.0]);
        // Defaults applied for missing
        assert_eq!(parsed.analysis.fft_threshold, DEFAULT_FFT_THRESHOLD);
        assert!(parsed.logging.compact);
        assert_eq!(parsed.sections.window, 10);
    }

    #[test]
    fn enums_parse_from_toml() {
        let content =
            "[analysis]\ncorrelation_backend = \"fft\"\n\n[sections]\nstatistic = \"std_dev\"";
        let parsed: Settings = toml::from_str(content).unwrap();
        assert_eq!(parsed.analysis.correlation_backend, CorrelationBackend::Fft);
        assert_eq!(parsed.sections.statistic, SectionStatistic::StdDev);
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.sections.window = 0;
        assert!(matches!(settings.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_negative_threshold() {
        let mut settings = Settings::default();
        settings.analysis.accuracy_threshold = -0.5;
        assert!(settings.validate().is_err());

        settings.analysis.accuracy_threshold = f64::NAN;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn section_names_match_tables() {
        let names: Vec<_> = ConfigSection::ALL.iter().map(|s| s.table_name()).collect();
        assert_eq!(names, vec!["logging", "analysis", "sections"]);
    }
}
