//! Core enums used throughout the library.

use serde::{Deserialize, Serialize};

/// How the full cross-correlation is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationBackend {
    /// Direct sum for small inputs, FFT above the configured size threshold.
    #[default]
    Auto,
    /// Exact O(n*m) lag-by-lag sum.
    Direct,
    /// FFT-based correlation via the convolution theorem.
    Fft,
}

impl std::fmt::Display for CorrelationBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationBackend::Auto => write!(f, "auto"),
            CorrelationBackend::Direct => write!(f, "direct"),
            CorrelationBackend::Fft => write!(f, "fft"),
        }
    }
}

/// Statistic used to reduce each window in section-wise aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatistic {
    /// Arithmetic mean of the non-missing samples.
    #[default]
    Mean,
    /// Population standard deviation of the non-missing samples.
    StdDev,
    /// Most frequent non-missing sample (smallest value on ties).
    Mode,
}

impl std::fmt::Display for SectionStatistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionStatistic::Mean => write!(f, "mean"),
            SectionStatistic::StdDev => write!(f, "std_dev"),
            SectionStatistic::Mode => write!(f, "mode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_serializes_lowercase() {
        let json = serde_json::to_string(&CorrelationBackend::Fft).unwrap();
        assert_eq!(json, "\"fft\"");
    }

    #[test]
    fn statistic_round_trips_through_json() {
        let json = serde_json::to_string(&SectionStatistic::StdDev).unwrap();
        assert_eq!(json, "\"std_dev\"");
        let parsed: SectionStatistic = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SectionStatistic::StdDev);
    }

    #[test]
    fn display_matches_config_names() {
        assert_eq!(CorrelationBackend::Auto.to_string(), "auto");
        assert_eq!(SectionStatistic::Mode.to_string(), "mode");
    }
}
