//! Configuration management for SigCmp.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Validation on load with automatic defaults
//!
//! # Example
//!
//! ```no_run
//! use sigcmp_core::comparison::Comparator;
//! use sigcmp_core::config::{ConfigManager, ConfigSection};
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new(".config/sigcmp.toml");
//! config.load_or_create().unwrap();
//!
//! // Build a comparator from the loaded settings
//! let comparator = Comparator::from_settings(config.settings());
//!
//! // Modify a setting and save just that section atomically
//! config.settings_mut().analysis.invalid_values = vec![-999.0];
//! config.update_section(ConfigSection::Analysis).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{AnalysisSettings, ConfigSection, LoggingSettings, SectionSettings, Settings};
