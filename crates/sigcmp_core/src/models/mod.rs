//! Shared data models for SigCmp.
//!
//! Enums selected through configuration and used across modules.

mod enums;

pub use enums::{CorrelationBackend, SectionStatistic};
