//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use cuke_report_converter::prelude::*;
//! ```

// Core
pub use crate::core::config::{Config, ConfigOverrides, ConverterConfig};
pub use crate::core::errors::{CrcError, Result};

// Report
pub use crate::report::reader::{ReportReader, ReportSource, decode_report};
pub use crate::report::source::SourceFeature;

// Model
pub use crate::model::{
    Embedding, FeatureId, FeatureNode, ScenarioId, ScenarioNode, ScenarioType, ScenarioVerdict,
    StepNode, StepResult, StepSection, TestRun,
};

// Convert
pub use crate::convert::{ConversionPolicy, Converter, ConvertibilityGate};
