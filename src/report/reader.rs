//! Report decoding: files or in-memory JSON values into [`SourceFeature`]s.
//!
//! Every report is decoded independently and in caller order. A report that
//! cannot be read or does not have the report shape is a
//! [`CrcError::ReportDecode`], which the [`ConvertibilityGate`] either raises
//! or turns into "this report contributed no features".

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::convert::gate::ConvertibilityGate;
use crate::core::errors::{CrcError, Result};
use crate::report::source::SourceFeature;

/// One input report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSource {
    /// A JSON report file on disk.
    File(PathBuf),
    /// An already-parsed JSON document, identified by `label` in logs and errors.
    Value { label: String, value: Value },
}

impl ReportSource {
    /// Report backed by a file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Report backed by an in-memory JSON value.
    pub fn value(label: impl Into<String>, value: Value) -> Self {
        Self::Value {
            label: label.into(),
            value,
        }
    }

    /// Human-readable identifier of this report.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Value { label, .. } => f.write_str(label),
        }
    }
}

impl From<PathBuf> for ReportSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&Path> for ReportSource {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

/// Decode a single report. Fails with [`CrcError::ReportDecode`] naming the report.
pub fn decode_report(source: &ReportSource) -> Result<Vec<SourceFeature>> {
    match source {
        ReportSource::File(path) => {
            let raw = fs::read(path).map_err(|err| CrcError::report_decode(source.label(), err))?;
            serde_json::from_slice(&raw).map_err(|err| CrcError::report_decode(source.label(), err))
        }
        ReportSource::Value { value, .. } => Vec::<SourceFeature>::deserialize(value)
            .map_err(|err| CrcError::report_decode(source.label(), err)),
    }
}

/// Decodes an ordered list of reports through the convertibility gate.
#[derive(Debug, Clone, Copy)]
pub struct ReportReader {
    gate: ConvertibilityGate,
}

impl ReportReader {
    #[must_use]
    pub const fn new(gate: ConvertibilityGate) -> Self {
        Self { gate }
    }

    /// Decode every report in order and concatenate their features.
    ///
    /// With a failing gate the first undecodable report aborts; otherwise it
    /// is logged and contributes nothing.
    pub fn collect_features(&self, sources: &[ReportSource]) -> Result<Vec<SourceFeature>> {
        let mut features = Vec::new();
        for source in sources {
            log::info!("Processing json file: {source}");
            if let Some(decoded) = self.gate.admit(decode_report(source))? {
                features.extend(decoded);
            }
        }
        Ok(features)
    }
}
