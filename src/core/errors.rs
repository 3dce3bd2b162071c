//! CRC-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, CrcError>;

/// Message carried by [`CrcError::FeatureNameMissing`]. Callers match on it.
pub const FEATURE_NAME_MISSING: &str = "Failed to convert feature. Name is not present";

/// Top-level error type for the cucumber report converter.
#[derive(Debug, Error)]
pub enum CrcError {
    #[error("[CRC-1001] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[CRC-1002] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[CRC-2001] Failed to process json file: {report}: {details}")]
    ReportDecode { report: String, details: String },

    #[error("[CRC-2002] {}", FEATURE_NAME_MISSING)]
    FeatureNameMissing,

    #[error("[CRC-2003] embedding {name:?} has an undecodable payload: {details}")]
    EmbeddingDecode { name: String, details: String },

    #[error("[CRC-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[CRC-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CrcError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingConfig { .. } => "CRC-1001",
            Self::ConfigParse { .. } => "CRC-1002",
            Self::ReportDecode { .. } => "CRC-2001",
            Self::FeatureNameMissing => "CRC-2002",
            Self::EmbeddingDecode { .. } => "CRC-2003",
            Self::Serialization { .. } => "CRC-2101",
            Self::Io { .. } => "CRC-3002",
        }
    }

    /// Whether the convertibility gate may skip the failing unit instead of
    /// aborting the run.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReportDecode { .. } | Self::FeatureNameMissing)
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convenience constructor for a report that could not be decoded.
    #[must_use]
    pub fn report_decode(report: impl Into<String>, details: impl ToString) -> Self {
        Self::ReportDecode {
            report: report.into(),
            details: details.to_string(),
        }
    }
}

impl From<serde_json::Error> for CrcError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for CrcError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CrcError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}
