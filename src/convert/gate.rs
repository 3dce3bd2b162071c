//! Convertibility gate: one policy for every recoverable conversion failure.
//!
//! Both failure points, an undecodable report and a feature without a name,
//! produce a `Result`. The gate turns it into either the value, a skip
//! (`Ok(None)`), or a fatal error, depending on `fail_on_error`.

use crate::core::errors::{CrcError, Result};
use crate::report::source::SourceFeature;

/// Skip-or-abort policy, fixed for the duration of one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertibilityGate {
    fail_on_error: bool,
}

impl ConvertibilityGate {
    #[must_use]
    pub const fn new(fail_on_error: bool) -> Self {
        Self { fail_on_error }
    }

    #[must_use]
    pub const fn fails_on_error(&self) -> bool {
        self.fail_on_error
    }

    /// Let `attempt` through, or decide what its failure means.
    ///
    /// Non-recoverable errors always propagate. Recoverable ones propagate
    /// when failing on error, and become `Ok(None)` otherwise.
    pub fn admit<T>(&self, attempt: Result<T>) -> Result<Option<T>> {
        match attempt {
            Ok(value) => Ok(Some(value)),
            Err(err) if !err.is_recoverable() => Err(err),
            Err(err) if self.fail_on_error => {
                log::error!("{err}");
                Err(err)
            }
            Err(err) => {
                log::warn!("{err}. Ignoring error");
                Ok(None)
            }
        }
    }

    /// Whether `feature` can be converted; unnamed features are skipped or fatal.
    pub fn check_feature(&self, feature: &SourceFeature) -> Result<bool> {
        Ok(self.admit(validate_feature(feature))?.is_some())
    }
}

/// A feature is convertible iff its name is not blank.
pub fn validate_feature(feature: &SourceFeature) -> Result<()> {
    if feature.name.trim().is_empty() {
        return Err(CrcError::FeatureNameMissing);
    }
    Ok(())
}
