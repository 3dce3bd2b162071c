//! Feature aggregation: one report feature into the run being built.

use crate::convert::gate::ConvertibilityGate;
use crate::convert::scenario::reconstruct_scenario;
use crate::core::config::ConverterConfig;
use crate::core::errors::Result;
use crate::model::feature::FeatureNode;
use crate::model::run::TestRun;
use crate::model::FeatureId;
use crate::report::source::SourceFeature;

/// How report features land in the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPolicy {
    pub gate: ConvertibilityGate,
    pub merge_features: bool,
}

impl ConversionPolicy {
    /// Snapshot of the converter settings, taken once per conversion.
    #[must_use]
    pub const fn from_config(config: &ConverterConfig) -> Self {
        Self {
            gate: ConvertibilityGate::new(config.fail_on_error),
            merge_features: config.merge_features,
        }
    }
}

/// Add every scenario of `source` to `run`.
///
/// An unconvertible feature is rejected before the run is touched, so a
/// failure never leaves a half-merged feature behind. Returns the feature the
/// scenarios went to, or `None` when the feature was skipped.
pub fn aggregate_feature(
    source: &SourceFeature,
    run: &mut TestRun,
    policy: &ConversionPolicy,
) -> Result<Option<FeatureId>> {
    if !policy.gate.check_feature(source)? {
        log::debug!("Cannot convert feature. Skipping...");
        return Ok(None);
    }

    let id = resolve_feature(source, run, policy.merge_features);
    let feature = &mut run.features[id.0];

    let elements = &source.elements;
    let mut cursor = 0;
    while cursor < elements.len() {
        let reconstruction = reconstruct_scenario(elements, cursor, feature.next_scenario_id());
        cursor += reconstruction.consumed;
        if let Some(scenario) = reconstruction.scenario {
            feature.add_scenario(scenario);
        }
    }
    feature.recount_step_results();

    Ok(Some(id))
}

/// Existing same-named feature when merging, otherwise a new one. The
/// returned id always indexes `run.features`.
fn resolve_feature(source: &SourceFeature, run: &mut TestRun, merge_features: bool) -> FeatureId {
    if merge_features {
        if let Some(existing) = run.find_feature(&source.name) {
            log::debug!("Merging feature {:?} into an existing one", source.name);
            return existing;
        }
    }
    let id = run.next_feature_id();
    run.features.push(FeatureNode::from_source(id, source));
    id
}
