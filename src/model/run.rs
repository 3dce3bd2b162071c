//! The test-run root.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::feature::FeatureNode;
use crate::model::scenario::ScenarioNode;
use crate::model::step::StepNode;
use crate::model::{FeatureId, ScenarioId};

/// All converted features, in order of first appearance across the reports.
///
/// Only a start time is derived; there is no run-level end time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestRun {
    pub start_time: Option<NaiveDateTime>,
    pub features: Vec<FeatureNode>,
}

impl TestRun {
    /// Set `start_time` to the earliest scenario start over all features.
    /// Left unset when no scenario carries a start timestamp.
    pub fn calculate_start_time(&mut self) {
        self.start_time = self
            .features
            .iter()
            .filter_map(FeatureNode::scenario_min_start_time)
            .min();
    }

    /// Handle the next pushed feature will get.
    #[must_use]
    pub fn next_feature_id(&self) -> FeatureId {
        FeatureId(self.features.len())
    }

    /// First feature with exactly this name.
    #[must_use]
    pub fn find_feature(&self, name: &str) -> Option<FeatureId> {
        self.features
            .iter()
            .position(|feature| feature.name == name)
            .map(FeatureId)
    }

    #[must_use]
    pub fn feature(&self, id: FeatureId) -> Option<&FeatureNode> {
        self.features.get(id.0)
    }

    pub fn feature_mut(&mut self, id: FeatureId) -> Option<&mut FeatureNode> {
        self.features.get_mut(id.0)
    }

    #[must_use]
    pub fn scenario(&self, id: ScenarioId) -> Option<&ScenarioNode> {
        self.feature(id.feature)?.scenarios.get(id.index)
    }

    /// Feature owning `scenario`.
    #[must_use]
    pub fn feature_of(&self, scenario: &ScenarioNode) -> Option<&FeatureNode> {
        self.feature(scenario.feature())
    }

    /// Scenario owning `step`.
    #[must_use]
    pub fn scenario_of(&self, step: &StepNode) -> Option<&ScenarioNode> {
        self.scenario(step.scenario)
    }

    #[must_use]
    pub fn num_of_scenarios(&self) -> usize {
        self.features.iter().map(FeatureNode::num_of_scenarios).sum()
    }

    #[must_use]
    pub fn num_of_passed_scenarios(&self) -> u32 {
        self.features.iter().map(|f| f.num_of_passed_scenarios).sum()
    }

    #[must_use]
    pub fn num_of_failed_scenarios(&self) -> u32 {
        self.features.iter().map(|f| f.num_of_failed_scenarios).sum()
    }

    /// Nanoseconds, sum of the features' total durations, saturating.
    #[must_use]
    pub fn total_duration(&self) -> u64 {
        self.features
            .iter()
            .map(|f| f.total_duration)
            .fold(0, u64::saturating_add)
    }
}
