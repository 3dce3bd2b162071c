//! Feature nodes and their rolled-up counters.

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::scenario::{ScenarioNode, ScenarioVerdict};
use crate::model::step::StepResult;
use crate::model::{FeatureId, ScenarioId};
use crate::report::source::SourceFeature;

/// A feature and the scenarios of every report merged into it.
///
/// `scenario_min_start_time` and `scenario_max_end_time` are computed on first
/// call and cached. The caches are never invalidated: scenarios appended after
/// the first call do not move them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureNode {
    pub id: FeatureId,
    pub name: String,
    pub description: Option<String>,
    /// Feature file uri of the first report that declared this feature.
    pub code_ref: Option<String>,
    /// Tags declared on the feature, from the first report only.
    pub tags: Vec<String>,
    /// Union of the tags of every scenario added so far.
    pub total_tags: BTreeSet<String>,
    pub scenarios: Vec<ScenarioNode>,
    pub num_of_passed_scenarios: u32,
    pub num_of_failed_scenarios: u32,
    /// Sum of the scenarios' counters; see [`FeatureNode::recount_step_results`].
    pub step_result_counter: BTreeMap<StepResult, u32>,
    /// Nanoseconds, sum of the scenarios' total durations.
    pub total_duration: u64,
    #[serde(skip)]
    min_scenario_start_time: OnceCell<Option<NaiveDateTime>>,
    #[serde(skip)]
    max_scenario_end_time: OnceCell<Option<NaiveDateTime>>,
}

impl FeatureNode {
    /// Empty feature taking name, description, uri and tags from `source`.
    #[must_use]
    pub fn from_source(id: FeatureId, source: &SourceFeature) -> Self {
        Self {
            id,
            name: source.name.clone(),
            description: source.description.clone(),
            code_ref: source.uri.clone(),
            tags: source.tags.iter().map(|tag| tag.name.clone()).collect(),
            total_tags: BTreeSet::new(),
            scenarios: Vec::new(),
            num_of_passed_scenarios: 0,
            num_of_failed_scenarios: 0,
            step_result_counter: BTreeMap::new(),
            total_duration: 0,
            min_scenario_start_time: OnceCell::new(),
            max_scenario_end_time: OnceCell::new(),
        }
    }

    /// Handle the next appended scenario will get.
    #[must_use]
    pub fn next_scenario_id(&self) -> ScenarioId {
        ScenarioId::new(self.id, self.scenarios.len())
    }

    /// Append a scenario: count its verdict, absorb its tags, add its duration
    /// (saturating).
    pub fn add_scenario(&mut self, scenario: ScenarioNode) {
        match scenario.verdict {
            ScenarioVerdict::Passed => self.num_of_passed_scenarios += 1,
            ScenarioVerdict::Failed => self.num_of_failed_scenarios += 1,
        }
        self.total_tags.extend(scenario.tags.iter().cloned());
        self.total_duration = self.total_duration.saturating_add(scenario.total_duration);
        self.scenarios.push(scenario);
    }

    /// Re-derive [`Self::step_result_counter`] from scratch over every scenario.
    ///
    /// Runs once per merged report, so a feature merged from `n` reports pays
    /// `O(n * scenarios)` in total.
    pub fn recount_step_results(&mut self) {
        let mut counter = BTreeMap::new();
        for scenario in &self.scenarios {
            for (result, count) in &scenario.step_result_counter {
                *counter.entry(*result).or_insert(0) += count;
            }
        }
        self.step_result_counter = counter;
    }

    #[must_use]
    pub fn num_of_scenarios(&self) -> usize {
        self.scenarios.len()
    }

    /// Earliest scenario start; memoized on first call.
    pub fn scenario_min_start_time(&self) -> Option<NaiveDateTime> {
        *self.min_scenario_start_time.get_or_init(|| {
            self.scenarios
                .iter()
                .filter_map(|s| s.start_timestamp)
                .min()
        })
    }

    /// Latest scenario end; memoized on first call.
    pub fn scenario_max_end_time(&self) -> Option<NaiveDateTime> {
        *self.max_scenario_end_time.get_or_init(|| {
            self.scenarios
                .iter()
                .filter_map(|s| s.end_timestamp)
                .max()
        })
    }

    #[must_use]
    pub fn step_count(&self, result: StepResult) -> u32 {
        self.step_result_counter.get(&result).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_passed_steps(&self) -> u32 {
        self.step_count(StepResult::Passed)
    }

    #[must_use]
    pub fn total_failed_steps(&self) -> u32 {
        self.step_count(StepResult::Failed)
    }

    #[must_use]
    pub fn total_skipped_steps(&self) -> u32 {
        self.step_count(StepResult::Skipped)
    }

    #[must_use]
    pub fn total_pending_steps(&self) -> u32 {
        self.step_count(StepResult::Pending)
    }

    #[must_use]
    pub fn total_undefined_steps(&self) -> u32 {
        self.step_count(StepResult::Undefined)
    }
}
