//! Scenario nodes.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::model::step::{StepNode, StepResult};
use crate::model::{FeatureId, ScenarioId};

/// Scenario keyword kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioType {
    Scenario,
    ScenarioOutline,
}

impl ScenarioType {
    /// Classify a scenario keyword: exactly "scenario" (any case) is a plain
    /// scenario, everything else is an outline.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        if keyword.eq_ignore_ascii_case("scenario") {
            Self::Scenario
        } else {
            Self::ScenarioOutline
        }
    }

    /// Keyword text as written in feature files.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Scenario => "Scenario",
            Self::ScenarioOutline => "Scenario Outline",
        }
    }
}

/// Derived scenario outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScenarioVerdict {
    Passed,
    #[default]
    Failed,
}

/// A scenario with its background folded in and its hooks attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioNode {
    pub id: ScenarioId,
    pub start_timestamp: Option<NaiveDateTime>,
    /// `start_timestamp + total_duration`.
    pub end_timestamp: Option<NaiveDateTime>,
    pub name: String,
    pub scenario_type: ScenarioType,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub line: u32,
    pub verdict: ScenarioVerdict,
    pub before_steps: Vec<StepNode>,
    pub background_steps: Vec<StepNode>,
    pub scenario_steps: Vec<StepNode>,
    pub after_steps: Vec<StepNode>,
    pub before_steps_duration: u64,
    pub background_steps_duration: u64,
    pub scenario_steps_duration: u64,
    pub after_steps_duration: u64,
    pub total_duration: u64,
    /// Direct steps of all four sections, counted per result.
    pub step_result_counter: BTreeMap<StepResult, u32>,
}

impl ScenarioNode {
    /// Owning feature.
    #[must_use]
    pub const fn feature(&self) -> FeatureId {
        self.id.feature
    }

    #[must_use]
    pub fn has_before_steps(&self) -> bool {
        !self.before_steps.is_empty()
    }

    #[must_use]
    pub fn has_after_steps(&self) -> bool {
        !self.after_steps.is_empty()
    }

    #[must_use]
    pub fn has_background(&self) -> bool {
        !self.background_steps.is_empty()
    }

    #[must_use]
    pub fn is_outline(&self) -> bool {
        self.scenario_type == ScenarioType::ScenarioOutline
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.verdict == ScenarioVerdict::Passed
    }

    /// Direct steps of the four sections: before, background, body, after.
    /// Nested step hooks are not included.
    pub fn all_steps(&self) -> impl Iterator<Item = &StepNode> {
        self.before_steps
            .iter()
            .chain(&self.background_steps)
            .chain(&self.scenario_steps)
            .chain(&self.after_steps)
    }

    /// Number of direct steps with the given result.
    #[must_use]
    pub fn step_count(&self, result: StepResult) -> u32 {
        self.step_result_counter.get(&result).copied().unwrap_or(0)
    }
}
