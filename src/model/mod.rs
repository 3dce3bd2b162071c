//! Run model: test-run → feature → scenario → step.
//!
//! Ownership flows strictly downward: a [`TestRun`] owns its features, a
//! feature owns its scenarios, a scenario owns its steps (hooks included).
//! Upward links are plain index handles ([`FeatureId`], [`ScenarioId`])
//! resolved through [`TestRun::feature`] and [`TestRun::scenario`].

pub mod feature;
pub mod run;
pub mod scenario;
pub mod step;

use serde::Serialize;

pub use feature::FeatureNode;
pub use run::TestRun;
pub use scenario::{ScenarioNode, ScenarioType, ScenarioVerdict};
pub use step::{Embedding, MatchArgument, StepMatch, StepNode, StepResult, StepSection};

/// Position of a feature in [`TestRun::features`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct FeatureId(pub usize);

/// Position of a scenario: its feature, then its index in
/// [`FeatureNode::scenarios`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ScenarioId {
    pub feature: FeatureId,
    pub index: usize,
}

impl ScenarioId {
    #[must_use]
    pub const fn new(feature: FeatureId, index: usize) -> Self {
        Self { feature, index }
    }
}
