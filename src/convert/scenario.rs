//! Scenario reconstruction from a feature's flat element list.
//!
//! Reports list a background as its own element directly before the
//! scenario it belongs to. Reconstruction walks the list with a cursor: a
//! background at the cursor is paired with the element after it, and both
//! are consumed together.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::convert::step::reconstruct_steps;
use crate::model::scenario::{ScenarioNode, ScenarioType, ScenarioVerdict};
use crate::model::step::{StepNode, StepResult, StepSection};
use crate::model::ScenarioId;
use crate::report::source::SourceElement;

/// Outcome of one reconstruction step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    /// `None` only for a background with nothing after it.
    pub scenario: Option<ScenarioNode>,
    /// Elements consumed: 1, or 2 when a background was paired.
    pub consumed: usize,
}

/// Build the scenario starting at `cursor` of `elements`, with handle `id`.
///
/// `cursor` must be in bounds.
#[must_use]
pub fn reconstruct_scenario(
    elements: &[SourceElement],
    cursor: usize,
    id: ScenarioId,
) -> Reconstruction {
    let current = &elements[cursor];
    if !current.is_background() {
        return Reconstruction {
            scenario: Some(build_scenario(None, current, id)),
            consumed: 1,
        };
    }

    match elements.get(cursor + 1) {
        Some(scenario) => Reconstruction {
            scenario: Some(build_scenario(Some(current), scenario, id)),
            consumed: 2,
        },
        None => {
            log::warn!(
                "Background {:?} at line {} is not followed by a scenario. Skipping...",
                current.name,
                current.line
            );
            Reconstruction {
                scenario: None,
                consumed: 1,
            }
        }
    }
}

/// Build one scenario from its element and optional background element.
#[must_use]
pub fn build_scenario(
    background: Option<&SourceElement>,
    element: &SourceElement,
    id: ScenarioId,
) -> ScenarioNode {
    let before_steps = reconstruct_steps(&element.before, StepSection::BeforeScenario, id);
    let background_steps = background.map_or_else(Vec::new, |bg| {
        reconstruct_steps(&bg.steps, StepSection::Background, id)
    });
    let scenario_steps = reconstruct_steps(&element.steps, StepSection::Scenario, id);
    let after_steps = reconstruct_steps(&element.after, StepSection::AfterScenario, id);

    let before_steps_duration = section_duration(&before_steps);
    let background_steps_duration = section_duration(&background_steps);
    let scenario_steps_duration = section_duration(&scenario_steps);
    let after_steps_duration = section_duration(&after_steps);
    let total_duration = before_steps_duration
        .saturating_add(background_steps_duration)
        .saturating_add(scenario_steps_duration)
        .saturating_add(after_steps_duration);

    let passed = [&before_steps, &background_steps, &scenario_steps, &after_steps]
        .into_iter()
        .all(|section| section_passed(section));
    let verdict = if passed {
        ScenarioVerdict::Passed
    } else {
        ScenarioVerdict::Failed
    };

    let step_result_counter = count_step_results(
        before_steps
            .iter()
            .chain(&background_steps)
            .chain(&scenario_steps)
            .chain(&after_steps),
    );

    let start_timestamp = element.start_timestamp;
    let end_timestamp =
        start_timestamp.and_then(|start| start.checked_add_signed(nanos(total_duration)));

    ScenarioNode {
        id,
        start_timestamp,
        end_timestamp,
        name: element.name.clone(),
        scenario_type: ScenarioType::from_keyword(&element.keyword),
        description: element.description.clone(),
        tags: element.tags.iter().map(|tag| tag.name.clone()).collect(),
        line: element.line,
        verdict,
        before_steps,
        background_steps,
        scenario_steps,
        after_steps,
        before_steps_duration,
        background_steps_duration,
        scenario_steps_duration,
        after_steps_duration,
        total_duration,
        step_result_counter,
    }
}

/// Sum of the direct steps' durations; nested step hooks do not count.
/// Saturates at `u64::MAX`.
fn section_duration(steps: &[StepNode]) -> u64 {
    steps
        .iter()
        .map(|step| step.duration)
        .fold(0, u64::saturating_add)
}

/// Every direct step passed; nested step hooks do not count.
fn section_passed(steps: &[StepNode]) -> bool {
    steps.iter().all(StepNode::is_passed)
}

fn count_step_results<'a>(
    steps: impl Iterator<Item = &'a StepNode>,
) -> BTreeMap<StepResult, u32> {
    let mut counter = BTreeMap::new();
    for step in steps {
        *counter.entry(step.result).or_insert(0) += 1;
    }
    counter
}

fn nanos(total: u64) -> Duration {
    Duration::nanoseconds(i64::try_from(total).unwrap_or(i64::MAX))
}
