//! Step reconstruction: one report step, hooks included, into a [`StepNode`].

use crate::model::step::{Embedding, MatchArgument, StepMatch, StepNode, StepResult, StepSection};
use crate::model::ScenarioId;
use crate::report::source::{SourceEmbedding, SourceStep, SourceStepMatch};

/// Convert `source` into a step of `section` owned by `scenario`.
///
/// Nested before/after hooks are converted recursively and always tagged
/// [`StepSection::BeforeStep`] / [`StepSection::AfterStep`], whatever the
/// enclosing section. A missing result leaves the step
/// [`StepResult::UnknownResult`] with zero duration; a negative duration
/// counts as zero.
#[must_use]
pub fn reconstruct_step(
    source: &SourceStep,
    section: StepSection,
    scenario: ScenarioId,
) -> StepNode {
    let (result, duration, error_message) = source.result.as_ref().map_or(
        (StepResult::UnknownResult, 0, None),
        |r| {
            (
                StepResult::from_text(&r.status),
                u64::try_from(r.duration).unwrap_or(0),
                r.error_message.clone(),
            )
        },
    );

    StepNode {
        scenario,
        section,
        keyword: source.keyword.clone(),
        name: source.name.clone(),
        line: source.line,
        result,
        duration,
        error_message,
        step_match: source.step_match.as_ref().map(convert_match),
        embeddings: source
            .embeddings
            .iter()
            .flatten()
            .map(convert_embedding)
            .collect(),
        table_data: source.rows.iter().map(|row| row.cells.clone()).collect(),
        doc_string: source.doc_string.as_ref().map(|doc| doc.value.clone()),
        before_steps: reconstruct_steps(&source.before, StepSection::BeforeStep, scenario),
        after_steps: reconstruct_steps(&source.after, StepSection::AfterStep, scenario),
    }
}

/// Convert every step of `steps`, in order.
#[must_use]
pub fn reconstruct_steps(
    steps: &[SourceStep],
    section: StepSection,
    scenario: ScenarioId,
) -> Vec<StepNode> {
    steps
        .iter()
        .map(|step| reconstruct_step(step, section, scenario))
        .collect()
}

fn convert_match(source: &SourceStepMatch) -> StepMatch {
    StepMatch {
        location: source.location.clone(),
        arguments: source
            .arguments
            .iter()
            .map(|arg| MatchArgument {
                val: arg.val.clone(),
                offset: arg.offset,
            })
            .collect(),
    }
}

fn convert_embedding(source: &SourceEmbedding) -> Embedding {
    Embedding {
        data: source.data.clone(),
        mime_type: source.mime_type.clone(),
        name: source.name.clone(),
    }
}
