//! Property-based tests for the conversion laws.
//!
//! Arbitrary features (backgrounds, hooks, nested hooks, every step status,
//! missing results) are run through the converter and checked for duration
//! additivity, the verdict law, order preservation and counter re-summing.

use proptest::prelude::*;

use crate::convert::feature::{ConversionPolicy, aggregate_feature};
use crate::convert::gate::ConvertibilityGate;
use crate::convert::run::Converter;
use crate::model::run::TestRun;
use crate::model::scenario::ScenarioVerdict;
use crate::model::step::StepResult;
use crate::report::source::{SourceElement, SourceFeature, SourceStep, SourceStepResult};

// ──────────────────── strategies ────────────────────

fn arb_status() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        4 => Just(Some("passed".to_string())),
        1 => Just(Some("failed".to_string())),
        1 => Just(Some("skipped".to_string())),
        1 => Just(Some("pending".to_string())),
        1 => Just(Some("undefined".to_string())),
        1 => Just(Some("ambiguous".to_string())),
        1 => Just(None),
    ]
}

fn arb_leaf_step() -> impl Strategy<Value = SourceStep> {
    (arb_status(), 0i64..5_000_000).prop_map(|(status, duration)| SourceStep {
        keyword: "Given ".into(),
        result: status.map(|status| SourceStepResult {
            status,
            duration,
            error_message: None,
        }),
        ..SourceStep::default()
    })
}

fn arb_step() -> impl Strategy<Value = SourceStep> {
    (
        arb_leaf_step(),
        prop::collection::vec(arb_leaf_step(), 0..2),
        prop::collection::vec(arb_leaf_step(), 0..2),
    )
        .prop_map(|(mut step, before, after)| {
            step.before = before;
            step.after = after;
            step
        })
}

fn arb_steps(max: usize) -> impl Strategy<Value = Vec<SourceStep>> {
    prop::collection::vec(arb_step(), 0..max)
}

fn arb_scenario_element() -> impl Strategy<Value = SourceElement> {
    (arb_steps(2), arb_steps(5), arb_steps(2), "[a-z]{1,8}").prop_map(
        |(before, steps, after, name)| SourceElement {
            element_type: "scenario".into(),
            keyword: "Scenario".into(),
            name,
            before,
            steps,
            after,
            ..SourceElement::default()
        },
    )
}

fn arb_background_element() -> impl Strategy<Value = SourceElement> {
    arb_steps(3).prop_map(|steps| SourceElement {
        element_type: "background".into(),
        keyword: "Background".into(),
        steps,
        ..SourceElement::default()
    })
}

fn arb_elements() -> impl Strategy<Value = Vec<SourceElement>> {
    prop::collection::vec(
        prop_oneof![
            3 => arb_scenario_element(),
            1 => arb_background_element(),
        ],
        0..8,
    )
}

fn arb_feature() -> impl Strategy<Value = SourceFeature> {
    (prop_oneof![Just("Search"), Just("Cart"), Just("Login")], arb_elements()).prop_map(
        |(name, elements)| SourceFeature {
            name: name.into(),
            elements,
            ..SourceFeature::default()
        },
    )
}

fn step_passed(step: &SourceStep) -> bool {
    step.result
        .as_ref()
        .is_some_and(|r| StepResult::from_text(&r.status) == StepResult::Passed)
}

// ──────────────────── properties ────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Section durations add up to the scenario total; scenario totals add
    /// up to the feature total.
    #[test]
    fn durations_are_additive(features in prop::collection::vec(arb_feature(), 0..5)) {
        let run = Converter::default().convert_features(features).unwrap();
        for feature in &run.features {
            let mut sum = 0;
            for s in &feature.scenarios {
                prop_assert_eq!(
                    s.total_duration,
                    s.before_steps_duration
                        + s.background_steps_duration
                        + s.scenario_steps_duration
                        + s.after_steps_duration
                );
                let direct: u64 = s.all_steps().map(|step| step.duration).sum();
                prop_assert_eq!(s.total_duration, direct);
                sum += s.total_duration;
            }
            prop_assert_eq!(feature.total_duration, sum);
        }
    }

    /// A scenario passes iff every direct step of its four sections passed.
    #[test]
    fn verdict_is_conjunction_of_direct_steps(feature in arb_feature()) {
        let run = Converter::default().convert_features(vec![feature]).unwrap();
        for feature in &run.features {
            let mut passed = 0u32;
            for s in &feature.scenarios {
                let all_passed = s.all_steps().all(|step| step.result == StepResult::Passed);
                prop_assert_eq!(s.verdict == ScenarioVerdict::Passed, all_passed);
                if all_passed {
                    passed += 1;
                }
            }
            prop_assert_eq!(feature.num_of_passed_scenarios, passed);
            prop_assert_eq!(
                feature.num_of_failed_scenarios as usize,
                feature.scenarios.len() - passed as usize
            );
        }
    }

    /// Nested hook results never reach the verdict.
    #[test]
    fn nested_hooks_do_not_affect_verdict(element in arb_scenario_element()) {
        let expected = element
            .before
            .iter()
            .chain(&element.steps)
            .chain(&element.after)
            .all(step_passed);
        let feature = SourceFeature {
            name: "Hooks".into(),
            elements: vec![element],
            ..SourceFeature::default()
        };
        let run = Converter::default().convert_features(vec![feature]).unwrap();
        let scenario = &run.features[0].scenarios[0];
        prop_assert_eq!(scenario.is_success(), expected);
    }

    /// After any sequence of merges the feature counter is the plain sum of
    /// its scenarios' counters.
    #[test]
    fn counters_are_resummed_across_merges(features in prop::collection::vec(arb_feature(), 1..6)) {
        let policy = ConversionPolicy {
            gate: ConvertibilityGate::new(false),
            merge_features: true,
        };
        let mut run = TestRun::default();
        for feature in &features {
            aggregate_feature(feature, &mut run, &policy).unwrap();
            for f in &run.features {
                for result in StepResult::KNOWN.into_iter().chain([StepResult::UnknownResult]) {
                    let expected: u32 = f.scenarios.iter().map(|s| s.step_count(result)).sum();
                    prop_assert_eq!(f.step_count(result), expected);
                }
            }
        }
    }

    /// Scenarios keep source order; a background is folded into the element after it.
    #[test]
    fn scenarios_follow_source_order(feature in arb_feature()) {
        let elements = &feature.elements;
        let mut expected = Vec::new();
        let mut i = 0;
        while i < elements.len() {
            if !elements[i].is_background() {
                expected.push(elements[i].name.clone());
                i += 1;
            } else if let Some(paired) = elements.get(i + 1) {
                expected.push(paired.name.clone());
                i += 2;
            } else {
                i += 1;
            }
        }
        let run = Converter::default().convert_features(vec![feature]).unwrap();
        let names: Vec<String> = run.features[0].scenarios.iter().map(|s| s.name.clone()).collect();
        prop_assert_eq!(names, expected);
    }

    /// Same input, same output.
    #[test]
    fn conversion_is_deterministic(features in prop::collection::vec(arb_feature(), 0..4)) {
        let conv = Converter::default();
        let first = conv.convert_features(features.clone()).unwrap();
        let second = conv.convert_features(features).unwrap();
        prop_assert_eq!(first, second);
    }
}
