//! Run aggregation and the crate's conversion entry point.

use std::path::PathBuf;

use crate::convert::feature::{ConversionPolicy, aggregate_feature};
use crate::core::config::Config;
use crate::core::errors::Result;
use crate::model::run::TestRun;
use crate::report::reader::{ReportReader, ReportSource};
use crate::report::source::SourceFeature;

/// Converts cucumber JSON reports into a [`TestRun`].
///
/// The policy flags are snapshotted from the config at the start of every
/// conversion call and stay fixed until it returns.
#[derive(Debug, Clone)]
pub struct Converter {
    config: Config,
}

impl Converter {
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Decode every report in order and convert the features they hold.
    pub fn convert_reports(&self, sources: &[ReportSource]) -> Result<TestRun> {
        let policy = self.policy();
        let features = ReportReader::new(policy.gate).collect_features(sources)?;
        self.convert_with(&features, &policy)
    }

    /// [`Self::convert_reports`] over report files.
    pub fn convert_files(&self, paths: &[PathBuf]) -> Result<TestRun> {
        let sources: Vec<ReportSource> = paths.iter().cloned().map(ReportSource::from).collect();
        self.convert_reports(&sources)
    }

    /// Decode reports without converting them.
    pub fn decode_reports(&self, sources: &[ReportSource]) -> Result<Vec<SourceFeature>> {
        ReportReader::new(self.policy().gate).collect_features(sources)
    }

    /// Convert already-decoded features, strictly in the given order.
    pub fn convert_features(&self, features: Vec<SourceFeature>) -> Result<TestRun> {
        let policy = self.policy();
        self.convert_with(&features, &policy)
    }

    fn policy(&self) -> ConversionPolicy {
        ConversionPolicy::from_config(&self.config.converter)
    }

    fn convert_with(&self, features: &[SourceFeature], policy: &ConversionPolicy) -> Result<TestRun> {
        let config_hash = self.config.stable_hash().unwrap_or_default();
        log::info!(
            "Starting transformation of features. Size: {} (config {config_hash})",
            features.len()
        );

        let mut run = TestRun::default();
        for feature in features {
            aggregate_feature(feature, &mut run, policy)?;
        }
        run.calculate_start_time();

        log::debug!("Total features: {}", run.features.len());
        Ok(run)
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConverterConfig;
    use crate::core::errors::FEATURE_NAME_MISSING;
    use chrono::NaiveDate;
    use serde_json::{Value, json};

    fn converter(fail_on_error: bool, merge_features: bool) -> Converter {
        Converter::new(Config {
            converter: ConverterConfig {
                fail_on_error,
                merge_features,
            },
            source_path: None,
        })
    }

    fn scenario(name: &str, start: &str, status: &str) -> Value {
        json!({
            "type": "scenario", "keyword": "Scenario", "name": name,
            "start_timestamp": start,
            "steps": [{"keyword": "Given ", "result": {"status": status, "duration": 1_000_000}}]
        })
    }

    fn report(features: Value) -> ReportSource {
        ReportSource::value("inline", features)
    }

    fn two_reports() -> Vec<ReportSource> {
        vec![
            report(json!([
                {"name": "Product Search", "elements": [
                    scenario("api", "2024-08-23T14:25:00.000Z", "passed")]},
                {"name": "Cart", "elements": [
                    scenario("add", "2024-08-23T14:24:54.383Z", "failed")]}
            ])),
            report(json!([
                {"name": "Product Search", "elements": [
                    scenario("ui-1", "2024-08-23T14:26:00.000Z", "passed"),
                    scenario("ui-2", "2024-08-23T14:27:00.000Z", "passed")]}
            ])),
        ]
    }

    #[test]
    fn conversion_is_deterministic() {
        let conv = Converter::default();
        let first = conv.convert_reports(&two_reports()).unwrap();
        let second = conv.convert_reports(&two_reports()).unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn merged_features_keep_first_appearance_order() {
        let run = converter(false, true).convert_reports(&two_reports()).unwrap();
        let names: Vec<&str> = run.features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Product Search", "Cart"]);
        let search: Vec<&str> = run.features[0]
            .scenarios
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(search, vec!["api", "ui-1", "ui-2"]);
        assert_eq!(run.num_of_scenarios(), 4);
        assert_eq!(run.num_of_passed_scenarios(), 3);
        assert_eq!(run.num_of_failed_scenarios(), 1);
    }

    #[test]
    fn unmerged_features_stay_separate() {
        let run = converter(false, false).convert_reports(&two_reports()).unwrap();
        let names: Vec<&str> = run.features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Product Search", "Cart", "Product Search"]);
        assert_eq!(run.total_duration(), 4_000_000);
    }

    #[test]
    fn start_time_is_earliest_scenario_start() {
        let run = Converter::default().convert_reports(&two_reports()).unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 8, 23)
            .unwrap()
            .and_hms_milli_opt(14, 24, 54, 383)
            .unwrap();
        assert_eq!(run.start_time, Some(expected));
    }

    #[test]
    fn blank_feature_is_skipped_or_fatal() {
        let sources = vec![report(json!([
            {"name": "Login", "elements": [scenario("ok", "2024-01-01T00:00:00.000Z", "passed")]},
            {"name": "", "elements": [scenario("lost", "2024-01-01T00:00:00.000Z", "passed")]},
            {"name": "Logout", "elements": []}
        ]))];

        let run = converter(false, true).convert_reports(&sources).unwrap();
        let names: Vec<&str> = run.features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Login", "Logout"]);

        let err = converter(true, true).convert_reports(&sources).unwrap_err();
        assert!(err.to_string().contains(FEATURE_NAME_MISSING));
    }

    #[test]
    fn undecodable_report_is_skipped_or_fatal() {
        let mut sources = two_reports();
        sources.insert(1, ReportSource::value("broken", json!({"not": "a list"})));

        let run = converter(false, true).convert_reports(&sources).unwrap();
        assert_eq!(run.features.len(), 2);

        let err = converter(true, true).convert_reports(&sources).unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn decoded_features_convert_like_reports() {
        let conv = Converter::default();
        let decoded = conv.decode_reports(&two_reports()).unwrap();
        assert_eq!(decoded.len(), 3);
        let via_features = conv.convert_features(decoded).unwrap();
        let via_reports = conv.convert_reports(&two_reports()).unwrap();
        assert_eq!(via_features, via_reports);
    }

    #[test]
    fn files_convert_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for (i, source) in two_reports().into_iter().enumerate() {
            let ReportSource::Value { value, .. } = source else {
                unreachable!()
            };
            let path = dir.path().join(format!("report-{i}.json"));
            std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
            paths.push(path);
        }

        let run = Converter::default().convert_files(&paths).unwrap();
        assert_eq!(run.features.len(), 2);
        assert_eq!(run.features[0].num_of_scenarios(), 3);
    }

    #[test]
    fn negative_step_duration_keeps_the_report() {
        let sources = vec![report(json!([
            {"name": "Clock skew", "elements": [{
                "type": "scenario", "keyword": "Scenario", "name": "rewound",
                "start_timestamp": "2024-08-23T14:24:54.383Z",
                "steps": [
                    {"keyword": "Given ", "result": {"status": "passed", "duration": -5}},
                    {"keyword": "Then ", "result": {"status": "passed", "duration": 7}}
                ]
            }]}
        ]))];

        let run = converter(true, true).convert_reports(&sources).unwrap();
        assert_eq!(run.features.len(), 1);
        let scenario = &run.features[0].scenarios[0];
        assert_eq!(scenario.scenario_steps[0].duration, 0);
        assert_eq!(scenario.total_duration, 7);
        assert!(scenario.is_success());
        assert_eq!(run.total_duration(), 7);
    }

    #[test]
    fn empty_input_yields_empty_run() {
        let run = Converter::default().convert_features(Vec::new()).unwrap();
        assert!(run.features.is_empty());
        assert!(run.start_time.is_none());
    }
}
