//! End-to-end checks of directory validation through the library API.

mod common;

use std::fs;

use common::{Dataset, CLEAN_AUTHORITY, CLEAN_RECORD, SCENARIO_RECORD};
use recordcheck::data::reference::ReferenceData;
use recordcheck::validate::{
    validate_directory, FileReport, FindingKind, RuleEngine, SchemaValidator,
};

fn run_records(dataset: &Dataset, autofix: bool) -> Vec<FileReport> {
    let config = dataset.config();
    let reference = ReferenceData::load(&config).expect("reference data loads");
    let schema = SchemaValidator::load(&config.record_schema).expect("schema loads");
    let engine = RuleEngine::new(&reference, &config.docs_url);
    validate_directory(&config.records_dir, &schema, Some(&engine), autofix)
}

fn report_for<'a>(reports: &'a [FileReport], file_name: &str) -> &'a FileReport {
    reports
        .iter()
        .find(|report| report.path.file_name().and_then(|n| n.to_str()) == Some(file_name))
        .unwrap_or_else(|| panic!("no report for {file_name}"))
}

fn messages(report: &FileReport) -> Vec<&str> {
    report.findings.iter().map(|f| f.message.as_str()).collect()
}

#[test]
fn clean_record_produces_no_findings() {
    let dataset = Dataset::new();
    dataset.write_record("clean.json", CLEAN_RECORD);

    let reports = run_records(&dataset, false);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_clean(), "{:?}", messages(&reports[0]));
}

#[test]
fn report_mode_scenario_yields_three_findings() {
    let dataset = Dataset::new();
    dataset.write_record("acme.json", SCENARIO_RECORD);

    let reports = run_records(&dataset, false);
    let report = report_for(&reports, "acme.json");
    assert_eq!(report.findings.len(), 3, "{:?}", messages(report));
    assert_eq!(report.autofixes().count(), 0);
    assert!(messages(report).iter().any(|m| m.contains("required-elements")));
    assert!(messages(report).iter().any(|m| m.contains("repeats the record name")));
    assert!(messages(report).iter().any(|m| m.contains("`Berlin` is not a recognized country")));
    assert_eq!(dataset.read_record("acme.json"), SCENARIO_RECORD);
}

#[test]
fn autofix_scenario_rewrites_file() {
    let dataset = Dataset::new();
    dataset.write_record("acme.json", SCENARIO_RECORD);

    let reports = run_records(&dataset, true);
    let report = report_for(&reports, "acme.json");
    assert_eq!(report.autofixes().count(), 2, "{:?}", messages(report));
    assert_eq!(report.findings[0].kind, FindingKind::Autofix);

    let rewritten = dataset.read_record("acme.json");
    let expected = "{\n    \"slug\": \"acme\",\n    \"name\": \"Acme\",\n    \"address\": \"Musterstr. 1\\nBerlin\\nGermany\",\n    \"required-elements\": [\n        {\n            \"type\": \"email\"\n        }\n    ],\n    \"quality\": \"tested\"\n}\n";
    assert_eq!(rewritten, expected);
}

#[test]
fn second_autofix_run_does_not_rewrite() {
    let dataset = Dataset::new();
    dataset.write_record("acme.json", SCENARIO_RECORD);

    run_records(&dataset, true);
    let after_first = dataset.read_record("acme.json");

    let reports = run_records(&dataset, true);
    let report = report_for(&reports, "acme.json");
    assert_eq!(report.autofixes().count(), 0);
    assert_eq!(report.findings.len(), 1, "{:?}", messages(report));
    assert_eq!(dataset.read_record("acme.json"), after_first);
}

#[test]
fn unchanged_record_is_not_resaved() {
    let dataset = Dataset::new();
    let compact = "{\"slug\":\"short\",\"name\":\"Short\",\"address\":\"Germany\"}\n";
    dataset.write_record("short.json", compact);

    let reports = run_records(&dataset, true);
    let report = report_for(&reports, "short.json");
    assert_eq!(report.findings.len(), 1, "{:?}", messages(report));
    assert!(report.findings[0].message.contains("needs at least 2"));
    assert_eq!(dataset.read_record("short.json"), compact);
}

#[test]
fn padded_field_is_trimmed_on_autofix() {
    let dataset = Dataset::new();
    dataset.write_record(
        "padded.json",
        "{\"slug\":\"padded\",\"name\":\" Padded Ltd \",\"address\":\"Main St 1\\nGermany\"}\n",
    );

    let reports = run_records(&dataset, false);
    let report = report_for(&reports, "padded.json");
    assert_eq!(report.findings.len(), 1);
    assert!(report.findings[0].message.contains("`name`"));

    let reports = run_records(&dataset, true);
    assert_eq!(report_for(&reports, "padded.json").autofixes().count(), 1);
    let rewritten: serde_json::Value =
        serde_json::from_str(&dataset.read_record("padded.json")).expect("valid json");
    assert_eq!(rewritten["name"], "Padded Ltd");
}

#[test]
fn slug_mismatch_names_both_values() {
    let dataset = Dataset::new();
    dataset.write_record("other.json", &CLEAN_RECORD.replace("\"clean\"", "\"acme\""));

    let reports = run_records(&dataset, false);
    let report = report_for(&reports, "other.json");
    assert_eq!(report.findings.len(), 1);
    let message = &report.findings[0].message;
    assert!(message.contains("acme") && message.contains("other.json"), "{message}");
}

#[test]
fn trailing_newline_is_checked_on_raw_bytes() {
    let dataset = Dataset::new();
    let body = CLEAN_RECORD.trim_end();
    dataset.write_record("clean.json", &format!("{body}\n\n"));
    let reports = run_records(&dataset, false);
    assert_eq!(reports[0].findings.len(), 1);
    assert!(reports[0].findings[0].message.contains("exactly one newline"));

    dataset.write_record("clean.json", body);
    let reports = run_records(&dataset, false);
    assert_eq!(reports[0].findings.len(), 1);
}

#[test]
fn parse_failure_stops_further_checks() {
    let dataset = Dataset::new();
    dataset.write_record("broken.json", "{\"slug\": }\n");

    let reports = run_records(&dataset, true);
    let report = report_for(&reports, "broken.json");
    assert_eq!(report.findings.len(), 1);
    assert!(report.findings[0].message.contains("not valid JSON"));
    assert!(report.findings[0].detail.is_some());
    assert_eq!(dataset.read_record("broken.json"), "{\"slug\": }\n");
}

#[test]
fn schema_violation_carries_detail() {
    let dataset = Dataset::new();
    dataset.write_record(
        "noname.json",
        "{\"slug\":\"noname\",\"address\":\"Main St 1\\nGermany\"}\n",
    );

    let reports = run_records(&dataset, false);
    let report = report_for(&reports, "noname.json");
    assert_eq!(report.findings.len(), 1, "{:?}", messages(report));
    let finding = &report.findings[0];
    assert!(finding.message.contains("does not match schema"));
    let detail = finding.detail.as_ref().expect("schema detail");
    assert_eq!(detail.as_array().map(Vec::len), Some(1));
    assert!(detail[0]["message"].as_str().unwrap_or_default().contains("name"));
}

#[test]
fn files_are_processed_in_name_order_and_non_json_ignored() {
    let dataset = Dataset::new();
    dataset.write_record("zeta.json", &CLEAN_RECORD.replace("\"clean\"", "\"zeta\""));
    dataset.write_record("alpha.json", &CLEAN_RECORD.replace("\"clean\"", "\"alpha\""));
    dataset.write_record("README.md", "not a record");

    let reports = run_records(&dataset, false);
    let names: Vec<_> = reports
        .iter()
        .filter_map(|report| report.path.file_name().and_then(|n| n.to_str()))
        .collect();
    assert_eq!(names, vec!["alpha.json", "zeta.json"]);
}

#[test]
fn directory_named_like_a_record_is_skipped() {
    let dataset = Dataset::new();
    dataset.write_record("clean.json", CLEAN_RECORD);
    fs::create_dir(dataset.root().join("companies").join("nested.json")).expect("create dir");

    let reports = run_records(&dataset, false);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].path.ends_with("clean.json"));
    assert!(reports[0].is_clean(), "{:?}", messages(&reports[0]));
}

#[test]
fn authorities_skip_heuristic_rules() {
    let dataset = Dataset::new();
    dataset.write_authority("bfdi.json", CLEAN_AUTHORITY);
    dataset.write_authority(
        "short.json",
        "{\"slug\":\"short\",\"name\":\"Short\",\"address\":\"Somewhere\",\"jurisdiction\":\"DE\"}\n",
    );

    let config = dataset.config();
    let schema = SchemaValidator::load(&config.authority_schema).expect("schema loads");
    let reports = validate_directory(&config.authorities_dir, &schema, None, true);
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(FileReport::is_clean));
}

#[test]
fn missing_directory_is_reported_not_fatal() {
    let dataset = Dataset::new();
    fs::remove_dir_all(dataset.root().join("companies")).expect("remove companies");

    let reports = run_records(&dataset, false);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].has_errors());
    assert!(reports[0].findings[0].message.contains("Could not list"));
}
