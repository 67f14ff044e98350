//! Walks one record directory and collects a [FileReport] per file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{json, Value};

use crate::validate::finding::{FileReport, Finding};
use crate::validate::rules::RuleEngine;
use crate::validate::schema::SchemaValidator;

pub const RECORD_EXTENSION: &str = "json";
const INDENT: &[u8] = b"    ";

/// Raw content must end in `}` followed by exactly one newline.
pub fn has_single_trailing_newline(raw: &str) -> bool {
    raw.ends_with("}\n")
}

/// 4-space indentation, original key order, one trailing newline.
pub fn serialize_record(record: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    record.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

fn write_record(path: &Path, record: &Value) -> io::Result<()> {
    let bytes = serialize_record(record).map_err(io::Error::other)?;
    fs::write(path, bytes)
}

/// `*.json` files directly in `dir`, sorted by file name.
pub fn list_record_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = match entry {
            Ok(entry) => entry.path(),
            Err(err) => {
                tracing::debug!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if path.is_file() && path.extension().is_some_and(|ext| ext == RECORD_EXTENSION) {
            files.push(path);
        } else {
            tracing::debug!(path = %path.display(), "skipping non-record entry");
        }
    }
    files.sort();
    Ok(files)
}

/// One report per file, clean files included. An unreadable directory yields a single
/// report keyed by the directory.
pub fn validate_directory(
    dir: &Path,
    schema: &SchemaValidator,
    rules: Option<&RuleEngine<'_>>,
    autofix: bool,
) -> Vec<FileReport> {
    let files = match list_record_files(dir) {
        Ok(files) => files,
        Err(err) => {
            let mut report = FileReport::new(dir);
            report.push(Finding::error(format!(
                "Could not list record directory: {err}"
            )));
            return vec![report];
        }
    };
    tracing::info!(dir = %dir.display(), files = files.len(), autofix, "validating directory");

    files
        .iter()
        .map(|path| check_file(path, schema, rules, autofix))
        .collect()
}

pub fn check_file(
    path: &Path,
    schema: &SchemaValidator,
    rules: Option<&RuleEngine<'_>>,
    autofix: bool,
) -> FileReport {
    let mut report = FileReport::new(path);

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            report.push(Finding::error(format!("Could not read file: {err}")));
            return report;
        }
    };

    if !has_single_trailing_newline(&raw) {
        report.push(Finding::error(
            "File must end with exactly one newline after the closing brace.",
        ));
    }

    let record: Value = match serde_json::from_str(&raw) {
        Ok(record) => record,
        Err(err) => {
            report.push(
                Finding::error(format!("File is not valid JSON: {err}")).with_detail(json!({
                    "line": err.line(),
                    "column": err.column(),
                })),
            );
            return report;
        }
    };

    if let Err(violations) = schema.check(&record) {
        report.push(
            Finding::error(format!(
                "Record does not match schema `{}` ({} violation(s)).",
                schema.path().display(),
                violations.len()
            ))
            .with_detail(serde_json::to_value(&violations).unwrap_or_default()),
        );
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    match record.get("slug").and_then(Value::as_str) {
        Some(slug) if format!("{slug}.{RECORD_EXTENSION}") == file_name => {}
        Some(slug) => report.push(Finding::error(format!(
            "Slug `{slug}` does not match file name `{file_name}`."
        ))),
        None => report.push(Finding::error(format!(
            "Record has no string `slug` to match file name `{file_name}`."
        ))),
    }

    if let Some(rules) = rules {
        let outcome = rules.evaluate(&record, autofix);
        if let Some(fixed) = outcome.changed_record(&record) {
            match write_record(path, fixed) {
                Ok(()) => tracing::info!(path = %path.display(), "rewrote autofixed record"),
                Err(err) => report.push(Finding::error(format!(
                    "Could not write autofixed record: {err}"
                ))),
            }
        }
        report.extend(outcome.into_findings());
    }

    report
}
