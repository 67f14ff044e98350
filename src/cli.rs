use std::path::Path;

use clap::Parser;

use crate::config::Config;
use crate::data::reference::ReferenceData;
use crate::logging;
use crate::validate::report;
use crate::validate::{validate_directory, RuleEngine, SchemaValidator};

pub const EXIT_OK: u8 = 0;
pub const EXIT_FINDINGS: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Validate company and supervisory authority records.
#[derive(Debug, Clone, Parser)]
#[command(name = "recordcheck")]
pub struct Cli {
    /// Repair fixable violations and rewrite the affected files in place.
    #[arg(long)]
    pub fix: bool,
}

pub fn run_with_args(args: &[String]) -> u8 {
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() { EXIT_USAGE } else { EXIT_OK };
        }
    };

    logging::init_tracing();
    run(&Config::from_env(), cli.fix)
}

/// Records directory first (with heuristic rules), then authorities (schema, formatting and
/// slug checks only).
pub fn run(config: &Config, autofix: bool) -> u8 {
    let reference = match ReferenceData::load(config) {
        Ok(reference) => reference,
        Err(err) => {
            eprintln!("failed to load reference data: {err}");
            return EXIT_FINDINGS;
        }
    };
    let Some(record_schema) = load_schema(&config.record_schema) else {
        return EXIT_FINDINGS;
    };
    let Some(authority_schema) = load_schema(&config.authority_schema) else {
        return EXIT_FINDINGS;
    };

    let engine = RuleEngine::new(&reference, &config.docs_url);
    let mut reports =
        validate_directory(&config.records_dir, &record_schema, Some(&engine), autofix);
    reports.extend(validate_directory(
        &config.authorities_dir,
        &authority_schema,
        None,
        autofix,
    ));

    if report::print(&reports) {
        EXIT_FINDINGS
    } else {
        EXIT_OK
    }
}

fn load_schema(path: &Path) -> Option<SchemaValidator> {
    match SchemaValidator::load(path) {
        Ok(schema) => Some(schema),
        Err(err) => {
            eprintln!("{err}");
            None
        }
    }
}
