//! Per-file validation: schema, formatting, slug and heuristic record rules.

pub mod finding;
pub mod report;
pub mod rules;
pub mod schema;
pub mod walker;

pub use finding::{FileReport, Finding, FindingKind};
pub use rules::{AddressSnapshot, RuleEngine, RuleOutcome};
pub use schema::{SchemaValidator, SchemaViolation};
pub use walker::{check_file, has_single_trailing_newline, serialize_record, validate_directory};
