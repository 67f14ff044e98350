//! JSON schema compilation with the dataset's custom formats.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use jsonschema::Validator;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::SchemaError;

static LOOSE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// Free-form multi-line text; any string is accepted.
pub fn is_multiline(_value: &str) -> bool {
    true
}

pub fn is_loose_email(value: &str) -> bool {
    LOOSE_EMAIL.is_match(value)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    pub instance_path: String,
    pub schema_path: String,
    pub message: String,
}

pub struct SchemaValidator {
    path: PathBuf,
    validator: Validator,
}

impl std::fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaValidator")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl SchemaValidator {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let schema: Value = serde_json::from_str(&raw).map_err(|source| SchemaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::compile(path, &schema)
    }

    /// `path` only labels errors and logs.
    pub fn compile(path: impl AsRef<Path>, schema: &Value) -> Result<Self, SchemaError> {
        let path = path.as_ref().to_path_buf();
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .with_format("multiline", is_multiline)
            .with_format("email", is_loose_email)
            .build(schema)
            .map_err(|err| SchemaError::Compile {
                path: path.clone(),
                message: err.to_string(),
            })?;
        tracing::debug!(schema = %path.display(), "schema compiled");
        Ok(Self { path, validator })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn check(&self, record: &Value) -> Result<(), Vec<SchemaViolation>> {
        let violations: Vec<SchemaViolation> = self
            .validator
            .iter_errors(record)
            .map(|err| SchemaViolation {
                instance_path: err.instance_path.to_string(),
                schema_path: err.schema_path.to_string(),
                message: err.to_string(),
            })
            .collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
