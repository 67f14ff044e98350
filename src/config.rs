//! Dataset layout and environment overrides.

use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_RECORDS_DIR: &str = "companies";
pub const DEFAULT_AUTHORITIES_DIR: &str = "supervisory-authorities";
pub const DEFAULT_RECORD_SCHEMA_PATH: &str = "schema.json";
pub const DEFAULT_AUTHORITY_SCHEMA_PATH: &str = "schema-supervisory-authorities.json";
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";
pub const DEFAULT_DOCS_URL: &str = "https://github.com/datenanfragen/data/blob/master/README.md";

pub const ROOT_ENV: &str = "RECORDCHECK_ROOT";
pub const TEMPLATES_ENV: &str = "RECORDCHECK_TEMPLATES";
pub const DOCS_URL_ENV: &str = "RECORDCHECK_DOCS_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub records_dir: PathBuf,
    pub authorities_dir: PathBuf,
    pub record_schema: PathBuf,
    pub authority_schema: PathBuf,
    pub templates_dir: PathBuf,
    /// Base of the reference links attached to findings.
    pub docs_url: String,
}

impl Config {
    /// Default layout below `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            records_dir: root.join(DEFAULT_RECORDS_DIR),
            authorities_dir: root.join(DEFAULT_AUTHORITIES_DIR),
            record_schema: root.join(DEFAULT_RECORD_SCHEMA_PATH),
            authority_schema: root.join(DEFAULT_AUTHORITY_SCHEMA_PATH),
            templates_dir: root.join(DEFAULT_TEMPLATES_DIR),
            docs_url: DEFAULT_DOCS_URL.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let root = env::var(ROOT_ENV).unwrap_or_else(|_| DEFAULT_ROOT.to_string());
        let mut config = Self::with_root(root);
        if let Ok(templates) = env::var(TEMPLATES_ENV) {
            config.templates_dir = PathBuf::from(templates);
        }
        if let Ok(docs_url) = env::var(DOCS_URL_ENV) {
            config.docs_url = docs_url;
        }
        config
    }
}
