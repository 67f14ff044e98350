use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    Autofix,
    Error,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autofix => "autofix",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub kind: FindingKind,
    pub message: String,
    pub reference_url: Option<String>,
    pub detail: Option<Value>,
}

impl Finding {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::Error,
            message: message.into(),
            reference_url: None,
            detail: None,
        }
    }

    pub fn autofix(message: impl Into<String>) -> Self {
        Self {
            kind: FindingKind::Autofix,
            ..Self::error(message)
        }
    }

    pub fn with_reference(mut self, url: impl Into<String>) -> Self {
        self.reference_url = Some(url.into());
        self
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Findings with a reference or detail are rendered in full.
    pub fn has_extra_fields(&self) -> bool {
        self.reference_url.is_some() || self.detail.is_some()
    }
}

/// All findings for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub path: PathBuf,
    pub findings: Vec<Finding>,
}

impl FileReport {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            findings: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.kind == FindingKind::Error)
    }

    pub fn autofixes(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.kind == FindingKind::Autofix)
    }
}
