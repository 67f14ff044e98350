//! Template catalog: which request templates exist for which language.
//!
//! Layout on disk: `<root>/<language_code>/<template_name>.txt`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use walkdir::WalkDir;

pub const TEMPLATE_EXTENSION: &str = "txt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
    by_language: BTreeMap<String, BTreeSet<String>>,
}

impl TemplateCatalog {
    /// Scan `root`. A missing or unreadable directory yields an empty catalog.
    pub fn build(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let mut catalog = Self::default();
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "template directory not found; catalog is empty");
            return catalog;
        }

        for entry in WalkDir::new(root)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(TEMPLATE_EXTENSION)
            {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let language = relative
                .parent()
                .and_then(|dir| dir.to_str())
                .filter(|dir| !dir.is_empty());
            let template = path.file_stem().and_then(|stem| stem.to_str());
            if let (Some(language), Some(template)) = (language, template) {
                catalog.insert(language, template);
            }
        }

        tracing::debug!(
            languages = catalog.by_language.len(),
            "template catalog built"
        );
        catalog
    }

    pub fn insert(&mut self, language: impl Into<String>, template: impl Into<String>) {
        self.by_language
            .entry(language.into())
            .or_default()
            .insert(template.into());
    }

    /// Unknown languages have no templates.
    pub fn contains(&self, language: &str, template: &str) -> bool {
        self.by_language
            .get(language)
            .is_some_and(|templates| templates.contains(template))
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.by_language.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.by_language.is_empty()
    }
}
