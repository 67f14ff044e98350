//! Heuristic record rules that the JSON schema cannot express.
//!
//! Rules run in a fixed order. Errors are always judged against the record as read from disk.
//! In autofix mode every rule repairs a single accumulating copy of the record; the address
//! rules share an [AddressSnapshot] of that copy, so each rule sees the line boundaries left
//! by the rule before it (trim first, then drop the duplicated name, then append a country).

use serde_json::{Map, Value};

use crate::data::cities::Gazetteer;
use crate::data::countries::CountryMatcher;
use crate::data::reference::ReferenceData;
use crate::data::templates::TemplateCatalog;
use crate::validate::finding::Finding;

pub const DEFAULT_REQUEST_LANGUAGE: &str = "en";
pub const ADDRESS_LINE_SEPARATOR: &str = "\n";
pub const MIN_ADDRESS_LINES: usize = 2;
pub const CUSTOM_TEMPLATE_FIELDS: [&str; 4] = [
    "custom-access-template",
    "custom-erasure-template",
    "custom-rectification-template",
    "custom-objection-template",
];

/// Address lines of the autofixed copy. `revision` counts mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSnapshot {
    lines: Vec<String>,
    revision: u32,
}

impl AddressSnapshot {
    pub fn parse(address: &str) -> Self {
        Self {
            lines: address
                .split(ADDRESS_LINE_SEPARATOR)
                .map(str::to_string)
                .collect(),
            revision: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn revision(&self) -> u32 {
        self.revision
    }

    pub fn render(&self) -> String {
        self.lines.join(ADDRESS_LINE_SEPARATOR)
    }

    /// Returns whether any line changed.
    fn trim_lines(&mut self) -> bool {
        let trimmed: Vec<String> = self.lines.iter().map(|l| l.trim().to_string()).collect();
        if trimmed == self.lines {
            return false;
        }
        self.lines = trimmed;
        self.revision += 1;
        true
    }

    fn remove_first(&mut self) {
        self.lines.remove(0);
        self.revision += 1;
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
        self.revision += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub errors: Vec<Finding>,
    pub autofixes: Vec<Finding>,
    /// Autofixed copy; present only in autofix mode.
    pub fixed: Option<Value>,
}

impl RuleOutcome {
    /// The autofixed copy if it differs from `original`.
    pub fn changed_record(&self, original: &Value) -> Option<&Value> {
        self.fixed.as_ref().filter(|fixed| *fixed != original)
    }

    /// Autofixes first, then errors.
    pub fn into_findings(self) -> Vec<Finding> {
        let mut findings = self.autofixes;
        findings.extend(self.errors);
        findings
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RuleEngine<'a> {
    pub templates: &'a TemplateCatalog,
    pub countries: &'a CountryMatcher,
    pub gazetteer: &'a Gazetteer,
    pub docs_url: &'a str,
}

impl<'a> RuleEngine<'a> {
    pub fn new(reference: &'a ReferenceData, docs_url: &'a str) -> Self {
        Self {
            templates: &reference.templates,
            countries: &reference.countries,
            gazetteer: &reference.gazetteer,
            docs_url,
        }
    }

    pub fn evaluate(&self, record: &Value, autofix: bool) -> RuleOutcome {
        let mut outcome = RuleOutcome {
            fixed: autofix.then(|| record.clone()),
            ..RuleOutcome::default()
        };
        let Some(object) = record.as_object() else {
            return outcome;
        };

        self.check_required_elements(object, &mut outcome);
        self.check_custom_templates(object, &mut outcome);
        self.check_quality(object, &mut outcome);
        self.check_trimmed_fields(object, &mut outcome);

        if let Some(address) = object.get("address").and_then(Value::as_str) {
            let original_lines: Vec<&str> = address.split(ADDRESS_LINE_SEPARATOR).collect();
            let mut snapshot = outcome
                .fixed
                .as_ref()
                .and_then(|fixed| fixed.get("address"))
                .and_then(Value::as_str)
                .map(AddressSnapshot::parse);

            self.check_address_line_count(&original_lines, &mut outcome);
            self.check_address_line_trim(&original_lines, snapshot.as_mut(), &mut outcome);
            self.check_address_name(object, &original_lines, snapshot.as_mut(), &mut outcome);
            self.check_address_country(&original_lines, snapshot.as_mut(), &mut outcome);

            if let (Some(snapshot), Some(fixed)) = (snapshot, outcome.fixed.as_mut()) {
                if snapshot.revision() > 0 {
                    if let Some(slot) = fixed.get_mut("address") {
                        *slot = Value::String(snapshot.render());
                    }
                }
            }
        }

        outcome
    }

    fn reference(&self, anchor: &str) -> String {
        format!("{}#{anchor}", self.docs_url)
    }

    fn check_required_elements(&self, object: &Map<String, Value>, outcome: &mut RuleOutcome) {
        let Some(elements) = object.get("required-elements").and_then(Value::as_array) else {
            return;
        };
        if elements.is_empty() {
            return;
        }
        let has_name = elements
            .iter()
            .any(|element| element.get("type").and_then(Value::as_str) == Some("name"));
        if !has_name {
            outcome.errors.push(Finding::error(
                "`required-elements` is set but does not contain an element of type `name`.",
            ));
        }
    }

    fn check_custom_templates(&self, object: &Map<String, Value>, outcome: &mut RuleOutcome) {
        let request_language = object.get("request-language").and_then(Value::as_str);
        let language = request_language.unwrap_or(DEFAULT_REQUEST_LANGUAGE);

        for field in CUSTOM_TEMPLATE_FIELDS {
            let Some(template) = object.get(field).and_then(Value::as_str) else {
                continue;
            };
            if self.templates.contains(language, template) {
                continue;
            }
            let finding = Finding::error(format!(
                "Custom template `{template}` in `{field}` does not exist for language `{language}`."
            ));
            outcome.errors.push(match request_language {
                Some(_) => finding,
                None => finding.with_reference(self.reference("custom-templates")),
            });
        }
    }

    fn check_quality(&self, object: &Map<String, Value>, outcome: &mut RuleOutcome) {
        let tested = object.get("quality").and_then(Value::as_str) == Some("tested");
        if tested && !object.contains_key("required-elements") {
            outcome.errors.push(
                Finding::error("Records with `quality: tested` must specify `required-elements`.")
                    .with_reference(self.reference("quality")),
            );
        }
    }

    fn check_trimmed_fields(&self, object: &Map<String, Value>, outcome: &mut RuleOutcome) {
        for (key, value) in object {
            let Some(text) = value.as_str() else {
                continue;
            };
            let trimmed = text.trim();
            if trimmed == text {
                continue;
            }
            outcome.errors.push(Finding::error(format!(
                "Field `{key}` has leading or trailing whitespace."
            )));
            if let Some(slot) = outcome.fixed.as_mut().and_then(|fixed| fixed.get_mut(key)) {
                *slot = Value::String(trimmed.to_string());
                outcome.autofixes.push(Finding::autofix(format!(
                    "Trimmed whitespace in field `{key}`."
                )));
            }
        }
    }

    fn check_address_line_count(&self, lines: &[&str], outcome: &mut RuleOutcome) {
        if lines.len() < MIN_ADDRESS_LINES {
            outcome.errors.push(Finding::error(format!(
                "Address has {} line(s) but needs at least {MIN_ADDRESS_LINES}.",
                lines.len()
            )));
        }
    }

    fn check_address_line_trim(
        &self,
        lines: &[&str],
        snapshot: Option<&mut AddressSnapshot>,
        outcome: &mut RuleOutcome,
    ) {
        if lines.iter().all(|line| line.trim() == *line) {
            return;
        }
        outcome.errors.push(Finding::error(
            "Address contains lines with leading or trailing whitespace.",
        ));
        if let Some(snapshot) = snapshot {
            if snapshot.trim_lines() {
                outcome
                    .autofixes
                    .push(Finding::autofix("Trimmed whitespace in address lines."));
            }
        }
    }

    fn check_address_name(
        &self,
        object: &Map<String, Value>,
        lines: &[&str],
        snapshot: Option<&mut AddressSnapshot>,
        outcome: &mut RuleOutcome,
    ) {
        let Some(name) = object.get("name").and_then(Value::as_str) else {
            return;
        };
        if lines.iter().any(|line| *line == name) {
            outcome.errors.push(Finding::error(format!(
                "Address repeats the record name `{name}`."
            )));
        }

        // Fix runs on the snapshot rule 6 already trimmed.
        let Some(snapshot) = snapshot else {
            return;
        };
        let first_is_name = snapshot
            .lines()
            .first()
            .is_some_and(|first| first.trim() == name.trim());
        if first_is_name && snapshot.lines().len() > 1 {
            snapshot.remove_first();
            outcome.autofixes.push(Finding::autofix(format!(
                "Removed record name `{}` from the first address line.",
                name.trim()
            )));
        }
    }

    fn check_address_country(
        &self,
        lines: &[&str],
        snapshot: Option<&mut AddressSnapshot>,
        outcome: &mut RuleOutcome,
    ) {
        let last = lines.last().map(|line| line.trim()).unwrap_or_default();
        if self.countries.is_country_line(last) {
            return;
        }
        let variations = self.countries.variations().names().collect::<Vec<_>>();
        outcome.errors.push(Finding::error(format!(
            "Last address line `{last}` is not a recognized country. Use the country's official \
             or native name, or one of these variations: {}.",
            variations.join(", ")
        )));

        let Some(snapshot) = snapshot else {
            return;
        };
        let Some(last) = snapshot.lines().last().map(|line| line.trim().to_string()) else {
            return;
        };
        if self.countries.is_country_line(&last) {
            return;
        }
        let Some((city, country)) = self
            .gazetteer
            .lookup_address_line(&last)
            .and_then(|found| Some((found.city, self.countries.display_name(found.country)?)))
        else {
            tracing::debug!(line = %last, "no gazetteer match for last address line");
            return;
        };
        outcome.autofixes.push(Finding::autofix(format!(
            "Appended country `{country}` to the address, guessed from `{city}`."
        )));
        snapshot.push(country.to_string());
    }
}
