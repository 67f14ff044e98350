//! Country reference table and the matcher that decides whether an address line names a country.
//!
//! Matching is exact string equality against official and native names. Countries listed in
//! [CountryVariations] are matched (and displayed) only by their preferred variation.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::ReferenceDataError;

const EMBEDDED_COUNTRIES: &str = include_str!("../../data/countries.json");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Country {
    pub name: String,
    pub native: String,
}

/// Country code -> official and native name.
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    countries: BTreeMap<String, Country>,
}

impl CountryTable {
    /// Table compiled into the binary from `data/countries.json`.
    pub fn embedded() -> Result<Self, ReferenceDataError> {
        Self::from_json(EMBEDDED_COUNTRIES)
    }

    pub fn from_json(raw: &str) -> Result<Self, ReferenceDataError> {
        let countries: BTreeMap<String, Country> =
            serde_json::from_str(raw).map_err(|source| ReferenceDataError::Parse {
                dataset: "country",
                source,
            })?;
        Ok(Self { countries })
    }

    pub fn get(&self, code: &str) -> Option<&Country> {
        self.countries.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Country)> {
        self.countries
            .iter()
            .map(|(code, country)| (code.as_str(), country))
    }

    pub(crate) fn len(&self) -> usize {
        self.countries.len()
    }
}

/// Preferred display spelling per country code. A code listed here is excluded from
/// official/native name matching; its variation is accepted instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryVariations {
    by_code: BTreeMap<String, String>,
}

impl CountryVariations {
    pub fn new<I, C, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        Self {
            by_code: entries
                .into_iter()
                .map(|(code, name)| (code.into(), name.into()))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_code.values().map(String::as_str)
    }
}

impl Default for CountryVariations {
    fn default() -> Self {
        Self::new([
            ("CZ", "Czech Republic"),
            ("KR", "Republic of Korea"),
            ("MK", "North Macedonia"),
            ("NL", "The Netherlands"),
            ("US", "United States of America"),
            ("VA", "Vatican City"),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct CountryMatcher {
    table: CountryTable,
    variations: CountryVariations,
}

impl CountryMatcher {
    pub fn new(table: CountryTable, variations: CountryVariations) -> Self {
        Self { table, variations }
    }

    pub fn variations(&self) -> &CountryVariations {
        &self.variations
    }

    /// `text` is expected to be trimmed by the caller.
    pub fn is_country_line(&self, text: &str) -> bool {
        if self.variations.names().any(|name| name == text) {
            return true;
        }
        self.table.iter().any(|(code, country)| {
            !self.variations.contains_code(code) && (country.name == text || country.native == text)
        })
    }

    /// Name to write when appending a country line for `code`.
    pub fn display_name(&self, code: &str) -> Option<&str> {
        if let Some(variation) = self.variations.get(code) {
            return Some(variation);
        }
        self.table.get(code).map(|country| country.name.as_str())
    }
}
