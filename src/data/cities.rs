//! City gazetteer: resolve a city name to a best-guess country code.
//!
//! Also owns the city-token heuristic for address lines, so a stronger address parser can
//! replace it without touching the rule engine.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::ReferenceDataError;

const EMBEDDED_CITIES: &str = include_str!("../../data/cities.json");

/// Optional leading postcode digits and spaces, then the city.
static CITY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\d+\s*)?(.+)$").expect("city token pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CityEntry {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub population: u64,
}

/// Normalize a city name for lookup: lowercase, collapse whitespace.
fn normalize_lookup(s: &str) -> String {
    s.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// City token found in an address line and the country it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityMatch<'l, 'g> {
    pub city: &'l str,
    pub country: &'g str,
}

#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    by_name: HashMap<String, Vec<CityEntry>>,
}

impl Gazetteer {
    /// Gazetteer compiled into the binary from `data/cities.json`.
    pub fn embedded() -> Result<Self, ReferenceDataError> {
        Self::from_json(EMBEDDED_CITIES)
    }

    pub fn from_json(raw: &str) -> Result<Self, ReferenceDataError> {
        let entries: Vec<CityEntry> =
            serde_json::from_str(raw).map_err(|source| ReferenceDataError::Parse {
                dataset: "city",
                source,
            })?;
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = CityEntry>) -> Self {
        let mut by_name: HashMap<String, Vec<CityEntry>> = HashMap::new();
        for entry in entries {
            by_name
                .entry(normalize_lookup(&entry.name))
                .or_default()
                .push(entry);
        }
        Self { by_name }
    }

    /// Country code of the most populous city with this name.
    pub fn lookup(&self, city: &str) -> Option<&str> {
        self.by_name
            .get(&normalize_lookup(city))?
            .iter()
            .max_by_key(|entry| entry.population)
            .map(|entry| entry.country.as_str())
    }

    /// Country guessed from an address line such as `10115 Berlin`.
    pub fn lookup_address_line<'l>(&self, line: &'l str) -> Option<CityMatch<'l, '_>> {
        let city = extract_city_token(line)?;
        let country = self.lookup(city)?;
        Some(CityMatch { city, country })
    }

    pub(crate) fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }
}

fn extract_city_token(line: &str) -> Option<&str> {
    let captures = CITY_TOKEN.captures(line.trim())?;
    let city = captures.get(1)?.as_str().trim();
    (!city.is_empty()).then_some(city)
}
