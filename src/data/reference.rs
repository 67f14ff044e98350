//! Read-only reference data loaded once before any record is checked.

use crate::config::Config;
use crate::data::cities::Gazetteer;
use crate::data::countries::{CountryMatcher, CountryTable, CountryVariations};
use crate::data::templates::TemplateCatalog;
use crate::error::ReferenceDataError;

#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub countries: CountryMatcher,
    pub gazetteer: Gazetteer,
    pub templates: TemplateCatalog,
}

impl ReferenceData {
    /// Embedded country and city tables plus the template tree from `config`.
    pub fn load(config: &Config) -> Result<Self, ReferenceDataError> {
        let table = CountryTable::embedded()?;
        let gazetteer = Gazetteer::embedded()?;
        let templates = TemplateCatalog::build(&config.templates_dir);
        tracing::info!(
            countries = table.len(),
            cities = gazetteer.len(),
            template_languages = templates.languages().count(),
            "reference data loaded"
        );
        Ok(Self {
            countries: CountryMatcher::new(table, CountryVariations::default()),
            gazetteer,
            templates,
        })
    }
}
