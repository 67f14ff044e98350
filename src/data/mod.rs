pub mod cities;
pub mod countries;
pub mod reference;
pub mod templates;
