use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DataLoadError;

const BUNDLED_COUNTRIES: &str = include_str!("../../config/countrydata.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    #[serde(rename = "country")]
    pub name: String,
    #[serde(rename = "countryCode")]
    pub code: String,
    #[serde(rename = "countryCode3")]
    pub code3: String,
    #[serde(rename = "numericCode")]
    pub numeric_code: u32,
    pub latitude: f64,
    pub longitude: f64,
}

/// Ordered, read-only table of countries. Source order is kept so that
/// suggestion lists come out in a stable order.
#[derive(Debug, Clone)]
pub struct Catalog {
    countries: Vec<Country>,
}

impl Catalog {
    /// Catalog compiled into the crate from `config/countrydata.json`.
    pub fn bundled() -> Result<Self, DataLoadError> {
        Self::from_slice(BUNDLED_COUNTRIES.as_bytes())
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, DataLoadError> {
        let countries: Vec<Country> = serde_json::from_slice(bytes)?;
        Self::from_countries(countries)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataLoadError> {
        let countries: Vec<Country> = serde_json::from_reader(reader)?;
        Self::from_countries(countries)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataLoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = fs::read(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_slice(&bytes)?;
        info!(path = %path.display(), "loaded country data file");
        Ok(catalog)
    }

    pub fn from_countries(countries: Vec<Country>) -> Result<Self, DataLoadError> {
        if countries.is_empty() {
            return Err(DataLoadError::Empty);
        }

        let mut seen = HashSet::with_capacity(countries.len());
        for (index, country) in countries.iter().enumerate() {
            if let Err(error) = validate_country(index, country) {
                warn!(%error, "rejecting country data");
                return Err(error);
            }
            if !seen.insert(fold_name(&country.name)) {
                let error = DataLoadError::invalid(
                    index,
                    format!("duplicate country name '{}'", country.name),
                );
                warn!(%error, "rejecting country data");
                return Err(error);
            }
        }

        info!(count = countries.len(), "country catalog ready");
        Ok(Self { countries })
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Country> {
        self.countries.get(index)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(|country| country.name.as_str())
    }

    /// Case-insensitive exact match on the country name.
    pub fn find_by_name(&self, name: &str) -> Option<&Country> {
        self.position_by_name(name).map(|idx| &self.countries[idx])
    }

    pub fn position_by_name(&self, name: &str) -> Option<usize> {
        let needle = fold_name(name.trim());
        if needle.is_empty() {
            return None;
        }
        self.countries
            .iter()
            .position(|country| fold_name(&country.name) == needle)
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Country> {
        let code = code.trim();
        self.countries
            .iter()
            .find(|country| country.code.eq_ignore_ascii_case(code))
    }
}

pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

fn validate_country(index: usize, country: &Country) -> Result<(), DataLoadError> {
    if country.name.trim().is_empty() {
        return Err(DataLoadError::invalid(index, "country name is blank"));
    }
    if country.name.trim() != country.name {
        return Err(DataLoadError::invalid(
            index,
            format!("'{}' has surrounding whitespace", country.name),
        ));
    }
    if country.code.trim().is_empty() {
        return Err(DataLoadError::invalid(
            index,
            format!("'{}' has a blank country code", country.name),
        ));
    }
    if !country.latitude.is_finite() || !(-90.0..=90.0).contains(&country.latitude) {
        return Err(DataLoadError::invalid(
            index,
            format!(
                "'{}' latitude {} is outside [-90, 90]",
                country.name, country.latitude
            ),
        ));
    }
    if !country.longitude.is_finite() || !(-180.0..=180.0).contains(&country.longitude) {
        return Err(DataLoadError::invalid(
            index,
            format!(
                "'{}' longitude {} is outside [-180, 180]",
                country.name, country.longitude
            ),
        ));
    }
    Ok(())
}
