//! Driver-specific option tables.
//!
//! Parameter structs carry the physical quantities every driver of a family
//! understands as typed fields. Anything vendor specific goes into an
//! [`DriverOptions`] table and is read back with a typed accessor.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{HalError, HalResult};

/// A TOML table of driver-specific options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DriverOptions(toml::Table);

impl DriverOptions {
    /// Create an empty option table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an option, returning `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Read an option as `T`.
    ///
    /// Returns `Ok(None)` when the key is absent and a configuration error
    /// when it is present with an incompatible type.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> HalResult<Option<T>> {
        match self.0.get(key) {
            None => Ok(None),
            Some(value) => value.clone().try_into().map(Some).map_err(|e| {
                HalError::Configuration(format!("option '{}' has an invalid value: {}", key, e))
            }),
        }
    }

    /// True if the key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// True if no option is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<toml::Table> for DriverOptions {
    fn from(table: toml::Table) -> Self {
        Self(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let options = DriverOptions::new()
            .with("gain", 2.5)
            .with("paths", vec!["a.json", "b.json"]);

        assert_eq!(options.get::<f64>("gain").unwrap(), Some(2.5));
        assert_eq!(
            options.get::<Vec<String>>("paths").unwrap(),
            Some(vec!["a.json".to_string(), "b.json".to_string()])
        );
        assert_eq!(options.get::<f64>("offset").unwrap(), None);
    }

    #[test]
    fn test_wrong_type_is_configuration_error() {
        let options = DriverOptions::new().with("gain", "high");
        let err = options.get::<f64>("gain").unwrap_err();
        assert!(matches!(err, HalError::Configuration(_)));
    }
}
