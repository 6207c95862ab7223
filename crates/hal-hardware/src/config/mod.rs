//! Bench configuration.
//!
//! A bench file declares which optional dependencies the operator vouches for
//! and which instruments to build:
//!
//! ```toml
//! [dependencies]
//! available = ["vendor_sdk"]
//! library_dirs = ["/opt/vendor/lib"]
//!
//! [[instruments]]
//! id = "alice_laser"
//! family = "laser"
//! driver = "fake"
//! location = "/dev/ttyUSB0"
//! [instruments.options]
//! power = 1.0
//! ```
//!
//! # Environment Variables
//!
//! Any field can be overridden with a `QKD_HAL_` prefixed variable, nested
//! fields separated by double underscores:
//!
//! - `QKD_HAL_DEPENDENCIES__AVAILABLE='["visa"]'` → sets `dependencies.available`

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use hal_core::{
    AnyOf, DependencyResolver, HalError, HalResult, InstrumentFamily, SharedLibraries,
    StaticResolver,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Driver name that selects the designated fake of the family.
pub const FAKE_DRIVER: &str = "fake";

/// Prefix of the environment overrides.
pub const ENV_PREFIX: &str = "QKD_HAL_";

/// Top-level bench configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HalConfig {
    /// Operator-declared optional dependencies
    #[serde(default)]
    pub dependencies: DependenciesConfig,

    /// Instruments to build, in open order
    #[serde(default)]
    pub instruments: Vec<InstrumentConfig>,
}

/// `[dependencies]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependenciesConfig {
    /// Names treated as resolvable whatever the machine provides
    #[serde(default)]
    pub available: Vec<String>,

    /// Extra shared-library search directories, searched first
    #[serde(default)]
    pub library_dirs: Vec<PathBuf>,
}

/// One `[[instruments]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Unique identifier
    pub id: String,

    /// Family the caller expects
    pub family: InstrumentFamily,

    /// Driver type, or `"fake"` for the designated fake of the family
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Device address (serial port, VISA resource, IP, ...)
    #[serde(default)]
    pub location: Option<String>,

    /// Driver-specific options handed to the factory
    #[serde(default)]
    pub options: toml::Table,
}

fn default_driver() -> String {
    FAKE_DRIVER.to_string()
}

impl InstrumentConfig {
    /// Instrument using the designated fake of `family`.
    pub fn fake(id: impl Into<String>, family: InstrumentFamily) -> Self {
        Self {
            id: id.into(),
            family,
            driver: default_driver(),
            location: None,
            options: toml::Table::new(),
        }
    }

    /// Same instrument with another driver.
    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    /// Same instrument with one more option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// True when the designated fake is requested.
    pub fn is_fake(&self) -> bool {
        self.driver == FAKE_DRIVER
    }

    /// Table handed to the factory: the options, plus `location` when set.
    pub fn driver_config(&self) -> toml::Value {
        let mut table = self.options.clone();
        if let Some(location) = &self.location {
            table
                .entry("location")
                .or_insert_with(|| toml::Value::String(location.clone()));
        }
        toml::Value::Table(table)
    }
}

impl HalConfig {
    /// Load a bench file, applying `QKD_HAL_` environment overrides.
    pub fn load(path: &Path) -> HalResult<Self> {
        if !path.exists() {
            return Err(HalError::Configuration(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        debug!(path = %path.display(), "loading bench configuration");

        let config: HalConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| {
                HalError::Configuration(format!("failed to parse {}: {}", path.display(), e))
            })?;
        config.validate()?;

        info!(
            path = %path.display(),
            instruments = config.instruments.len(),
            "bench configuration loaded"
        );
        Ok(config)
    }

    /// Parse a bench configuration from TOML text (no environment overrides).
    pub fn from_toml_str(content: &str) -> HalResult<Self> {
        let config: HalConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check identifiers and driver names.
    pub fn validate(&self) -> HalResult<()> {
        let mut seen = HashSet::new();
        for instrument in &self.instruments {
            if instrument.id.trim().is_empty() {
                return Err(HalError::Configuration(
                    "instrument id must not be empty".into(),
                ));
            }
            if instrument.driver.trim().is_empty() {
                return Err(HalError::Configuration(format!(
                    "instrument '{}' has an empty driver name",
                    instrument.id
                )));
            }
            if !seen.insert(instrument.id.as_str()) {
                return Err(HalError::Configuration(format!(
                    "duplicate instrument id '{}'",
                    instrument.id
                )));
            }
        }
        Ok(())
    }

    /// Find an instrument by id.
    pub fn instrument(&self, id: &str) -> Option<&InstrumentConfig> {
        self.instruments.iter().find(|i| i.id == id)
    }

    /// Resolver for the process-wide capability gates: operator-declared
    /// names, then shared libraries in the configured and default directories.
    pub fn resolver(&self) -> impl DependencyResolver + 'static {
        AnyOf::new()
            .with(StaticResolver::new(self.dependencies.available.clone()))
            .with(SharedLibraries::from_env().with_dirs(self.dependencies.library_dirs.clone()))
    }
}
