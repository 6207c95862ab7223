//! Driver registry.
//!
//! The registry owns one factory per driver type and one designated fake per
//! family. Building an instrument from its configuration goes through the
//! same steps whatever the driver:
//!
//! 1. `driver = "fake"` is replaced by the designated fake of the family
//! 2. the factory is looked up by driver type
//! 3. the factory family is checked against the configured family
//! 4. the factory's capability gate, if any, must be enabled
//! 5. the options are validated, then the instrument is built

use dashmap::DashMap;
use hal_core::{
    DriverFactory, GateOutcome, HalError, HalResult, InstrumentFamily, InstrumentHandle,
};
use hal_driver_fake::FactoryRegistry;
use std::fmt::Write as _;
use tracing::info;

use crate::config::InstrumentConfig;

// =============================================================================
// Catalog
// =============================================================================

/// Availability of a registered driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverStatus {
    /// Constructible
    Enabled,
    /// Capability gate closed
    Disabled {
        /// Unresolved dependencies
        missing: Vec<String>,
    },
    /// Capability gate declared without dependencies
    Malformed,
}

impl DriverStatus {
    /// True for [`DriverStatus::Enabled`].
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Catalog entry for one registered driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    /// Driver type, as written in configuration files
    pub driver_type: String,
    /// Human-readable name
    pub name: String,
    /// Family of the instruments it builds
    pub family: InstrumentFamily,
    /// Optional dependencies declared by its gate
    pub requires: Vec<String>,
    /// Current availability
    pub status: DriverStatus,
    /// True if `driver = "fake"` resolves to it
    pub designated_fake: bool,
}

// =============================================================================
// Driver Registry
// =============================================================================

/// Registry of driver factories.
///
/// Factories are registered once at startup. Registration takes `&self` so
/// driver crates can register against a shared registry.
#[derive(Default)]
pub struct DriverRegistry {
    /// Registered driver factories by driver_type (thread-safe via DashMap)
    factories: DashMap<String, Box<dyn DriverFactory>>,

    /// Designated fake driver_type per family
    fakes: DashMap<InstrumentFamily, &'static str>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every fake driver, designated per family.
    pub fn with_fakes() -> Self {
        let registry = Self::new();
        hal_driver_fake::register_all(&registry);
        registry
    }

    /// Register a driver factory.
    ///
    /// Returns the previous factory for this driver_type, if any was registered.
    pub fn register_factory(
        &self,
        factory: Box<dyn DriverFactory>,
    ) -> Option<Box<dyn DriverFactory>> {
        let driver_type = factory.driver_type().to_string();
        info!(
            driver_type = %driver_type,
            name = %factory.name(),
            family = %factory.family(),
            gated = factory.gate().is_some(),
            "Registering driver factory"
        );
        self.factories.insert(driver_type, factory)
    }

    /// Make `driver_type` the fake used for `driver = "fake"` in `family`.
    ///
    /// Returns the previously designated driver type, if any.
    pub fn designate_fake(
        &self,
        family: InstrumentFamily,
        driver_type: &'static str,
    ) -> Option<&'static str> {
        info!(%family, driver_type, "Designating fake driver");
        self.fakes.insert(family, driver_type)
    }

    /// Check if a factory is registered for a driver type.
    pub fn has_factory(&self, driver_type: &str) -> bool {
        self.factories.contains_key(driver_type)
    }

    /// Designated fake of `family`, if any.
    pub fn designated_fake(&self, family: InstrumentFamily) -> Option<&'static str> {
        self.fakes.get(&family).map(|entry| *entry.value())
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// True if no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Concrete driver type for an instrument configuration.
    pub fn resolve_driver(&self, config: &InstrumentConfig) -> HalResult<String> {
        if config.is_fake() {
            self.designated_fake(config.family)
                .map(str::to_string)
                .ok_or(HalError::NoFakeDesignated(config.family))
        } else {
            Ok(config.driver.clone())
        }
    }

    /// Build the instrument described by `config`.
    ///
    /// # Errors
    /// - [`HalError::NoFakeDesignated`] for `driver = "fake"` without designated fake
    /// - [`HalError::UnknownDriver`] if no factory has that driver type
    /// - [`HalError::FamilyMismatch`] if the driver builds another family
    /// - [`HalError::MissingDependencies`] if the driver's gate is closed
    /// - whatever the factory reports from `validate` or `build`
    pub fn build(&self, config: &InstrumentConfig) -> HalResult<InstrumentHandle> {
        let driver_type = self.resolve_driver(config)?;
        let factory = self
            .factories
            .get(&driver_type)
            .ok_or_else(|| HalError::UnknownDriver(driver_type.clone()))?;

        if factory.family() != config.family {
            return Err(HalError::FamilyMismatch {
                driver: driver_type,
                expected: config.family,
                actual: factory.family(),
            });
        }

        if let Some(gate) = factory.gate() {
            gate.ensure()?;
        }

        let driver_config = config.driver_config();
        factory.validate(&driver_config)?;
        let handle = factory.build(driver_config)?;
        handle.expect_family(&driver_type, config.family)?;

        info!(
            id = %config.id,
            driver_type = %driver_type,
            instrument = %handle,
            "Instrument built"
        );
        Ok(handle)
    }

    /// Every registered driver, sorted by family then driver type.
    ///
    /// Reading the status evaluates the capability gates that were not
    /// evaluated yet, with the process-wide resolver.
    pub fn catalog(&self) -> Vec<DriverInfo> {
        let mut catalog: Vec<DriverInfo> = self
            .factories
            .iter()
            .map(|entry| {
                let factory = entry.value();
                let (requires, status) = match factory.gate() {
                    None => (Vec::new(), DriverStatus::Enabled),
                    Some(gate) => {
                        let requires = gate.requires().iter().map(|d| d.to_string()).collect();
                        let status = match gate.outcome() {
                            GateOutcome::Enabled => DriverStatus::Enabled,
                            GateOutcome::Disabled { missing } => DriverStatus::Disabled {
                                missing: missing.clone(),
                            },
                            GateOutcome::Malformed => DriverStatus::Malformed,
                        };
                        (requires, status)
                    }
                };
                DriverInfo {
                    driver_type: factory.driver_type().to_string(),
                    name: factory.name().to_string(),
                    family: factory.family(),
                    requires,
                    status,
                    designated_fake: self.designated_fake(factory.family())
                        == Some(factory.driver_type()),
                }
            })
            .collect();
        catalog.sort_by(|a, b| {
            a.family
                .cmp(&b.family)
                .then_with(|| a.driver_type.cmp(&b.driver_type))
        });
        catalog
    }

    /// Human-readable catalog, grouped by family.
    pub fn catalog_report(&self) -> String {
        let mut report = String::new();
        let mut current: Option<InstrumentFamily> = None;
        for info in self.catalog() {
            if current != Some(info.family) {
                if current.is_some() {
                    report.push('\n');
                }
                let _ = writeln!(report, "{}", info.family);
                current = Some(info.family);
            }
            let marker = if info.designated_fake { " [fake]" } else { "" };
            let status = match &info.status {
                DriverStatus::Enabled => String::new(),
                DriverStatus::Disabled { missing } => {
                    format!("  DISABLED (missing: {})", missing.join(", "))
                }
                DriverStatus::Malformed => "  DISABLED (gate without dependencies)".to_string(),
            };
            let _ = writeln!(
                report,
                "  {:<32} {}{}{}",
                info.driver_type, info.name, marker, status
            );
        }
        report
    }
}

impl FactoryRegistry for DriverRegistry {
    fn register_factory(&self, factory: Box<dyn DriverFactory>) {
        DriverRegistry::register_factory(self, factory);
    }

    fn designate_fake(&self, family: InstrumentFamily, driver_type: &'static str) {
        DriverRegistry::designate_fake(self, family, driver_type);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_fakes_covers_every_family() {
        let registry = DriverRegistry::with_fakes();
        for family in InstrumentFamily::ALL {
            assert!(registry.designated_fake(family).is_some(), "{}", family);
        }
        assert!(registry.has_factory("replay_adc"));
        assert_eq!(registry.len(), 13);
    }

    #[test]
    fn test_fake_resolution() {
        let registry = DriverRegistry::with_fakes();
        let config = InstrumentConfig::fake("laser", InstrumentFamily::Laser);
        assert_eq!(registry.resolve_driver(&config).unwrap(), "fake_laser");

        let handle = registry.build(&config).unwrap();
        assert_eq!(handle.family(), InstrumentFamily::Laser);
    }

    #[test]
    fn test_no_fake_designated() {
        let registry = DriverRegistry::new();
        let config = InstrumentConfig::fake("voa", InstrumentFamily::Voa);
        assert!(matches!(
            registry.build(&config),
            Err(HalError::NoFakeDesignated(InstrumentFamily::Voa))
        ));
    }

    #[test]
    fn test_unknown_driver() {
        let registry = DriverRegistry::with_fakes();
        let config =
            InstrumentConfig::fake("voa", InstrumentFamily::Voa).with_driver("thorlabs_v1000");
        let err = registry.build(&config).unwrap_err();
        assert!(matches!(err, HalError::UnknownDriver(ref t) if t == "thorlabs_v1000"));
    }

    #[test]
    fn test_family_mismatch() {
        let registry = DriverRegistry::with_fakes();
        let config =
            InstrumentConfig::fake("laser", InstrumentFamily::Laser).with_driver("fake_voa");
        assert!(matches!(
            registry.build(&config),
            Err(HalError::FamilyMismatch {
                expected: InstrumentFamily::Laser,
                actual: InstrumentFamily::Voa,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let registry = DriverRegistry::with_fakes();
        let config = InstrumentConfig::fake("pm", InstrumentFamily::PowerMeter)
            .with_option("power", "lots");
        assert!(registry.build(&config).is_err());
    }

    #[test]
    fn test_catalog_sorted_and_marked() {
        let registry = DriverRegistry::with_fakes();
        let catalog = registry.catalog();
        assert_eq!(catalog.len(), 13);

        assert_eq!(catalog[0].family, InstrumentFamily::Adc);
        assert_eq!(catalog[0].driver_type, "fake_adc");
        assert!(catalog[0].designated_fake);
        assert_eq!(catalog[1].driver_type, "replay_adc");
        assert!(!catalog[1].designated_fake);
        assert!(catalog.iter().all(|info| info.status.is_enabled()));

        let report = registry.catalog_report();
        assert!(report.starts_with("ADC\n"));
        assert!(report.contains("fake_voa"));
        assert!(report.contains("[fake]"));
    }
}
